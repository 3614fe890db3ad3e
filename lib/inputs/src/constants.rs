// SPDX-FileCopyrightText: Copyright (c) 2024-2025 NVIDIA CORPORATION & AFFILIATES. All rights reserved.
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

/// Sentinel mean meaning "no output length was requested".
pub const DEFAULT_OUTPUT_TOKENS_MEAN: i64 = -1;

pub const DEFAULT_OUTPUT_TOKENS_STDDEV: f64 = 0.0;

/// Lower bound applied to every sampled output length
pub const MIN_OUTPUT_TOKENS: f64 = 1.0;

/// The TensorRT-LLM backend requires `max_tokens` on every request.
pub const DEFAULT_TENSORRTLLM_MAX_TOKENS: i64 = 256;

pub const DEFAULT_RANDOM_SEED: u64 = 0;

/// Field holding the prompt text(s) of a request
pub const TEXT_INPUT_KEY: &str = "text_input";
pub const STREAM_KEY: &str = "stream";
pub const MAX_TOKENS_KEY: &str = "max_tokens";
pub const MIN_LENGTH_KEY: &str = "min_length";
pub const MODEL_KEY: &str = "model";
pub const TIMESTAMP_KEY: &str = "timestamp";

/// Default file name of the exported request bodies
pub const DEFAULT_INPUTS_FILENAME: &str = "inputs.json";

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

//! # Perf Inputs
//!
//! Turns an already-materialized [`GenericDataset`] into the request bodies sent to an
//! inference server during a benchmark run. Each output format has its own
//! [`PayloadConverter`]; [`create_request_body`] validates the [`InputsConfig`] against the
//! chosen converter and then converts every row into one request payload.

pub mod config;
pub mod constants;
pub mod converters;
pub mod dataset;
pub mod error;
pub mod logging;
pub mod sampling;

pub use config::{InputsConfig, InputsConfigBuilder, ModelSelectionStrategy, OutputFormat};
pub use converters::{create_request_body, Payload, PayloadConverter, RequestBody};
pub use dataset::{DataRow, FileData, GenericDataset};
pub use error::{InputsError, Result};
pub use sampling::{Sampler, SeededSampler};

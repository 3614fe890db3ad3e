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

use serde_json::Value;

use super::{
    max_tokens, merge_field, merge_row_data, select_model_name, Payload, PayloadConverter,
    RequestBody,
};
use crate::config::{InputsConfig, OutputFormat};
use crate::constants::{
    DEFAULT_TENSORRTLLM_MAX_TOKENS, MAX_TOKENS_KEY, MIN_LENGTH_KEY, MODEL_KEY, STREAM_KEY,
    TEXT_INPUT_KEY,
};
use crate::dataset::GenericDataset;
use crate::error::{InputsError, Result};
use crate::sampling::Sampler;

/// Payloads for Triton running the TensorRT-LLM backend.
///
/// Request parameters are backend tensors, so each one is sent as a single element list.
/// Per-row `optional_data` is passed through as is.
#[derive(Debug, Default, Clone, Copy)]
pub struct TensorRtLlmConverter;

fn tensor(value: Value) -> Value {
    Value::Array(vec![value])
}

impl TensorRtLlmConverter {
    fn add_request_params(
        &self,
        payload: &mut Payload,
        config: &InputsConfig,
        sampler: &mut dyn Sampler,
    ) {
        if config.add_stream {
            payload.insert(STREAM_KEY.to_string(), tensor(Value::Bool(true)));
        }

        let max_tokens = max_tokens(config, sampler, DEFAULT_TENSORRTLLM_MAX_TOKENS);
        payload.insert(MAX_TOKENS_KEY.to_string(), tensor(Value::from(max_tokens)));
        if config.output_tokens_deterministic {
            payload.insert(MIN_LENGTH_KEY.to_string(), tensor(Value::from(max_tokens)));
        }

        for (key, value) in &config.extra_inputs {
            merge_field(payload, key, tensor(value.clone()));
        }
    }
}

impl PayloadConverter for TensorRtLlmConverter {
    fn output_format(&self) -> OutputFormat {
        OutputFormat::TensorRtLlm
    }

    fn check_config(&self, config: &InputsConfig) -> Result<()> {
        if config.output_tokens_deterministic && !config.has_output_tokens_mean() {
            return Err(InputsError::configuration(
                "The output-tokens-deterministic option requires output_tokens_mean to be set",
            ));
        }
        Ok(())
    }

    fn convert(
        &self,
        dataset: &GenericDataset,
        config: &InputsConfig,
        sampler: &mut dyn Sampler,
    ) -> Result<RequestBody> {
        let mut request_body = RequestBody::default();

        for (index, row) in dataset.rows() {
            let model_name = select_model_name(config, index, sampler)?;

            let mut payload = Payload::new();
            payload.insert(MODEL_KEY.to_string(), Value::from(model_name));
            payload.insert(TEXT_INPUT_KEY.to_string(), Value::from(row.texts.clone()));

            self.add_request_params(&mut payload, config, sampler);
            merge_row_data(&mut payload, row, |ts| tensor(Value::from(ts)));

            request_body.data.push(payload);
        }

        Ok(request_body)
    }
}

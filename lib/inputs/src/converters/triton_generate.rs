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

use super::{max_tokens, merge_field, merge_row_data, Payload, PayloadConverter, RequestBody};
use crate::config::{InputsConfig, OutputFormat};
use crate::constants::{DEFAULT_OUTPUT_TOKENS_MEAN, MAX_TOKENS_KEY, STREAM_KEY, TEXT_INPUT_KEY};
use crate::dataset::GenericDataset;
use crate::error::{InputsError, Result};
use crate::sampling::Sampler;

/// Payloads for the Triton `generate` endpoint.
///
/// The model is part of the endpoint URL, so the payload only carries the prompt and the
/// request parameters. `max_tokens` is left out unless an output length was requested.
#[derive(Debug, Default, Clone, Copy)]
pub struct TritonGenerateConverter;

impl TritonGenerateConverter {
    fn add_request_params(
        &self,
        payload: &mut Payload,
        config: &InputsConfig,
        sampler: &mut dyn Sampler,
    ) {
        if config.add_stream {
            payload.insert(STREAM_KEY.to_string(), Value::Bool(true));
        }

        let max_tokens = max_tokens(config, sampler, DEFAULT_OUTPUT_TOKENS_MEAN);
        if max_tokens != DEFAULT_OUTPUT_TOKENS_MEAN {
            payload.insert(MAX_TOKENS_KEY.to_string(), Value::from(max_tokens));
        }

        for (key, value) in &config.extra_inputs {
            merge_field(payload, key, value.clone());
        }
    }
}

impl PayloadConverter for TritonGenerateConverter {
    fn output_format(&self) -> OutputFormat {
        OutputFormat::TritonGenerate
    }

    fn check_config(&self, config: &InputsConfig) -> Result<()> {
        if config.output_tokens_deterministic {
            return Err(InputsError::configuration(
                "The output-tokens-deterministic option is not supported for Triton Generate; \
                 it requires a sampled output length",
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

        for (_, row) in dataset.rows() {
            let mut payload = Payload::new();
            payload.insert(TEXT_INPUT_KEY.to_string(), Value::from(row.texts.clone()));

            self.add_request_params(&mut payload, config, sampler);
            merge_row_data(&mut payload, row, Value::from);

            request_body.data.push(payload);
        }

        Ok(request_body)
    }
}

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

//! # Payload Converters
//!
//! A converter turns every [`DataRow`] of a [`GenericDataset`] into exactly one request payload
//! for a given server API. Payloads are assembled from layers, each one overwriting the keys of
//! the layers before it:
//!
//! 1. base fields (the prompt under `text_input`, plus `model` where the format needs it)
//! 2. computed request parameters (`stream`, `max_tokens`, ...)
//! 3. [`InputsConfig::extra_inputs`]
//! 4. the row's `optional_data`, then its `timestamp`
//!
//! The prompt is never overwritten; a layer that tries is logged and skipped for that key.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing as log;

use crate::config::{InputsConfig, ModelSelectionStrategy, OutputFormat};
use crate::constants::{MIN_OUTPUT_TOKENS, TEXT_INPUT_KEY, TIMESTAMP_KEY};
use crate::dataset::{DataRow, GenericDataset};
use crate::error::{InputsError, Result};
use crate::sampling::Sampler;

mod tensorrtllm;
mod triton_generate;

pub use tensorrtllm::TensorRtLlmConverter;
pub use triton_generate::TritonGenerateConverter;

/// A single request body for one row
pub type Payload = Map<String, Value>;

/// All payloads of a dataset, in row order
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct RequestBody {
    pub data: Vec<Payload>,
}

impl RequestBody {
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Write the request bodies as pretty printed JSON
    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }
}

pub trait PayloadConverter {
    fn output_format(&self) -> OutputFormat;

    /// Reject configurations this output format cannot express. Called before [`Self::convert`].
    fn check_config(&self, config: &InputsConfig) -> Result<()>;

    /// Build one payload per row, preserving file then row order.
    fn convert(
        &self,
        dataset: &GenericDataset,
        config: &InputsConfig,
        sampler: &mut dyn Sampler,
    ) -> Result<RequestBody>;
}

impl OutputFormat {
    pub fn converter(&self) -> Box<dyn PayloadConverter> {
        match self {
            OutputFormat::TritonGenerate => Box::new(TritonGenerateConverter),
            OutputFormat::TensorRtLlm => Box::new(TensorRtLlmConverter),
        }
    }
}

/// Validate `config` against the converter of its output format, then convert `dataset`.
///
/// Nothing is converted when the configuration is rejected.
pub fn create_request_body(
    dataset: &GenericDataset,
    config: &InputsConfig,
    sampler: &mut dyn Sampler,
) -> Result<RequestBody> {
    let converter = config.output_format.converter();
    converter.check_config(config)?;

    let request_body = converter.convert(dataset, config, sampler)?;
    log::debug!(
        output_format = %config.output_format,
        files = dataset.files_data.len(),
        requests = request_body.len(),
        "converted dataset"
    );
    Ok(request_body)
}

/// Output length for one request: `default` unless the user asked for a specific mean, in
/// which case a value is drawn from the configured bounded normal distribution.
pub(crate) fn max_tokens(config: &InputsConfig, sampler: &mut dyn Sampler, default: i64) -> i64 {
    if !config.has_output_tokens_mean() {
        return default;
    }
    sampler.bounded_normal(
        config.output_tokens_mean as f64,
        config.output_tokens_stddev,
        MIN_OUTPUT_TOKENS,
    ) as i64
}

/// Pick the model for the row at `index` within its file
pub(crate) fn select_model_name<'a>(
    config: &'a InputsConfig,
    index: usize,
    sampler: &mut dyn Sampler,
) -> Result<&'a str> {
    let models = &config.model_name;
    if models.is_empty() {
        return Err(InputsError::MissingModelName);
    }
    let selected = match config.model_selection_strategy {
        ModelSelectionStrategy::RoundRobin => index % models.len(),
        ModelSelectionStrategy::Random => sampler.index(models.len()),
    };
    Ok(models[selected].as_str())
}

/// Insert `value` under `key`, overwriting earlier layers but never the prompt.
pub(crate) fn merge_field(payload: &mut Payload, key: &str, value: Value) {
    if key == TEXT_INPUT_KEY {
        log::warn!(key, "ignoring override of the prompt field");
        return;
    }
    payload.insert(key.to_string(), value);
}

/// Apply the row layer: `optional_data` verbatim, then the timestamp shaped by `timestamp`.
pub(crate) fn merge_row_data(
    payload: &mut Payload,
    row: &DataRow,
    timestamp: impl FnOnce(i64) -> Value,
) {
    for (key, value) in &row.optional_data {
        merge_field(payload, key, value.clone());
    }
    if let Some(ts) = row.timestamp {
        merge_field(payload, TIMESTAMP_KEY, timestamp(ts));
    }
}

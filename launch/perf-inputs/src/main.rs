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

use anyhow::Context as _;
use clap::Parser;

use perf_inputs::{create_request_body, logging, GenericDataset, InputsConfig, SeededSampler};

mod flags;
use flags::Flags;

fn main() -> anyhow::Result<()> {
    logging::init();

    let flags = Flags::parse();

    // Defaults, then PERF_INPUTS_CONFIG_PATH, then PERF_INPUTS_* env, then flags.
    let mut config = InputsConfig::from_settings()?;
    flags.apply(&mut config);
    config.validate_settings()?;

    let dataset = GenericDataset::from_file(&flags.input_file)
        .with_context(|| flags.input_file.display().to_string())?;
    tracing::info!(
        files = dataset.files_data.len(),
        rows = dataset.num_rows(),
        output_format = %config.output_format,
        "Loaded dataset"
    );

    let mut sampler = SeededSampler::new(config.random_seed);
    let request_body = create_request_body(&dataset, &config, &mut sampler)?;

    request_body
        .write_to_file(&flags.output_file)
        .with_context(|| flags.output_file.display().to_string())?;
    tracing::info!(
        requests = request_body.len(),
        "Wrote request bodies to {}",
        flags.output_file.display()
    );

    Ok(())
}

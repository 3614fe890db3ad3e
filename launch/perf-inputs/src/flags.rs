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

use std::path::PathBuf;

use perf_inputs::constants::DEFAULT_INPUTS_FILENAME;
use perf_inputs::{InputsConfig, ModelSelectionStrategy, OutputFormat};
use serde_json::Value;

/// Flags override whatever `InputsConfig::from_settings` loaded from files and env.
#[derive(clap::Parser, Debug, Clone)]
#[command(version, about, long_about = None)]
pub struct Flags {
    /// A dataset in its JSON form: `{"files_data": {"<file>": {"rows": [...]}}}`
    #[arg(long)]
    pub input_file: PathBuf,

    /// Where to write the request bodies
    #[arg(long, default_value = DEFAULT_INPUTS_FILENAME)]
    pub output_file: PathBuf,

    /// triton_generate or tensorrtllm
    #[arg(long, value_parser = parse_output_format)]
    pub output_format: Option<OutputFormat>,

    /// Model to target. Repeat the flag to spread requests over several models.
    #[arg(long = "model")]
    pub model_name: Vec<String>,

    /// round_robin or random
    #[arg(long, value_parser = parse_model_selection_strategy)]
    pub model_selection_strategy: Option<ModelSelectionStrategy>,

    /// Ask the server to stream responses
    #[arg(long)]
    pub streaming: bool,

    /// Extra `KEY:VALUE` pair added to every request. VALUE is parsed as JSON when it can be,
    /// otherwise it is sent as a string. Repeatable.
    #[arg(long = "extra-inputs", value_parser = parse_extra_input)]
    pub extra_inputs: Vec<(String, Value)>,

    /// Mean number of output tokens
    #[arg(long)]
    pub output_tokens_mean: Option<i64>,

    /// Standard deviation of the number of output tokens
    #[arg(long)]
    pub output_tokens_stddev: Option<f64>,

    /// Require exactly the sampled number of output tokens
    #[arg(long)]
    pub output_tokens_deterministic: bool,

    #[arg(long)]
    pub random_seed: Option<u64>,
}

impl Flags {
    /// Layer the flags that were given on top of `config`
    pub fn apply(&self, config: &mut InputsConfig) {
        if let Some(output_format) = self.output_format {
            config.output_format = output_format;
        }
        if !self.model_name.is_empty() {
            config.model_name = self.model_name.clone();
        }
        if let Some(strategy) = self.model_selection_strategy {
            config.model_selection_strategy = strategy;
        }
        if self.streaming {
            config.add_stream = true;
        }
        for (key, value) in &self.extra_inputs {
            config.extra_inputs.insert(key.clone(), value.clone());
        }
        if let Some(mean) = self.output_tokens_mean {
            config.output_tokens_mean = mean;
        }
        if let Some(stddev) = self.output_tokens_stddev {
            config.output_tokens_stddev = stddev;
        }
        if self.output_tokens_deterministic {
            config.output_tokens_deterministic = true;
        }
        if let Some(seed) = self.random_seed {
            config.random_seed = seed;
        }
    }
}

fn parse_output_format(s: &str) -> Result<OutputFormat, String> {
    s.parse().map_err(|e| format!("{e}"))
}

fn parse_model_selection_strategy(s: &str) -> Result<ModelSelectionStrategy, String> {
    s.parse().map_err(|e| format!("{e}"))
}

fn parse_extra_input(s: &str) -> Result<(String, Value), String> {
    let Some((key, value)) = s.split_once(':') else {
        return Err(format!("Invalid extra input '{s}'. Expected KEY:VALUE"));
    };
    if key.is_empty() {
        return Err(format!("Invalid extra input '{s}'. KEY must not be empty"));
    }
    let value =
        serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use serde_json::json;

    #[test]
    fn test_parse_extra_input() {
        assert_eq!(
            parse_extra_input("max_tokens:1234").unwrap(),
            ("max_tokens".to_string(), json!(1234))
        );
        assert_eq!(
            parse_extra_input("ignore_eos:true").unwrap(),
            ("ignore_eos".to_string(), json!(true))
        );
        assert_eq!(
            parse_extra_input("additional_key:additional_value").unwrap(),
            ("additional_key".to_string(), json!("additional_value"))
        );
        assert_eq!(
            parse_extra_input("url:http://host:8000").unwrap(),
            ("url".to_string(), json!("http://host:8000"))
        );
        assert!(parse_extra_input("no_separator").is_err());
        assert!(parse_extra_input(":value").is_err());
    }

    #[test]
    fn test_apply_overrides_config() {
        let flags = Flags::try_parse_from([
            "perf-inputs",
            "--input-file",
            "dataset.json",
            "--output-format",
            "tensorrtllm",
            "--model",
            "a",
            "--model",
            "b",
            "--streaming",
            "--extra-inputs",
            "ignore_eos:true",
            "--output-tokens-mean",
            "128",
        ])
        .unwrap();

        let mut config = InputsConfig::default();
        flags.apply(&mut config);

        assert_eq!(config.output_format, OutputFormat::TensorRtLlm);
        assert_eq!(config.model_name, vec!["a".to_string(), "b".to_string()]);
        assert!(config.add_stream);
        assert_eq!(config.extra_inputs["ignore_eos"], json!(true));
        assert_eq!(config.output_tokens_mean, 128);
        assert_eq!(flags.output_file, PathBuf::from(DEFAULT_INPUTS_FILENAME));
    }

    #[test]
    fn test_apply_keeps_loaded_values() {
        let flags = Flags::try_parse_from(["perf-inputs", "--input-file", "dataset.json"]).unwrap();

        let mut config = InputsConfig::default();
        config.add_stream = true;
        config.model_name = vec!["gpt2".to_string()];
        flags.apply(&mut config);

        assert!(config.add_stream);
        assert_eq!(config.model_name, vec!["gpt2".to_string()]);
    }

    #[test]
    fn test_unknown_output_format() {
        let result = Flags::try_parse_from([
            "perf-inputs",
            "--input-file",
            "dataset.json",
            "--output-format",
            "openai",
        ]);
        assert!(result.is_err());
    }
}

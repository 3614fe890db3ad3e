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

use std::fmt;
use std::str::FromStr;

use derive_builder::Builder;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::{Validate, ValidationError};

use crate::constants::{
    DEFAULT_OUTPUT_TOKENS_MEAN, DEFAULT_OUTPUT_TOKENS_STDDEV, DEFAULT_RANDOM_SEED,
};
use crate::error::{InputsError, Result};

/// ENV pointing at an optional TOML file with [`InputsConfig`] settings
pub const CONFIG_PATH_ENV: &str = "PERF_INPUTS_CONFIG_PATH";

/// Prefix of the environment variables read by [`InputsConfig::from_settings`]
pub const ENV_PREFIX: &str = "PERF_INPUTS_";

/// Request body shape produced for the target server
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// Triton `generate` endpoint
    #[default]
    TritonGenerate,

    /// Triton with the TensorRT-LLM backend; every field is sent as a tensor (a list)
    #[serde(rename = "tensorrtllm")]
    TensorRtLlm,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::TritonGenerate => "triton_generate",
            OutputFormat::TensorRtLlm => "tensorrtllm",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = InputsError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "triton_generate" => Ok(OutputFormat::TritonGenerate),
            "tensorrtllm" => Ok(OutputFormat::TensorRtLlm),
            _ => Err(InputsError::configuration(format!(
                "Unknown output format '{s}'. Expected one of: triton_generate, tensorrtllm"
            ))),
        }
    }
}

/// How a model name is picked for each request when several are configured
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ModelSelectionStrategy {
    #[default]
    RoundRobin,
    Random,
}

impl FromStr for ModelSelectionStrategy {
    type Err = InputsError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "round_robin" => Ok(ModelSelectionStrategy::RoundRobin),
            "random" => Ok(ModelSelectionStrategy::Random),
            _ => Err(InputsError::configuration(format!(
                "Unknown model selection strategy '{s}'. Expected one of: round_robin, random"
            ))),
        }
    }
}

/// Global request-shaping knobs shared by every converter.
///
/// The configuration is read-only once built; converters never mutate it.
#[derive(Serialize, Deserialize, Validate, Debug, Builder, Clone, PartialEq)]
#[builder(build_fn(private, name = "build_internal"), derive(Debug))]
#[validate(schema(function = "validate_inputs_config", skip_on_field_errors = true))]
#[serde(default)]
pub struct InputsConfig {
    /// Ask the server to stream the response
    #[builder(default)]
    pub add_stream: bool,

    /// Key/value pairs merged into every request payload
    #[builder(default)]
    pub extra_inputs: Map<String, Value>,

    /// Models to target; only formats that name the model in the payload need one
    #[builder(default, setter(into))]
    pub model_name: Vec<String>,

    #[builder(default)]
    pub model_selection_strategy: ModelSelectionStrategy,

    #[builder(default)]
    pub output_format: OutputFormat,

    /// Mean number of output tokens; [`DEFAULT_OUTPUT_TOKENS_MEAN`] means not requested
    #[builder(default = "DEFAULT_OUTPUT_TOKENS_MEAN")]
    pub output_tokens_mean: i64,

    #[validate(range(min = 0.0))]
    #[builder(default = "DEFAULT_OUTPUT_TOKENS_STDDEV")]
    pub output_tokens_stddev: f64,

    /// Force the server to generate exactly the requested number of tokens
    #[builder(default)]
    pub output_tokens_deterministic: bool,

    /// Seed of the sampler used for output lengths and random model selection
    #[builder(default = "DEFAULT_RANDOM_SEED")]
    pub random_seed: u64,
}

impl Default for InputsConfig {
    fn default() -> Self {
        InputsConfig {
            add_stream: false,
            extra_inputs: Map::new(),
            model_name: Vec::new(),
            model_selection_strategy: ModelSelectionStrategy::default(),
            output_format: OutputFormat::default(),
            output_tokens_mean: DEFAULT_OUTPUT_TOKENS_MEAN,
            output_tokens_stddev: DEFAULT_OUTPUT_TOKENS_STDDEV,
            output_tokens_deterministic: false,
            random_seed: DEFAULT_RANDOM_SEED,
        }
    }
}

fn validate_inputs_config(config: &InputsConfig) -> Result<(), ValidationError> {
    if config.output_tokens_mean != DEFAULT_OUTPUT_TOKENS_MEAN && config.output_tokens_mean < 1 {
        return Err(ValidationError::new(
            "output_tokens_mean must be at least 1 when set",
        ));
    }
    Ok(())
}

impl InputsConfig {
    pub fn builder() -> InputsConfigBuilder {
        InputsConfigBuilder::default()
    }

    /// True when the user asked for a specific output length
    pub fn has_output_tokens_mean(&self) -> bool {
        self.output_tokens_mean != DEFAULT_OUTPUT_TOKENS_MEAN
    }

    pub(crate) fn figment() -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(InputsConfig::default()));
        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            figment = figment.merge(Toml::file(path));
        }
        figment.merge(Env::prefixed(ENV_PREFIX))
    }

    /// Load the inputs configuration from the environment and configuration files
    /// Configuration is priorities in the following order, where the last has the lowest priority:
    /// 1. Environment variables prefixed with `PERF_INPUTS_` (top priority)
    /// 2. The TOML file named by `PERF_INPUTS_CONFIG_PATH`, if set
    /// 3. Built-in defaults
    pub fn from_settings() -> Result<InputsConfig> {
        let config: InputsConfig = Self::figment().extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate a configuration whose fields were changed after it was loaded
    pub fn validate_settings(&self) -> Result<()> {
        self.validate()?;
        Ok(())
    }
}

impl InputsConfigBuilder {
    /// Add a single key/value pair to `extra_inputs`
    pub fn extra_input(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.extra_inputs
            .get_or_insert_with(Map::new)
            .insert(key.into(), value.into());
        self
    }

    /// Build and validate the inputs configuration
    pub fn build(&self) -> Result<InputsConfig> {
        let config = self.build_internal()?;
        config.validate()?;
        Ok(config)
    }
}

/// Check if an environment variable is truthy
pub fn env_is_truthy(env: &str) -> bool {
    match std::env::var(env) {
        Ok(val) => is_truthy(val.as_str()),
        Err(_) => false,
    }
}

/// Check if a string is truthy
pub fn is_truthy(val: &str) -> bool {
    matches!(val.to_lowercase().as_str(), "1" | "true" | "on" | "yes")
}

/// Check whether JSONL logging enabled
/// Set the `PERF_INPUTS_LOGGING_JSONL` environment variable a [`is_truthy`] value
pub fn jsonl_logging_enabled() -> bool {
    env_is_truthy("PERF_INPUTS_LOGGING_JSONL")
}

/// Check whether logging with ANSI terminal escape codes and colors is disabled.
/// Set the `PERF_INPUTS_DISABLE_ANSI_LOGGING` environment variable a [`is_truthy`] value
pub fn disable_ansi_logging() -> bool {
    env_is_truthy("PERF_INPUTS_DISABLE_ANSI_LOGGING")
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;
    use serde_json::json;

    #[test]
    fn test_builder_defaults() {
        let config = InputsConfig::builder().build().unwrap();
        assert_eq!(config, InputsConfig::default());
        assert!(!config.has_output_tokens_mean());
    }

    #[test]
    fn test_builder_extra_inputs() {
        let config = InputsConfig::builder()
            .extra_input("ignore_eos", true)
            .extra_input("max_tokens", 1234)
            .build()
            .unwrap();

        assert_eq!(config.extra_inputs.len(), 2);
        assert_eq!(config.extra_inputs["ignore_eos"], json!(true));
        assert_eq!(config.extra_inputs["max_tokens"], json!(1234));
    }

    #[test]
    fn test_builder_rejects_negative_stddev() {
        let err = InputsConfig::builder()
            .output_tokens_stddev(-1.0)
            .build()
            .unwrap_err();
        assert!(matches!(err, InputsError::Validation(_)));
    }

    #[test]
    fn test_builder_rejects_zero_mean() {
        let err = InputsConfig::builder()
            .output_tokens_mean(0)
            .build()
            .unwrap_err();
        assert!(matches!(err, InputsError::Validation(_)));
    }

    #[test]
    fn test_output_format_from_str() {
        assert_eq!(
            "tensorrtllm".parse::<OutputFormat>().unwrap(),
            OutputFormat::TensorRtLlm
        );
        assert_eq!(
            "triton_generate".parse::<OutputFormat>().unwrap(),
            OutputFormat::TritonGenerate
        );
        assert!("openai".parse::<OutputFormat>().is_err());
        assert_eq!(OutputFormat::TensorRtLlm.to_string(), "tensorrtllm");
    }

    #[test]
    fn test_from_settings_defaults() {
        Jail::expect_with(|_jail| {
            let config = InputsConfig::from_settings().unwrap();
            assert_eq!(config, InputsConfig::default());
            Ok(())
        });
    }

    #[test]
    fn test_from_settings_env_overrides_file() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "inputs.toml",
                r#"
                add_stream = true
                output_format = "tensorrtllm"
                model_name = ["gpt2"]
                output_tokens_mean = 100

                [extra_inputs]
                ignore_eos = true
                "#,
            )?;
            jail.set_env(CONFIG_PATH_ENV, "inputs.toml");
            jail.set_env("PERF_INPUTS_OUTPUT_TOKENS_MEAN", "200");

            let config = InputsConfig::from_settings().unwrap();
            assert!(config.add_stream);
            assert_eq!(config.output_format, OutputFormat::TensorRtLlm);
            assert_eq!(config.model_name, vec!["gpt2".to_string()]);
            assert_eq!(config.output_tokens_mean, 200);
            assert_eq!(config.extra_inputs["ignore_eos"], json!(true));
            Ok(())
        });
    }

    #[test]
    fn test_from_settings_validates() {
        Jail::expect_with(|jail| {
            jail.set_env("PERF_INPUTS_OUTPUT_TOKENS_STDDEV", "-3.0");
            assert!(InputsConfig::from_settings().is_err());
            Ok(())
        });
    }

    #[test]
    fn test_is_truthy() {
        assert!(is_truthy("1"));
        assert!(is_truthy("TRUE"));
        assert!(is_truthy("yes"));
        assert!(!is_truthy("0"));
        assert!(!is_truthy("off"));
    }
}

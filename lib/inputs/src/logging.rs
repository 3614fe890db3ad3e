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

//! Logging for the perf inputs tools.
//!
//! - Configuration loaded from:
//!   1. Environment variables (highest priority).
//!   2. Optional TOML file pointed to by the `PERF_INPUTS_LOGGING_CONFIG_PATH` environment variable.
//!
//! Logging can take two forms: `READABLE` or `JSONL`. The default is `READABLE`. `JSONL`
//! can be enabled by setting the `PERF_INPUTS_LOGGING_JSONL` environment variable to `1`.
//!
//! Filters can be configured using the `PERF_INPUTS_LOG` environment variable or by setting the
//! `log_filters` key in the TOML configuration file. The default log level is `info`.
//!
//! Example:
//! ```toml
//! log_level = "warn"
//!
//! [log_filters]
//! "perf_inputs::converters" = "debug"
//! ```

use std::collections::HashMap;
use std::sync::Once;

use figment::{
    providers::{Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use tracing_subscriber::filter::{Directive, LevelFilter};
use tracing_subscriber::fmt;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

/// ENV used to set the log level
const FILTER_ENV: &str = "PERF_INPUTS_LOG";

/// Default log level
const DEFAULT_FILTER_LEVEL: &str = "info";

/// ENV used to set the path to the logging configuration file
const CONFIG_PATH_ENV: &str = "PERF_INPUTS_LOGGING_CONFIG_PATH";

/// Once instance to ensure the logger is only initialized once
static INIT: Once = Once::new();

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct LoggingConfig {
    log_level: String,
    log_filters: HashMap<String, String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            log_level: DEFAULT_FILTER_LEVEL.to_string(),
            log_filters: HashMap::new(),
        }
    }
}

/// Initialize the logger
pub fn init() {
    INIT.call_once(|| {
        let config = load_config();

        let default_directive = config
            .log_level
            .parse::<Directive>()
            .unwrap_or_else(|_| LevelFilter::INFO.into());
        let mut filter_layer = EnvFilter::builder()
            .with_default_directive(default_directive)
            .with_env_var(FILTER_ENV)
            .from_env_lossy();

        for (module, level) in config.log_filters {
            match format!("{module}={level}").parse::<Directive>() {
                Ok(d) => {
                    filter_layer = filter_layer.add_directive(d);
                }
                Err(e) => {
                    eprintln!("Failed parsing filter '{level}' for module '{module}': {e}");
                }
            }
        }

        if crate::config::jsonl_logging_enabled() {
            let l = fmt::layer()
                .json()
                .with_ansi(false)
                .with_timer(TimeFormatter)
                .with_writer(std::io::stderr)
                .with_filter(filter_layer);
            tracing_subscriber::registry().with(l).init();
        } else {
            let l = fmt::layer()
                .compact()
                .with_ansi(!crate::config::disable_ansi_logging())
                .with_timer(TimeFormatter)
                .with_writer(std::io::stderr)
                .with_filter(filter_layer);
            tracing_subscriber::registry().with(l).init();
        }
    });
}

fn load_config() -> LoggingConfig {
    let mut figment = Figment::new().merge(Serialized::defaults(LoggingConfig::default()));
    if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
        figment = figment.merge(Toml::file(path));
    }

    match figment.extract() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid logging configuration, using defaults: {e}");
            LoggingConfig::default()
        }
    }
}

/// UTC timestamps with millisecond precision
struct TimeFormatter;

impl FormatTime for TimeFormatter {
    fn format_time(&self, w: &mut fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(
            w,
            "{}",
            chrono::Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ")
        )
    }
}

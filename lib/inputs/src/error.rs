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

//! Inputs Error

use crate::config::InputsConfigBuilderError;

pub type Result<T, E = InputsError> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum InputsError {
    /// The configuration asks for something the selected output format cannot express.
    /// Raised by [`crate::PayloadConverter::check_config`] before any row is converted.
    #[error("Configuration Error: {0}")]
    Configuration(String),

    /// Model selection was needed but the configuration names no model.
    #[error("At least one model name is required for this output format")]
    MissingModelName,

    #[error("Invalid configuration: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Failed to load settings: {0}")]
    Settings(Box<figment::Error>),

    #[error("Failed to build configuration: {0}")]
    Builder(#[from] InputsConfigBuilderError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serde Json Error: {0}")]
    SerdeJson(#[from] serde_json::Error),
}

impl From<figment::Error> for InputsError {
    fn from(err: figment::Error) -> Self {
        InputsError::Settings(Box::new(err))
    }
}

impl InputsError {
    pub fn configuration(msg: impl Into<String>) -> Self {
        InputsError::Configuration(msg.into())
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, InputsError::Configuration(_))
    }
}

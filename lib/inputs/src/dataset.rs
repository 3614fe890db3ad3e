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

//! Dataset shapes handed to the converters.
//!
//! Retrieval and parsing of the various dataset sources happens upstream; by the time the data
//! reaches this crate every source has been reduced to rows of prompts grouped per file.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Result;

/// One logical request: the prompt text(s) plus optional per-row metadata
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct DataRow {
    #[serde(default)]
    pub texts: Vec<String>,

    /// Time offset at which the request should be issued
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,

    /// Per-row payload parameters, e.g. `session_id`. These take precedence over every other
    /// field of the payload except the prompt itself.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub optional_data: Map<String, Value>,
}

impl DataRow {
    pub fn new<S: Into<String>>(texts: impl IntoIterator<Item = S>) -> Self {
        DataRow {
            texts: texts.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    pub fn with_timestamp(mut self, timestamp: i64) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn with_optional_data(mut self, optional_data: Map<String, Value>) -> Self {
        self.optional_data = optional_data;
        self
    }
}

/// The rows read from a single input source, in the order they were read
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct FileData {
    #[serde(default)]
    pub rows: Vec<DataRow>,
}

impl FileData {
    pub fn new(rows: Vec<DataRow>) -> Self {
        FileData { rows }
    }
}

/// Every input source keyed by its file identifier.
///
/// Files are visited in key order, rows in their stored order.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct GenericDataset {
    #[serde(default)]
    pub files_data: BTreeMap<String, FileData>,
}

impl GenericDataset {
    pub fn new(files_data: impl IntoIterator<Item = (String, FileData)>) -> Self {
        GenericDataset {
            files_data: files_data.into_iter().collect(),
        }
    }

    /// Load a dataset previously saved in its JSON form
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let dataset: GenericDataset = serde_json::from_str(&contents)?;
        Ok(dataset)
    }

    /// All rows in conversion order, paired with their index inside their file
    pub fn rows(&self) -> impl Iterator<Item = (usize, &DataRow)> {
        self.files_data
            .values()
            .flat_map(|file_data| file_data.rows.iter().enumerate())
    }

    pub fn num_rows(&self) -> usize {
        self.files_data.values().map(|f| f.rows.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.num_rows() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rows_follow_file_then_row_order() {
        let dataset = GenericDataset::new([
            (
                "file2".to_string(),
                FileData::new(vec![DataRow::new(["c"])]),
            ),
            (
                "file1".to_string(),
                FileData::new(vec![DataRow::new(["a"]), DataRow::new(["b"])]),
            ),
        ]);

        let rows: Vec<_> = dataset
            .rows()
            .map(|(index, row)| (index, row.texts[0].as_str()))
            .collect();
        assert_eq!(rows, vec![(0, "a"), (1, "b"), (0, "c")]);
        assert_eq!(dataset.num_rows(), 3);
    }

    #[test]
    fn test_deserialize_defaults() {
        let dataset: GenericDataset = serde_json::from_value(json!({
            "files_data": {
                "file1": {
                    "rows": [
                        {"texts": ["text input one"]},
                        {"texts": ["text input two"], "timestamp": 12, "optional_data": {"session_id": "abcd"}}
                    ]
                }
            }
        }))
        .unwrap();

        let rows = &dataset.files_data["file1"].rows;
        assert_eq!(rows[0], DataRow::new(["text input one"]));
        assert_eq!(rows[1].timestamp, Some(12));
        assert_eq!(rows[1].optional_data["session_id"], json!("abcd"));
    }

    #[test]
    fn test_empty_dataset() {
        let dataset = GenericDataset::default();
        assert!(dataset.is_empty());
        assert_eq!(dataset.rows().count(), 0);
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dataset.json");
        std::fs::write(
            &path,
            r#"{"files_data": {"file1": {"rows": [{"texts": ["hello"]}]}}}"#,
        )
        .unwrap();

        let dataset = GenericDataset::from_file(&path).unwrap();
        assert_eq!(dataset.num_rows(), 1);
        assert!(GenericDataset::from_file(&dir.path().join("missing.json")).is_err());
    }
}

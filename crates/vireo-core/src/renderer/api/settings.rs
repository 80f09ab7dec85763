// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Renderer configuration loaded from JSON.

use crate::math::LinearRgba;
use serde::{Deserialize, Serialize};

/// Settings that size the recording buffers and control recorder validation.
///
/// Missing fields fall back to their defaults when deserialized, so a config
/// file only needs to list what it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Number of command entries reserved up front in each command log.
    pub command_capacity: usize,
    /// Bytes reserved up front for debug labels in each command log.
    pub label_capacity: usize,
    /// Number of items reserved up front in each stage's render queue.
    pub queue_capacity: usize,
    /// If `true`, the recorder checks that each command is legal in the current state.
    pub validate_usage: bool,
    /// Number of viewport slots tracked by the recorder.
    pub max_viewports: usize,
    /// The color stages clear their targets to.
    pub clear_color: LinearRgba,
}

impl RenderSettings {
    /// Parses settings from a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serializes the settings to pretty-printed JSON.
    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            command_capacity: 256,
            label_capacity: 1024,
            queue_capacity: 250,
            validate_usage: true,
            max_viewports: 16,
            clear_color: LinearRgba::BLACK,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let settings =
            RenderSettings::from_json_str(r#"{ "validate_usage": false, "queue_capacity": 8 }"#)
                .unwrap();
        assert!(!settings.validate_usage);
        assert_eq!(settings.queue_capacity, 8);
        assert_eq!(settings.command_capacity, 256);
        assert_eq!(settings.max_viewports, 16);
    }

    #[test]
    fn json_round_trip_preserves_clear_color() {
        let settings = RenderSettings {
            clear_color: LinearRgba::CORNFLOWER_BLUE,
            ..Default::default()
        };
        let json = settings.to_json_string().unwrap();
        assert_eq!(RenderSettings::from_json_str(&json).unwrap(), settings);
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(RenderSettings::from_json_str("{ not json").is_err());
    }
}

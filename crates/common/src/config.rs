// -------------------------------------------------------------------------------------------------
//  Copyright (C) 2015-2026 Nautech Systems Pty Ltd. All rights reserved.
//  https://nautechsystems.io
//
//  Licensed under the GNU Lesser General Public License Version 3.0 (the "License");
//  You may not use this file except in compliance with the License.
//  You may obtain a copy of the License at https://www.gnu.org/licenses/lgpl-3.0.en.html
//
//  Unless required by applicable law or agreed to in writing, software
//  distributed under the License is distributed on an "AS IS" BASIS,
//  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//  See the License for the specific language governing permissions and
//  limitations under the License.
// -------------------------------------------------------------------------------------------------

//! Ring map configuration types and parsing.
//!
//! # Spec String Format
//!
//! The `CIRCLEMAP_CONFIG` environment variable uses a semicolon-separated format:
//!
//! ```text
//! capacity=256;name=OrderIdCache;log_evictions
//! ```
//!
//! ## Supported Keys
//!
//! | Key             | Type    | Description                                     |
//! |-----------------|---------|-------------------------------------------------|
//! | `capacity`      | Integer | Fixed number of entries (must be positive).     |
//! | `name`          | String  | Name used in log records (case preserved).      |
//! | `log_evictions` | Boolean | Log each eviction at debug level.               |
//!
//! Keys are case-insensitive.
//!
//! ## Boolean Values
//!
//! - Bare flag: `log_evictions` → true
//! - Explicit: `log_evictions=true`, `log_evictions=false`, `log_evictions=0`, `log_evictions=no`

use std::env;

use circlemap_core::correctness::{check_positive_usize, check_predicate_true};
use serde::{Deserialize, Serialize};

/// Environment variable read by [`RingMapConfig::from_env`].
pub const CIRCLEMAP_CONFIG_ENV: &str = "CIRCLEMAP_CONFIG";

/// Default capacity for [`RingMapConfig::default`].
pub const DEFAULT_CAPACITY: usize = 1024;

/// Configuration for a [`RingMap`](crate::cache::ring::RingMap).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RingMapConfig {
    /// The fixed number of entries held before the oldest is evicted.
    pub capacity: usize,
    /// The name used to identify the map in log records.
    pub name: String,
    /// If evictions should be logged at debug level.
    pub log_evictions: bool,
}

impl Default for RingMapConfig {
    /// Creates a new default [`RingMapConfig`] instance.
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            name: "RingMap".to_string(),
            log_evictions: false,
        }
    }
}

impl RingMapConfig {
    /// Creates a new [`RingMapConfig`] instance.
    #[must_use]
    pub fn new(capacity: usize, name: impl Into<String>, log_evictions: bool) -> Self {
        Self {
            capacity,
            name: name.into(),
            log_evictions,
        }
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `capacity` is zero.
    /// - `name` is empty.
    pub fn validate(&self) -> anyhow::Result<()> {
        check_positive_usize(self.capacity, "capacity")?;
        check_predicate_true(!self.name.is_empty(), "`name` was empty")?;
        Ok(())
    }

    /// Parses a configuration from a spec string.
    ///
    /// Keys not present in the spec keep their default values.
    ///
    /// # Format
    ///
    /// Semicolon-separated key-value pairs or bare flags:
    /// ```text
    /// capacity=256;name=OrderIdCache;log_evictions
    /// ```
    ///
    /// # Errors
    ///
    /// Returns an error if the spec string contains an unknown key, invalid syntax,
    /// or a value which fails validation.
    pub fn from_spec(spec: &str) -> anyhow::Result<Self> {
        let mut config = Self::default();

        for kv in spec.split(';') {
            let kv = kv.trim();
            if kv.is_empty() {
                continue;
            }

            let Some((k, v)) = kv.split_once('=') else {
                match kv.to_lowercase().as_str() {
                    "log_evictions" => config.log_evictions = true,
                    _ => anyhow::bail!("Invalid spec pair: {kv}"),
                }
                continue;
            };

            let k = k.trim();
            let v = v.trim();

            match k.to_lowercase().as_str() {
                "capacity" => {
                    config.capacity = parse_capacity(v)?;
                }
                "name" => {
                    config.name = v.to_string();
                }
                "log_evictions" => {
                    config.log_evictions = parse_bool_value(v);
                }
                _ => anyhow::bail!("Invalid spec key: {k}"),
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Parses configuration from the `CIRCLEMAP_CONFIG` environment variable.
    ///
    /// # Errors
    ///
    /// Returns an error if the variable is unset or contains invalid syntax.
    pub fn from_env() -> anyhow::Result<Self> {
        let spec = env::var(CIRCLEMAP_CONFIG_ENV)?;
        Self::from_spec(&spec)
    }
}

/// Parses a boolean value from a string.
///
/// Returns `true` unless the value is explicitly "false", "0", or "no" (case-insensitive).
fn parse_bool_value(v: &str) -> bool {
    !matches!(v.to_lowercase().as_str(), "false" | "0" | "no")
}

fn parse_capacity(v: &str) -> anyhow::Result<usize> {
    v.parse::<usize>()
        .map_err(|e| anyhow::anyhow!("Invalid capacity '{v}': {e}"))
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn test_default_config() {
        let config = RingMapConfig::default();
        assert_eq!(config.capacity, DEFAULT_CAPACITY);
        assert_eq!(config.name, "RingMap");
        assert!(!config.log_evictions);
        assert!(config.validate().is_ok());
    }

    #[rstest]
    fn test_from_spec_empty_string() {
        let config = RingMapConfig::from_spec("").unwrap();
        assert_eq!(config, RingMapConfig::default());
    }

    #[rstest]
    fn test_from_spec_full_example() {
        let config =
            RingMapConfig::from_spec("capacity=256;name=OrderIdCache;log_evictions").unwrap();
        assert_eq!(config, RingMapConfig::new(256, "OrderIdCache", true));
    }

    #[rstest]
    fn test_from_spec_case_insensitive_keys() {
        let config = RingMapConfig::from_spec("CAPACITY=8;Name=Seen;LOG_EVICTIONS").unwrap();
        assert_eq!(config.capacity, 8);
        assert_eq!(config.name, "Seen");
        assert!(config.log_evictions);
    }

    #[rstest]
    fn test_from_spec_with_whitespace_and_trailing_semicolon() {
        let config = RingMapConfig::from_spec("  capacity = 16 ; name = Quotes ;").unwrap();
        assert_eq!(config.capacity, 16);
        assert_eq!(config.name, "Quotes");
    }

    #[rstest]
    #[case("log_evictions=true", true)]
    #[case("log_evictions=1", true)]
    #[case("log_evictions=false", false)]
    #[case("log_evictions=0", false)]
    #[case("log_evictions=no", false)]
    #[case("LOG_EVICTIONS=FALSE", false)]
    fn test_from_spec_log_evictions(#[case] spec: &str, #[case] expected: bool) {
        let config = RingMapConfig::from_spec(spec).unwrap();
        assert_eq!(config.log_evictions, expected);
    }

    #[rstest]
    fn test_from_spec_zero_capacity_is_rejected() {
        let err = RingMapConfig::from_spec("capacity=0").unwrap_err();
        assert!(err.to_string().contains("not positive"));
    }

    #[rstest]
    #[case("capacity=-1")]
    #[case("capacity=abc")]
    #[case("capacity=")]
    fn test_from_spec_invalid_capacity(#[case] spec: &str) {
        let err = RingMapConfig::from_spec(spec).unwrap_err();
        assert!(err.to_string().starts_with("Invalid capacity"));
    }

    #[rstest]
    fn test_from_spec_empty_name_is_rejected() {
        assert!(RingMapConfig::from_spec("name=").is_err());
    }

    #[rstest]
    #[case("bogus")]
    #[case("bogus=1")]
    fn test_from_spec_unknown_key(#[case] spec: &str) {
        assert!(RingMapConfig::from_spec(spec).is_err());
    }

    #[rstest]
    fn test_deserialize_with_defaults() {
        let config: RingMapConfig = serde_json::from_str(r#"{"capacity": 32}"#).unwrap();
        assert_eq!(config.capacity, 32);
        assert_eq!(config.name, "RingMap");
        assert!(!config.log_evictions);
    }

    #[rstest]
    fn test_deserialize_unknown_field_is_rejected() {
        let result: Result<RingMapConfig, _> = serde_json::from_str(r#"{"size": 32}"#);
        assert!(result.is_err());
    }

    #[rstest]
    fn test_serialize_roundtrip() {
        let config = RingMapConfig::new(64, "Seen", true);
        let json = serde_json::to_string(&config).unwrap();
        let parsed: RingMapConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }
}

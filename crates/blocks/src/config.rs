//! Process-wide defaults shared by initializers and layers.
//!
//! The configuration is resolved once, from the environment, the first time any accessor runs:
//!
//! - `BLOCKS_FLOATX`: `float32` or `float64` (default `float64`), the dtype generated arrays use.
//! - `BLOCKS_DEFAULT_SEED`: base seed for [`InitializationPlan`](crate::params::InitializationPlan)
//!   (default `1`).

use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::env;
use crate::tensor::DType;

static CONFIG: OnceLock<Config> = OnceLock::new();

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub floatx: DType,
    pub default_seed: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            floatx: DType::F64,
            default_seed: 1,
        }
    }
}

impl Config {
    /// Defaults overlaid with whatever environment overrides parse cleanly.
    pub fn from_env() -> Self {
        let mut config = Config::default();
        if let Some(floatx) = env::parse_var::<DType>(env::FLOATX_VAR) {
            config.floatx = floatx;
        }
        if let Some(seed) = env::parse_var::<u64>(env::DEFAULT_SEED_VAR) {
            config.default_seed = seed;
        }
        config
    }

    /// Parses a JSON document; absent fields keep their defaults.
    pub fn from_json_str(json: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Returns the process configuration, resolving it on first use.
pub fn config() -> &'static Config {
    CONFIG.get_or_init(|| {
        let config = Config::from_env();
        tracing::debug!(floatx = %config.floatx, default_seed = config.default_seed, "resolved blocks configuration");
        config
    })
}

/// Default floating-point dtype for generated arrays.
pub fn floatx() -> DType {
    config().floatx
}

pub fn default_seed() -> u64 {
    config().default_seed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_fills_missing_fields_with_defaults() {
        let config = Config::from_json_str(r#"{"floatx": "float32"}"#).unwrap();
        assert_eq!(config.floatx, DType::F32);
        assert_eq!(config.default_seed, 1);
    }

    #[test]
    fn json_rejects_unknown_dtype() {
        assert!(Config::from_json_str(r#"{"floatx": "int8"}"#).is_err());
    }

    #[test]
    fn from_env_overlays_overrides() {
        // Resolve the process config first so other tests never observe these variables.
        let resolved = config().clone();

        std::env::set_var(env::FLOATX_VAR, "float32");
        std::env::set_var(env::DEFAULT_SEED_VAR, " 42 ");
        assert_eq!(
            Config::from_env(),
            Config {
                floatx: DType::F32,
                default_seed: 42,
            }
        );

        std::env::set_var(env::DEFAULT_SEED_VAR, "abc");
        std::env::set_var(env::FLOATX_VAR, "");
        assert_eq!(Config::from_env(), Config::default());

        std::env::remove_var(env::FLOATX_VAR);
        std::env::remove_var(env::DEFAULT_SEED_VAR);
        assert_eq!(config(), &resolved);
    }
}

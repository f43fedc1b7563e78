//! Optional TOML settings file for `prodrule forward`.
//!
//! # Example
//!
//! ```toml
//! [engine]
//! strategy = "RANDOM"
//! max_iterations = 50
//! seed = 7
//! ```
//!
//! Every key is optional. Command-line flags override the file; a knowledge
//! base's own strategy applies only when neither names one.

use std::path::{Path, PathBuf};

use prodrule_eval::{EngineConfig, Strategy, DEFAULT_MAX_ITERATIONS};
use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not parse '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Top-level settings file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CliConfig {
    #[serde(default)]
    pub engine: EngineSection,
}

/// `[engine]` table. Unset keys stay `None` so that later layers can fill
/// them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EngineSection {
    pub strategy: Option<Strategy>,
    pub max_iterations: Option<usize>,
    pub seed: Option<u64>,
}

impl EngineSection {
    /// Fill unset keys from `fallback`.
    pub fn or(self, fallback: EngineSection) -> EngineSection {
        EngineSection {
            strategy: self.strategy.or(fallback.strategy),
            max_iterations: self.max_iterations.or(fallback.max_iterations),
            seed: self.seed.or(fallback.seed),
        }
    }

    /// Resolve into engine settings, taking `default_strategy` when no
    /// layer named one.
    pub fn resolve(self, default_strategy: Option<Strategy>) -> EngineConfig {
        EngineConfig {
            strategy: self.strategy.or(default_strategy).unwrap_or_default(),
            max_iterations: self.max_iterations.unwrap_or(DEFAULT_MAX_ITERATIONS),
            seed: self.seed,
        }
    }
}

impl CliConfig {
    pub fn load(path: &Path) -> Result<CliConfig, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

//! # Configuration
//!
//! Attacher configuration is managed by [`confique`], which handles layered
//! loading from TOML files, environment variables and compiled defaults.
//!
//! ## Resolution order
//!
//! 1. **Environment variables**: `ATTACHER_DEFAULT_ENGINE`, `ATTACHER_MARK_ERRORS`
//! 2. **Config file**: `attacher.toml` (optional)
//! 3. **Compiled defaults**: `#[config(default = ...)]`
//!
//! ## Available settings
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `default_engine` | `AttachEngine3D` | Engine installed in a new controller |
//! | `mark_errors` | `true` | Flag the host as failed when an edit cannot be attached |

use crate::error::Result;
use confique::Config;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const CONFIG_FILENAME: &str = "attacher.toml";

#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct AttacherConfig {
    /// Type name of the engine a new controller starts with.
    #[config(default = "AttachEngine3D", env = "ATTACHER_DEFAULT_ENGINE")]
    pub default_engine: String,

    /// Whether a failed attachment during an edit sets the host's error status.
    /// With `false` failures are only logged: the host never enters the error
    /// state, and a successful edit does not clear one set elsewhere.
    #[config(default = true, env = "ATTACHER_MARK_ERRORS")]
    pub mark_errors: bool,
}

impl Default for AttacherConfig {
    fn default() -> Self {
        Self {
            default_engine: "AttachEngine3D".to_string(),
            mark_errors: true,
        }
    }
}

impl AttacherConfig {
    /// Load from the environment layered over `attacher.toml` in `dir`.
    /// A missing file is not an error.
    pub fn load<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let config = Self::builder()
            .env()
            .file(dir.as_ref().join(CONFIG_FILENAME))
            .load()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_default_config() {
        let config = AttacherConfig::default();
        assert_eq!(config.default_engine, "AttachEngine3D");
        assert!(config.mark_errors);
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AttacherConfig::load(dir.path()).unwrap();
        assert_eq!(config, AttacherConfig::default());
    }

    #[test]
    fn test_load_overrides_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let written = AttacherConfig {
            default_engine: "AttachEnginePoint".to_string(),
            mark_errors: false,
        };
        fs::write(
            dir.path().join(CONFIG_FILENAME),
            toml::to_string(&written).unwrap(),
        )
        .unwrap();

        let config = AttacherConfig::load(dir.path()).unwrap();
        assert_eq!(config, written);
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME), "mark_errors = \"often\"").unwrap();
        assert!(AttacherConfig::load(dir.path()).is_err());
    }
}

//! Run configuration.
//!
//! Stored as TOML:
//!
//! ```toml
//! [paths]
//! object_alias = "object_alias.txt"
//! predicate_alias = "predicate_alias.txt"
//! relationships = "relationships.json"
//! image_dir = "images"
//!
//! [sampling]
//! n_per_pred = 10
//! seed = 42
//!
//! [deep]
//! image_size = 224
//! batch_size = 8
//! grid = 4
//! ```
//!
//! Missing sections and keys take their defaults, so a partial file is valid.

use crate::features::deep::{DEFAULT_BATCH_SIZE, DEFAULT_IMAGE_SIZE};
use crate::synonyms::{DEFAULT_OBJECT_ALIAS_FILE, DEFAULT_PREDICATE_ALIAS_FILE};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// File name looked up inside the per-user config directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Input locations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Object alias list
    pub object_alias: PathBuf,
    /// Predicate alias list
    pub predicate_alias: PathBuf,
    /// Relationship corpus (JSON)
    pub relationships: PathBuf,
    /// Directory holding `{image_id}.jpg`
    pub image_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            object_alias: PathBuf::from(DEFAULT_OBJECT_ALIAS_FILE),
            predicate_alias: PathBuf::from(DEFAULT_PREDICATE_ALIAS_FILE),
            relationships: PathBuf::from("relationships.json"),
            image_dir: PathBuf::from("images"),
        }
    }
}

/// Labeled-example sampling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplingConfig {
    /// Labeled examples kept per predicate
    pub n_per_pred: usize,
    /// RNG seed
    pub seed: u64,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            n_per_pred: 10,
            seed: 42,
        }
    }
}

/// Crop embedding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeepConfig {
    /// Side of the square crop
    pub image_size: u32,
    /// Crops per embedder call
    pub batch_size: usize,
    /// Grid side for the pooling embedder
    pub grid: u32,
}

impl Default for DeepConfig {
    fn default() -> Self {
        Self {
            image_size: DEFAULT_IMAGE_SIZE,
            batch_size: DEFAULT_BATCH_SIZE,
            grid: 4,
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VgrelConfig {
    /// Input locations
    pub paths: PathsConfig,
    /// Sampling parameters
    pub sampling: SamplingConfig,
    /// Deep-feature parameters
    pub deep: DeepConfig,
}

impl VgrelConfig {
    /// Parse from TOML text.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| Error::config(e.to_string()))
    }

    /// Serialize to TOML text.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::config(e.to_string()))
    }

    /// Load from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| Error::config(format!("Failed to read {:?}: {}", path, e)))?;
        let config = Self::from_toml_str(&text)?;
        log::debug!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Write to a TOML file, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_toml_string()?)?;
        Ok(())
    }

    /// Resolve the effective configuration.
    ///
    /// An explicit path must exist. Otherwise `default_path` is used when it
    /// exists, and built-in defaults when it does not.
    pub fn resolve(explicit: Option<&Path>, default_path: Option<&Path>) -> Result<Self> {
        if let Some(p) = explicit {
            return Self::load(p);
        }
        match default_path {
            Some(p) if p.is_file() => Self::load(p),
            _ => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let c = VgrelConfig::default();
        assert_eq!(c.sampling.n_per_pred, 10);
        assert_eq!(c.sampling.seed, 42);
        assert_eq!(c.deep.image_size, 224);
        assert_eq!(c.deep.batch_size, 8);
        assert_eq!(c.paths.object_alias, PathBuf::from(DEFAULT_OBJECT_ALIAS_FILE));
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let c = VgrelConfig::from_toml_str("[sampling]\nn_per_pred = 3\n").unwrap();
        assert_eq!(c.sampling.n_per_pred, 3);
        assert_eq!(c.sampling.seed, 42);
        assert_eq!(c.deep, DeepConfig::default());
    }

    #[test]
    fn test_bad_toml() {
        let err = VgrelConfig::from_toml_str("[sampling\n").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_save_then_resolve() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE_NAME);

        let mut c = VgrelConfig::default();
        c.paths.image_dir = PathBuf::from("/data/vg/images");
        c.deep.grid = 2;
        c.save(&path).unwrap();

        assert_eq!(VgrelConfig::resolve(None, Some(&path)).unwrap(), c);
        assert_eq!(VgrelConfig::resolve(Some(&path), None).unwrap(), c);
    }

    #[test]
    fn test_resolve_fallbacks() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert_eq!(
            VgrelConfig::resolve(None, Some(&missing)).unwrap(),
            VgrelConfig::default()
        );
        assert!(VgrelConfig::resolve(Some(&missing), None).is_err());
    }
}

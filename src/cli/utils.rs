//! Utility functions for CLI commands

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::{VgrelConfig, CONFIG_FILE_NAME};
use crate::dataset::{load_relationships, ImageRelationships};
use crate::synonyms::{AliasMap, SimilarCategories, SynonymTable};

/// Settings shared by every command.
#[derive(Debug, Clone)]
pub struct Context {
    /// Effective configuration
    pub config: VgrelConfig,
    /// Suppress progress output
    pub quiet: bool,
}

impl Context {
    /// Resolve the configuration from `--config` or the user config directory.
    pub fn load(explicit: Option<&Path>, quiet: bool) -> Result<Self, String> {
        let default_path = default_config_path().ok();
        let config = VgrelConfig::resolve(explicit, default_path.as_deref())
            .map_err(|e| format_error("load config", &e.to_string()))?;
        Ok(Self { config, quiet })
    }
}

/// `<config dir>/vgrel`, created on demand.
pub fn get_config_dir() -> Result<PathBuf, String> {
    let dir = dirs::config_dir()
        .ok_or_else(|| "Could not determine config directory".to_string())?
        .join("vgrel");
    fs::create_dir_all(&dir).map_err(|e| format_error("create config directory", &e.to_string()))?;
    Ok(dir)
}

/// `<config dir>/vgrel/config.toml`; the file itself may not exist.
pub fn default_config_path() -> Result<PathBuf, String> {
    dirs::config_dir()
        .map(|d| d.join("vgrel").join(CONFIG_FILE_NAME))
        .ok_or_else(|| "Could not determine config directory".to_string())
}

/// Format error message consistently
pub fn format_error(operation: &str, details: &str) -> String {
    format!("Failed to {}: {}", operation, details)
}

/// Flatten list arguments.
///
/// Each value may be a comma-separated list or `@path` naming a file with one
/// entry per line. Entries are trimmed; empties are dropped.
pub fn parse_list(values: &[String]) -> Result<Vec<String>, String> {
    let mut out = Vec::new();
    for v in values {
        if let Some(path) = v.strip_prefix('@') {
            let text = fs::read_to_string(path)
                .map_err(|e| format_error("read list file", &format!("{}: {}", path, e)))?;
            out.extend(
                text.lines()
                    .map(str::trim)
                    .filter(|l| !l.is_empty())
                    .map(str::to_string),
            );
        } else {
            out.extend(
                v.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string),
            );
        }
    }
    Ok(out)
}

/// Like [`parse_list`] but an empty result is an error.
pub fn require_list(values: &[String], what: &str) -> Result<Vec<String>, String> {
    let list = parse_list(values)?;
    if list.is_empty() {
        return Err(format!("No {} given", what));
    }
    Ok(list)
}

/// Relationship corpus from `input`, falling back to the configured path.
pub fn read_relationships(input: Option<&Path>, ctx: &Context) -> Result<Vec<ImageRelationships>, String> {
    let path = input.unwrap_or(ctx.config.paths.relationships.as_path());
    load_relationships(path).map_err(|e| format_error("load relationships", &format!("{}: {}", path.display(), e)))
}

/// Alias lists, with per-command overrides of the configured paths.
pub fn read_similar(
    object_alias: Option<&Path>,
    predicate_alias: Option<&Path>,
    ctx: &Context,
) -> Result<SimilarCategories, String> {
    let obj = object_alias.unwrap_or(ctx.config.paths.object_alias.as_path());
    let pred = predicate_alias.unwrap_or(ctx.config.paths.predicate_alias.as_path());
    SimilarCategories::new(obj, pred).map_err(|e| format_error("load alias lists", &e.to_string()))
}

/// Synonym table for `canonicals` over one alias file.
pub fn read_synonym_table(alias: &Path, canonicals: &[String]) -> Result<SynonymTable, String> {
    let aliases = AliasMap::from_file(alias)
        .map_err(|e| format_error("load alias file", &format!("{}: {}", alias.display(), e)))?;
    Ok(SynonymTable::from_closures(&aliases, canonicals))
}

pub mod types;

pub use types::{
    AdvancedConfig, DcpConfig, OutputBodyReplaceConfig, PruneMode, PurgeErrorsConfig,
    StrategiesConfig, Thresholds, Toggle, TurnProtection,
};

use crate::error::{ConfigError, Result};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE_STEM: &str = "dcp";
const CONFIG_EXTENSIONS: [&str; 2] = ["json", "toml"];

/// Get the global config directory (~/.pi/agent)
pub fn global_config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".pi").join("agent"))
}

/// Get the project config directory (project/.pi)
pub fn local_config_dir(project_path: &Path) -> PathBuf {
    project_path.join(".pi")
}

/// First `dcp.json` / `dcp.toml` found in a layer directory
pub fn find_layer(dir: &Path) -> Option<PathBuf> {
    CONFIG_EXTENSIONS
        .iter()
        .map(|ext| dir.join(format!("{}.{}", CONFIG_FILE_STEM, ext)))
        .find(|p| p.is_file())
}

/// Load the policy: defaults, then the global layer, then the project layer,
/// then an explicit file. Later layers win.
///
/// Unreadable global/project layers are skipped with a warning; an explicit
/// file that cannot be read is an error.
pub fn load_config(project_path: Option<&Path>, explicit: Option<&Path>) -> Result<DcpConfig> {
    let mut merged = defaults_value()?;

    let mut layers = Vec::new();
    if let Some(dir) = global_config_dir() {
        layers.extend(find_layer(&dir));
    }
    if let Some(project) = project_path {
        layers.extend(find_layer(&local_config_dir(project)));
    }

    for layer in layers {
        match read_layer(&layer) {
            Ok(value) => {
                log::debug!("Merging config layer {}", layer.display());
                merge_deep(&mut merged, value);
            }
            Err(e) => log::warn!("Failed to load config {}: {}", layer.display(), e),
        }
    }

    if let Some(path) = explicit {
        merge_deep(&mut merged, read_layer(path)?);
    }

    finish(merged)
}

/// Merge the given files over the defaults, in order. Any failure is an error.
pub fn load_layers<I, P>(paths: I) -> Result<DcpConfig>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    let mut merged = defaults_value()?;
    for path in paths {
        merge_deep(&mut merged, read_layer(path.as_ref())?);
    }
    finish(merged)
}

/// Read one config file as a JSON value, choosing the parser by extension.
pub fn read_layer(path: &Path) -> Result<Value> {
    let content = fs::read_to_string(path)?;
    let value = match path.extension().and_then(|e| e.to_str()) {
        Some("json") => serde_json::from_str(&content)
            .map_err(|e| ConfigError::ParsingFailed(format!("{}: {}", path.display(), e)))?,
        Some("toml") => {
            let table: toml::Table = toml::from_str(&content)
                .map_err(|e| ConfigError::ParsingFailed(format!("{}: {}", path.display(), e)))?;
            serde_json::to_value(table)?
        }
        _ => return Err(ConfigError::UnsupportedFormat(path.to_path_buf()).into()),
    };

    if !value.is_object() {
        return Err(ConfigError::ParsingFailed(format!(
            "{}: top level must be an object",
            path.display()
        ))
        .into());
    }
    Ok(value)
}

/// Recursively merge `source` into `target`.
///
/// Objects merge key by key; arrays and scalars replace; `null` leaves the
/// target value alone.
pub fn merge_deep(target: &mut Value, source: Value) {
    match (target, source) {
        (Value::Object(target_map), Value::Object(source_map)) => {
            for (key, value) in source_map {
                match value {
                    Value::Null => {}
                    Value::Object(_) => {
                        let slot = target_map
                            .entry(key)
                            .or_insert_with(|| Value::Object(Default::default()));
                        if !slot.is_object() {
                            *slot = Value::Object(Default::default());
                        }
                        merge_deep(slot, value);
                    }
                    other => {
                        target_map.insert(key, other);
                    }
                }
            }
        }
        (target, source) => {
            if !source.is_null() {
                *target = source;
            }
        }
    }
}

fn defaults_value() -> Result<Value> {
    Ok(serde_json::to_value(DcpConfig::default())?)
}

fn finish(merged: Value) -> Result<DcpConfig> {
    let config: DcpConfig = serde_json::from_value(merged)
        .map_err(|e| ConfigError::ParsingFailed(e.to_string()))?;
    config.validate()?;
    Ok(config)
}

use crate::config::{self, DcpConfig};
use colored::*;
use std::path::Path;

/// Print the merged policy as JSON, with the layers that fed it on stderr.
pub fn handle_config(
    policy: &DcpConfig,
    project: &Path,
    explicit: Option<&Path>,
) -> crate::Result<()> {
    let mut layers = Vec::new();
    if let Some(dir) = config::global_config_dir() {
        layers.extend(config::find_layer(&dir));
    }
    layers.extend(config::find_layer(&config::local_config_dir(project)));
    layers.extend(explicit.map(Path::to_path_buf));

    if layers.is_empty() {
        eprintln!("{}", "No config files found, using defaults".dimmed());
    } else {
        for layer in &layers {
            eprintln!("{} {}", "layer:".dimmed(), layer.display());
        }
    }

    println!("{}", serde_json::to_string_pretty(policy)?);
    Ok(())
}

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

/// Names a YAML file holding [`CollectorSettings`]; takes precedence over any
/// caller-supplied settings.
pub const DATA_COLLECTOR_YAML_ENV: &str = "KUBE_DATA_COLLECTOR_YAML";

/// Optional subdirectory inserted just above the last segment of the base
/// directory, for separating results of multiple products in one run.
pub const DYNAMIC_BASE_DIR_ENV: &str = "KUBE_DATA_COLLECTOR_DYNAMIC_BASE_DIR";

/// Raw settings, as found in the YAML file or supplied by the embedding test
/// framework under its `data_collector` key.
#[derive(Debug, Clone, Deserialize)]
pub struct CollectorSettings {
    pub data_collector_base_directory: PathBuf,
    /// Explicit override; wins over `data_collector_base_directory`.
    #[serde(default)]
    pub collector_directory: Option<PathBuf>,
}

/// Resolved collector configuration, constructed once at startup and threaded
/// through as a parameter.
#[derive(Debug, Clone)]
pub struct CollectorConfig {
    pub base_directory: PathBuf,
}

impl CollectorConfig {
    /// Resolve settings with the documented precedence: the env-named YAML
    /// file first, then the caller-supplied fallback settings.
    pub fn resolve(fallback: Option<&CollectorSettings>) -> anyhow::Result<CollectorConfig> {
        let settings = match std::env::var(DATA_COLLECTOR_YAML_ENV) {
            Ok(path) if !path.is_empty() => load_settings_file(Path::new(&path))?,
            _ => fallback
                .cloned()
                .with_context(|| {
                    format!(
                        "no data collector configuration: set {} or supply settings",
                        DATA_COLLECTOR_YAML_ENV
                    )
                })?,
        };
        let dynamic = std::env::var(DYNAMIC_BASE_DIR_ENV)
            .ok()
            .filter(|v| !v.is_empty());
        Ok(CollectorConfig {
            base_directory: base_directory_for(&settings, dynamic.as_deref()),
        })
    }
}

pub fn load_settings_file(path: &Path) -> anyhow::Result<CollectorSettings> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to open {} file", path.display()))?;
    serde_yaml::from_str(&text)
        .with_context(|| format!("Failed to parse collector settings in {}", path.display()))
}

/// Pick the base directory (`collector_directory` over
/// `data_collector_base_directory`) and insert the dynamic segment above its
/// last path component:
/// `/data/results/collected-info` + `product_a` -> `/data/results/product_a/collected-info`.
pub fn base_directory_for(settings: &CollectorSettings, dynamic_dir: Option<&str>) -> PathBuf {
    let configured = settings
        .collector_directory
        .clone()
        .unwrap_or_else(|| settings.data_collector_base_directory.clone());

    let Some(dynamic) = dynamic_dir else {
        return configured;
    };

    let trimmed = PathBuf::from(
        configured
            .to_string_lossy()
            .trim_end_matches('/')
            .to_string(),
    );
    match (trimmed.parent(), trimmed.file_name()) {
        (Some(head), Some(tail)) => head.join(dynamic).join(tail),
        _ => trimmed.join(dynamic),
    }
}

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "cwlogs-cost.json";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct EstimatorConfig {
    pub pricing_file: Option<String>,
    pub default_region: Option<String>,
    pub reports_dir: String,
    pub days_per_month: f64,
    pub log_group_prefix: String,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            pricing_file: None,
            default_region: None,
            reports_dir: "reports".to_string(),
            days_per_month: 30.0,
            log_group_prefix: "/aws/lambda/".to_string(),
        }
    }
}

/// Reads `path`, or returns the defaults when no file exists there.
pub fn load_config(path: &Path) -> Result<EstimatorConfig> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        return Ok(EstimatorConfig::default());
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let config: EstimatorConfig = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
    Ok(config)
}

pub fn expand_path(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).as_ref())
}

/// `--region`, then `AWS_REGION`, then `AWS_DEFAULT_REGION`, then the config file,
/// then `fallback`.
pub fn resolve_region(
    cli_region: Option<&str>,
    env_lookup: impl Fn(&str) -> Option<String>,
    config: &EstimatorConfig,
    fallback: &str,
) -> String {
    let non_empty = |region: &String| !region.trim().is_empty();

    cli_region
        .map(str::to_string)
        .filter(non_empty)
        .or_else(|| env_lookup("AWS_REGION").filter(non_empty))
        .or_else(|| env_lookup("AWS_DEFAULT_REGION").filter(non_empty))
        .or_else(|| config.default_region.clone().filter(non_empty))
        .unwrap_or_else(|| fallback.to_string())
}

use std::fs;
use std::path::Path;
use tracing::info;

use crate::client::path_spec::PathSpec;
use crate::core::constants::PATH_ENV_VAR;
use crate::core::error::{BciError, Result};
use crate::models::config_model::RetrieverConfig;

/// Read and validate a retriever config from a JSON file.
pub fn load_config<P: AsRef<Path>>(file_path: P) -> Result<RetrieverConfig> {
    let file_path = file_path.as_ref();

    let data = fs::read_to_string(file_path)
        .map_err(|e| BciError::Config(format!("File read Error: {e} {}", file_path.display())))?;

    let config: RetrieverConfig = serde_json::from_str(&data)?;
    validate(&config)?;

    info!("Config loaded from {}", file_path.display());
    Ok(config)
}

/// Like [`load_config`], with `BCI_PATH` overriding the path spec when set.
pub fn load_config_with_env<P: AsRef<Path>>(file_path: P) -> Result<RetrieverConfig> {
    let config = load_config(file_path)?;
    apply_path_override(config, std::env::var(PATH_ENV_VAR).ok())
}

pub fn apply_path_override(
    mut config: RetrieverConfig,
    path_spec: Option<String>,
) -> Result<RetrieverConfig> {
    if let Some(path_spec) = path_spec.filter(|p| !p.trim().is_empty()) {
        info!("Path spec overridden by {}", PATH_ENV_VAR);
        config.path_spec = path_spec;
        validate(&config)?;
    }
    Ok(config)
}

pub fn validate(config: &RetrieverConfig) -> Result<()> {
    config
        .path_spec
        .parse::<PathSpec>()
        .map_err(|e| BciError::Config(e.to_string()))?;

    if config.tree.trim().is_empty() {
        return Err(BciError::Config("tree name is empty".into()));
    }

    if let Some(timing) = &config.timing {
        if !(timing.sample_rate.is_finite() && timing.sample_rate > 0.0) {
            return Err(BciError::Config(format!(
                "nominal sample rate must be positive, got {}",
                timing.sample_rate
            )));
        }
        if !timing.trigger_time.is_finite() {
            return Err(BciError::Config("nominal trigger time must be finite".into()));
        }
    }

    if config.correction.node_prefix().trim().is_empty() {
        return Err(BciError::Config("correction node prefix is empty".into()));
    }

    if let Some(segments) = &config.segments {
        if segments.count == 0 || segments.samples_per_segment == 0 {
            return Err(BciError::Config("segment layout sizes must be non-zero".into()));
        }
        if config.timing.is_none() {
            return Err(BciError::Config(
                "segmented records need nominal timing".into(),
            ));
        }
    }

    Ok(())
}

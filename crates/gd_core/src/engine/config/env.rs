use std::path::Path;
use std::{env, fs};

use super::EngineConfig;

pub const ENGINE_CONFIG_PATH_ENV: &str = "GD_ENGINE_CONFIG_PATH";

/// Reads `GD_ENGINE_CONFIG_PATH` if set. `Ok(None)` when unset or blank.
pub fn config_from_env() -> Result<Option<EngineConfig>, String> {
    let Ok(path) = env::var(ENGINE_CONFIG_PATH_ENV) else {
        return Ok(None);
    };

    let path = path.trim();
    if path.is_empty() {
        return Ok(None);
    }

    load_config_file(path)
        .map(Some)
        .map_err(|e| format!("{ENGINE_CONFIG_PATH_ENV}='{path}': {e}"))
}

pub fn config_from_env_or_default() -> Result<EngineConfig, String> {
    Ok(config_from_env()?.unwrap_or_default())
}

/// YAML for `.yaml`/`.yml`, JSON otherwise. The result is validated.
pub fn load_config_file(path: impl AsRef<Path>) -> Result<EngineConfig, String> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read engine config '{}': {e}", path.display()))?;

    let is_yaml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));
    let config = if is_yaml {
        EngineConfig::from_yaml(&content)
    } else {
        EngineConfig::from_json(&content)
    }
    .map_err(|e| format!("Failed to parse engine config '{}': {e}", path.display()))?;

    config.validate().map_err(|e| format!("Invalid engine config '{}': {e}", path.display()))?;
    Ok(config)
}

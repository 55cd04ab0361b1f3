use crate::commands::AppState;
use crate::models::config::AppConfig;
use std::path::PathBuf;

/// Fields that can be changed from the command line; None leaves a value as is
#[derive(Debug, Clone, Default)]
pub struct ConfigUpdate {
    pub interval_ms: Option<u64>,
    pub recent_limit: Option<usize>,
    pub default_item_label: Option<String>,
}

/// Load configuration
pub fn load_config(state: &AppState) -> Result<AppConfig, String> {
    state.config_manager.load().map_err(|e| e.to_string())
}

/// Apply an update and save it; returns the saved configuration
pub fn update_config(state: &mut AppState, update: ConfigUpdate) -> Result<AppConfig, String> {
    let mut config = load_config(state)?;

    if let Some(interval_ms) = update.interval_ms {
        config.scan.interval_ms = interval_ms;
    }
    if let Some(recent_limit) = update.recent_limit {
        config.session.recent_limit = recent_limit;
    }
    if let Some(label) = update.default_item_label {
        config.session.default_item_label = label;
    }

    state.config_manager.save(&config).map_err(|e| e.to_string())?;
    state.config = config.clone();

    Ok(config)
}

/// Get config file path
pub fn get_config_path(state: &AppState) -> PathBuf {
    state.config_manager.config_file_path().to_path_buf()
}

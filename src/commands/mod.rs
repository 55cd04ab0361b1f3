pub mod config;
pub mod scan;
pub mod session;

use crate::models::config::AppConfig;
use crate::services::config::ConfigManager;
use crate::services::session_store::SessionStore;
use std::path::PathBuf;

/// Everything a command needs: loaded configuration and the session store
pub struct AppState {
    pub config_manager: ConfigManager,
    pub config: AppConfig,
    pub store: SessionStore,
}

impl AppState {
    /// Load config and open the session store.
    ///
    /// `data_dir` overrides both the config and the store location (one
    /// directory holding `config.json` and `sessions.json`).
    pub fn init(data_dir: Option<PathBuf>) -> Result<Self, String> {
        let config_manager = match &data_dir {
            Some(dir) => ConfigManager::with_dir(dir),
            None => ConfigManager::new().map_err(|e| e.to_string())?,
        };
        let config = config_manager.load().map_err(|e| e.to_string())?;

        let store_path = match &data_dir {
            Some(dir) => dir.join("sessions.json"),
            None => SessionStore::default_path().map_err(|e| e.to_string())?,
        };
        let store = SessionStore::open(store_path, config.session.default_item_label.clone())
            .map_err(|e| e.to_string())?;

        Ok(Self {
            config_manager,
            config,
            store,
        })
    }
}

use serde::{Deserialize, Serialize};

/// Scan loop configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScanConfig {
    /// Milliseconds between capture attempts
    pub interval_ms: u64,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self { interval_ms: 600 }
    }
}

/// Shopping session configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionConfig {
    /// Number of sessions shown in the recent-session picker
    pub recent_limit: usize,
    /// Label stored for items saved without a product name
    pub default_item_label: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            recent_limit: 5,
            default_item_label: "Ürün".to_string(),
        }
    }
}

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub scan: ScanConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

impl AppConfig {
    /// Validate value ranges
    pub fn validate(&self) -> Result<(), String> {
        if self.scan.interval_ms == 0 {
            return Err("scan.interval_ms must be greater than 0".to_string());
        }

        if self.session.recent_limit == 0 {
            return Err("session.recent_limit must be greater than 0".to_string());
        }

        if self.session.default_item_label.trim().is_empty() {
            return Err("session.default_item_label must not be empty".to_string());
        }

        Ok(())
    }
}

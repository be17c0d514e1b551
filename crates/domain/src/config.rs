//! Configuration management

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_SWEEP_INTERVAL_SECS;

/// Bridge configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeConfig {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub permissions: PermissionConfig,
    /// IANA zone written into created events. `None` falls back to `$TZ`,
    /// then UTC.
    #[serde(default)]
    pub time_zone: Option<String>,
}

/// Calendar store configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    pub path: String,
    pub pool_size: u32,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self { path: "calendar.db".to_string(), pool_size: 4 }
    }
}

/// Permission prompt bookkeeping
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionConfig {
    /// Pending requests older than this are resolved as denied.
    /// `None` keeps them until the prompt is answered.
    #[serde(default)]
    pub pending_request_ttl_secs: Option<u64>,
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_secs: u64,
}

impl PermissionConfig {
    pub fn pending_request_ttl(&self) -> Option<Duration> {
        self.pending_request_ttl_secs.map(Duration::from_secs)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs.max(1))
    }
}

impl Default for PermissionConfig {
    fn default() -> Self {
        Self { pending_request_ttl_secs: None, sweep_interval_secs: DEFAULT_SWEEP_INTERVAL_SECS }
    }
}

fn default_sweep_interval() -> u64 {
    DEFAULT_SWEEP_INTERVAL_SECS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config: BridgeConfig =
            serde_json::from_str(r#"{ "permissions": { "pending_request_ttl_secs": 30 } }"#)
                .unwrap();

        assert_eq!(config.store, StoreConfig::default());
        assert_eq!(config.permissions.pending_request_ttl(), Some(Duration::from_secs(30)));
        assert_eq!(config.permissions.sweep_interval_secs, DEFAULT_SWEEP_INTERVAL_SECS);
        assert!(config.time_zone.is_none());
    }

    #[test]
    fn sweep_interval_never_zero() {
        let config = PermissionConfig { pending_request_ttl_secs: None, sweep_interval_secs: 0 };
        assert_eq!(config.sweep_interval(), Duration::from_secs(1));
    }
}

//! Configuration loader
//!
//! Loads bridge configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If `CALBRIDGE_STORE_PATH` is unset, falls back to loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `CALBRIDGE_STORE_PATH`: Calendar store database path (required)
//! - `CALBRIDGE_STORE_POOL_SIZE`: Connection pool size
//! - `CALBRIDGE_TIME_ZONE`: IANA zone written into created events
//! - `CALBRIDGE_PENDING_TTL_SECS`: Expire unanswered permission prompts
//! - `CALBRIDGE_SWEEP_INTERVAL_SECS`: How often expiry runs
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./config.{json,toml}` or `./calbridge.{json,toml}` (current working
//!    directory)
//! 2. `../config.{json,toml}` and `../../config.{json,toml}`
//! 3. The same names relative to the executable location

use std::path::{Path, PathBuf};
use std::str::FromStr;

use calbridge_domain::constants::DEFAULT_TIME_ZONE;
use calbridge_domain::{BridgeConfig, BridgeError, PermissionConfig, Result, StoreConfig};
use chrono_tz::Tz;
use tracing::debug;

const STORE_PATH_VAR: &str = "CALBRIDGE_STORE_PATH";
const STORE_POOL_SIZE_VAR: &str = "CALBRIDGE_STORE_POOL_SIZE";
const TIME_ZONE_VAR: &str = "CALBRIDGE_TIME_ZONE";
const PENDING_TTL_VAR: &str = "CALBRIDGE_PENDING_TTL_SECS";
const SWEEP_INTERVAL_VAR: &str = "CALBRIDGE_SWEEP_INTERVAL_SECS";

/// Load configuration with automatic fallback strategy
///
/// First attempts to load from environment variables. If the store path is
/// not set there, falls back to a config file.
///
/// # Errors
/// Returns `BridgeError::Config` if configuration cannot be loaded from
/// either source or a value is invalid.
pub fn load() -> Result<BridgeConfig> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = ?e, "Failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables
///
/// Only `CALBRIDGE_STORE_PATH` is required; the rest fall back to defaults.
///
/// # Errors
/// Returns `BridgeError::Config` if the store path is missing or a numeric
/// variable does not parse.
pub fn load_from_env() -> Result<BridgeConfig> {
    let path = env_var(STORE_PATH_VAR)?;
    let defaults = BridgeConfig::default();

    let pool_size =
        env_parse::<u32>(STORE_POOL_SIZE_VAR, "pool size")?.unwrap_or(defaults.store.pool_size);
    let pending_request_ttl_secs = env_parse::<u64>(PENDING_TTL_VAR, "pending request TTL")?;
    let sweep_interval_secs = env_parse::<u64>(SWEEP_INTERVAL_VAR, "sweep interval")?
        .unwrap_or(defaults.permissions.sweep_interval_secs);
    let time_zone = std::env::var(TIME_ZONE_VAR).ok().filter(|zone| !zone.trim().is_empty());

    Ok(BridgeConfig {
        store: StoreConfig { path, pool_size },
        permissions: PermissionConfig { pending_request_ttl_secs, sweep_interval_secs },
        time_zone,
    })
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// The format is detected by file extension.
///
/// # Errors
/// Returns `BridgeError::Config` if the file is missing, unreadable, or not
/// valid JSON/TOML.
pub fn load_from_file(path: Option<PathBuf>) -> Result<BridgeConfig> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(BridgeError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            BridgeError::Config("No config file found in any of the standard locations".to_string())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| BridgeError::Config(format!("Failed to read config file: {}", e)))?;

    parse_config(&contents, &config_path)
}

fn parse_config(contents: &str, path: &Path) -> Result<BridgeConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| BridgeError::Config(format!("Invalid TOML format: {}", e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| BridgeError::Config(format!("Invalid JSON format: {}", e))),
        _ => Err(BridgeError::Config(format!("Unsupported config format: {}", extension))),
    }
}

/// Probe multiple paths for configuration files
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    const NAMES: [&str; 4] = ["config.json", "config.toml", "calbridge.json", "calbridge.toml"];
    const PARENT_NAMES: [&str; 4] =
        ["../config.json", "../config.toml", "../../config.json", "../../config.toml"];

    let roots = [
        std::env::current_dir().ok(),
        std::env::current_exe().ok().and_then(|exe| exe.parent().map(Path::to_path_buf)),
    ];

    roots
        .into_iter()
        .flatten()
        .flat_map(|root| NAMES.iter().chain(PARENT_NAMES.iter()).map(move |name| root.join(name)))
        .find(|path| path.exists())
}

/// Time zone to stamp on created events.
///
/// Uses the configured zone, then `$TZ`, then the zone the host reports.
/// An explicitly configured zone must be a valid IANA name. Falls back to
/// UTC only when no usable zone can be found.
///
/// # Errors
/// Returns `BridgeError::Config` for an unknown configured zone.
pub fn resolve_time_zone(config: &BridgeConfig) -> Result<String> {
    if let Some(zone) = config.time_zone.as_deref() {
        return Tz::from_str(zone.trim())
            .map(|tz| tz.name().to_string())
            .map_err(|_| BridgeError::Config(format!("Unknown time zone: {zone}")));
    }

    Ok(fallback_time_zone(std::env::var("TZ").ok().as_deref(), system_time_zone))
}

/// Zone name reported by the host, e.g. from `/etc/localtime`.
fn system_time_zone() -> Option<String> {
    iana_time_zone::get_timezone()
        .map_err(|err| debug!(error = %err, "could not detect the host time zone"))
        .ok()
}

fn fallback_time_zone(env_zone: Option<&str>, detect: impl FnOnce() -> Option<String>) -> String {
    let canonical = |zone: &str| Tz::from_str(zone.trim()).ok().map(|tz| tz.name().to_string());

    env_zone
        .map(|zone| zone.trim().trim_start_matches(':'))
        .and_then(canonical)
        .or_else(|| detect().as_deref().and_then(canonical))
        .unwrap_or_else(|| DEFAULT_TIME_ZONE.to_string())
}

fn env_var(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| {
        BridgeError::Config(format!("Missing required environment variable: {}", key))
    })
}

/// Parse an optional numeric environment variable.
fn env_parse<T: FromStr>(key: &str, label: &str) -> Result<Option<T>>
where
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| BridgeError::Config(format!("Invalid {label}: {e}"))),
        Err(_) => Ok(None),
    }
}

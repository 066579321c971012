//! Ambient dispatcher configuration: pool sizes and queue capacities, read
//! from `initialize`'s `initializationOptions` with `SmartDefault` fallbacks
//! when a field is absent or the whole payload is malformed.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use smart_default::SmartDefault;

use crate::dispatcher::DispatcherConfig;
use crate::error::ext::ResultExt;

#[derive(Debug, Clone, Deserialize, Serialize, SmartDefault)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    #[default(4)]
    pub request_pool_size: usize,
    #[default(2)]
    pub worker_pool_size: usize,
    /// `0` means unbounded, matching [`crate::queue::MessageQueue::new`].
    #[default(0)]
    pub inbound_queue_capacity: usize,
    #[default(256)]
    pub outbound_queue_capacity: usize,
    /// Overrides the `LOG_FILE` env var when set; see [`crate::logging::init`].
    pub log_file: Option<PathBuf>,
}

impl Config {
    /// Deserializes `initialize`'s `initializationOptions`, falling back
    /// to [`Default::default`] when absent or malformed.
    pub fn from_initialization_options(options: Option<serde_json::Value>) -> Result<Self, crate::error::LspError> {
        let config: Option<Self> = options
            .map(serde_json::from_value)
            .transpose()
            .invalid_params("InitializeParams", "initializationOptions")?;
        Ok(config.unwrap_or_default())
    }

    /// The default location for a persisted log file when `log_file` is
    /// unset and `LOG_FILE` isn't either.
    pub fn default_log_file() -> Option<PathBuf> {
        directories::BaseDirs::new().map(|dirs| dirs.data_dir().join("lsp-core").join("lsp-core.log"))
    }
}

impl From<&Config> for DispatcherConfig {
    fn from(config: &Config) -> Self {
        DispatcherConfig {
            request_pool_size: config.request_pool_size,
            worker_pool_size: config.worker_pool_size,
            inbound_queue_capacity: config.inbound_queue_capacity,
            outbound_queue_capacity: config.outbound_queue_capacity,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn defaults_match_dispatcher_defaults() {
        let config = Config::default();
        assert_eq!(config.request_pool_size, 4);
        assert_eq!(config.worker_pool_size, 2);
        assert_eq!(config.outbound_queue_capacity, 256);
    }

    #[test]
    fn absent_initialization_options_fall_back_to_default() {
        let config = Config::from_initialization_options(None).unwrap();
        assert_eq!(config.request_pool_size, 4);
    }

    #[test]
    fn malformed_initialization_options_are_invalid_params() {
        let err = Config::from_initialization_options(Some(serde_json::json!("not an object"))).unwrap_err();
        assert!(matches!(err, crate::error::LspError::InvalidParams { .. }));
    }

    #[test]
    fn partial_initialization_options_fill_in_defaults() {
        let config = Config::from_initialization_options(Some(serde_json::json!({"requestPoolSize": 8})))
            .unwrap();
        assert_eq!(config.request_pool_size, 8);
        assert_eq!(config.worker_pool_size, 2);
    }

    #[test]
    fn inbound_queue_capacity_reaches_dispatcher_config() {
        let config = Config::from_initialization_options(Some(serde_json::json!({"inboundQueueCapacity": 64})))
            .unwrap();
        let dispatcher_config = DispatcherConfig::from(&config);
        assert_eq!(dispatcher_config.inbound_queue_capacity, 64);
    }
}

//! Application configuration schemas.
//!
//! The root [`AppConfig`] is deserialized from TOML files via the `config`
//! crate at process start. The `engine` section is the user-editable
//! [`EngineConfig`]; after bootstrap it is owned by the settings store and
//! mutated only through patch updates.

pub mod engine;
pub mod logging;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

pub use self::engine::{
    ChannelsConfig, ChannelsPatch, EngineConfig, EngineConfigPatch, LookaheadConfig,
    LookaheadPatch, MAX_LOOKAHEAD_DAYS,
};
pub use self::logging::LoggingConfig;

/// Root application configuration.
///
/// This struct is the top-level deserialization target for the merged
/// TOML configuration files (default.toml + environment overlay).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Compliance engine settings (user-editable at runtime).
    #[serde(default)]
    pub engine: EngineConfig,
    /// Local data layout settings.
    #[serde(default)]
    pub data: DataConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Local data directory layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Directory holding the engine's durable state (notifications, config).
    #[serde(default = "default_state_dir")]
    pub state_dir: String,
    /// Directory holding the exported asset/record snapshot consumed by the
    /// JSON data-source adapter.
    #[serde(default = "default_source_dir")]
    pub source_dir: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            state_dir: default_state_dir(),
            source_dir: default_source_dir(),
        }
    }
}

impl AppConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges the default configuration with an environment-specific overlay
    /// and environment variables prefixed with `CALWATCH__`.
    pub fn load(env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("CALWATCH")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }
}

fn default_state_dir() -> String {
    "data/state".to_string()
}

fn default_source_dir() -> String {
    "data/source".to_string()
}

use std::{env, str::FromStr};

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use tracing::level_filters::LevelFilter;

use crate::error::LoggingError;

pub const LOG_LEVEL_ENV: &str = "BEAMCAST_LOG_LEVEL";
pub const LOG_FORMAT_ENV: &str = "BEAMCAST_LOG_FORMAT";

/// Формат вывода событий.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum LogFormat {
    /// Многострочный, для разработки.
    Pretty,
    /// Однострочный.
    #[default]
    Compact,
    /// JSON, по объекту на строку.
    Json,
}

/// Настройки логирования.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Уровень по умолчанию (`trace`..`error`, `off`). `RUST_LOG`, если
    /// задан, имеет приоритет.
    pub level: String,
    pub format: LogFormat,
    pub ansi: bool,
    pub with_target: bool,
    pub with_thread_names: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
            ansi: true,
            with_target: true,
            with_thread_names: false,
        }
    }
}

impl LoggingConfig {
    /// Переопределяет уровень и формат из `BEAMCAST_LOG_LEVEL` и
    /// `BEAMCAST_LOG_FORMAT`.
    pub fn apply_env_overrides(&mut self) -> Result<(), LoggingError> {
        if let Ok(level) = env::var(LOG_LEVEL_ENV) {
            self.level = level;
        }
        if let Ok(format) = env::var(LOG_FORMAT_ENV) {
            self.format =
                LogFormat::from_str(&format).map_err(|_| LoggingError::InvalidFormat(format))?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), LoggingError> {
        self.level_filter().map(|_| ())
    }

    pub fn level_filter(&self) -> Result<LevelFilter, LoggingError> {
        LevelFilter::from_str(self.level.trim())
            .map_err(|_| LoggingError::InvalidLevel(self.level.clone()))
    }
}

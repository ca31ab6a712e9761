use std::time::Duration;

use config::{Config, Environment};
use serde::{Deserialize, Serialize};

use crate::{
    error::{SettingsError, SettingsResult},
    logging::LoggingConfig,
};

pub const DEFAULT_TICK_INTERVAL_MS: u64 = 10;
pub const DEFAULT_WORKER_NAME: &str = "beamcast-worker";

/// Настройки рантайма: период тика рабочего потока и логирование.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub tick_interval_ms: u64,
    pub worker_name: String,
    #[serde(default)]
    pub log: LoggingConfig,
}

impl Settings {
    /// Значения по умолчанию, переопределяемые переменными окружения
    /// `BEAMCAST_*` (вложенные ключи через `__`, например
    /// `BEAMCAST_LOG__FORMAT=json`).
    pub fn load() -> SettingsResult<Self> {
        let cfg = Config::builder()
            .set_default("tick_interval_ms", DEFAULT_TICK_INTERVAL_MS)?
            .set_default("worker_name", DEFAULT_WORKER_NAME)?
            .add_source(
                Environment::with_prefix("BEAMCAST")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let settings: Settings = cfg.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> SettingsResult<()> {
        if self.tick_interval_ms == 0 {
            return Err(SettingsError::Invalid {
                key: "tick_interval_ms",
                reason: "must be greater than zero".into(),
            });
        }
        if self.worker_name.trim().is_empty() {
            return Err(SettingsError::Invalid {
                key: "worker_name",
                reason: "must not be empty".into(),
            });
        }
        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            worker_name: DEFAULT_WORKER_NAME.to_string(),
            log: LoggingConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::env;

    use serial_test::serial;

    use super::*;
    use crate::logging::LogFormat;

    fn clear_env() {
        for key in [
            "BEAMCAST_TICK_INTERVAL_MS",
            "BEAMCAST_WORKER_NAME",
            "BEAMCAST_LOG__FORMAT",
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    #[serial]
    fn test_load_defaults() {
        clear_env();
        let settings = Settings::load().unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.tick_interval(), Duration::from_millis(10));
    }

    /// Тест проверяет переопределение через переменные окружения, включая
    /// вложенный ключ логирования.
    #[test]
    #[serial]
    fn test_load_from_env() {
        clear_env();
        env::set_var("BEAMCAST_TICK_INTERVAL_MS", "25");
        env::set_var("BEAMCAST_WORKER_NAME", "dispatcher");
        env::set_var("BEAMCAST_LOG__FORMAT", "json");

        let settings = Settings::load();
        clear_env();

        let settings = settings.unwrap();
        assert_eq!(settings.tick_interval_ms, 25);
        assert_eq!(settings.worker_name, "dispatcher");
        assert_eq!(settings.log.format, LogFormat::Json);
    }

    #[test]
    #[serial]
    fn test_zero_interval_is_rejected() {
        clear_env();
        env::set_var("BEAMCAST_TICK_INTERVAL_MS", "0");
        let result = Settings::load();
        clear_env();

        assert!(matches!(
            result,
            Err(SettingsError::Invalid {
                key: "tick_interval_ms",
                ..
            })
        ));
    }
}

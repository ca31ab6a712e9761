pub mod config;
mod formatter;

pub use config::{LogFormat, LoggingConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::error::LoggingError;

/// Инициализация логирования с конфигурацией.
///
/// `RUST_LOG`, если задан, важнее уровня из конфигурации. Повторный вызов
/// возвращает [`LoggingError::Init`].
pub fn init_logging(mut config: LoggingConfig) -> Result<(), LoggingError> {
    config.apply_env_overrides()?;
    let env_filter = build_filter(&config)?;

    tracing_subscriber::registry()
        .with(env_filter)
        .with(formatter::build_layer(&config, std::io::stdout))
        .try_init()?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        commit = env!("GIT_COMMIT"),
        built = env!("BUILD_TIME"),
        log_level = %config.level,
        log_format = %config.format,
        "Logging system initialized"
    );
    Ok(())
}

/// Фильтр из `RUST_LOG`, иначе из уровня конфигурации.
pub fn build_filter(config: &LoggingConfig) -> Result<EnvFilter, LoggingError> {
    match EnvFilter::try_from_default_env() {
        Ok(env_filter) => Ok(env_filter),
        Err(_) => Ok(EnvFilter::new(config.level_filter()?.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use std::env;

    use serial_test::serial;

    use super::*;

    #[test]
    #[serial]
    fn test_build_filter_from_config_level() {
        env::remove_var("RUST_LOG");
        let config = LoggingConfig {
            level: "debug".into(),
            ..Default::default()
        };
        let filter = build_filter(&config).unwrap();
        assert_eq!(
            filter.max_level_hint(),
            Some(tracing::level_filters::LevelFilter::DEBUG)
        );
    }

    #[test]
    #[serial]
    fn test_build_filter_rejects_bad_level_without_rust_log() {
        env::remove_var("RUST_LOG");
        let config = LoggingConfig {
            level: "chatty".into(),
            ..Default::default()
        };
        assert!(matches!(
            build_filter(&config),
            Err(LoggingError::InvalidLevel(_))
        ));
    }
}

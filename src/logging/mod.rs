//! Инициализация `tracing`: фильтр уровней и fmt-слой в выбранном формате.

pub mod config;
mod filters;
mod formatter;

pub use config::{LogFormat, LoggingConfig};
use tracing_subscriber::{
    layer::{Layered, SubscriberExt},
    util::SubscriberInitExt,
    EnvFilter, Registry,
};

use crate::error::LoggingError;

/// Инициализация логирования с конфигурацией.
///
/// Возвращает ошибку, если глобальный subscriber уже установлен.
pub fn init_logging(config: &LoggingConfig) -> Result<(), LoggingError> {
    let env_filter = filters::build_filter_from_config(config)?;

    let fmt_layer = formatter::build_formatter_from_config::<Layered<EnvFilter, Registry>>(config);
    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    tracing::debug!(
        version = env!("CARGO_PKG_VERSION"),
        log_level = %config.level,
        format = %config.format,
        "Logging system initialized"
    );
    Ok(())
}

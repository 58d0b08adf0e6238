//! Ошибки основного крейта. Ошибки программы и леджера живут в
//! `pubhub-error`.

pub mod stream;

pub use stream::{RecvError, TryRecvError};

use thiserror::Error;

/// Ошибка загрузки или проверки настроек.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to load settings: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid setting `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Ошибка инициализации логирования.
#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Invalid log filter: {0}")]
    Filter(#[from] tracing_subscriber::filter::ParseError),

    #[error("Global tracing subscriber is already set: {0}")]
    AlreadyInitialised(#[from] tracing_subscriber::util::TryInitError),
}

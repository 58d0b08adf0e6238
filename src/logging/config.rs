use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Формат вывода логов.
#[derive(Debug, Default, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Pretty,
    #[default]
    Compact,
}

/// Конфигурация логирования.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Уровень по умолчанию (`trace`..`error`) или полная директива
    /// `EnvFilter`.
    #[serde(default = "default_level")]
    pub level: String,

    #[serde(default)]
    pub format: LogFormat,

    #[serde(default = "default_true")]
    pub with_ansi: bool,

    #[serde(default = "default_true")]
    pub with_target: bool,

    #[serde(default = "default_false")]
    pub with_thread_ids: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: LogFormat::default(),
            with_ansi: true,
            with_target: true,
            with_thread_ids: false,
        }
    }
}

impl LoggingConfig {
    /// Директива фильтра. Голый уровень применяется только к крейту, чтобы
    /// не включать отладку зависимостей.
    pub fn build_filter_directive(&self) -> String {
        let level = self.level.trim();
        if is_plain_level(level) {
            format!("warn,pubhub={level}")
        } else {
            level.to_string()
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(match self {
            LogFormat::Json => "json",
            LogFormat::Pretty => "pretty",
            LogFormat::Compact => "compact",
        })
    }
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "pretty" => Ok(LogFormat::Pretty),
            "compact" => Ok(LogFormat::Compact),
            other => Err(format!("unknown log format '{other}'")),
        }
    }
}

fn is_plain_level(s: &str) -> bool {
    matches!(
        s.to_ascii_lowercase().as_str(),
        "trace" | "debug" | "info" | "warn" | "error" | "off"
    )
}

fn default_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_false() -> bool {
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_level_is_scoped_to_crate() {
        let cfg = LoggingConfig {
            level: "debug".into(),
            ..Default::default()
        };
        assert_eq!(cfg.build_filter_directive(), "warn,pubhub=debug");
    }

    #[test]
    fn test_full_directive_is_kept() {
        let cfg = LoggingConfig {
            level: "pubhub::program=trace,info".into(),
            ..Default::default()
        };
        assert_eq!(cfg.build_filter_directive(), "pubhub::program=trace,info");
    }

    #[test]
    fn test_format_parse() {
        assert_eq!("JSON".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!(LogFormat::Pretty.to_string(), "pretty");
        assert!("xml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let cfg: LoggingConfig = serde_json::from_str(r#"{"format":"json"}"#).unwrap();
        assert_eq!(cfg.format, LogFormat::Json);
        assert_eq!(cfg.level, "info");
        assert!(cfg.with_ansi);
    }
}

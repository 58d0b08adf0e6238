use std::path::Path;

use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use crate::{error::SettingsError, ledger::Rent, logging::LoggingConfig, program::ProgramConfig};

/// Файл настроек по умолчанию (необязательный).
pub const DEFAULT_CONFIG_FILE: &str = "pubhub.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub program: ProgramConfig,
    pub rent: Rent,
    pub logging: LoggingConfig,
}

impl Settings {
    /// Загружает настройки: значения по умолчанию → `pubhub.toml` (если
    /// есть) → переменные окружения `PUBHUB__<СЕКЦИЯ>__<КЛЮЧ>`.
    pub fn load() -> Result<Self, SettingsError> {
        Self::load_from(None)
    }

    /// То же, что [`Settings::load`], но с явным файлом. Явно указанный файл
    /// обязан существовать.
    pub fn load_from(path: Option<&Path>) -> Result<Self, SettingsError> {
        let defaults = ProgramConfig::default();
        let rent = Rent::default();

        let file = match path {
            Some(p) => File::from(p).required(true),
            None => File::new(DEFAULT_CONFIG_FILE, FileFormat::Toml).required(false),
        };

        let cfg = Config::builder()
            // Добавляем значения по умолчанию
            .set_default("program.publish_mode", defaults.publish_mode.as_str())?
            .set_default("program.max_topics", i64::from(defaults.max_topics))?
            .set_default("program.max_topic_len", defaults.max_topic_len as i64)?
            .set_default("program.max_message_len", defaults.max_message_len as i64)?
            .set_default("program.strict_topics", defaults.strict_topics)?
            .set_default("program.event_buffer", defaults.event_buffer as i64)?
            .set_default("rent.lamports_per_byte_year", rent.lamports_per_byte_year as i64)?
            .set_default("rent.exemption_threshold", rent.exemption_threshold)?
            .set_default("logging.level", "info")?
            .set_default("logging.format", "compact")?
            .add_source(file)
            // Переменные окружения с префиксом PUBHUB__
            .add_source(
                Environment::with_prefix("PUBHUB")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let settings: Settings = cfg.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        let positive = |key: &'static str, value: usize| {
            if value == 0 {
                Err(SettingsError::Invalid {
                    key,
                    reason: "must be greater than zero".to_string(),
                })
            } else {
                Ok(())
            }
        };
        positive("program.max_topics", self.program.max_topics as usize)?;
        positive("program.max_topic_len", self.program.max_topic_len)?;
        positive("program.max_message_len", self.program.max_message_len)?;
        positive("program.event_buffer", self.program.event_buffer)?;

        if !(self.rent.exemption_threshold.is_finite() && self.rent.exemption_threshold >= 0.0) {
            return Err(SettingsError::Invalid {
                key: "rent.exemption_threshold",
                reason: format!("{} is not a non-negative number", self.rent.exemption_threshold),
            });
        }
        if self.rent.lamports_per_byte_year > Rent::max_lamports_per_byte_year() {
            return Err(SettingsError::Invalid {
                key: "rent.lamports_per_byte_year",
                reason: format!(
                    "{} exceeds {}",
                    self.rent.lamports_per_byte_year,
                    Rent::max_lamports_per_byte_year()
                ),
            });
        }
        Ok(())
    }
}

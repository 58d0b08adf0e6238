use tracing_subscriber::EnvFilter;

use super::config::LoggingConfig;
use crate::error::LoggingError;

/// Собирает фильтр: `RUST_LOG`, если задан, иначе директива из конфигурации.
pub fn build_filter_from_config(config: &LoggingConfig) -> Result<EnvFilter, LoggingError> {
    if let Ok(env_filter) = EnvFilter::try_from_default_env() {
        return Ok(env_filter);
    }
    Ok(EnvFilter::try_new(config.build_filter_directive())?)
}

#[cfg(test)]
mod tests {
    use std::{
        env,
        sync::{Arc, Mutex},
    };

    use serial_test::serial;
    use tracing_subscriber::{fmt, prelude::*, registry::Registry};

    use super::*;

    // Мини-буферный writer для тестов
    struct VecMakeWriter(Arc<Mutex<Vec<u8>>>);

    impl<'a> fmt::MakeWriter<'a> for VecMakeWriter {
        type Writer = VecWriterGuard;

        fn make_writer(&'a self) -> Self::Writer {
            VecWriterGuard(self.0.clone())
        }
    }

    struct VecWriterGuard(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for VecWriterGuard {
        fn write(
            &mut self,
            buf: &[u8],
        ) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }
        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    /// Тест проверяет, что некорректная директива из конфигурации даёт
    /// ошибку, а не тихий откат.
    #[test]
    #[serial]
    fn test_invalid_directive_is_rejected() {
        env::remove_var("RUST_LOG");
        let cfg = LoggingConfig {
            level: "pubhub=verbose".into(),
            ..Default::default()
        };
        assert!(matches!(
            build_filter_from_config(&cfg),
            Err(LoggingError::Filter(_))
        ));
    }

    /// Тест проверяет, что RUST_LOG имеет приоритет над конфигурацией.
    #[test]
    #[serial]
    fn test_env_overrides_config() {
        env::set_var("RUST_LOG", "error");
        let cfg = LoggingConfig {
            level: "pubhub=verbose".into(),
            ..Default::default()
        };
        let res = build_filter_from_config(&cfg);
        env::remove_var("RUST_LOG");
        assert!(res.is_ok());
    }

    /// Тест проверяет поведение фильтра в runtime: при уровне `warn`
    /// сообщения info отбрасываются, а warn проходят.
    #[test]
    #[serial]
    fn test_filter_drops_lower_levels() {
        env::remove_var("RUST_LOG");
        let cfg = LoggingConfig {
            level: "warn".into(),
            ..Default::default()
        };
        let filter = build_filter_from_config(&cfg).unwrap();

        let buffer = Arc::new(Mutex::new(Vec::new()));
        let layer = fmt::layer()
            .with_writer(VecMakeWriter(buffer.clone()))
            .with_ansi(false)
            .with_filter(filter);
        let subscriber = Registry::default().with(layer);

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(target: "pubhub", "info message should be filtered out");
            tracing::warn!(target: "pubhub", "warn message should pass");
        });

        let out = buffer.lock().unwrap();
        let s = String::from_utf8_lossy(&out);
        assert!(s.contains("warn message should pass"));
        assert!(!s.contains("info message should be filtered out"));
    }
}

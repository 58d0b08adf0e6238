/// Немедленно возвращает ошибку (аналогично `anyhow::bail!`).
///
/// Поддерживает три формы:
/// - `bail!(err)`: принимает готовую ошибку; она конвертируется через
///   `From` в тип ошибки текущей функции (`HubError`, `StackError`, ...);
/// - `bail!(code, "msg")`: создаёт `GenericError` с кодом и сообщением;
/// - `bail!(code, "fmt {}", arg)`: форматирует сообщение.
///
/// Пример:
///
/// ```ignore
/// use pubhub_error::{bail, StatusCode};
///
/// fn validate_topic(topic: &str) -> Result<(), pubhub_error::StackError> {
///     if topic.is_empty() {
///         bail!(StatusCode::InvalidArgs, "Topic cannot be empty");
///     }
///     if topic.len() > 64 {
///         bail!(StatusCode::InvalidArgs, "Topic too long: {} bytes", topic.len());
///     }
///     Ok(())
/// }
/// ```
#[macro_export]
macro_rules! bail {
    ($err:expr) => {
        return Err(::core::convert::From::from($err))
    };
    ($code:expr, $msg:expr) => {
        return Err($crate::StackError::new(
            $crate::types::GenericError::new($code, $msg)
        ))
    };
    ($code:expr, $fmt:expr, $($arg:tt)*) => {
        return Err($crate::StackError::new(
            $crate::types::GenericError::new($code, format!($fmt, $($arg)*))
        ))
    };
}

/// Проверяет условие и вызывает `bail!`, если условие ложно.
///
/// Формы аналогичны `bail!`:
/// - `ensure!(cond, err)`
/// - `ensure!(cond, code, "msg")`
/// - `ensure!(cond, code, "fmt {}", arg)`
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $err:expr) => {
        if !($cond) {
            $crate::bail!($err);
        }
    };
    ($cond:expr, $code:expr, $msg:expr) => {
        if !($cond) {
            $crate::bail!($code, $msg);
        }
    };
    ($cond:expr, $code:expr, $fmt:expr, $($arg:tt)*) => {
        if !($cond) {
            $crate::bail!($code, $fmt, $($arg)*);
        }
    };
}

/// Трейт-расширение для `Result`, добавляющее удобные методы контекстирования.
///
/// Позволяет вызывать `.context(...)` и `.with_context(...)` на результатах,
/// превращая ошибку в [`StackError`](crate::StackError) и приклеивая к ней
/// контекст.
pub trait ResultExt<T> {
    /// Если `self` равен `Err`, оборачивает ошибку в `StackError` и добавляет
    /// указанный контекст.
    fn context<C>(
        self,
        ctx: C,
    ) -> Result<T, crate::StackError>
    where
        C: Into<String>;

    /// Добавляет ленивый контекст (вызывается только в случае ошибки).
    fn with_context<C, F>(
        self,
        f: F,
    ) -> Result<T, crate::StackError>
    where
        C: Into<String>,
        F: FnOnce() -> C;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
    E: Into<crate::StackError>,
{
    #[track_caller]
    fn context<C>(
        self,
        ctx: C,
    ) -> Result<T, crate::StackError>
    where
        C: Into<String>,
    {
        self.map_err(|e| e.into().context(ctx))
    }

    #[track_caller]
    fn with_context<C, F>(
        self,
        f: F,
    ) -> Result<T, crate::StackError>
    where
        C: Into<String>,
        F: FnOnce() -> C,
    {
        self.map_err(|e| e.into().context(f()))
    }
}

////////////////////////////////////////////////////////////////////////////////
// Тесты
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{GenericError, HubError, HubResult, StackResult, StatusCode};

    #[test]
    fn test_bail_typed_error() {
        fn example() -> HubResult<()> {
            bail!(HubError::Unauthorized {
                expected: "a".into(),
                actual: "b".into(),
            });
        }

        assert!(matches!(example(), Err(HubError::Unauthorized { .. })));
    }

    #[test]
    fn test_bail_typed_error_into_stack() {
        fn example() -> StackResult<()> {
            bail!(HubError::NotFound {
                address: "x".into()
            });
        }

        let err = example().unwrap_err();
        assert_eq!(err.status_code(), StatusCode::NotFound);
    }

    #[test]
    fn test_bail_with_format() {
        fn example(value: usize) -> StackResult<()> {
            bail!(StatusCode::InvalidArgs, "Invalid length: {}", value);
        }

        let err = example(42).unwrap_err();
        assert!(err.to_string().contains("Invalid length: 42"));
    }

    #[test]
    fn test_ensure() {
        fn validate(x: i32) -> StackResult<()> {
            ensure!(x > 0, StatusCode::InvalidArgs, "Value must be positive");
            ensure!(x < 100, StatusCode::InvalidArgs, "Value too large: {}", x);
            Ok(())
        }

        assert!(validate(50).is_ok());
        assert!(validate(-1).is_err());
        assert!(validate(150).is_err());
    }

    #[test]
    fn test_result_ext() {
        fn inner() -> Result<(), GenericError> {
            Err(GenericError::new(StatusCode::Internal, "inner error"))
        }

        fn outer() -> StackResult<()> {
            inner().context("outer context")?;
            Ok(())
        }

        let err = outer().unwrap_err();
        assert_eq!(err.contexts().len(), 1);
        assert_eq!(err.contexts()[0].note, "outer context");
    }

    #[test]
    fn test_with_context_lazy() {
        fn example(success: bool) -> StackResult<()> {
            let result: Result<(), HubError> = if success {
                Ok(())
            } else {
                Err(HubError::InvalidTopic {
                    reason: "empty".into(),
                })
            };

            result.with_context(|| format!("topic check #{}", 1))?;
            Ok(())
        }

        assert!(example(true).is_ok());
        let err = example(false).unwrap_err();
        assert_eq!(err.contexts()[0].note, "topic check #1");
    }
}

use std::any::Any;

use thiserror::Error;

use crate::{ErrorExt, LedgerError, StatusCode};

/// Ошибки программы хаба.
///
/// Каждое нарушенное предусловие операции имеет собственный вариант, чтобы
/// вызывающий мог ветвиться по причине, а не по тексту.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HubError {
    /// Реестр топиков по этому адресу уже создан
    #[error("topics registry already initialised at {address}")]
    AlreadyInitialised { address: String },
    /// Реестр топиков не создан
    #[error("topics registry not initialised at {address}")]
    NotInitialised { address: String },
    /// Аккаунт не найден
    #[error("account not found: {address}")]
    NotFound { address: String },
    /// Хаб для этого владельца уже существует
    #[error("hub already exists at {address}")]
    AlreadyExists { address: String },
    /// Подписант не является владельцем аккаунта
    #[error("signer {actual} is not the owner {expected}")]
    Unauthorized { expected: String, actual: String },
    /// Топик уже есть в реестре
    #[error("topic already registered: {topic}")]
    DuplicateTopic { topic: String },
    /// Топика нет в реестре
    #[error("topic not found: {topic}")]
    TopicNotFound { topic: String },
    /// Реестр заполнен
    #[error("topics capacity exceeded (capacity {capacity})")]
    CapacityExceeded { capacity: usize },
    /// Хаб, к которому обращаются, не существует
    #[error("hub not found: {hub}")]
    HubNotFound { hub: String },
    /// Пустое или слишком длинное имя топика
    #[error("invalid topic: {reason}")]
    InvalidTopic { reason: String },
    /// Сообщение превышает лимит
    #[error("message too large: {size} bytes (max {max})")]
    MessageTooLarge { size: usize, max: usize },
    /// Данные аккаунта не разбираются как ожидаемый тип
    #[error("corrupted account {address}: {reason}")]
    CorruptedAccount { address: String, reason: String },
    /// Ошибка леджера (аренда, хранилище)
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

impl HubError {
    /// Короткое имя варианта в camelCase; так ошибки выглядят для клиентов
    /// программы.
    pub fn name(&self) -> &'static str {
        match self {
            Self::AlreadyInitialised { .. } => "alreadyInitialised",
            Self::NotInitialised { .. } => "notInitialised",
            Self::NotFound { .. } => "notFound",
            Self::AlreadyExists { .. } => "alreadyExists",
            Self::Unauthorized { .. } => "unauthorized",
            Self::DuplicateTopic { .. } => "duplicateTopic",
            Self::TopicNotFound { .. } => "topicNotFound",
            Self::CapacityExceeded { .. } => "capacityExceeded",
            Self::HubNotFound { .. } => "hubNotFound",
            Self::InvalidTopic { .. } => "invalidTopic",
            Self::MessageTooLarge { .. } => "messageTooLarge",
            Self::CorruptedAccount { .. } => "corruptedAccount",
            Self::Ledger(_) => "ledger",
        }
    }
}

impl ErrorExt for HubError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::AlreadyInitialised { .. } => StatusCode::AlreadyInitialised,
            Self::NotInitialised { .. } => StatusCode::NotInitialised,
            Self::NotFound { .. } | Self::TopicNotFound { .. } | Self::HubNotFound { .. } => {
                StatusCode::NotFound
            }
            Self::AlreadyExists { .. } => StatusCode::AlreadyExists,
            Self::Unauthorized { .. } => StatusCode::Unauthorized,
            Self::DuplicateTopic { .. } => StatusCode::Duplicate,
            Self::CapacityExceeded { .. } => StatusCode::CapacityExceeded,
            Self::InvalidTopic { .. } => StatusCode::InvalidArgs,
            Self::MessageTooLarge { .. } => StatusCode::SizeLimit,
            Self::CorruptedAccount { .. } => StatusCode::CorruptedData,
            Self::Ledger(err) => err.status_code(),
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn client_message(&self) -> String {
        match self {
            Self::CorruptedAccount { .. } => "Account data is corrupted".to_string(),
            _ => self.to_string(),
        }
    }

    fn metrics_tags(&self) -> Vec<(&'static str, String)> {
        let mut tags = vec![
            ("error_type", "hub".to_string()),
            ("error_name", self.name().to_string()),
            ("status_code", self.status_code().to_string()),
        ];

        match self {
            Self::DuplicateTopic { topic } | Self::TopicNotFound { topic } => {
                tags.push(("topic", topic.clone()));
            }
            Self::CapacityExceeded { capacity } => {
                tags.push(("capacity", capacity.to_string()));
            }
            Self::MessageTooLarge { size, max } => {
                tags.push(("message_size", size.to_string()));
                tags.push(("max_size", max.to_string()));
            }
            _ => {}
        }

        tags
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_each_precondition_has_distinct_name() {
        let errors = [
            HubError::AlreadyInitialised { address: "a".into() },
            HubError::NotInitialised { address: "a".into() },
            HubError::NotFound { address: "a".into() },
            HubError::AlreadyExists { address: "a".into() },
            HubError::Unauthorized {
                expected: "a".into(),
                actual: "b".into(),
            },
            HubError::DuplicateTopic { topic: "/t".into() },
            HubError::TopicNotFound { topic: "/t".into() },
            HubError::CapacityExceeded { capacity: 1 },
            HubError::HubNotFound { hub: "h".into() },
        ];

        let mut names: Vec<_> = errors.iter().map(HubError::name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), errors.len());
    }

    #[test]
    fn test_ledger_error_keeps_its_status() {
        let err: HubError = LedgerError::InsufficientFunds {
            account: "a".into(),
            required: 5,
            available: 1,
        }
        .into();
        assert_eq!(err.status_code(), StatusCode::InsufficientFunds);
        assert!(err.to_string().starts_with("insufficient funds"));
    }

    #[test]
    fn test_corrupted_account_hides_reason_from_client() {
        let err = HubError::CorruptedAccount {
            address: "a".into(),
            reason: "bad discriminator".into(),
        };
        assert_eq!(err.client_message(), "Account data is corrupted");
        assert!(err.log_message().contains("bad discriminator"));
    }

    #[test]
    fn test_message_too_large_tags() {
        let err = HubError::MessageTooLarge {
            size: 2048,
            max: 1024,
        };
        assert_eq!(err.status_code(), StatusCode::SizeLimit);

        let tags = err.metrics_tags();
        assert!(tags
            .iter()
            .any(|(k, v)| k == &"message_size" && v == "2048"));
        assert!(tags.iter().any(|(k, v)| k == &"max_size" && v == "1024"));
    }
}

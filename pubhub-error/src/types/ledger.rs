use std::any::Any;

use thiserror::Error;

use crate::{ErrorExt, StatusCode};

/// Ошибки леджера: баланс кошельков и хранилище аккаунтов.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// Плательщику не хватает средств на аренду
    #[error("insufficient funds in {account}: required {required}, available {available}")]
    InsufficientFunds {
        account: String,
        required: u64,
        available: u64,
    },
    /// Адрес уже занят другим аккаунтом
    #[error("account already in use: {address}")]
    AccountInUse { address: String },
    /// Аккаунт по адресу не существует
    #[error("account not found: {address}")]
    AccountNotFound { address: String },
    /// Размер данных превышает максимальный размер аккаунта
    #[error("account data too large: {size} bytes (max {max})")]
    AccountTooLarge { size: usize, max: usize },
}

impl ErrorExt for LedgerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InsufficientFunds { .. } => StatusCode::InsufficientFunds,
            Self::AccountInUse { .. } => StatusCode::AccountInUse,
            Self::AccountNotFound { .. } => StatusCode::NotFound,
            Self::AccountTooLarge { .. } => StatusCode::SizeLimit,
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn metrics_tags(&self) -> Vec<(&'static str, String)> {
        let mut tags = vec![
            ("error_type", "ledger".to_string()),
            ("status_code", self.status_code().to_string()),
        ];

        match self {
            Self::InsufficientFunds {
                required,
                available,
                ..
            } => {
                tags.push(("required", required.to_string()));
                tags.push(("available", available.to_string()));
            }
            Self::AccountTooLarge { size, max } => {
                tags.push(("size", size.to_string()));
                tags.push(("max_size", max.to_string()));
            }
            _ => {}
        }

        tags
    }
}

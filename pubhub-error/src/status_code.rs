use std::fmt;

use num_enum::TryFromPrimitive;
#[cfg(feature = "serde_repr")]
use serde_repr::{Deserialize_repr, Serialize_repr};
#[cfg(feature = "strum")]
use strum_macros::{AsRefStr, EnumIter};

/// Коды статуса для категоризации ошибок.
///
/// # Диапазоны:
/// - 0xxx: Успех
/// - 1xxx: Общие ошибки
/// - 2xxx: Ошибки состояния аккаунтов (нет/уже есть/дубликат)
/// - 3xxx: Авторизация
/// - 4xxx: Лимиты (ёмкость, баланс)
/// - 5xxx: Хранилище аккаунтов (леджер)
/// - 8xxx: Ошибки формата данных
///
/// `num_enum::TryFromPrimitive` даёт нативную реализацию `TryFrom<u32>`, что
/// удобно, когда код передаётся вызывающей стороне как число.
#[cfg_attr(feature = "strum", derive(AsRefStr, EnumIter))]
#[cfg_attr(feature = "serde_repr", derive(Serialize_repr, Deserialize_repr))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive)]
#[repr(u32)]
#[non_exhaustive]
pub enum StatusCode {
    // === 0xxx: Успех ===
    Success = 0,

    // === 1xxx: Общие ошибки ===
    Unknown = 1000,
    Unsupported = 1001,
    Unexpected = 1002,
    Internal = 1003,
    InvalidArgs = 1004,

    // === 2xxx: Состояние ===
    NotFound = 2000,
    AlreadyExists = 2001,
    NotInitialised = 2002,
    AlreadyInitialised = 2003,
    Duplicate = 2004,
    InvalidValue = 2005,

    // === 3xxx: Авторизация ===
    PermissionDenied = 3001,
    Unauthorized = 3009,

    // === 4xxx: Лимиты ===
    QuotaExceeded = 4001,
    CapacityExceeded = 4003,
    InsufficientFunds = 4004,

    // === 5xxx: Леджер ===
    StorageUnavailable = 5000,
    CorruptedData = 5002,
    SerializationFailed = 5003,
    DeserializationFailed = 5004,
    AccountInUse = 5008,

    // === 8xxx: Формат данных ===
    InvalidUtf8 = 8004,
    SizeLimit = 8007,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

////////////////////////////////////////////////////////////////////////////////
// Собственные методы
////////////////////////////////////////////////////////////////////////////////

impl StatusCode {
    /// Числовое представление кода статуса.
    pub const fn code(self) -> u32 {
        self as u32
    }

    /// Пытается получить вариант `StatusCode` из `u32`.
    ///
    /// Возвращает `None`, если значение не соответствует ни одному варианту.
    pub fn from_u32(v: u32) -> Option<Self> {
        Self::try_from(v).ok()
    }

    /// Вернёт `true`, если переданный `code` означает успешный результат.
    pub fn is_success(code: u32) -> bool {
        Self::Success as u32 == code
    }

    /// Является ли код ошибкой со стороны вызывающего (неверный запрос или
    /// состояние, которое он может исправить сам).
    ///
    /// Клиентские ошибки лежат в диапазоне `2xxx..4xxx`; `InvalidArgs` (1004)
    /// учитывается явно.
    pub fn is_client_error(&self) -> bool {
        let c = self.code();
        if (2000..=4999).contains(&c) {
            return true;
        }
        matches!(self, Self::InvalidArgs | Self::SizeLimit)
    }

    /// Является ли код внутренней ошибкой (диапазоны `1xxx` и `5xxx`).
    pub fn is_server_error(&self) -> bool {
        let c = self.code();
        matches!(c, 1000..=1999 | 5000..=5999) && !matches!(self, Self::InvalidArgs)
    }

    /// Требуется ли логировать как критическую ошибку.
    pub fn is_critical(&self) -> bool {
        matches!(
            self,
            Self::Internal | Self::CorruptedData | Self::StorageUnavailable
        )
    }

    /// Рекомендуемый уровень логирования для данного кода.
    pub fn log_level(&self) -> LogLevel {
        match self {
            Self::Success => LogLevel::Trace,
            Self::NotFound
            | Self::AlreadyExists
            | Self::NotInitialised
            | Self::AlreadyInitialised
            | Self::Duplicate => LogLevel::Debug,
            Self::InvalidArgs
            | Self::InvalidValue
            | Self::SizeLimit
            | Self::CapacityExceeded
            | Self::InsufficientFunds => LogLevel::Info,
            Self::PermissionDenied | Self::Unauthorized => LogLevel::Warn,
            Self::Internal | Self::CorruptedData | Self::StorageUnavailable => LogLevel::Error,
            _ => LogLevel::Warn,
        }
    }
}

////////////////////////////////////////////////////////////////////////////////
// Общие реализации трейтов для StatusCode
////////////////////////////////////////////////////////////////////////////////

impl From<StatusCode> for u32 {
    fn from(c: StatusCode) -> Self {
        c.code()
    }
}

impl fmt::Display for StatusCode {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        #[cfg(feature = "strum")]
        {
            write!(f, "{} ({})", self.as_ref(), self.code())
        }
        #[cfg(not(feature = "strum"))]
        {
            write!(f, "{:?} ({})", self, self.code())
        }
    }
}

////////////////////////////////////////////////////////////////////////////////
// Тесты
////////////////////////////////////////////////////////////////////////////////

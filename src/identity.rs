//! 32-байтовые идентификаторы: [`Pubkey`] (личность вызывающего) и
//! [`Address`] (адрес аккаунта, выведенный детерминированно).
//!
//! Это разные типы, чтобы личность нельзя было передать туда, где ожидается
//! адрес аккаунта, и наоборот. Оба печатаются как hex в нижнем регистре и
//! сериализуются строкой в human-readable форматах (JSON) и сырыми байтами в
//! бинарных (bincode).

use std::{fmt, str::FromStr};

use rand::RngCore;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

/// Длина ключа в байтах.
pub const KEY_LEN: usize = 32;

/// Ошибка разбора hex-представления ключа.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseKeyError {
    #[error("expected {expected} hex characters, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
    #[error("invalid hex digit at position {position}")]
    InvalidDigit { position: usize },
}

macro_rules! key_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
        pub struct $name([u8; KEY_LEN]);

        impl $name {
            pub const fn new(bytes: [u8; KEY_LEN]) -> Self {
                Self(bytes)
            }

            pub const fn to_bytes(self) -> [u8; KEY_LEN] {
                self.0
            }

            pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
                &self.0
            }

            /// Короткая форма для логов: первые 4 байта в hex.
            pub fn short(&self) -> String {
                hex::encode(&self.0[..4])
            }
        }

        impl From<[u8; KEY_LEN]> for $name {
            fn from(bytes: [u8; KEY_LEN]) -> Self {
                Self(bytes)
            }
        }

        impl AsRef<[u8]> for $name {
            fn as_ref(&self) -> &[u8] {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(
                &self,
                f: &mut fmt::Formatter<'_>,
            ) -> fmt::Result {
                f.write_str(&hex::encode(self.0))
            }
        }

        impl fmt::Debug for $name {
            fn fmt(
                &self,
                f: &mut fmt::Formatter<'_>,
            ) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.short())
            }
        }

        impl FromStr for $name {
            type Err = ParseKeyError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                decode_key(s).map(Self)
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(
                &self,
                serializer: S,
            ) -> Result<S::Ok, S::Error> {
                if serializer.is_human_readable() {
                    serializer.collect_str(self)
                } else {
                    self.0.serialize(serializer)
                }
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                if deserializer.is_human_readable() {
                    let s = String::deserialize(deserializer)?;
                    s.parse().map_err(de::Error::custom)
                } else {
                    <[u8; KEY_LEN]>::deserialize(deserializer).map(Self)
                }
            }
        }
    };
}

key_type!(
    /// Публичный идентификатор участника (владельца, подписчика, издателя).
    ///
    /// Используется и как ключ авторизации, и как seed для вывода адресов.
    Pubkey
);

key_type!(
    /// Адрес аккаунта программы, выведенный из пространства имён и владельца.
    Address
);

impl Pubkey {
    /// Случайный уникальный идентификатор (для тестов и демо).
    pub fn new_unique() -> Self {
        let mut bytes = [0u8; KEY_LEN];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self(bytes)
    }
}

fn decode_key(s: &str) -> Result<[u8; KEY_LEN], ParseKeyError> {
    let invalid_length = || ParseKeyError::InvalidLength {
        expected: KEY_LEN * 2,
        actual: s.len(),
    };
    if s.len() != KEY_LEN * 2 {
        return Err(invalid_length());
    }

    let mut out = [0u8; KEY_LEN];
    hex::decode_to_slice(s, &mut out).map_err(|e| match e {
        hex::FromHexError::InvalidHexCharacter { index, .. } => {
            ParseKeyError::InvalidDigit { position: index }
        }
        _ => invalid_length(),
    })?;
    Ok(out)
}

//! Детерминированный вывод адресов аккаунтов.
//!
//! Адрес = SHA-256(program_id ‖ len(tag) ‖ tag ‖ owner ‖ маркер). Длина тега
//! входит в хеш, поэтому пары (tag, owner) не могут склеиться в одинаковый
//! вход. Секретов нет: любой участник может заранее вычислить адрес хаба или
//! реестра, ещё до того как аккаунт создан.

use std::fmt;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::identity::{Address, Pubkey};

const DERIVED_ADDRESS_MARKER: &[u8] = b"ProgramDerivedAddress";

/// Идентификатор программы по умолчанию.
pub static PROGRAM_ID: Lazy<Pubkey> =
    Lazy::new(|| Pubkey::new(Sha256::digest(b"pubhub:program:v1").into()));

/// Пространство имён аккаунтов программы.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Namespace {
    /// Хаб издателя.
    Hub,
    /// Реестр топиков владельца.
    Topics,
}

impl Namespace {
    pub fn as_str(self) -> &'static str {
        match self {
            Namespace::Hub => "hub",
            Namespace::Topics => "topics",
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Namespace {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hub" => Ok(Namespace::Hub),
            "topics" => Ok(Namespace::Topics),
            other => Err(format!("unknown namespace '{other}' (expected hub|topics)")),
        }
    }
}

/// Выводит адрес для `(namespace, owner)` в рамках заданной программы.
pub fn derive_address_for(
    program_id: &Pubkey,
    namespace: Namespace,
    owner: &Pubkey,
) -> Address {
    let tag = namespace.as_str().as_bytes();

    let mut hasher = Sha256::new();
    hasher.update(program_id.as_ref());
    hasher.update([tag.len() as u8]);
    hasher.update(tag);
    hasher.update(owner.as_ref());
    hasher.update(DERIVED_ADDRESS_MARKER);

    Address::new(hasher.finalize().into())
}

/// Выводит адрес для `(namespace, owner)` в программе по умолчанию.
pub fn derive_address(
    namespace: Namespace,
    owner: &Pubkey,
) -> Address {
    derive_address_for(&PROGRAM_ID, namespace, owner)
}

/// Адрес хаба владельца.
pub fn hub_address(owner: &Pubkey) -> Address {
    derive_address(Namespace::Hub, owner)
}

/// Адрес реестра топиков владельца.
pub fn topics_address(owner: &Pubkey) -> Address {
    derive_address(Namespace::Topics, owner)
}

//! Байтовые раскладки аккаунтов программы.
//!
//! Данные аккаунта = 8 байт дискриминатора ‖ bincode-тело. Дискриминатор:
//! первые 8 байт SHA-256 от `"account:<Имя>"`, так что аккаунт одного типа
//! нельзя прочитать как аккаунт другого.

pub mod hub;
pub mod topics;

pub use hub::*;
pub use topics::*;

use pubhub_error::{HubError, HubResult};
use serde::{de::DeserializeOwned, Serialize};
use sha2::{Digest, Sha256};

use crate::identity::Address;

pub const DISCRIMINATOR_LEN: usize = 8;

/// Тип, который хранится в аккаунте программы.
pub trait AccountState: Serialize + DeserializeOwned {
    /// Имя типа, из которого выводится дискриминатор.
    const NAME: &'static str;

    fn discriminator() -> [u8; DISCRIMINATOR_LEN] {
        let hash = Sha256::digest(format!("account:{}", Self::NAME).as_bytes());
        let mut out = [0u8; DISCRIMINATOR_LEN];
        out.copy_from_slice(&hash[..DISCRIMINATOR_LEN]);
        out
    }

    /// Размер данных аккаунта для текущего содержимого.
    fn encoded_len(&self) -> usize {
        // bincode не ошибается на типах без map с неизвестной длиной
        DISCRIMINATOR_LEN + bincode::serialized_size(self).unwrap_or(0) as usize
    }
}

/// Сериализует состояние в данные аккаунта.
pub fn encode<T: AccountState>(
    address: &Address,
    state: &T,
) -> HubResult<Vec<u8>> {
    let mut data = Vec::with_capacity(state.encoded_len());
    data.extend_from_slice(&T::discriminator());
    bincode::serialize_into(&mut data, state).map_err(|e| HubError::CorruptedAccount {
        address: address.to_string(),
        reason: e.to_string(),
    })?;
    Ok(data)
}

/// Разбирает данные аккаунта, проверяя дискриминатор.
pub fn decode<T: AccountState>(
    address: &Address,
    data: &[u8],
) -> HubResult<T> {
    let corrupted = |reason: String| HubError::CorruptedAccount {
        address: address.to_string(),
        reason,
    };

    if data.len() < DISCRIMINATOR_LEN {
        return Err(corrupted(format!(
            "{} bytes is shorter than the discriminator",
            data.len()
        )));
    }
    let (tag, body) = data.split_at(DISCRIMINATOR_LEN);
    if tag != T::discriminator().as_slice() {
        return Err(corrupted(format!("not a {} account", T::NAME)));
    }
    bincode::deserialize(body).map_err(|e| corrupted(e.to_string()))
}

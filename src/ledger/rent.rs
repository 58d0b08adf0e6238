use serde::{Deserialize, Serialize};

/// Служебные байты, которые леджер резервирует за каждым аккаунтом сверх его
/// данных.
pub const ACCOUNT_STORAGE_OVERHEAD: u64 = 128;

/// Максимальный размер данных одного аккаунта.
pub const MAX_ACCOUNT_SIZE: usize = 10 * 1024;

/// Количество лампортов в одной единице баланса.
pub const LAMPORTS_PER_SOL: u64 = 1_000_000_000;

/// Параметры аренды хранилища.
///
/// Аккаунт освобождён от периодической платы, если на нём лежит не меньше
/// `minimum_balance(size)`; эта сумма удерживается с плательщика при создании
/// и полностью возвращается при закрытии.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rent {
    /// Стоимость хранения одного байта в год.
    pub lamports_per_byte_year: u64,
    /// Сколько лет аренды нужно внести вперёд.
    pub exemption_threshold: f64,
}

impl Default for Rent {
    fn default() -> Self {
        Self {
            lamports_per_byte_year: 3480,
            exemption_threshold: 2.0,
        }
    }
}

impl Rent {
    /// Минимальный баланс аккаунта с `data_len` байтами данных.
    ///
    /// Результат насыщается на `u64::MAX`: такую сумму не внесёт ни один
    /// плательщик, и операция завершится ошибкой леджера.
    pub fn minimum_balance(
        &self,
        data_len: usize,
    ) -> u64 {
        let bytes = ACCOUNT_STORAGE_OVERHEAD.saturating_add(data_len as u64);
        let per_year = bytes.saturating_mul(self.lamports_per_byte_year);
        (per_year as f64 * self.exemption_threshold) as u64
    }

    /// Наибольшая стоимость байта в год, при которой годовая плата за
    /// аккаунт предельного размера ещё помещается в `u64`.
    pub fn max_lamports_per_byte_year() -> u64 {
        u64::MAX / (ACCOUNT_STORAGE_OVERHEAD + MAX_ACCOUNT_SIZE as u64)
    }
}

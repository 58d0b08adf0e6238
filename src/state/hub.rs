use serde::{Deserialize, Serialize};

use super::AccountState;
use crate::identity::Pubkey;

/// Хаб издателя.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HubAccount {
    owner: Pubkey,
    /// Время создания по часам леджера, unix-секунды. Только для информации.
    created_at: i64,
}

impl AccountState for HubAccount {
    const NAME: &'static str = "Hub";
}

impl HubAccount {
    pub fn new(
        owner: Pubkey,
        created_at: i64,
    ) -> Self {
        Self { owner, created_at }
    }

    pub fn owner(&self) -> &Pubkey {
        &self.owner
    }

    pub fn created_at(&self) -> i64 {
        self.created_at
    }

    /// Время создания как `DateTime<Utc>`.
    pub fn created_at_utc(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        chrono::DateTime::from_timestamp(self.created_at, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_size_layout() {
        let hub = HubAccount::new(Pubkey::new_unique(), 1_700_000_000);
        // discriminator + owner + i64
        assert_eq!(hub.encoded_len(), 8 + 32 + 8);
    }

    #[test]
    fn test_created_at_utc() {
        let hub = HubAccount::new(Pubkey::new_unique(), 0);
        assert_eq!(hub.created_at_utc().unwrap().timestamp(), 0);
    }
}

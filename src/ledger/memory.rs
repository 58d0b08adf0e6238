use std::{cmp::Ordering, sync::Arc};

use dashmap::{mapref::entry::Entry, DashMap};
use pubhub_error::LedgerError;

use super::{Account, Ledger, Rent, RentChange, MAX_ACCOUNT_SIZE};
use crate::identity::{Address, Pubkey};

/// Источник времени леджера (unix-секунды).
pub type Clock = Arc<dyn Fn() -> i64 + Send + Sync>;

/// Леджер в памяти процесса.
///
/// Все операции атомарны: проверки (занятость адреса, баланс плательщика)
/// выполняются до изменения состояния, поэтому неудачный вызов ничего не
/// меняет. Блокировки берутся в порядке `accounts` → `wallets`.
pub struct InMemoryLedger {
    wallets: DashMap<Pubkey, u64>,
    accounts: DashMap<Address, Account>,
    rent: Rent,
    clock: Clock,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::with_rent(Rent::default())
    }

    pub fn with_rent(rent: Rent) -> Self {
        Self {
            wallets: DashMap::new(),
            accounts: DashMap::new(),
            rent,
            clock: Arc::new(|| chrono::Utc::now().timestamp()),
        }
    }

    /// Подменяет часы леджера.
    pub fn with_clock(
        mut self,
        clock: impl Fn() -> i64 + Send + Sync + 'static,
    ) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Количество существующих аккаунтов.
    pub fn account_count(&self) -> usize {
        self.accounts.len()
    }

    /// Сумма аренды, удерживаемой на всех аккаунтах.
    pub fn total_escrowed(&self) -> u64 {
        self.accounts.iter().map(|a| a.lamports).sum()
    }

    fn debit(
        &self,
        wallet: &Pubkey,
        amount: u64,
    ) -> Result<(), LedgerError> {
        if amount == 0 {
            return Ok(());
        }
        match self.wallets.get_mut(wallet) {
            Some(mut balance) if *balance >= amount => {
                *balance -= amount;
                Ok(())
            }
            other => Err(LedgerError::InsufficientFunds {
                account: wallet.to_string(),
                required: amount,
                available: other.map(|b| *b).unwrap_or(0),
            }),
        }
    }

    fn check_size(data: &[u8]) -> Result<(), LedgerError> {
        if data.len() > MAX_ACCOUNT_SIZE {
            return Err(LedgerError::AccountTooLarge {
                size: data.len(),
                max: MAX_ACCOUNT_SIZE,
            });
        }
        Ok(())
    }
}

impl Default for InMemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl Ledger for InMemoryLedger {
    fn rent(&self) -> Rent {
        self.rent
    }

    fn now(&self) -> i64 {
        (self.clock)()
    }

    fn balance(
        &self,
        wallet: &Pubkey,
    ) -> u64 {
        self.wallets.get(wallet).map(|b| *b).unwrap_or(0)
    }

    fn credit(
        &self,
        wallet: &Pubkey,
        lamports: u64,
    ) {
        let mut balance = self.wallets.entry(*wallet).or_insert(0);
        *balance = balance.saturating_add(lamports);
    }

    fn account(
        &self,
        address: &Address,
    ) -> Option<Account> {
        self.accounts.get(address).map(|entry| entry.clone())
    }

    fn create_account(
        &self,
        payer: &Pubkey,
        address: Address,
        data: Vec<u8>,
    ) -> Result<u64, LedgerError> {
        Self::check_size(&data)?;
        let lamports = self.rent.minimum_balance(data.len());

        match self.accounts.entry(address) {
            Entry::Occupied(_) => Err(LedgerError::AccountInUse {
                address: address.to_string(),
            }),
            Entry::Vacant(slot) => {
                self.debit(payer, lamports)?;
                slot.insert(Account { lamports, data });
                Ok(lamports)
            }
        }
    }

    fn resize_account(
        &self,
        payer: &Pubkey,
        address: &Address,
        data: Vec<u8>,
    ) -> Result<RentChange, LedgerError> {
        Self::check_size(&data)?;
        let mut account =
            self.accounts
                .get_mut(address)
                .ok_or_else(|| LedgerError::AccountNotFound {
                    address: address.to_string(),
                })?;

        let required = self.rent.minimum_balance(data.len());
        let change = match required.cmp(&account.lamports) {
            Ordering::Greater => {
                let diff = required - account.lamports;
                self.debit(payer, diff)?;
                RentChange::Charged(diff)
            }
            Ordering::Less => {
                let diff = account.lamports - required;
                self.credit(payer, diff);
                RentChange::Refunded(diff)
            }
            Ordering::Equal => RentChange::Unchanged,
        };

        account.lamports = required;
        account.data = data;
        Ok(change)
    }

    fn close_account(
        &self,
        address: &Address,
        recipient: &Pubkey,
    ) -> Result<u64, LedgerError> {
        let (_, account) =
            self.accounts
                .remove(address)
                .ok_or_else(|| LedgerError::AccountNotFound {
                    address: address.to_string(),
                })?;
        self.credit(recipient, account.lamports);
        Ok(account.lamports)
    }
}

//! Внешний леджер, на котором исполняется программа.
//!
//! Леджер хранит балансы кошельков и байтовые данные аккаунтов по выведенным
//! адресам, удерживает аренду при создании аккаунта и возвращает её при
//! закрытии. Программа видит его только через трейт [`Ledger`]; в комплекте
//! есть [`InMemoryLedger`] для тестов, демо и встраивания.

pub mod memory;
pub mod rent;

pub use memory::*;
pub use rent::*;

use pubhub_error::LedgerError;

use crate::identity::{Address, Pubkey};

/// Аккаунт, принадлежащий программе.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    /// Удержанная аренда.
    pub lamports: u64,
    /// Данные аккаунта.
    pub data: Vec<u8>,
}

/// Движение аренды при изменении размера аккаунта.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RentChange {
    /// С плательщика удержано дополнительно.
    Charged(u64),
    /// Плательщику возвращено.
    Refunded(u64),
    Unchanged,
}

pub trait Ledger: Send + Sync {
    /// Параметры аренды.
    fn rent(&self) -> Rent;

    /// Текущее время леджера, unix-секунды.
    fn now(&self) -> i64;

    /// Баланс кошелька (0 для неизвестного).
    fn balance(
        &self,
        wallet: &Pubkey,
    ) -> u64;

    /// Пополняет кошелёк. Сам кран находится вне программы.
    fn credit(
        &self,
        wallet: &Pubkey,
        lamports: u64,
    );

    /// Снимок аккаунта по адресу.
    fn account(
        &self,
        address: &Address,
    ) -> Option<Account>;

    /// Создаёт аккаунт, удерживая с `payer` минимальный баланс для `data`.
    /// Возвращает удержанную сумму.
    fn create_account(
        &self,
        payer: &Pubkey,
        address: Address,
        data: Vec<u8>,
    ) -> Result<u64, LedgerError>;

    /// Заменяет данные аккаунта, при необходимости меняя его размер; разница в
    /// аренде удерживается с `payer` или возвращается ему.
    fn resize_account(
        &self,
        payer: &Pubkey,
        address: &Address,
        data: Vec<u8>,
    ) -> Result<RentChange, LedgerError>;

    /// Удаляет аккаунт и переводит всю удержанную аренду на `recipient`.
    /// Возвращает переведённую сумму.
    fn close_account(
        &self,
        address: &Address,
        recipient: &Pubkey,
    ) -> Result<u64, LedgerError>;
}

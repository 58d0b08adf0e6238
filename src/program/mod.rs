//! Программа хаба: операции над аккаунтами леджера и рассылка событий.
//!
//! Каждая операция является одной синхронной транзакцией "всё или ничего": проверки
//! и оплата выполняются до любых изменений, а события испускаются уже после
//! того, как блокировки аккаунтов отпущены.

mod dispatch;
mod hub;
mod instruction;
mod locks;
mod topics;

pub use dispatch::PublishReceipt;
pub use instruction::{Instruction, Outcome};

use std::{fmt, str::FromStr, sync::Arc};

use locks::AccountLocks;
use pubhub_error::{HubError, HubResult};
use serde::{Deserialize, Serialize};

use crate::{
    events::{EventBus, ProgramEvent},
    identity::{Address, Pubkey},
    ledger::Ledger,
    state::{self, AccountState},
    subscription::SubscriptionIndex,
};

/// Режим рассылки публикаций. Выбирается при развёртывании и не меняется.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PublishMode {
    /// Публикует только владелец хаба; одно событие на вызов.
    #[default]
    HubScoped,
    /// Публиковать может любой; по событию на каждого подписчика топика.
    SubscriberAddressed,
}

impl PublishMode {
    pub fn as_str(self) -> &'static str {
        match self {
            PublishMode::HubScoped => "hub_scoped",
            PublishMode::SubscriberAddressed => "subscriber_addressed",
        }
    }
}

impl fmt::Display for PublishMode {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PublishMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "hub_scoped" | "hub" => Ok(PublishMode::HubScoped),
            "subscriber_addressed" | "subscriber" => Ok(PublishMode::SubscriberAddressed),
            other => Err(format!(
                "unknown publish mode '{other}' (expected hub_scoped|subscriber_addressed)"
            )),
        }
    }
}

/// Параметры развёртывания программы.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgramConfig {
    pub publish_mode: PublishMode,
    /// Ёмкость каждого нового реестра топиков.
    pub max_topics: u16,
    /// Максимальная длина имени топика в байтах.
    pub max_topic_len: usize,
    /// Максимальная длина сообщения в байтах.
    pub max_message_len: usize,
    /// Требовать, чтобы топик подписки и публикации был зарегистрирован у
    /// владельца хаба.
    pub strict_topics: bool,
    /// Ёмкость буфера потоков событий.
    pub event_buffer: usize,
}

impl Default for ProgramConfig {
    fn default() -> Self {
        Self {
            publish_mode: PublishMode::default(),
            max_topics: 32,
            max_topic_len: 64,
            max_message_len: 1024,
            strict_topics: false,
            event_buffer: 128,
        }
    }
}

/// Экземпляр программы над конкретным леджером.
///
/// `Send + Sync`: разделяется между вызывающими через `Arc`.
pub struct Program<L: Ledger> {
    ledger: Arc<L>,
    config: ProgramConfig,
    subscriptions: SubscriptionIndex,
    events: EventBus,
    locks: AccountLocks,
}

////////////////////////////////////////////////////////////////////////////////
// Собственные методы
////////////////////////////////////////////////////////////////////////////////

impl<L: Ledger> Program<L> {
    pub fn new(
        ledger: Arc<L>,
        config: ProgramConfig,
    ) -> Self {
        let events = EventBus::new(config.event_buffer);
        Self {
            ledger,
            config,
            subscriptions: SubscriptionIndex::new(),
            events,
            locks: AccountLocks::default(),
        }
    }

    pub fn ledger(&self) -> &Arc<L> {
        &self.ledger
    }

    pub fn config(&self) -> &ProgramConfig {
        &self.config
    }

    pub fn publish_mode(&self) -> PublishMode {
        self.config.publish_mode
    }

    /// Шина событий: слушатели и потоки.
    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn subscriptions(&self) -> &SubscriptionIndex {
        &self.subscriptions
    }

    /// Читает и разбирает аккаунт; `None`, если по адресу ничего нет.
    fn load<T: AccountState>(
        &self,
        address: &Address,
    ) -> HubResult<Option<T>> {
        match self.ledger.account(address) {
            Some(account) => state::decode(address, &account.data).map(Some),
            None => Ok(None),
        }
    }

    fn emit_all(
        &self,
        events: Vec<ProgramEvent>,
    ) -> usize {
        events.into_iter().map(|e| self.events.emit(e)).sum()
    }
}

fn ensure_owner(
    owner: &Pubkey,
    signer: &Pubkey,
) -> HubResult<()> {
    if owner != signer {
        tracing::warn!(
            owner = %owner.short(),
            signer = %signer.short(),
            "signer is not the owner"
        );
        return Err(HubError::Unauthorized {
            expected: owner.to_string(),
            actual: signer.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_mode_parse_and_display() {
        assert_eq!(
            "hub_scoped".parse::<PublishMode>().unwrap(),
            PublishMode::HubScoped
        );
        assert_eq!(
            "subscriber-addressed".parse::<PublishMode>().unwrap(),
            PublishMode::SubscriberAddressed
        );
        assert_eq!(PublishMode::SubscriberAddressed.to_string(), "subscriber_addressed");
        assert!("broadcast".parse::<PublishMode>().is_err());
    }

    #[test]
    fn test_config_deserialize_partial() {
        let cfg: ProgramConfig =
            serde_json::from_str(r#"{"publish_mode":"subscriber_addressed","max_topics":4}"#)
                .unwrap();
        assert_eq!(cfg.publish_mode, PublishMode::SubscriberAddressed);
        assert_eq!(cfg.max_topics, 4);
        assert_eq!(cfg.max_topic_len, ProgramConfig::default().max_topic_len);
    }

    #[test]
    fn test_ensure_owner() {
        let owner = Pubkey::new_unique();
        assert!(ensure_owner(&owner, &owner).is_ok());
        let err = ensure_owner(&owner, &Pubkey::new_unique()).unwrap_err();
        assert_eq!(err.name(), "unauthorized");
    }
}

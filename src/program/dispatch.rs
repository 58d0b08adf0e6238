use pubhub_error::{HubError, HubResult};
use serde::Serialize;
use tracing::debug;

use super::{ensure_owner, Program, PublishMode};
use crate::{
    address::topics_address,
    events::{ProgramEvent, Publication},
    identity::{Address, Pubkey},
    ledger::Ledger,
    state::HubAccount,
};

/// Итог вызова `publish`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PublishReceipt {
    /// Сколько записей о публикации испущено.
    pub events_emitted: usize,
    /// Сколько получателей (слушателей и потоков) их приняли в сумме.
    pub listeners_reached: usize,
}

impl<L: Ledger> Program<L> {
    /// Подписывает участника на топик хаба. Подписаться может кто угодно.
    ///
    /// Возвращает `false`, если такая подписка уже была.
    pub fn subscribe(
        &self,
        subscriber: &Pubkey,
        hub: &Address,
        topic: &str,
    ) -> HubResult<bool> {
        self.validate_topic(topic)?;

        // Блокировка хаба удерживается до вставки, чтобы подписка не пережила
        // параллельное закрытие хаба.
        let inserted = self.locks.with_read(hub, || {
            let account = self.load_hub(hub)?;
            if self.config.strict_topics {
                self.ensure_registered(account.owner(), topic)?;
            }
            Ok::<_, HubError>(self.subscriptions.insert(*hub, topic, *subscriber))
        })?;

        debug!(
            subscriber = %subscriber.short(),
            hub = %hub.short(),
            topic,
            inserted,
            "subscribe"
        );
        if inserted {
            self.events.emit(ProgramEvent::Subscribed {
                subscriber: *subscriber,
                hub: *hub,
                topic: topic.to_string(),
            });
        }
        Ok(inserted)
    }

    /// Публикует сообщение в топик хаба.
    ///
    /// В режиме [`PublishMode::HubScoped`] публикует только владелец, и
    /// испускается ровно одна запись. В режиме
    /// [`PublishMode::SubscriberAddressed`] публиковать может любой, и
    /// испускается по записи на каждого текущего подписчика пары; без
    /// подписчиков вызов успешен и ничего не испускает.
    pub fn publish(
        &self,
        publisher: &Pubkey,
        hub: &Address,
        topic: &str,
        message: &str,
    ) -> HubResult<PublishReceipt> {
        self.validate_topic(topic)?;
        if message.len() > self.config.max_message_len {
            return Err(HubError::MessageTooLarge {
                size: message.len(),
                max: self.config.max_message_len,
            });
        }

        let publications = self.locks.with_read(hub, || {
            let account = self.load_hub(hub)?;
            if self.config.strict_topics {
                self.ensure_registered(account.owner(), topic)?;
            }

            let record = |subscriber| Publication {
                publisher: *publisher,
                hub: *hub,
                topic: topic.to_string(),
                message: message.to_string(),
                subscriber,
            };
            let out = match self.config.publish_mode {
                PublishMode::HubScoped => {
                    ensure_owner(account.owner(), publisher)?;
                    vec![record(None)]
                }
                PublishMode::SubscriberAddressed => self
                    .subscriptions
                    .subscribers(hub, topic)
                    .into_iter()
                    .map(|s| record(Some(s)))
                    .collect(),
            };
            Ok::<_, HubError>(out)
        })?;

        let events_emitted = publications.len();
        let listeners_reached =
            self.emit_all(publications.into_iter().map(ProgramEvent::Publication).collect());
        debug!(
            publisher = %publisher.short(),
            hub = %hub.short(),
            topic,
            mode = %self.config.publish_mode,
            events_emitted,
            listeners_reached,
            "publish"
        );
        Ok(PublishReceipt {
            events_emitted,
            listeners_reached,
        })
    }

    /// Проверяет имя топика: непустое и не длиннее `max_topic_len` байт.
    pub fn validate_topic(
        &self,
        topic: &str,
    ) -> HubResult<()> {
        if topic.is_empty() {
            return Err(HubError::InvalidTopic {
                reason: "topic must not be empty".to_string(),
            });
        }
        if topic.len() > self.config.max_topic_len {
            return Err(HubError::InvalidTopic {
                reason: format!(
                    "topic is {} bytes, max is {}",
                    topic.len(),
                    self.config.max_topic_len
                ),
            });
        }
        Ok(())
    }

    fn load_hub(
        &self,
        hub: &Address,
    ) -> HubResult<HubAccount> {
        self.load(hub)?.ok_or_else(|| HubError::HubNotFound {
            hub: hub.to_string(),
        })
    }

    /// Топик должен быть в реестре владельца хаба.
    fn ensure_registered(
        &self,
        owner: &Pubkey,
        topic: &str,
    ) -> HubResult<()> {
        let address = topics_address(owner);
        let registry = self
            .locks
            .with_read(&address, || self.load_registry(&address))?;
        if !registry.contains(topic) {
            return Err(HubError::TopicNotFound {
                topic: topic.to_string(),
            });
        }
        Ok(())
    }
}

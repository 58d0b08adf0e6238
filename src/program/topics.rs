use pubhub_error::{HubError, HubResult};
use tracing::{debug, info};

use super::{ensure_owner, Program};
use crate::{
    address::topics_address,
    events::ProgramEvent,
    identity::{Address, Pubkey},
    ledger::{Ledger, MAX_ACCOUNT_SIZE},
    state::{self, TopicsAccount},
};

impl<L: Ledger> Program<L> {
    /// Создаёт пустой реестр топиков владельца по выведенному адресу.
    /// Аренда удерживается с владельца.
    pub fn initialise(
        &self,
        owner: &Pubkey,
    ) -> HubResult<Address> {
        let address = topics_address(owner);
        self.locks.with_write(&address, || {
            if self.ledger.account(&address).is_some() {
                return Err(HubError::AlreadyInitialised {
                    address: address.to_string(),
                });
            }
            let registry = TopicsAccount::new(*owner, self.config.max_topics);
            let data = state::encode(&address, &registry)?;
            let rent = self.ledger.create_account(owner, address, data)?;
            info!(
                owner = %owner.short(),
                address = %address.short(),
                capacity = registry.capacity(),
                rent,
                "topics registry initialised"
            );
            Ok(address)
        })
    }

    /// Добавляет топик в конец реестра владельца. Возвращает его позицию.
    ///
    /// Аккаунт растёт под новое содержимое, доплата аренды удерживается с
    /// владельца.
    pub fn create_topic(
        &self,
        owner: &Pubkey,
        topic: &str,
    ) -> HubResult<usize> {
        self.validate_topic(topic)?;
        let address = topics_address(owner);

        let index = self.locks.with_write(&address, || {
            let mut registry = self.load_registry(&address)?;
            ensure_owner(registry.owner(), owner)?;

            registry.push(topic)?;
            let data = state::encode(&address, &registry)?;
            if data.len() > MAX_ACCOUNT_SIZE {
                return Err(HubError::CapacityExceeded {
                    capacity: registry.capacity(),
                });
            }
            let change = self.ledger.resize_account(owner, &address, data)?;
            let index = registry.len() - 1;
            debug!(
                owner = %owner.short(),
                topic,
                index,
                len = registry.len(),
                ?change,
                "topic created"
            );
            Ok(index)
        })?;

        self.events.emit(ProgramEvent::TopicCreated {
            owner: *owner,
            topic: topic.to_string(),
            index,
        });
        Ok(index)
    }

    /// Удаляет топик; все последующие сдвигаются на одну позицию влево.
    /// Освободившаяся аренда возвращается владельцу.
    pub fn remove_topic(
        &self,
        owner: &Pubkey,
        topic: &str,
    ) -> HubResult<usize> {
        let address = topics_address(owner);

        let index = self.locks.with_write(&address, || {
            let mut registry = self.load_registry(&address)?;
            ensure_owner(registry.owner(), owner)?;

            let index = registry.remove(topic)?;
            let data = state::encode(&address, &registry)?;
            let change = self.ledger.resize_account(owner, &address, data)?;
            debug!(
                owner = %owner.short(),
                topic,
                index,
                len = registry.len(),
                ?change,
                "topic removed"
            );
            Ok::<_, HubError>(index)
        })?;

        self.events.emit(ProgramEvent::TopicRemoved {
            owner: *owner,
            topic: topic.to_string(),
            index,
        });
        Ok(index)
    }

    /// Уничтожает реестр и возвращает всю аренду владельцу. Непустой реестр
    /// тоже можно уничтожить. Возвращает сумму возврата.
    pub fn deinitialise(
        &self,
        signer: &Pubkey,
        address: &Address,
    ) -> HubResult<u64> {
        self.locks.with_write(address, || {
            let registry = self.load_registry(address)?;
            ensure_owner(registry.owner(), signer)?;

            let refunded = self.ledger.close_account(address, registry.owner())?;
            info!(
                owner = %registry.owner().short(),
                address = %address.short(),
                remaining = registry.len(),
                refunded,
                "topics registry deinitialised"
            );
            Ok(refunded)
        })
    }

    /// Реестр топиков владельца, если он создан.
    pub fn topics(
        &self,
        owner: &Pubkey,
    ) -> HubResult<Option<TopicsAccount>> {
        let address = topics_address(owner);
        self.locks.with_read(&address, || self.load(&address))
    }

    pub(super) fn load_registry(
        &self,
        address: &Address,
    ) -> HubResult<TopicsAccount> {
        self.load(address)?
            .ok_or_else(|| HubError::NotInitialised {
                address: address.to_string(),
            })
    }
}

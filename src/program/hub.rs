use pubhub_error::{HubError, HubResult};
use tracing::info;

use super::{ensure_owner, Program};
use crate::{
    address::hub_address,
    events::ProgramEvent,
    identity::{Address, Pubkey},
    ledger::Ledger,
    state::{self, HubAccount},
};

impl<L: Ledger> Program<L> {
    /// Создаёт хаб, принадлежащий `rent_payer`. У владельца может быть только
    /// один хаб.
    pub fn create_hub(
        &self,
        rent_payer: &Pubkey,
    ) -> HubResult<Address> {
        let address = hub_address(rent_payer);
        let created_at = self.locks.with_write(&address, || {
            if self.ledger.account(&address).is_some() {
                return Err(HubError::AlreadyExists {
                    address: address.to_string(),
                });
            }
            let hub = HubAccount::new(*rent_payer, self.ledger.now());
            let data = state::encode(&address, &hub)?;
            let rent = self.ledger.create_account(rent_payer, address, data)?;
            info!(
                owner = %rent_payer.short(),
                hub = %address.short(),
                rent,
                "hub created"
            );
            Ok(hub.created_at())
        })?;

        self.events.emit(ProgramEvent::HubCreated {
            owner: *rent_payer,
            hub: address,
            created_at,
        });
        Ok(address)
    }

    /// Закрывает хаб: удаляет его подписки и возвращает владельцу всю
    /// аренду. Возвращает сумму возврата.
    pub fn close_hub(
        &self,
        rent_payer: &Pubkey,
        hub: &Address,
    ) -> HubResult<u64> {
        let refunded = self.locks.with_write(hub, || {
            let account = self.load::<HubAccount>(hub)?.ok_or_else(|| HubError::NotFound {
                address: hub.to_string(),
            })?;
            ensure_owner(account.owner(), rent_payer)?;

            let refunded = self.ledger.close_account(hub, rent_payer)?;
            let dropped = self.subscriptions.remove_hub(hub);
            info!(
                owner = %rent_payer.short(),
                hub = %hub.short(),
                refunded,
                dropped_subscriptions = dropped,
                "hub closed"
            );
            Ok::<_, HubError>(refunded)
        })?;

        self.events.emit(ProgramEvent::HubClosed {
            owner: *rent_payer,
            hub: *hub,
            refunded,
        });
        Ok(refunded)
    }

    /// Хаб по адресу, если он существует.
    pub fn hub(
        &self,
        address: &Address,
    ) -> HubResult<Option<HubAccount>> {
        self.locks.with_read(address, || self.load(address))
    }
}

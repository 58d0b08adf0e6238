use pubhub_error::{ResultExt, StackResult};
use serde::{Deserialize, Serialize};

use super::{dispatch::PublishReceipt, Program};
use crate::{
    identity::{Address, Pubkey},
    ledger::Ledger,
};

/// Инструкция программе от подписанта.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "instruction", rename_all = "camelCase")]
pub enum Instruction {
    Initialise,
    Deinitialise { registry: Address },
    CreateTopic { topic: String },
    RemoveTopic { topic: String },
    CreateHub,
    CloseHub { hub: Address },
    Subscribe { hub: Address, topic: String },
    Publish { hub: Address, topic: String, message: String },
}

/// Результат успешной инструкции.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum Outcome {
    Initialised { address: Address },
    Deinitialised { refunded: u64 },
    TopicCreated { index: usize },
    TopicRemoved { index: usize },
    HubCreated { address: Address },
    HubClosed { refunded: u64 },
    Subscribed { new: bool },
    Published(PublishReceipt),
}

impl Instruction {
    pub fn name(&self) -> &'static str {
        match self {
            Instruction::Initialise => "initialise",
            Instruction::Deinitialise { .. } => "deinitialise",
            Instruction::CreateTopic { .. } => "createTopic",
            Instruction::RemoveTopic { .. } => "removeTopic",
            Instruction::CreateHub => "createHub",
            Instruction::CloseHub { .. } => "closeHub",
            Instruction::Subscribe { .. } => "subscribe",
            Instruction::Publish { .. } => "publish",
        }
    }
}

impl<L: Ledger> Program<L> {
    /// Исполняет инструкцию от имени `signer`. Ошибка получает контекст с
    /// именем инструкции.
    pub fn process(
        &self,
        signer: &Pubkey,
        instruction: Instruction,
    ) -> StackResult<Outcome> {
        let name = instruction.name();
        let outcome = match instruction {
            Instruction::Initialise => self
                .initialise(signer)
                .map(|address| Outcome::Initialised { address }),
            Instruction::Deinitialise { registry } => self
                .deinitialise(signer, &registry)
                .map(|refunded| Outcome::Deinitialised { refunded }),
            Instruction::CreateTopic { topic } => self
                .create_topic(signer, &topic)
                .map(|index| Outcome::TopicCreated { index }),
            Instruction::RemoveTopic { topic } => self
                .remove_topic(signer, &topic)
                .map(|index| Outcome::TopicRemoved { index }),
            Instruction::CreateHub => self
                .create_hub(signer)
                .map(|address| Outcome::HubCreated { address }),
            Instruction::CloseHub { hub } => self
                .close_hub(signer, &hub)
                .map(|refunded| Outcome::HubClosed { refunded }),
            Instruction::Subscribe { hub, topic } => self
                .subscribe(signer, &hub, &topic)
                .map(|new| Outcome::Subscribed { new }),
            Instruction::Publish {
                hub,
                topic,
                message,
            } => self
                .publish(signer, &hub, &topic, &message)
                .map(Outcome::Published),
        };
        outcome.with_context(|| format!("instruction {name} failed"))
    }
}

#![allow(dead_code)]

use std::sync::Arc;

use pubhub::{
    ledger::LAMPORTS_PER_SOL, InMemoryLedger, Ledger, Program, ProgramConfig, Pubkey, PublishMode,
};

/// Программа на леджере в памяти и два участника с балансом по 1 SOL.
pub struct Harness {
    pub ledger: Arc<InMemoryLedger>,
    pub program: Program<InMemoryLedger>,
    pub alice: Pubkey,
    pub bob: Pubkey,
}

pub fn harness(config: ProgramConfig) -> Harness {
    let ledger = Arc::new(InMemoryLedger::new());
    let alice = Pubkey::new_unique();
    let bob = Pubkey::new_unique();
    ledger.credit(&alice, LAMPORTS_PER_SOL);
    ledger.credit(&bob, LAMPORTS_PER_SOL);
    Harness {
        program: Program::new(Arc::clone(&ledger), config),
        ledger,
        alice,
        bob,
    }
}

pub fn with_mode(mode: PublishMode) -> Harness {
    harness(ProgramConfig {
        publish_mode: mode,
        ..Default::default()
    })
}

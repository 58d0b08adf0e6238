//! CLI pubhub
//!
//! Проигрывает сценарии хаба на леджере в памяти и выводит адреса
//! аккаунтов.

use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pubhub::{
    address::{derive_address, hub_address},
    ledger::LAMPORTS_PER_SOL,
    logging::init_logging,
    InMemoryLedger, Instruction, Ledger, Namespace, Program, ProgramEvent, Pubkey,
    PublishMode, RecvError, Settings, StackResult,
};
use tracing::{debug, info};

#[derive(Parser)]
#[command(name = "pubhub")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Decentralized publish/subscribe hub", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Файл настроек (по умолчанию pubhub.toml, если есть)
    #[arg(short, long, global = true, env = "PUBHUB_CONFIG")]
    config: Option<PathBuf>,
    /// Включить подробный вывод (debug)
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Проиграть сценарий публикации на леджере в памяти
    Demo {
        /// Режим рассылки (по умолчанию из настроек)
        #[arg(short, long)]
        mode: Option<PublishMode>,
    },
    /// Вывести адрес аккаунта для владельца
    Address {
        /// Пространство имён: hub или topics
        namespace: Namespace,
        /// Владелец (64 hex-символа)
        owner: Pubkey,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut settings =
        Settings::load_from(cli.config.as_deref()).context("failed to load settings")?;
    if cli.verbose {
        settings.logging.level = "debug".to_string();
    }
    init_logging(&settings.logging)?;

    match cli.command {
        Commands::Demo { mode } => {
            if let Some(mode) = mode {
                settings.program.publish_mode = mode;
            }
            run_demo(settings).await
        }
        Commands::Address { namespace, owner } => {
            println!("{}", derive_address(namespace, &owner));
            Ok(())
        }
    }
}

async fn run_demo(settings: Settings) -> Result<()> {
    let ledger = Arc::new(InMemoryLedger::with_rent(settings.rent));
    let program = Program::new(Arc::clone(&ledger), settings.program);
    let mode = program.publish_mode();

    let alice = Pubkey::new_unique();
    let bob = Pubkey::new_unique();
    ledger.credit(&alice, LAMPORTS_PER_SOL);
    ledger.credit(&bob, LAMPORTS_PER_SOL);
    info!(%mode, alice = %alice.short(), bob = %bob.short(), "demo started");

    // Печатает публикации, пока шина жива.
    let mut stream = program.events().stream();
    let printer = tokio::spawn(async move {
        loop {
            match stream.recv().await {
                Ok(ProgramEvent::Publication(p)) => match serde_json::to_string(&p) {
                    Ok(line) => println!("{line}"),
                    Err(e) => eprintln!("failed to encode publication: {e}"),
                },
                Ok(other) => debug!(event = %other.kind(), "lifecycle event"),
                Err(RecvError::Lagged(n)) => eprintln!("missed {n} events"),
                Err(_) => break,
            }
        }
    });

    let result = match mode {
        PublishMode::HubScoped => owner_publishes(&program, &alice, &bob),
        PublishMode::SubscriberAddressed => subscriber_receives(&program, &alice, &bob),
    };

    drop(program);
    printer.await.context("event printer panicked")?;

    if let Err(err) = result {
        eprintln!("{}", serde_json::to_string(&err.to_response())?);
        anyhow::bail!("demo failed: {err}");
    }
    info!(
        alice_balance = ledger.balance(&alice),
        bob_balance = ledger.balance(&bob),
        accounts = ledger.account_count(),
        "demo finished"
    );
    Ok(())
}

/// Alice создаёт хаб, Bob подписывается на `/topic_1`, Alice публикует.
fn owner_publishes(
    program: &Program<InMemoryLedger>,
    alice: &Pubkey,
    bob: &Pubkey,
) -> StackResult<()> {
    program.process(alice, Instruction::CreateHub)?;
    let hub = hub_address(alice);
    program.process(
        bob,
        Instruction::Subscribe {
            hub,
            topic: "/topic_1".into(),
        },
    )?;
    program.process(
        alice,
        Instruction::Publish {
            hub,
            topic: "/topic_1".into(),
            message: "Hello, Bob!".into(),
        },
    )?;
    program.process(alice, Instruction::CloseHub { hub })?;
    Ok(())
}

/// Alice создаёт хаб и подписывается на `/topic_2`, Bob публикует ей.
fn subscriber_receives(
    program: &Program<InMemoryLedger>,
    alice: &Pubkey,
    bob: &Pubkey,
) -> StackResult<()> {
    program.process(alice, Instruction::CreateHub)?;
    let hub = hub_address(alice);
    program.process(
        alice,
        Instruction::Subscribe {
            hub,
            topic: "/topic_2".into(),
        },
    )?;
    program.process(
        bob,
        Instruction::Publish {
            hub,
            topic: "/topic_2".into(),
            message: "Hello, Alice!".into(),
        },
    )?;
    program.process(alice, Instruction::CloseHub { hub })?;
    Ok(())
}

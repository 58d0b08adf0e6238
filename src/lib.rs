/// Deterministic account addresses derived from a namespace and an owner.
pub mod address;
/// Layered settings: defaults, `pubhub.toml`, `PUBHUB__*` environment.
pub mod config;
/// Crate-local errors: settings, logging, event streams.
pub mod error;
/// Event bus: publication records and lifecycle events.
pub mod events;
/// 32-byte identities and account addresses.
pub mod identity;
/// Ledger collaborator: balances, account storage, rent.
pub mod ledger;
/// Logging (filters, formats).
pub mod logging;
/// Hub program: topic registry, hubs, subscriptions, publishing.
pub mod program;
/// On-ledger account layouts.
pub mod state;
/// Subscription index keyed by (hub, topic).
pub mod subscription;

// -----------------------------------------------------------------------------
//  Frequently used public types
// -----------------------------------------------------------------------------

/// Address derivation.
pub use address::{derive_address, hub_address, topics_address, Namespace, PROGRAM_ID};
/// Settings.
pub use config::Settings;
/// Stream errors and configuration errors.
pub use error::{LoggingError, RecvError, SettingsError, TryRecvError};
/// Events API.
pub use events::{EventBus, EventKind, EventStream, ListenerId, ProgramEvent, Publication};
/// Identities.
pub use identity::{Address, Pubkey};
/// Ledger API.
pub use ledger::{InMemoryLedger, Ledger, Rent};
/// Program API.
pub use program::{Instruction, Outcome, Program, ProgramConfig, PublishMode, PublishReceipt};
/// Program and ledger errors.
pub use pubhub_error::{HubError, HubResult, LedgerError, StackError, StackResult, StatusCode};
/// Account layouts.
pub use state::{HubAccount, TopicsAccount};
/// Subscriptions.
pub use subscription::SubscriptionIndex;

//! hypertokens-core: deterministic token ledger state machine.
//!
//! Three operations act on a key-value [`Store`]:
//! - `deploy`: define a token with a fixed supply, per-mint amount and precision
//! - `mint`: claim the next slice of a token's supply, optionally gated by a
//!   deployer-signed permit
//! - `transfer`: move balance between addresses
//!
//! A [`Ledger`] applies them either speculatively ([`Ledger::simulate`]) or
//! for good ([`Ledger::commit`]). Replicas that commit the same operations in
//! the same order end with identical stores.

pub mod amount;
mod auth;
mod config;
mod deploy;
mod engine;
mod error;
mod hash;
pub mod keys;
mod migration;
mod mint;
pub mod records;
pub mod schema;
mod store;
mod transfer;
pub mod view;

pub use auth::{Ed25519Verifier, MintPermit, SignatureVerifier, address_of, mint_message, sign_mint, sign_mint_with_nonce};
pub use config::LedgerConfig;
pub use engine::{Event, Ledger, Receipt, Verdict};
pub use error::{Error, Rejection};
pub use hash::Hash;
pub use keys::{Address, Ticker};
pub use migration::{LegacyRecord, MigrationReport, TERMINAL_KEY};
pub use schema::{DeployOp, Envelope, MintOp, Operation, TransferOp};
pub use store::{MemoryStore, Mutation, Overlay, Store, Value};

/// Re-export for convenience
pub use ed25519_dalek::{SigningKey, VerifyingKey};

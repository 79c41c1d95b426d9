//! Error types for hypertokens-core.

use thiserror::Error;

/// Why an operation was refused.
///
/// Rejections are verdicts, not faults: the ledger stays usable after any of
/// them and the rejected operation leaves no trace in the store.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum Rejection {
    /// The payload does not match the schema for its operation type.
    #[error("invalid operation: {0}")]
    SchemaInvalid(String),

    /// The ticker belongs to the reserved set.
    #[error("ticker {0} is reserved and cannot be deployed")]
    ReservedTicker(String),

    /// Decimals outside `0..=18`.
    #[error("invalid decimals")]
    InvalidDecimals,

    /// Amount unparseable, not positive, or beyond the token's precision.
    #[error("invalid amount")]
    InvalidAmount,

    /// Supply unparseable or not positive.
    #[error("invalid supply")]
    InvalidSupply,

    #[error("token {0} exists already")]
    TokenExists(String),

    #[error("token {0} does not exist")]
    TokenNotFound(String),

    #[error("no nonce given")]
    MissingNonce,

    #[error("no signature given")]
    MissingSignature,

    /// The signature already authorized an earlier mint.
    #[error("signature has been used before")]
    SignatureReused,

    /// The signature does not verify against the deployer.
    #[error("not authorized")]
    NotAuthorized,

    #[error("token {0} is minted out")]
    MintedOut(String),

    #[error("invalid address")]
    InvalidAddress,

    #[error("cannot send to yourself")]
    SelfTransfer,

    #[error("insufficient funds")]
    InsufficientFunds,

    /// A stored balance could not be decoded.
    #[error("invalid balance encoding at {0}")]
    InvalidBalanceEncoding(String),

    /// A stored deployment or index record could not be decoded.
    #[error("corrupt record at {0}")]
    CorruptRecord(String),
}

/// Infrastructure errors, never produced while applying an operation.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be loaded.
    #[error("configuration error: {0}")]
    Config(#[from] confique::Error),
}

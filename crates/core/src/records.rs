//! Stored record types and their encodings.
//!
//! Deployments are stored as JSON objects, balances and counters as decimal
//! integer strings. Every magnitude is a fixed-point integer string.

use crate::amount::safe_parse_integer;
use crate::keys::{self, Address, Ticker};
use crate::{Rejection, Store};
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};

/// One token's issuance rules and progress.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deployment {
    pub ticker: Ticker,
    pub decimals: u8,
    /// Total supply.
    pub supply: String,
    /// Upper bound granted by a single mint.
    pub per_mint: String,
    /// Amount minted so far.
    pub completed: String,
    /// Mints require the deployer's signature.
    pub signed: bool,
    pub deployer: Address,
    pub data: Option<String>,
    /// Creation order, starting at zero.
    pub index: u64,
}

impl Deployment {
    pub fn supply(&self) -> Result<BigUint, Rejection> {
        self.magnitude(&self.supply)
    }

    pub fn per_mint(&self) -> Result<BigUint, Rejection> {
        self.magnitude(&self.per_mint)
    }

    pub fn completed(&self) -> Result<BigUint, Rejection> {
        self.magnitude(&self.completed)
    }

    fn magnitude(&self, value: &str) -> Result<BigUint, Rejection> {
        safe_parse_integer(value).ok_or_else(|| Rejection::CorruptRecord(keys::deployment(&self.ticker)))
    }
}

pub fn read_deployment(store: &dyn Store, ticker: &Ticker) -> Result<Option<Deployment>, Rejection> {
    let key = keys::deployment(ticker);
    match store.get(&key) {
        None => Ok(None),
        Some(bytes) => serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|_| Rejection::CorruptRecord(key)),
    }
}

pub fn write_deployment(store: &mut dyn Store, deployment: &Deployment) -> Result<(), Rejection> {
    let key = keys::deployment(&deployment.ticker);
    let bytes = serde_json::to_vec(deployment).map_err(|_| Rejection::CorruptRecord(key.clone()))?;
    store.put(&key, bytes);
    Ok(())
}

/// Balance of `address` in `ticker`, zero when absent.
pub fn read_balance(store: &dyn Store, address: &Address, ticker: &Ticker) -> Result<BigUint, Rejection> {
    let key = keys::balance(address, ticker);
    match store.get(&key) {
        None => Ok(BigUint::default()),
        Some(bytes) => std::str::from_utf8(&bytes)
            .ok()
            .and_then(safe_parse_integer)
            .ok_or(Rejection::InvalidBalanceEncoding(key)),
    }
}

pub fn write_balance(store: &mut dyn Store, address: &Address, ticker: &Ticker, balance: &BigUint) {
    store.put(&keys::balance(address, ticker), balance.to_string().into_bytes());
}

/// Read a decimal counter, zero when absent.
pub fn read_counter(store: &dyn Store, key: &str) -> Result<u64, Rejection> {
    match store.get(key) {
        None => Ok(0),
        Some(bytes) => std::str::from_utf8(&bytes)
            .ok()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| Rejection::CorruptRecord(key.to_string())),
    }
}

pub fn write_counter(store: &mut dyn Store, key: &str, value: u64) {
    store.put(key, value.to_string().into_bytes());
}

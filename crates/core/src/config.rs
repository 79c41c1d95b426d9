//! Ledger parameters.
//!
//! These values are part of the protocol: replicas that disagree on them
//! will disagree on verdicts.

use crate::Error;
use crate::keys::Ticker;
use confique::Config;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_RESERVED_TICKERS: [&str; 7] =
    ["tap", "trac", "pipe", "gib", "dmt-nat", "nat", "hypermall"];

#[derive(Config, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Tickers nobody may deploy (protocol-native or platform-reserved).
    #[config(default = ["tap", "trac", "pipe", "gib", "dmt-nat", "nat", "hypermall"])]
    pub reserved_tickers: Vec<String>,

    /// Largest accepted operation payload, in bytes.
    #[config(default = 2048, env = "HYPERTOKENS_MAX_OPERATION_BYTES")]
    pub max_operation_bytes: usize,

    /// Shortest accepted transfer recipient.
    #[config(default = 64, env = "HYPERTOKENS_MIN_ADDRESS_LEN")]
    pub min_address_len: usize,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            reserved_tickers: DEFAULT_RESERVED_TICKERS.iter().map(|t| t.to_string()).collect(),
            max_operation_bytes: 2048,
            min_address_len: 64,
        }
    }
}

impl LedgerConfig {
    /// Load from a TOML file, letting environment variables override it.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        Ok(Self::builder().env().file(path.as_ref()).load()?)
    }

    pub fn is_reserved(&self, ticker: &Ticker) -> bool {
        self.reserved_tickers
            .iter()
            .any(|reserved| Ticker::new(reserved) == *ticker)
    }
}

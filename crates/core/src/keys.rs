//! Normalized identifiers and the store keys derived from them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A token ticker, trimmed and lower-cased.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Ticker(String);

impl Ticker {
    pub fn new(raw: &str) -> Self {
        Self(raw.trim().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// JSON-quoted form used inside keys, so no ticker can alias another
    /// key by containing a separator.
    fn key_segment(&self) -> String {
        serde_json::Value::String(self.0.clone()).to_string()
    }
}

impl fmt::Display for Ticker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An account address (hex public key), trimmed and lower-cased.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Address(String);

impl Address {
    pub fn new(raw: &str) -> Self {
        Self(raw.trim().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub const DEPLOYMENT_COUNT: &str = "dc";
pub const MIGRATION_FLAG: &str = "m/legacy";

pub fn deployment(ticker: &Ticker) -> String {
    format!("d/{}", ticker.key_segment())
}

pub fn balance(address: &Address, ticker: &Ticker) -> String {
    format!("b/{}/{}", address, ticker.key_segment())
}

/// Replay marker key. Hex case is folded so one signature has one key.
pub fn signature(signature: &str) -> String {
    format!("s/{}", signature.trim().to_lowercase())
}

pub fn deployment_order(ticker: &Ticker) -> String {
    format!("dl/{}", ticker.key_segment())
}

pub fn deployment_slot(index: u64) -> String {
    format!("dli/{index}")
}

/// Marker for a legacy history record that has already been replayed.
pub fn replayed_record(legacy_key: &str) -> String {
    format!("mr/{}", serde_json::Value::String(legacy_key.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticker_normalization() {
        assert_eq!(Ticker::new("  GeN "), Ticker::new("gen"));
        assert_eq!(deployment(&Ticker::new("GEN")), "d/\"gen\"");
    }

    #[test]
    fn ticker_separators_stay_inside_quotes() {
        let address = Address::new("ab");
        let tricky = Ticker::new("x\"/\"y");
        assert_eq!(balance(&address, &tricky), "b/ab/\"x\\\"/\\\"y\"");
    }

    #[test]
    fn signature_keys_fold_case() {
        assert_eq!(signature("ABcd"), signature("abcd"));
    }

    #[test]
    fn prefixes_do_not_collide() {
        let t = Ticker::new("a");
        let keys = [
            deployment(&t),
            balance(&Address::new("a"), &t),
            signature("a"),
            deployment_order(&t),
            deployment_slot(0),
            DEPLOYMENT_COUNT.to_string(),
            MIGRATION_FLAG.to_string(),
            replayed_record("mint_1"),
        ];
        let namespaces: std::collections::BTreeSet<&str> =
            keys.iter().map(|k| k.split('/').next().unwrap_or("")).collect();
        assert_eq!(namespaces.len(), keys.len());
    }
}

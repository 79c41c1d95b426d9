//! Read-only views over committed state, in human-decimal units.

use crate::amount::from_fixed_point;
use crate::keys::{self, Address, Ticker};
use crate::records::{self, Deployment};
use crate::{Rejection, Store};
use serde::{Deserialize, Serialize};

/// A deployment with its amounts rendered for people.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenInfo {
    pub ticker: Ticker,
    pub decimals: u8,
    pub supply: String,
    pub per_mint: String,
    pub completed: String,
    pub signed: bool,
    pub deployer: Address,
    pub data: Option<String>,
    pub index: u64,
    pub minted_out: bool,
}

impl TryFrom<&Deployment> for TokenInfo {
    type Error = Rejection;

    fn try_from(d: &Deployment) -> Result<Self, Self::Error> {
        let supply = d.supply()?;
        let completed = d.completed()?;
        Ok(Self {
            ticker: d.ticker.clone(),
            decimals: d.decimals,
            supply: from_fixed_point(&supply, d.decimals),
            per_mint: from_fixed_point(&d.per_mint()?, d.decimals),
            completed: from_fixed_point(&completed, d.decimals),
            signed: d.signed,
            deployer: d.deployer.clone(),
            data: d.data.clone(),
            index: d.index,
            minted_out: completed >= supply,
        })
    }
}

pub fn token_info(store: &dyn Store, ticker: &str) -> Result<Option<TokenInfo>, Rejection> {
    records::read_deployment(store, &Ticker::new(ticker))?
        .as_ref()
        .map(TokenInfo::try_from)
        .transpose()
}

/// Balance of `address`, or `None` when the token does not exist.
pub fn balance_of(store: &dyn Store, address: &str, ticker: &str) -> Result<Option<String>, Rejection> {
    let ticker = Ticker::new(ticker);
    let Some(deployment) = records::read_deployment(store, &ticker)? else {
        return Ok(None);
    };
    let balance = records::read_balance(store, &Address::new(address), &ticker)?;
    Ok(Some(from_fixed_point(&balance, deployment.decimals)))
}

/// All deployments in creation order.
pub fn deployments(store: &dyn Store) -> Result<Vec<Deployment>, Rejection> {
    let count = records::read_counter(store, keys::DEPLOYMENT_COUNT)?;
    (0..count).map(|index| deployment_at(store, index)).collect()
}

/// The most recent deployments that can still be minted, newest first.
pub fn minting(store: &dyn Store, limit: usize) -> Result<Vec<TokenInfo>, Rejection> {
    let count = records::read_counter(store, keys::DEPLOYMENT_COUNT)?;
    let mut out = Vec::new();
    for index in (0..count).rev() {
        if out.len() >= limit {
            break;
        }
        let info = TokenInfo::try_from(&deployment_at(store, index)?)?;
        if !info.minted_out {
            out.push(info);
        }
    }
    Ok(out)
}

fn deployment_at(store: &dyn Store, index: u64) -> Result<Deployment, Rejection> {
    let slot = keys::deployment_slot(index);
    let key = store
        .get(&slot)
        .and_then(|bytes| String::from_utf8(bytes).ok())
        .ok_or_else(|| Rejection::CorruptRecord(slot.clone()))?;
    let bytes = store.get(&key).ok_or_else(|| Rejection::CorruptRecord(key.clone()))?;
    serde_json::from_slice(&bytes).map_err(|_| Rejection::CorruptRecord(key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Ed25519Verifier;
    use crate::engine::Ledger;
    use crate::{LedgerConfig, MemoryStore};

    fn ledger_with(tokens: &[(&str, &str, &str)]) -> Ledger<MemoryStore> {
        let mut ledger = Ledger::new(MemoryStore::new(), LedgerConfig::default(), Box::new(Ed25519Verifier));
        for (tick, supply, amt) in tokens {
            let payload = format!(r#"{{"op":"deploy","tick":"{tick}","supply":"{supply}","amt":"{amt}","dec":"2"}}"#);
            ledger.commit_raw("dd", payload.as_bytes()).unwrap();
        }
        ledger
    }

    #[test]
    fn token_info_renders_decimals() {
        let mut ledger = ledger_with(&[("gen", "1000.5", "0.25")]);
        ledger.commit_raw("aa", br#"{"op":"mint","tick":"GEN"}"#).unwrap();

        let info = token_info(ledger.store(), " Gen").unwrap().unwrap();
        assert_eq!(info.supply, "1000.5");
        assert_eq!(info.per_mint, "0.25");
        assert_eq!(info.completed, "0.25");
        assert!(!info.minted_out);

        assert_eq!(token_info(ledger.store(), "none").unwrap(), None);
    }

    #[test]
    fn balance_of_distinguishes_missing_token() {
        let mut ledger = ledger_with(&[("gen", "10", "1.5")]);
        ledger.commit_raw("aa", br#"{"op":"mint","tick":"gen"}"#).unwrap();

        assert_eq!(balance_of(ledger.store(), "AA", "gen").unwrap(), Some("1.5".into()));
        assert_eq!(balance_of(ledger.store(), "bb", "gen").unwrap(), Some("0".into()));
        assert_eq!(balance_of(ledger.store(), "aa", "none").unwrap(), None);
    }

    #[test]
    fn deployments_in_creation_order() {
        let ledger = ledger_with(&[("one", "10", "1"), ("two", "10", "1"), ("three", "10", "1")]);
        let tickers: Vec<String> = deployments(ledger.store())
            .unwrap()
            .iter()
            .map(|d| d.ticker.to_string())
            .collect();
        assert_eq!(tickers, vec!["one", "two", "three"]);
    }

    #[test]
    fn minting_skips_exhausted_tokens() {
        let mut ledger = ledger_with(&[("one", "10", "1"), ("full", "1", "1"), ("three", "10", "1")]);
        ledger.commit_raw("aa", br#"{"op":"mint","tick":"full"}"#).unwrap();

        let tickers: Vec<String> = minting(ledger.store(), 10)
            .unwrap()
            .iter()
            .map(|t| t.ticker.to_string())
            .collect();
        assert_eq!(tickers, vec!["three", "one"]);

        assert_eq!(minting(ledger.store(), 1).unwrap().len(), 1);
    }
}

//! Minting.

use crate::auth::{self, SignatureVerifier};
use crate::keys::{Address, Ticker};
use crate::records;
use crate::schema::MintOp;
use crate::{Event, Rejection, Store};

/// Grant the caller `min(per_mint, supply - completed)`.
///
/// A mint that would overshoot the supply is clamped to what is left, so the
/// last mint of a token exhausts it exactly.
pub(crate) fn mint(
    store: &mut dyn Store,
    verifier: &dyn SignatureVerifier,
    minter: &Address,
    op: &MintOp,
) -> Result<Event, Rejection> {
    let ticker = Ticker::new(&op.ticker);
    let mut deployment = records::read_deployment(store, &ticker)?
        .ok_or_else(|| Rejection::TokenNotFound(ticker.to_string()))?;

    if deployment.signed {
        auth::authorize_mint(store, verifier, &deployment, minter, op)?;
    }

    let supply = deployment.supply()?;
    let completed = deployment.completed()?;
    if completed >= supply {
        return Err(Rejection::MintedOut(ticker.to_string()));
    }

    let remaining = &supply - &completed;
    let grant = deployment.per_mint()?.min(remaining);

    let balance = records::read_balance(store, minter, &ticker)? + &grant;
    let completed = completed + &grant;

    deployment.completed = completed.to_string();
    records::write_deployment(store, &deployment)?;
    records::write_balance(store, minter, &ticker, &balance);

    Ok(Event::Minted {
        ticker,
        to: minter.clone(),
        amount: grant.to_string(),
        completed: deployment.completed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Ed25519Verifier;
    use crate::records::Deployment;
    use crate::{MemoryStore, keys};

    fn setup(supply: &str, per_mint: &str, completed: &str) -> MemoryStore {
        let mut store = MemoryStore::new();
        let deployment = Deployment {
            ticker: Ticker::new("gen"),
            decimals: 0,
            supply: supply.into(),
            per_mint: per_mint.into(),
            completed: completed.into(),
            signed: false,
            deployer: Address::new("dd"),
            data: None,
            index: 0,
        };
        records::write_deployment(&mut store, &deployment).unwrap();
        store
    }

    fn op(ticker: &str) -> MintOp {
        MintOp {
            ticker: ticker.into(),
            signature: None,
            nonce: None,
            data: None,
        }
    }

    fn run(store: &mut MemoryStore, minter: &str) -> Result<Event, Rejection> {
        mint(store, &Ed25519Verifier, &Address::new(minter), &op("GEN"))
    }

    #[test]
    fn grants_per_mint_amount() {
        let mut store = setup("100", "30", "0");
        let event = run(&mut store, "aa").unwrap();
        assert_eq!(
            event,
            Event::Minted {
                ticker: Ticker::new("gen"),
                to: Address::new("aa"),
                amount: "30".into(),
                completed: "30".into(),
            }
        );
        let balance = records::read_balance(&store, &Address::new("aa"), &Ticker::new("gen")).unwrap();
        assert_eq!(balance.to_string(), "30");
    }

    #[test]
    fn clamps_final_grant() {
        let mut store = setup("100", "30", "90");
        match run(&mut store, "aa").unwrap() {
            Event::Minted { amount, completed, .. } => {
                assert_eq!(amount, "10");
                assert_eq!(completed, "100");
            }
            other => panic!("unexpected event {other:?}"),
        }
        assert_eq!(run(&mut store, "bb"), Err(Rejection::MintedOut("gen".into())));
    }

    #[test]
    fn unknown_token() {
        let mut store = MemoryStore::new();
        assert_eq!(run(&mut store, "aa"), Err(Rejection::TokenNotFound("gen".into())));
    }

    #[test]
    fn corrupt_balance_blocks_mint() {
        let mut store = setup("100", "30", "0");
        store.put(&keys::balance(&Address::new("aa"), &Ticker::new("gen")), b"x".to_vec());
        assert!(matches!(
            run(&mut store, "aa"),
            Err(Rejection::InvalidBalanceEncoding(_))
        ));
    }

    #[test]
    fn corrupt_progress_is_reported() {
        let mut store = setup("100", "30", "-1");
        assert!(matches!(run(&mut store, "aa"), Err(Rejection::CorruptRecord(_))));
    }
}

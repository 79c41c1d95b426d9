//! The ledger engine: applies operations to a store.
//!
//! Every operation runs against an [`Overlay`]. Simulation drops the overlay;
//! commit flushes it. The handlers cannot tell the two apart, which is what
//! keeps simulated and committed verdicts identical.

use crate::auth::SignatureVerifier;
use crate::keys::{Address, Ticker};
use crate::schema::{Envelope, Operation};
use crate::store::{Mutation, Overlay};
use crate::{LedgerConfig, Rejection, Store, deploy, mint, transfer};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// What an accepted operation did.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    Deployed {
        ticker: Ticker,
        index: u64,
    },
    Minted {
        ticker: Ticker,
        to: Address,
        /// Granted magnitude, possibly clamped to the remaining supply.
        amount: String,
        /// Completed supply after this mint.
        completed: String,
    },
    Transferred {
        ticker: Ticker,
        from: Address,
        to: Address,
        amount: String,
    },
}

/// An accepted operation and the writes it produces.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    pub event: Event,
    pub mutations: Vec<Mutation>,
}

/// The verdict on one operation.
pub type Verdict = Result<Receipt, Rejection>;

/// The token ledger.
pub struct Ledger<S: Store> {
    store: S,
    config: LedgerConfig,
    verifier: Box<dyn SignatureVerifier>,
}

impl<S: Store> Ledger<S> {
    pub fn new(store: S, config: LedgerConfig, verifier: Box<dyn SignatureVerifier>) -> Self {
        Self {
            store,
            config,
            verifier,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub(crate) fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Release the underlying store.
    pub fn into_store(self) -> S {
        self.store
    }

    /// Evaluate an operation without persisting anything.
    pub fn simulate(&self, envelope: &Envelope) -> Verdict {
        let verdict = self.evaluate(envelope);
        match &verdict {
            Ok(receipt) => debug!(event = ?receipt.event, "simulation accepted"),
            Err(rejection) => debug!(%rejection, op = envelope.operation.kind(), "simulation rejected"),
        }
        verdict
    }

    /// Apply an operation. On rejection the store is left untouched.
    pub fn commit(&mut self, envelope: &Envelope) -> Verdict {
        let receipt = match self.evaluate(envelope) {
            Ok(receipt) => receipt,
            Err(rejection) => {
                debug!(%rejection, op = envelope.operation.kind(), address = %envelope.acting_address, "operation rejected");
                return Err(rejection);
            }
        };

        for mutation in &receipt.mutations {
            self.store.put(&mutation.key, mutation.value.clone());
        }
        log_event(&receipt.event);

        Ok(receipt)
    }

    /// Apply operations in order, each seeing the effects of the ones before.
    pub fn commit_batch<'a, I>(&mut self, envelopes: I) -> Vec<Verdict>
    where
        I: IntoIterator<Item = &'a Envelope>,
    {
        envelopes.into_iter().map(|e| self.commit(e)).collect()
    }

    /// Gate a raw payload, then simulate it as `acting_address`.
    pub fn simulate_raw(&self, acting_address: &str, payload: &[u8]) -> Verdict {
        let operation = Operation::parse(payload, self.config.max_operation_bytes)?;
        self.simulate(&Envelope::new(acting_address, operation))
    }

    /// Gate a raw payload, then commit it as `acting_address`.
    pub fn commit_raw(&mut self, acting_address: &str, payload: &[u8]) -> Verdict {
        let operation = Operation::parse(payload, self.config.max_operation_bytes)?;
        self.commit(&Envelope::new(acting_address, operation))
    }

    fn evaluate(&self, envelope: &Envelope) -> Verdict {
        envelope.operation.validate()?;

        let mut tx = Overlay::new(&self.store);
        let caller = &envelope.acting_address;
        let event = match &envelope.operation {
            Operation::Deploy(op) => deploy::deploy(&mut tx, &self.config, caller, op)?,
            Operation::Mint(op) => mint::mint(&mut tx, self.verifier.as_ref(), caller, op)?,
            Operation::Transfer(op) => transfer::transfer(&mut tx, &self.config, caller, op)?,
        };

        Ok(Receipt {
            event,
            mutations: tx.into_mutations(),
        })
    }
}

fn log_event(event: &Event) {
    match event {
        Event::Deployed { ticker, index } => info!(%ticker, index, "deployed token"),
        Event::Minted {
            ticker,
            to,
            amount,
            completed,
        } => info!(%ticker, %to, %amount, %completed, "minted"),
        Event::Transferred {
            ticker,
            from,
            to,
            amount,
        } => info!(%ticker, %from, %to, %amount, "transferred"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Ed25519Verifier;
    use crate::MemoryStore;

    fn ledger() -> Ledger<MemoryStore> {
        Ledger::new(MemoryStore::new(), LedgerConfig::default(), Box::new(Ed25519Verifier))
    }

    const DEPLOY: &[u8] = br#"{"op":"deploy","tick":"gen","supply":"100","amt":"30","dec":"0"}"#;
    const MINT: &[u8] = br#"{"op":"mint","tick":"gen"}"#;

    #[test]
    fn simulate_leaves_store_untouched() {
        let ledger = ledger();
        let receipt = ledger.simulate_raw("aa", DEPLOY).unwrap();
        assert!(!receipt.mutations.is_empty());
        assert!(ledger.store().is_empty());
    }

    #[test]
    fn commit_applies_exactly_the_simulated_mutations() {
        let mut ledger = ledger();
        let simulated = ledger.simulate_raw("aa", DEPLOY).unwrap();
        let committed = ledger.commit_raw("aa", DEPLOY).unwrap();
        assert_eq!(simulated, committed);

        for mutation in &committed.mutations {
            assert_eq!(ledger.store().get(&mutation.key).as_ref(), Some(&mutation.value));
        }
        assert_eq!(ledger.store().len(), committed.mutations.len());
    }

    #[test]
    fn rejection_writes_nothing() {
        let mut ledger = ledger();
        assert_eq!(
            ledger.commit_raw("aa", MINT),
            Err(Rejection::TokenNotFound("gen".into()))
        );
        assert!(ledger.store().is_empty());
    }

    #[test]
    fn schema_gate_runs_first() {
        let mut ledger = ledger();
        let result = ledger.commit_raw("aa", br#"{"op":"mint"}"#);
        assert!(matches!(result, Err(Rejection::SchemaInvalid(_))));
    }

    #[test]
    fn batch_sees_prior_effects() {
        let mut ledger = ledger();
        let deploy = Envelope::new("aa", Operation::parse(DEPLOY, 2048).unwrap());
        let mint = Envelope::new("bb", Operation::parse(MINT, 2048).unwrap());

        let verdicts = ledger.commit_batch([&deploy, &mint, &mint, &mint, &mint, &mint]);
        let amounts: Vec<String> = verdicts
            .iter()
            .filter_map(|v| match v {
                Ok(Receipt {
                    event: Event::Minted { amount, .. },
                    ..
                }) => Some(amount.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(amounts, vec!["30", "30", "30", "10"]);
        assert_eq!(verdicts[5], Err(Rejection::MintedOut("gen".into())));
    }
}

//! One-shot upgrade from the legacy record format.
//!
//! Legacy deployments kept their history as keyed entries (`deploy_*`,
//! `mint_*`, `transfer_*`) whose value carried the acting address in an
//! `initiator` field. The upgrade replays those entries, in order, through
//! the current handlers and stops at the `migration1` marker. Once the flag
//! is persisted the upgrade never runs again.
//!
//! A history without the marker can be offered again on the next open. Each
//! replayed record leaves a marker of its own, so a later run picks up where
//! the previous one stopped instead of applying the same mints twice.

use crate::engine::Ledger;
use crate::keys::{self, MIGRATION_FLAG};
use crate::schema::{DeployOp, Envelope, MintOp, Operation, TransferOp};
use crate::Store;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Key of the record that ends the legacy history.
pub const TERMINAL_KEY: &str = "migration1";

// Legacy values carry bookkeeping next to the payload. Only these fields
// reach the decoder.
const DEPLOY_FIELDS: &[&str] = &["tick", "supply", "amt", "dec", "signed", "dta"];
const MINT_FIELDS: &[&str] = &["tick", "sig", "nonce", "dta"];
const TRANSFER_FIELDS: &[&str] = &["tick", "amt", "addr", "dta"];

/// A legacy history entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LegacyRecord {
    pub key: String,
    pub value: serde_json::Value,
}

/// Summary of one upgrade run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MigrationReport {
    /// The flag was already set; nothing was read.
    pub already_complete: bool,
    /// The terminal marker was reached and the flag is now set.
    pub completed: bool,
    /// Records replayed and accepted.
    pub applied: usize,
    /// Records replayed and rejected by a handler.
    pub rejected: usize,
    /// Records that could not be replayed at all.
    pub skipped: usize,
    /// Records an earlier, unfinished run already replayed.
    pub resumed: usize,
}

enum LegacyKind {
    Deploy,
    Mint,
    Transfer,
    Terminal,
}

impl LegacyKind {
    fn classify(key: &str) -> Option<Self> {
        if key == TERMINAL_KEY {
            Some(Self::Terminal)
        } else if key.starts_with("deploy_") {
            Some(Self::Deploy)
        } else if key.starts_with("mint_") {
            Some(Self::Mint)
        } else if key.starts_with("transfer_") {
            Some(Self::Transfer)
        } else {
            None
        }
    }
}

impl<S: Store> Ledger<S> {
    pub fn is_migrated(&self) -> bool {
        self.store().get(MIGRATION_FLAG).as_deref() == Some(b"true".as_slice())
    }

    /// Replay legacy history unless that already happened.
    ///
    /// Meant to run once when the store is opened, before live operations.
    pub fn migrate<I>(&mut self, records: I) -> MigrationReport
    where
        I: IntoIterator<Item = LegacyRecord>,
    {
        let mut report = MigrationReport::default();
        if self.is_migrated() {
            report.already_complete = true;
            return report;
        }

        for record in records {
            let Some(kind) = LegacyKind::classify(&record.key) else {
                report.skipped += 1;
                continue;
            };

            let marker = keys::replayed_record(&record.key);
            if self.store().get(&marker).is_some() {
                report.resumed += 1;
                continue;
            }

            let envelope = match kind {
                LegacyKind::Terminal => {
                    self.store_mut().put(MIGRATION_FLAG, b"true".to_vec());
                    report.completed = true;
                    info!(
                        applied = report.applied,
                        rejected = report.rejected,
                        resumed = report.resumed,
                        "legacy migration finished"
                    );
                    break;
                }
                LegacyKind::Deploy => promote::<DeployOp>(record, DEPLOY_FIELDS, Operation::Deploy),
                LegacyKind::Mint => promote::<MintOp>(record, MINT_FIELDS, Operation::Mint),
                LegacyKind::Transfer => promote::<TransferOp>(record, TRANSFER_FIELDS, Operation::Transfer),
            };
            let Some(envelope) = envelope else {
                report.skipped += 1;
                continue;
            };

            match self.commit(&envelope) {
                Ok(_) => report.applied += 1,
                Err(_) => report.rejected += 1,
            }
            // Rejected records are marked as well: one verdict per record.
            self.store_mut().put(&marker, Vec::new());
        }

        report
    }
}

/// Lift the legacy `initiator` into the envelope and decode the payload
/// fields named in `known`.
fn promote<T: DeserializeOwned>(
    record: LegacyRecord,
    known: &[&str],
    wrap: fn(T) -> Operation,
) -> Option<Envelope> {
    let serde_json::Value::Object(mut fields) = record.value else {
        warn!(key = %record.key, "legacy record is not an object");
        return None;
    };

    let Some(serde_json::Value::String(initiator)) = fields.remove("initiator") else {
        warn!(key = %record.key, "legacy record has no initiator");
        return None;
    };
    fields.retain(|name, _| known.contains(&name.as_str()));

    match serde_json::from_value::<T>(serde_json::Value::Object(fields)) {
        Ok(payload) => Some(Envelope::new(&initiator, wrap(payload))),
        Err(e) => {
            warn!(key = %record.key, error = %e, "legacy record does not decode");
            None
        }
    }
}

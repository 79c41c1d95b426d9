//! Signed-mint authorization.
//!
//! A deployer of a signed token hands out mint permits off-ledger: a
//! signature over `ticker + minter + data + nonce`. Each signature can be
//! redeemed once.

use crate::keys::{self, Address, Ticker};
use crate::records::Deployment;
use crate::schema::MintOp;
use crate::{Rejection, Store};
use ed25519_dalek::{Signature, Signer, SigningKey, VerifyingKey};
use rand::RngCore;
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};

/// Verifies a detached signature made by the owner of an address.
pub trait SignatureVerifier: Send + Sync {
    fn verify(&self, signature_hex: &str, message: &[u8], signer: &Address) -> bool;
}

/// Addresses are hex ed25519 public keys, signatures hex ed25519 signatures.
#[derive(Clone, Copy, Debug, Default)]
pub struct Ed25519Verifier;

impl SignatureVerifier for Ed25519Verifier {
    fn verify(&self, signature_hex: &str, message: &[u8], signer: &Address) -> bool {
        let Some(public_key) = decode_array::<32>(signer.as_str()) else {
            return false;
        };
        let Some(sig_bytes) = decode_array::<64>(signature_hex) else {
            return false;
        };
        let Ok(public_key) = VerifyingKey::from_bytes(&public_key) else {
            return false;
        };

        let signature = Signature::from_bytes(&sig_bytes);
        public_key.verify_strict(message, &signature).is_ok()
    }
}

fn decode_array<const N: usize>(s: &str) -> Option<[u8; N]> {
    hex::decode(s.trim()).ok()?.try_into().ok()
}

/// The address owned by a key.
pub fn address_of(key: &VerifyingKey) -> Address {
    Address::new(&hex::encode(key.to_bytes()))
}

/// The exact bytes a mint permit signs.
pub fn mint_message(ticker: &Ticker, minter: &Address, data: Option<&str>, nonce: &str) -> Vec<u8> {
    let mut message = String::new();
    message.push_str(ticker.as_str());
    message.push_str(minter.as_str());
    if let Some(data) = data {
        message.push_str(data);
    }
    message.push_str(nonce);
    message.into_bytes()
}

/// Gate a mint on a signed token.
///
/// On success the signature's replay marker is already written to `store`,
/// so any later operation observing the same store sees it as spent.
pub(crate) fn authorize_mint(
    store: &mut dyn Store,
    verifier: &dyn SignatureVerifier,
    deployment: &Deployment,
    minter: &Address,
    op: &MintOp,
) -> Result<(), Rejection> {
    let nonce = op.nonce.as_deref().ok_or(Rejection::MissingNonce)?;
    let signature = op.signature.as_deref().ok_or(Rejection::MissingSignature)?;

    let replay_key = keys::signature(signature);
    if store.get(&replay_key).is_some() {
        return Err(Rejection::SignatureReused);
    }

    let message = mint_message(&deployment.ticker, minter, op.data.as_deref(), nonce);
    if !verifier.verify(signature, &message, &deployment.deployer) {
        return Err(Rejection::NotAuthorized);
    }

    store.put(&replay_key, Vec::new());
    Ok(())
}

/// A permit the deployer hands to a minter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MintPermit {
    pub signature: String,
    pub nonce: String,
}

/// Sign a permit for `minter` with a fresh random nonce.
///
/// Runs on the deployer's machine, never inside the ledger.
pub fn sign_mint(key: &SigningKey, ticker: &str, minter: &str, data: Option<&str>) -> MintPermit {
    let mut nonce = [0u8; 16];
    OsRng.fill_bytes(&mut nonce);
    sign_mint_with_nonce(key, ticker, minter, data, &hex::encode(nonce))
}

pub fn sign_mint_with_nonce(
    key: &SigningKey,
    ticker: &str,
    minter: &str,
    data: Option<&str>,
    nonce: &str,
) -> MintPermit {
    let message = mint_message(&Ticker::new(ticker), &Address::new(minter), data, nonce);
    MintPermit {
        signature: hex::encode(key.sign(&message).to_bytes()),
        nonce: nonce.to_string(),
    }
}

//! Operation payloads and the schema gate.
//!
//! Payloads arrive as JSON objects tagged by `op`:
//! ```text
//! {"op":"deploy","tick":"gen","supply":"30000000","amt":"1000","dec":"18","signed":false,"dta":null}
//! {"op":"mint","tick":"gen","sig":null,"nonce":null,"dta":null}
//! {"op":"transfer","tick":"gen","amt":"32.555","addr":"7618eb9c...","dta":null}
//! ```
//! Validation only looks at the payload itself. It never touches the store
//! and runs before an acting address is attached.

use crate::keys::Address;
use crate::Rejection;
use serde::{Deserialize, Serialize};

const TICKER_CHARS: (usize, usize) = (1, 128);
const NUMERIC_CHARS: (usize, usize) = (1, 38);
const DECIMALS_CHARS: (usize, usize) = (1, 2);
const TEXT_CHARS: (usize, usize) = (1, 512);

/// Create a token.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeployOp {
    #[serde(rename = "tick")]
    pub ticker: String,
    pub supply: String,
    /// Amount granted per mint.
    #[serde(rename = "amt")]
    pub amount: String,
    #[serde(rename = "dec")]
    pub decimals: String,
    #[serde(default)]
    pub signed: bool,
    #[serde(rename = "dta", default)]
    pub data: Option<String>,
}

/// Claim the next mint of a token.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MintOp {
    #[serde(rename = "tick")]
    pub ticker: String,
    #[serde(rename = "sig", default)]
    pub signature: Option<String>,
    #[serde(default)]
    pub nonce: Option<String>,
    #[serde(rename = "dta", default)]
    pub data: Option<String>,
}

/// Send balance to another address.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TransferOp {
    #[serde(rename = "tick")]
    pub ticker: String,
    #[serde(rename = "amt")]
    pub amount: String,
    #[serde(rename = "addr")]
    pub to: String,
    #[serde(rename = "dta", default)]
    pub data: Option<String>,
}

/// A validated operation payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum Operation {
    Deploy(DeployOp),
    Mint(MintOp),
    Transfer(TransferOp),
}

/// An operation bound to the authenticated address that submitted it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Envelope {
    pub acting_address: Address,
    pub operation: Operation,
}

impl Envelope {
    pub fn new(acting_address: &str, operation: Operation) -> Self {
        Self {
            acting_address: Address::new(acting_address),
            operation,
        }
    }
}

impl Operation {
    /// Decode and validate a JSON payload of at most `max_bytes`.
    pub fn parse(payload: &[u8], max_bytes: usize) -> Result<Self, Rejection> {
        if payload.len() > max_bytes {
            return Err(Rejection::SchemaInvalid(format!(
                "payload of {} bytes exceeds {max_bytes}",
                payload.len()
            )));
        }

        let operation: Operation = serde_json::from_slice(payload)
            .map_err(|e| Rejection::SchemaInvalid(e.to_string()))?;
        operation.validate()?;
        Ok(operation)
    }

    /// Check field lengths and formats.
    pub fn validate(&self) -> Result<(), Rejection> {
        match self {
            Operation::Deploy(op) => op.validate(),
            Operation::Mint(op) => op.validate(),
            Operation::Transfer(op) => op.validate(),
        }
    }

    /// The operation name as it appears on the wire.
    pub fn kind(&self) -> &'static str {
        match self {
            Operation::Deploy(_) => "deploy",
            Operation::Mint(_) => "mint",
            Operation::Transfer(_) => "transfer",
        }
    }

    pub fn ticker(&self) -> &str {
        match self {
            Operation::Deploy(op) => &op.ticker,
            Operation::Mint(op) => &op.ticker,
            Operation::Transfer(op) => &op.ticker,
        }
    }
}

impl DeployOp {
    pub fn validate(&self) -> Result<(), Rejection> {
        text("tick", &self.ticker, TICKER_CHARS)?;
        numeric("supply", &self.supply, NUMERIC_CHARS)?;
        numeric("amt", &self.amount, NUMERIC_CHARS)?;
        numeric("dec", &self.decimals, DECIMALS_CHARS)?;
        optional_text("dta", self.data.as_deref())
    }
}

impl MintOp {
    pub fn validate(&self) -> Result<(), Rejection> {
        text("tick", &self.ticker, TICKER_CHARS)?;
        if let Some(signature) = &self.signature {
            hex_string("sig", signature)?;
        }
        optional_text("nonce", self.nonce.as_deref())?;
        optional_text("dta", self.data.as_deref())
    }
}

impl TransferOp {
    pub fn validate(&self) -> Result<(), Rejection> {
        text("tick", &self.ticker, TICKER_CHARS)?;
        numeric("amt", &self.amount, NUMERIC_CHARS)?;
        hex_string("addr", &self.to)?;
        optional_text("dta", self.data.as_deref())
    }
}

fn invalid(field: &str, reason: &str) -> Rejection {
    Rejection::SchemaInvalid(format!("{field}: {reason}"))
}

fn text(field: &str, value: &str, (min, max): (usize, usize)) -> Result<(), Rejection> {
    let len = value.chars().count();
    if len < min || len > max {
        return Err(invalid(field, &format!("length must be within {min}..={max}")));
    }
    Ok(())
}

fn optional_text(field: &str, value: Option<&str>) -> Result<(), Rejection> {
    value.map_or(Ok(()), |v| text(field, v, TEXT_CHARS))
}

/// Plain decimal number: digits with at most one dot between digits.
fn numeric(field: &str, value: &str, bounds: (usize, usize)) -> Result<(), Rejection> {
    text(field, value, bounds)?;
    let mut parts = value.splitn(2, '.');
    let int_part = parts.next().unwrap_or("");
    let is_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    let valid = is_digits(int_part) && parts.next().is_none_or(is_digits);
    if !valid {
        return Err(invalid(field, "must be numeric"));
    }
    Ok(())
}

fn hex_string(field: &str, value: &str) -> Result<(), Rejection> {
    if value.is_empty() || value.len() % 2 != 0 || !value.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(invalid(field, "must be hex"));
    }
    Ok(())
}

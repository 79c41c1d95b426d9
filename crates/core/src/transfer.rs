//! Balance transfers.

use crate::amount;
use crate::keys::{Address, Ticker};
use crate::records;
use crate::schema::TransferOp;
use crate::{Event, LedgerConfig, Rejection, Store};

pub(crate) fn transfer(
    store: &mut dyn Store,
    config: &LedgerConfig,
    sender: &Address,
    op: &TransferOp,
) -> Result<Event, Rejection> {
    let recipient = Address::new(&op.to);
    if recipient == *sender {
        return Err(Rejection::SelfTransfer);
    }

    let ticker = Ticker::new(&op.ticker);
    let deployment = records::read_deployment(store, &ticker)?
        .ok_or_else(|| Rejection::TokenNotFound(ticker.to_string()))?;

    if recipient.len() < config.min_address_len {
        return Err(Rejection::InvalidAddress);
    }

    let amount = amount::positive(&op.amount, deployment.decimals).ok_or(Rejection::InvalidAmount)?;

    let from_balance = records::read_balance(store, sender, &ticker)?;
    if from_balance < amount {
        return Err(Rejection::InsufficientFunds);
    }
    let to_balance = records::read_balance(store, &recipient, &ticker)?;

    records::write_balance(store, sender, &ticker, &(from_balance - &amount));
    records::write_balance(store, &recipient, &ticker, &(to_balance + &amount));

    Ok(Event::Transferred {
        ticker,
        from: sender.clone(),
        to: recipient,
        amount: amount.to_string(),
    })
}

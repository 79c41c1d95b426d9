//! Token deployment.

use crate::amount::{self, MAX_DECIMALS};
use crate::keys::{self, Address, Ticker};
use crate::records::{self, Deployment};
use crate::schema::DeployOp;
use crate::{Event, LedgerConfig, Rejection, Store};

pub(crate) fn deploy(
    store: &mut dyn Store,
    config: &LedgerConfig,
    deployer: &Address,
    op: &DeployOp,
) -> Result<Event, Rejection> {
    let ticker = Ticker::new(&op.ticker);
    if config.is_reserved(&ticker) {
        return Err(Rejection::ReservedTicker(ticker.to_string()));
    }

    let decimals: u8 = op.decimals.parse().map_err(|_| Rejection::InvalidDecimals)?;
    if decimals > MAX_DECIMALS {
        return Err(Rejection::InvalidDecimals);
    }

    let per_mint = amount::positive(&op.amount, decimals).ok_or(Rejection::InvalidAmount)?;
    let supply = amount::positive(&op.supply, decimals).ok_or(Rejection::InvalidSupply)?;
    if per_mint > supply {
        return Err(Rejection::InvalidAmount);
    }

    if records::read_deployment(store, &ticker)?.is_some() {
        return Err(Rejection::TokenExists(ticker.to_string()));
    }

    let index = records::read_counter(store, keys::DEPLOYMENT_COUNT)?;
    let deployment = Deployment {
        ticker: ticker.clone(),
        decimals,
        supply: supply.to_string(),
        per_mint: per_mint.to_string(),
        completed: "0".to_string(),
        signed: op.signed,
        deployer: deployer.clone(),
        data: op.data.clone(),
        index,
    };

    records::write_deployment(store, &deployment)?;
    store.put(
        &keys::deployment_slot(index),
        keys::deployment(&ticker).into_bytes(),
    );
    records::write_counter(store, &keys::deployment_order(&ticker), index);
    records::write_counter(store, keys::DEPLOYMENT_COUNT, index + 1);

    Ok(Event::Deployed { ticker, index })
}

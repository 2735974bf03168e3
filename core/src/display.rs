//! Output formatting — identity abbreviation and asset display helpers.
//!
//! Horizon reports balances as 7-decimal strings; they are rendered verbatim,
//! never re-parsed.

use crate::asset::Asset;
use crate::network::Network;

/// Abbreviate a long identifier: first four and last four characters.
/// Short inputs are returned unchanged.
#[must_use]
pub fn short_id(id: &str) -> String {
    if id.chars().count() <= 9 {
        return id.to_string();
    }
    let head: String = id.chars().take(4).collect();
    let tail: String = id.chars().skip(id.chars().count() - 4).collect();
    format!("{head}…{tail}")
}

/// One-line label for an asset: `100.0000000 XLM`,
/// `12.0000000 USDC (GAAZ…CWN7)`, or `3.5000000 pool dd7b…fac7`.
#[must_use]
pub fn asset_label(asset: &Asset) -> String {
    match asset {
        Asset::Native { balance } => format!("{balance} {}", crate::asset::NATIVE_ASSET_CODE),
        Asset::Credit {
            balance,
            code,
            issuer,
        } => format!("{balance} {code} ({})", short_id(issuer)),
        Asset::LiquidityPoolShares { balance, pool_id } => {
            format!("{balance} pool {}", short_id(pool_id))
        }
    }
}

/// Block-explorer link for an account on the given network.
#[must_use]
pub fn explorer_account_url(network: &Network, account_id: &str) -> String {
    format!(
        "https://stellar.expert/explorer/{}/account/{account_id}",
        network.name
    )
}

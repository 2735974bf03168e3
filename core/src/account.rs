//! Account aggregation — one normalized view per fetch.
//!
//! Balances are required: any failure loading the account surfaces to the
//! caller. Creation metadata (who funded the account, and when) is
//! best-effort: the lookup chases the account's chronologically first
//! transaction and its operations, and any failure along the way downgrades
//! to the "unknown" sentinel instead of failing the fetch.

use serde::Serialize;

use crate::asset::{classify, Asset};
use crate::error::Result;
use crate::horizon::LedgerApi;
use crate::keys::PublicKey;

/// Placeholder rendered when no creation record could be found.
pub const UNKNOWN_CREATION: &str = "-";

/// Normalized account state, rebuilt from scratch on every fetch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccountView {
    pub account_id: String,
    pub created_at: String,
    pub created_by: String,
    pub balances: Vec<Asset>,
}

/// Fetch and normalize the account behind `key`.
///
/// Strictly sequential: account load, then the earliest-transaction lookup,
/// then that transaction's operations. No retries; the caller decides when
/// to try again.
pub async fn fetch_account(api: &dyn LedgerApi, key: &PublicKey) -> Result<AccountView> {
    let account = api.load_account(key).await?;
    let balances = classify(&account.balances);

    let (created_at, created_by) = match creation_record(api, &account.account_id).await {
        Some((at, by)) => (at, by),
        None => (UNKNOWN_CREATION.to_string(), UNKNOWN_CREATION.to_string()),
    };

    Ok(AccountView {
        account_id: account.account_id,
        created_at,
        created_by,
        balances,
    })
}

/// Locate the `create_account` operation in the account's first transaction.
/// Returns `None` on any failure or absence; errors are logged, not raised.
async fn creation_record(api: &dyn LedgerApi, account_id: &str) -> Option<(String, String)> {
    let tx = match api.earliest_transaction(account_id).await {
        Ok(Some(tx)) => tx,
        Ok(None) => return None,
        Err(e) => {
            tracing::debug!(error = %e, %account_id, "creation lookup: transaction fetch failed");
            return None;
        }
    };
    let operations = match api.transaction_operations(&tx.id).await {
        Ok(ops) => ops,
        Err(e) => {
            tracing::debug!(error = %e, tx_id = %tx.id, "creation lookup: operations fetch failed");
            return None;
        }
    };
    operations
        .into_iter()
        .find(|op| op.kind == "create_account")
        .map(|op| (op.created_at, op.source_account))
}

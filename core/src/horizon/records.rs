//! Serde mappings for the Horizon response shapes the viewer consumes.

use serde::Deserialize;

/// Pagination envelope: Horizon wraps collection responses in
/// `{"_embedded": {"records": [...]}}`.
#[derive(Debug, Deserialize)]
pub(crate) struct Page<T> {
    #[serde(rename = "_embedded")]
    pub embedded: Embedded<T>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Embedded<T> {
    pub records: Vec<T>,
}

/// Account state as returned by `GET /accounts/{account_id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct AccountRecord {
    pub account_id: String,
    #[serde(default)]
    pub sequence: String,
    pub balances: Vec<BalanceRecord>,
}

/// One entry of an account's balances array. The `asset_type` string
/// discriminates which of the optional fields are present.
#[derive(Debug, Clone, Deserialize)]
pub struct BalanceRecord {
    pub balance: String,
    pub asset_type: String,
    #[serde(default)]
    pub asset_code: Option<String>,
    #[serde(default)]
    pub asset_issuer: Option<String>,
    #[serde(default)]
    pub liquidity_pool_id: Option<String>,
}

/// Transaction summary from `GET /accounts/{id}/transactions`.
#[derive(Debug, Clone, Deserialize)]
pub struct TransactionRecord {
    pub id: String,
    #[serde(default)]
    pub hash: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub source_account: String,
}

/// Operation record from `GET /transactions/{id}/operations`.
#[derive(Debug, Clone, Deserialize)]
pub struct OperationRecord {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub source_account: String,
}

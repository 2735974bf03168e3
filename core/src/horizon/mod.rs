//! Thin facade over the Horizon HTTP API for ledger queries.
mod records;
#[cfg(test)]
pub(crate) mod testing;

pub use records::{AccountRecord, BalanceRecord, OperationRecord, TransactionRecord};

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::error::{Result, ViewerError};
use crate::keys::PublicKey;
use crate::network::{validate_horizon_url, Network};

use records::Page;

/// The ledger operations the account aggregator depends on. `LedgerClient`
/// is the HTTP-backed implementation; tests substitute a scripted stub.
#[async_trait]
pub trait LedgerApi: Send + Sync {
    /// Load account state (balances, sequence) for a public key.
    async fn load_account(&self, key: &PublicKey) -> Result<AccountRecord>;

    /// The account's chronologically first transaction, if any.
    /// Implementations must query ascending order with a limit of one;
    /// this selects which transaction is inspected for creation metadata.
    async fn earliest_transaction(&self, account_id: &str) -> Result<Option<TransactionRecord>>;

    /// All operations attached to a transaction.
    async fn transaction_operations(&self, tx_id: &str) -> Result<Vec<OperationRecord>>;
}

/// HTTP client bound to one network's Horizon endpoint.
///
/// Construction is pure: no request is made until an operation is called.
/// Cloning is cheap (the underlying connection pool is shared), which lets a
/// session hand a handle to an in-flight refresh while staying free to
/// replace its own.
#[derive(Debug, Clone)]
pub struct LedgerClient {
    http: reqwest::Client,
    network: Network,
}

impl LedgerClient {
    pub fn new(network: &Network, allow_insecure: bool) -> anyhow::Result<Self> {
        validate_horizon_url(&network.horizon_url, allow_insecure)?;
        Ok(Self {
            http: reqwest::Client::new(),
            network: network.clone(),
        })
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    pub fn horizon_url(&self) -> &str {
        &self.network.horizon_url
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<ApiOutcome<T>> {
        let url = format!("{}{}", self.network.horizon_url, path);
        tracing::debug!(%url, "horizon request");
        let response = self
            .http
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| ViewerError::Network(format!("Request to {url} failed: {e}")))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(ApiOutcome::NotFound);
        }
        if !status.is_success() {
            return Err(ViewerError::Network(format!(
                "Horizon returned {status} for {url}"
            )));
        }
        let body = response.json().await.map_err(|e| {
            ViewerError::MalformedResponse(format!("Cannot decode response from {url}: {e}"))
        })?;
        Ok(ApiOutcome::Found(body))
    }
}

enum ApiOutcome<T> {
    Found(T),
    NotFound,
}

#[async_trait]
impl LedgerApi for LedgerClient {
    async fn load_account(&self, key: &PublicKey) -> Result<AccountRecord> {
        let path = format!("/accounts/{key}");
        match self.get_json(&path, &[]).await? {
            ApiOutcome::Found(account) => Ok(account),
            ApiOutcome::NotFound => Err(ViewerError::AccountNotFound(key.to_string())),
        }
    }

    async fn earliest_transaction(&self, account_id: &str) -> Result<Option<TransactionRecord>> {
        let path = format!("/accounts/{account_id}/transactions");
        let page: Page<TransactionRecord> =
            match self.get_json(&path, &[("order", "asc"), ("limit", "1")]).await? {
                ApiOutcome::Found(page) => page,
                ApiOutcome::NotFound => return Ok(None),
            };
        Ok(page.embedded.records.into_iter().next())
    }

    async fn transaction_operations(&self, tx_id: &str) -> Result<Vec<OperationRecord>> {
        let path = format!("/transactions/{tx_id}/operations");
        match self.get_json::<Page<OperationRecord>>(&path, &[]).await? {
            ApiOutcome::Found(page) => Ok(page.embedded.records),
            ApiOutcome::NotFound => Ok(Vec::new()),
        }
    }
}

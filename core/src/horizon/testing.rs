//! Scripted `LedgerApi` stub for offline tests.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{Result, ViewerError};
use crate::keys::PublicKey;

use super::{AccountRecord, BalanceRecord, LedgerApi, OperationRecord, TransactionRecord};

/// Which step of the aggregation should fail.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum FailAt {
    None,
    LoadAccount,
    AccountMissing,
    Transactions,
    Operations,
}

/// A ledger whose responses are fixed up front. Records every query so tests
/// can assert ordering parameters and call counts.
pub(crate) struct StubLedger {
    pub account: AccountRecord,
    pub earliest: Option<TransactionRecord>,
    pub operations: Vec<OperationRecord>,
    pub fail_at: FailAt,
    pub calls: Mutex<Vec<String>>,
}

impl StubLedger {
    pub fn new(account: AccountRecord) -> Self {
        Self {
            account,
            earliest: None,
            operations: Vec::new(),
            fail_at: FailAt::None,
            calls: Mutex::new(Vec::new()),
        }
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }
}

pub(crate) fn native_balance(amount: &str) -> BalanceRecord {
    BalanceRecord {
        balance: amount.into(),
        asset_type: "native".into(),
        asset_code: None,
        asset_issuer: None,
        liquidity_pool_id: None,
    }
}

pub(crate) fn account_with(id: &str, balances: Vec<BalanceRecord>) -> AccountRecord {
    AccountRecord {
        account_id: id.into(),
        sequence: "1".into(),
        balances,
    }
}

#[async_trait]
impl LedgerApi for StubLedger {
    async fn load_account(&self, key: &PublicKey) -> Result<AccountRecord> {
        self.record(format!("load_account {key}"));
        match self.fail_at {
            FailAt::LoadAccount => Err(ViewerError::Network("connection refused".into())),
            FailAt::AccountMissing => Err(ViewerError::AccountNotFound(key.to_string())),
            _ => Ok(self.account.clone()),
        }
    }

    async fn earliest_transaction(&self, account_id: &str) -> Result<Option<TransactionRecord>> {
        self.record(format!("earliest_transaction {account_id}"));
        if self.fail_at == FailAt::Transactions {
            return Err(ViewerError::Network("transactions fetch failed".into()));
        }
        Ok(self.earliest.clone())
    }

    async fn transaction_operations(&self, tx_id: &str) -> Result<Vec<OperationRecord>> {
        self.record(format!("transaction_operations {tx_id}"));
        if self.fail_at == FailAt::Operations {
            return Err(ViewerError::Network("operations fetch failed".into()));
        }
        Ok(self.operations.clone())
    }
}

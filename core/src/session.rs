//! Per-user session state: selected network, connected key, current view.
//!
//! Nothing here cancels an outstanding fetch; instead every state change that
//! invalidates in-flight work bumps a generation counter, and a fetch result
//! is only applied when its generation still matches. A superseded result is
//! discarded rather than racing the newer state.

use crate::account::{fetch_account, AccountView};
use crate::bridge::{self, WalletBridge};
use crate::error::Result;
use crate::horizon::{LedgerApi, LedgerClient};
use crate::keys::PublicKey;
use crate::network::Network;

pub struct Session {
    network: Network,
    client: LedgerClient,
    allow_insecure: bool,
    key: Option<PublicKey>,
    account: Option<AccountView>,
    generation: u64,
}

/// Snapshot handed to an account fetch. Carries the generation it was started
/// under plus its own client handle, so the session is free to switch
/// networks while the fetch is outstanding.
pub struct RefreshTask {
    generation: u64,
    client: LedgerClient,
    key: PublicKey,
}

impl RefreshTask {
    pub async fn run(&self) -> Result<AccountView> {
        fetch_account(&self.client as &dyn LedgerApi, &self.key).await
    }
}

impl Session {
    pub fn new(network: Network, allow_insecure: bool) -> anyhow::Result<Self> {
        let client = LedgerClient::new(&network, allow_insecure)?;
        Ok(Self {
            network,
            client,
            allow_insecure,
            key: None,
            account: None,
            generation: 0,
        })
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    pub fn client(&self) -> &LedgerClient {
        &self.client
    }

    pub fn public_key(&self) -> Option<&PublicKey> {
        self.key.as_ref()
    }

    pub fn account(&self) -> Option<&AccountView> {
        self.account.as_ref()
    }

    /// Switch networks: rebuild the client and reset to "no account". Any
    /// fetch started before the switch is invalidated.
    pub fn select_network(&mut self, network: Network) -> anyhow::Result<()> {
        self.client = LedgerClient::new(&network, self.allow_insecure)?;
        self.network = network;
        self.account = None;
        self.generation += 1;
        Ok(())
    }

    /// Connect through a wallet bridge and remember the identity. Switching
    /// to a different identity drops the old view and invalidates any fetch
    /// still in flight for it.
    pub async fn connect(&mut self, bridge: &dyn WalletBridge) -> Result<PublicKey> {
        let key = bridge::connect(bridge).await?;
        if self.key.as_ref() != Some(&key) {
            self.account = None;
            self.generation += 1;
        }
        self.key = Some(key.clone());
        Ok(key)
    }

    /// Forget the connected wallet and its account view.
    pub fn disconnect(&mut self) {
        self.key = None;
        self.account = None;
        self.generation += 1;
    }

    /// Start an account fetch for the connected key. `None` when no wallet
    /// is connected.
    pub fn begin_refresh(&self) -> Option<RefreshTask> {
        let key = self.key.clone()?;
        Some(RefreshTask {
            generation: self.generation,
            client: self.client.clone(),
            key,
        })
    }

    /// Apply a finished fetch. Returns `false` when the task was superseded
    /// by a network switch or disconnect; the result is dropped unseen.
    pub fn apply(&mut self, task: &RefreshTask, result: Result<AccountView>) -> bool {
        if task.generation != self.generation {
            tracing::debug!("discarding superseded account fetch");
            return false;
        }
        self.account = result.ok();
        true
    }

    /// Fetch and apply in one step. A fetch superseded mid-flight is
    /// discarded silently; only an applied failure surfaces to the caller.
    pub async fn refresh(&mut self) -> Result<()> {
        let Some(task) = self.begin_refresh() else {
            self.account = None;
            return Ok(());
        };
        let result = task.run().await;
        if task.generation != self.generation {
            tracing::debug!("discarding superseded account fetch");
            return Ok(());
        }
        match result {
            Ok(view) => {
                self.account = Some(view);
                Ok(())
            }
            Err(e) => {
                self.account = None;
                Err(e)
            }
        }
    }
}

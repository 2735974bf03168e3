//! Domain error type for viewer operations.

use thiserror::Error;

/// Typed error enum for viewer operations, allowing callers to match on
/// specific failure modes instead of inspecting opaque `anyhow::Error` messages.
#[derive(Debug, Error)]
pub enum ViewerError {
    /// The wallet extension is not installed or its bridge is not reachable.
    #[error("Wallet extension is not available")]
    ExtensionUnavailable,

    /// The wallet bridge rejected the request or returned garbage.
    #[error("{0}")]
    Bridge(String),

    /// The public-key string failed strkey validation.
    #[error("{0}")]
    InvalidPublicKey(String),

    /// The account does not exist on the selected network.
    #[error("Account {0} not found on this network")]
    AccountNotFound(String),

    /// HTTP or transport failure talking to the ledger service.
    #[error("{0}")]
    Network(String),

    /// The ledger service answered with a body we could not decode.
    #[error("{0}")]
    MalformedResponse(String),

    /// Unexpected error from internal subsystems.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Alias for `std::result::Result<T, ViewerError>`.
pub type Result<T> = std::result::Result<T, ViewerError>;

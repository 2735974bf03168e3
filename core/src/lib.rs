pub mod account;
pub mod asset;
pub mod bridge;
pub mod display;
pub mod error;
pub mod horizon;
pub mod keys;
pub mod network;
pub mod session;

pub use account::{fetch_account, AccountView, UNKNOWN_CREATION};
pub use asset::{classify, Asset, NATIVE_ASSET_CODE};
pub use bridge::{connect, ExtensionBridge, StaticBridge, WalletBridge};
pub use error::ViewerError;
pub use horizon::{LedgerApi, LedgerClient};
pub use keys::PublicKey;
pub use network::{networks, Network};
pub use session::{RefreshTask, Session};

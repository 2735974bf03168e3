//! Static registry of supported Stellar networks.
//!
//! The registry is fixed configuration data built at startup; nothing in the
//! viewer mutates it. Testnet comes first and doubles as the default
//! selection.

use anyhow::{bail, Result};
use serde::Serialize;

pub const TESTNET_PASSPHRASE: &str = "Test SDF Network ; September 2015";
pub const PUBLIC_PASSPHRASE: &str = "Public Global Stellar Network ; September 2015";

pub const TESTNET_HORIZON_URL: &str = "https://horizon-testnet.stellar.org";
pub const PUBLIC_HORIZON_URL: &str = "https://horizon.stellar.org";

/// A Stellar network: display name, network passphrase, and the Horizon
/// endpoint that serves it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Network {
    pub name: String,
    pub passphrase: String,
    pub horizon_url: String,
}

impl Network {
    pub fn testnet() -> Self {
        Self {
            name: "testnet".into(),
            passphrase: TESTNET_PASSPHRASE.into(),
            horizon_url: TESTNET_HORIZON_URL.into(),
        }
    }

    pub fn public() -> Self {
        Self {
            name: "public".into(),
            passphrase: PUBLIC_PASSPHRASE.into(),
            horizon_url: PUBLIC_HORIZON_URL.into(),
        }
    }

    /// A user-supplied network pointed at an arbitrary Horizon endpoint.
    pub fn custom(
        name: impl Into<String>,
        passphrase: impl Into<String>,
        horizon_url: impl Into<String>,
        allow_insecure: bool,
    ) -> Result<Self> {
        let horizon_url = horizon_url.into();
        validate_horizon_url(&horizon_url, allow_insecure)?;
        Ok(Self {
            name: name.into(),
            passphrase: passphrase.into(),
            horizon_url,
        })
    }

    /// Look up a registry network by name.
    pub fn by_name(name: &str) -> Option<Self> {
        networks().into_iter().find(|n| n.name == name)
    }
}

impl Default for Network {
    fn default() -> Self {
        Self::testnet()
    }
}

impl std::fmt::Display for Network {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// The ordered list of supported networks. The first entry is the default.
pub fn networks() -> Vec<Network> {
    vec![Network::testnet(), Network::public()]
}

/// Reject non-HTTPS Horizon URLs unless `allow_insecure` is set.
pub(crate) fn validate_horizon_url(url: &str, allow_insecure: bool) -> Result<()> {
    if url.starts_with("https://") {
        return Ok(());
    }
    if url.starts_with("http://") {
        if allow_insecure {
            return Ok(());
        }
        bail!("Refusing to connect over plain HTTP: {url}\nUse --insecure to allow unencrypted connections.");
    }
    bail!("Invalid Horizon URL scheme: {url}\nExpected an https:// URL.");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_order_and_default() {
        let nets = networks();
        assert_eq!(nets[0].name, "testnet");
        assert_eq!(nets[1].name, "public");
        assert_eq!(Network::default(), nets[0]);
    }

    #[test]
    fn known_endpoints() {
        assert_eq!(Network::testnet().horizon_url, TESTNET_HORIZON_URL);
        assert_eq!(Network::public().horizon_url, PUBLIC_HORIZON_URL);
        assert_eq!(Network::public().passphrase, PUBLIC_PASSPHRASE);
    }

    #[test]
    fn by_name_lookup() {
        assert_eq!(Network::by_name("public"), Some(Network::public()));
        assert!(Network::by_name("futurenet").is_none());
    }

    #[test]
    fn custom_requires_https() {
        assert!(Network::custom("local", "Standalone", "http://localhost:8000", false).is_err());
        assert!(Network::custom("local", "Standalone", "http://localhost:8000", true).is_ok());
        assert!(Network::custom("local", "Standalone", "ftp://example.org", true).is_err());
        assert!(Network::custom("mirror", "Test", "https://horizon.example.org", false).is_ok());
    }
}

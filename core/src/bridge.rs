//! Wallet bridge — how the viewer obtains a public-key identity.
//!
//! The real variant talks to a browser-wallet extension host over 4-byte LE
//! length-prefixed JSON frames (the Chrome native-messaging wire format): the
//! viewer sends `isConnected` / `getPublicKey` requests and reads responses.
//! A static variant backs tests and the CLI's `--account` flag.

use std::io::{self, Read, Write};
use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::{bail, Context};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ViewerError};
use crate::keys::PublicKey;

/// Capability set consumed from the wallet extension.
#[async_trait]
pub trait WalletBridge: Send + Sync {
    /// Non-blocking capability probe; no side effects.
    fn is_available(&self) -> bool;

    /// Ask the extension for the account's public key. May be rejected.
    async fn request_public_key(&self) -> anyhow::Result<String>;
}

/// Produce a connection outcome from a bridge. Never panics and never
/// propagates a raw bridge failure: every path resolves to a value.
pub async fn connect(bridge: &dyn WalletBridge) -> Result<PublicKey> {
    if !bridge.is_available() {
        return Err(ViewerError::ExtensionUnavailable);
    }
    let raw = bridge
        .request_public_key()
        .await
        .map_err(|e| ViewerError::Bridge(format!("Wallet connection failed: {e}")))?;
    PublicKey::from_strkey(raw.trim())
}

/// Bridge holding a fixed key. Serves as the test double and as the backing
/// for explicitly supplied account ids.
pub struct StaticBridge {
    key: Option<String>,
}

impl StaticBridge {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: Some(key.into()),
        }
    }

    /// A bridge that reports no extension present.
    pub fn unavailable() -> Self {
        Self { key: None }
    }
}

#[async_trait]
impl WalletBridge for StaticBridge {
    fn is_available(&self) -> bool {
        self.key.is_some()
    }

    async fn request_public_key(&self) -> anyhow::Result<String> {
        match &self.key {
            Some(key) => Ok(key.clone()),
            None => bail!("No wallet key configured"),
        }
    }
}

// -- Extension host protocol --

#[derive(Debug, Serialize)]
struct BridgeRequest {
    id: u64,
    method: &'static str,
}

#[derive(Debug, Deserialize)]
struct BridgeResponse {
    id: u64,
    #[serde(default)]
    result: Option<serde_json::Value>,
    #[serde(default)]
    error: Option<BridgeErrorBody>,
}

#[derive(Debug, Deserialize)]
struct BridgeErrorBody {
    #[serde(default)]
    code: String,
    message: String,
}

const MAX_FRAME_LEN: usize = 1_048_576;

/// Write one native-messaging frame.
fn write_frame(writer: &mut impl Write, request: &BridgeRequest) -> io::Result<()> {
    let json =
        serde_json::to_vec(request).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    let len = json.len() as u32;
    writer.write_all(&len.to_le_bytes())?;
    writer.write_all(&json)?;
    writer.flush()
}

/// Read one native-messaging frame. `Ok(None)` on clean EOF (host closed).
fn read_frame(reader: &mut impl Read) -> io::Result<Option<BridgeResponse>> {
    let mut len_buf = [0u8; 4];
    match reader.read_exact(&mut len_buf) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => return Ok(None),
        Err(e) => return Err(e),
    }

    let len = u32::from_le_bytes(len_buf) as usize;
    if len == 0 || len > MAX_FRAME_LEN {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("Invalid bridge frame length: {len}"),
        ));
    }

    let mut buf = vec![0u8; len];
    reader.read_exact(&mut buf)?;

    let response: BridgeResponse =
        serde_json::from_slice(&buf).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    Ok(Some(response))
}

struct Transport {
    reader: Box<dyn Read + Send>,
    writer: Box<dyn Write + Send>,
}

/// Bridge backed by an extension host reachable over a byte transport.
///
/// The transport is plain blocking I/O; each exchange runs on the blocking
/// pool so a slow host never stalls the async runtime.
pub struct ExtensionBridge {
    transport: std::sync::Arc<std::sync::Mutex<Transport>>,
    next_id: AtomicU64,
}

impl ExtensionBridge {
    pub fn over(
        reader: impl Read + Send + 'static,
        writer: impl Write + Send + 'static,
    ) -> Self {
        Self {
            transport: std::sync::Arc::new(std::sync::Mutex::new(Transport {
                reader: Box::new(reader),
                writer: Box::new(writer),
            })),
            next_id: AtomicU64::new(1),
        }
    }

    /// Connect to an extension host listening on a local socket.
    #[cfg(unix)]
    pub fn unix_socket(path: &std::path::Path) -> anyhow::Result<Self> {
        let stream = std::os::unix::net::UnixStream::connect(path)
            .with_context(|| format!("Cannot reach wallet host at {}", path.display()))?;
        let reader = stream
            .try_clone()
            .context("Cannot clone wallet host stream")?;
        Ok(Self::over(reader, stream))
    }

    async fn call(&self, method: &'static str) -> anyhow::Result<serde_json::Value> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let transport = std::sync::Arc::clone(&self.transport);

        tokio::task::spawn_blocking(move || {
            let mut transport = transport
                .lock()
                .map_err(|_| anyhow::anyhow!("Wallet host transport is poisoned"))?;

            write_frame(&mut transport.writer, &BridgeRequest { id, method })
                .with_context(|| format!("Failed to send '{method}' to the wallet host"))?;

            let response = read_frame(&mut transport.reader)
                .with_context(|| format!("Failed to read '{method}' response"))?
                .context("Wallet host closed the connection")?;

            if response.id != id {
                bail!(
                    "Wallet host answered out of order: expected id {id}, got {}",
                    response.id
                );
            }
            if let Some(err) = response.error {
                bail!("Wallet host rejected '{method}': {} ({})", err.message, err.code);
            }
            response
                .result
                .with_context(|| format!("Wallet host sent an empty '{method}' response"))
        })
        .await
        .context("Wallet host exchange was aborted")?
    }
}

#[async_trait]
impl WalletBridge for ExtensionBridge {
    fn is_available(&self) -> bool {
        // Construction only succeeds over a live transport.
        true
    }

    async fn request_public_key(&self) -> anyhow::Result<String> {
        let connected = self
            .call("isConnected")
            .await?
            .as_bool()
            .context("'isConnected' response is not a boolean")?;
        if !connected {
            bail!("Wallet extension reports no active connection");
        }
        let key = self
            .call("getPublicKey")
            .await?
            .as_str()
            .context("'getPublicKey' response is not a string")?
            .to_string();
        Ok(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::sync::{Arc, Mutex};

    const VALID: &str = "GA7QYNF7SOWQ3GLR2BGMZEHXAVIRZA4KVWLTJJFC7MGXUA74P7UJVSGZ";

    /// Write sink the test can inspect after the exchange.
    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn frame(json: serde_json::Value) -> Vec<u8> {
        let body = serde_json::to_vec(&json).unwrap();
        let mut out = (body.len() as u32).to_le_bytes().to_vec();
        out.extend_from_slice(&body);
        out
    }

    fn sent_methods(buf: &SharedBuf) -> Vec<String> {
        let bytes = buf.0.lock().unwrap().clone();
        let mut cursor = Cursor::new(bytes);
        let mut methods = Vec::new();
        loop {
            let mut len_buf = [0u8; 4];
            if cursor.read_exact(&mut len_buf).is_err() {
                break;
            }
            let mut body = vec![0u8; u32::from_le_bytes(len_buf) as usize];
            cursor.read_exact(&mut body).unwrap();
            let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
            methods.push(value["method"].as_str().unwrap().to_string());
        }
        methods
    }

    #[tokio::test]
    async fn extension_bridge_key_exchange() {
        let mut responses = frame(serde_json::json!({"id": 1, "result": true}));
        responses.extend(frame(serde_json::json!({"id": 2, "result": VALID})));
        let sent = SharedBuf::default();
        let bridge = ExtensionBridge::over(Cursor::new(responses), sent.clone());

        let key = bridge.request_public_key().await.unwrap();
        assert_eq!(key, VALID);
        assert_eq!(sent_methods(&sent), vec!["isConnected", "getPublicKey"]);
    }

    #[tokio::test]
    async fn extension_bridge_not_connected() {
        let responses = frame(serde_json::json!({"id": 1, "result": false}));
        let bridge = ExtensionBridge::over(Cursor::new(responses), io::sink());

        let err = bridge.request_public_key().await.unwrap_err();
        assert!(err.to_string().contains("no active connection"));
    }

    #[tokio::test]
    async fn extension_bridge_error_response() {
        let responses = frame(serde_json::json!({
            "id": 1,
            "error": {"code": "USER_DECLINED", "message": "request denied"}
        }));
        let bridge = ExtensionBridge::over(Cursor::new(responses), io::sink());

        let err = bridge.request_public_key().await.unwrap_err();
        assert!(err.to_string().contains("request denied"));
    }

    #[tokio::test]
    async fn slow_host_does_not_stall_the_runtime() {
        use std::time::{Duration, Instant};

        /// Host that sits on the read for a while before closing.
        struct SlowReader;

        impl Read for SlowReader {
            fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
                std::thread::sleep(Duration::from_millis(300));
                Ok(0)
            }
        }

        let bridge = Arc::new(ExtensionBridge::over(SlowReader, io::sink()));
        let exchange = tokio::spawn({
            let bridge = Arc::clone(&bridge);
            async move { bridge.request_public_key().await }
        });

        let start = Instant::now();
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(
            start.elapsed() < Duration::from_millis(250),
            "timer starved while the wallet host was blocking"
        );

        let err = exchange.await.unwrap().unwrap_err();
        assert!(err.to_string().contains("closed"));
    }

    #[tokio::test]
    async fn extension_bridge_eof() {
        let bridge = ExtensionBridge::over(Cursor::new(Vec::new()), io::sink());
        assert!(bridge.request_public_key().await.is_err());
    }

    #[test]
    fn frame_length_is_bounded() {
        let mut oversized = (2_000_000u32).to_le_bytes().to_vec();
        oversized.extend_from_slice(&[0u8; 8]);
        assert!(read_frame(&mut Cursor::new(oversized)).is_err());
    }

    /// Bridge that counts how often the extension call is invoked.
    struct CountingBridge {
        available: bool,
        calls: Arc<Mutex<u32>>,
    }

    #[async_trait]
    impl WalletBridge for CountingBridge {
        fn is_available(&self) -> bool {
            self.available
        }

        async fn request_public_key(&self) -> anyhow::Result<String> {
            *self.calls.lock().unwrap() += 1;
            bail!("boom")
        }
    }

    #[tokio::test]
    async fn connect_skips_the_extension_when_unavailable() {
        let calls = Arc::new(Mutex::new(0));
        let bridge = CountingBridge {
            available: false,
            calls: calls.clone(),
        };

        let err = connect(&bridge).await.unwrap_err();
        assert!(matches!(err, ViewerError::ExtensionUnavailable));
        assert_eq!(*calls.lock().unwrap(), 0, "extension must not be invoked");
    }

    #[tokio::test]
    async fn connect_wraps_bridge_failures() {
        let calls = Arc::new(Mutex::new(0));
        let bridge = CountingBridge {
            available: true,
            calls,
        };

        let err = connect(&bridge).await.unwrap_err();
        assert!(matches!(err, ViewerError::Bridge(_)));
    }

    #[tokio::test]
    async fn connect_validates_the_returned_key() {
        let bridge = StaticBridge::new("not-a-strkey");
        let err = connect(&bridge).await.unwrap_err();
        assert!(matches!(err, ViewerError::InvalidPublicKey(_)));
    }

    #[tokio::test]
    async fn connect_happy_path() {
        let bridge = StaticBridge::new(VALID);
        let key = connect(&bridge).await.unwrap();
        assert_eq!(key.as_str(), VALID);
    }

    #[tokio::test]
    async fn static_unavailable_bridge() {
        let bridge = StaticBridge::unavailable();
        assert!(!bridge.is_available());
        let err = connect(&bridge).await.unwrap_err();
        assert!(matches!(err, ViewerError::ExtensionUnavailable));
    }
}

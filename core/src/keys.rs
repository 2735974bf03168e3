//! Public-key identity — strkey-encoded ed25519 public keys.
//!
//! A Stellar public key is a 56-character "strkey": base32 (RFC 4648
//! alphabet, no padding) over a version byte, the 32-byte key, and a
//! CRC16-XMODEM checksum. The viewer never touches private key material;
//! this type only guarantees that an identity string handed over by the
//! wallet bridge is well-formed.

use serde::Serialize;

use crate::error::{Result, ViewerError};

/// Version byte for ed25519 public keys ('G' prefix).
const VERSION_ED25519_PUBLIC: u8 = 6 << 3;

const STRKEY_LEN: usize = 56;
const BASE32_ALPHABET: &[u8; 32] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ234567";

/// A validated account identity (`G...` strkey).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct PublicKey(String);

impl PublicKey {
    /// Parse and validate a strkey-encoded ed25519 public key.
    pub fn from_strkey(s: &str) -> Result<Self> {
        if s.len() != STRKEY_LEN {
            return Err(ViewerError::InvalidPublicKey(format!(
                "Public key must be {STRKEY_LEN} characters, got {}",
                s.len()
            )));
        }
        let raw = base32_decode(s).ok_or_else(|| {
            ViewerError::InvalidPublicKey(format!("Public key is not valid base32: {s}"))
        })?;
        // 56 chars * 5 bits = 35 bytes: version + 32-byte key + 2-byte checksum
        if raw[0] != VERSION_ED25519_PUBLIC {
            return Err(ViewerError::InvalidPublicKey(format!(
                "Not an ed25519 public key (version byte {:#04x}): {s}",
                raw[0]
            )));
        }
        let expected = u16::from_le_bytes([raw[33], raw[34]]);
        if crc16_xmodem(&raw[..33]) != expected {
            return Err(ViewerError::InvalidPublicKey(format!(
                "Public key checksum mismatch: {s}"
            )));
        }
        Ok(Self(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Abbreviated form for UIs: first four and last four characters.
    pub fn short(&self) -> String {
        crate::display::short_id(&self.0)
    }
}

impl std::fmt::Display for PublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for PublicKey {
    type Err = ViewerError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_strkey(s)
    }
}

/// Strict RFC 4648 base32 decode, no padding. Returns `None` on characters
/// outside the alphabet or leftover bits that are not zero.
fn base32_decode(s: &str) -> Option<Vec<u8>> {
    let mut out = Vec::with_capacity(s.len() * 5 / 8);
    let mut acc: u32 = 0;
    let mut bits: u32 = 0;
    for c in s.bytes() {
        let val = BASE32_ALPHABET.iter().position(|&a| a == c)? as u32;
        acc = (acc << 5) | val;
        bits += 5;
        if bits >= 8 {
            bits -= 8;
            out.push((acc >> bits) as u8);
            acc &= (1 << bits) - 1;
        }
    }
    if acc != 0 {
        return None;
    }
    Some(out)
}

/// CRC16-XMODEM: polynomial 0x1021, initial value 0.
fn crc16_xmodem(data: &[u8]) -> u16 {
    let mut crc: u16 = 0;
    for &byte in data {
        crc ^= (byte as u16) << 8;
        for _ in 0..8 {
            if crc & 0x8000 != 0 {
                crc = (crc << 1) ^ 0x1021;
            } else {
                crc <<= 1;
            }
        }
    }
    crc
}

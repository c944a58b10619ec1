//! Identity types shared by every upbox crate
//!
//! This module defines the two identifiers used throughout the system:
//! - [`ObjectHandle`]: Unique identifier for a deployed Box instance
//! - [`Address`]: Address-like identity of a caller or owner

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Unique identifier for a deployed Box instance
///
/// An ObjectHandle names one proxy: its storage, its active implementation
/// and its event log. Handles are never reused, and instances behind
/// different handles are fully isolated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectHandle(Uuid);

impl ObjectHandle {
    /// Create a new random ObjectHandle using UUID v4
    ///
    /// # Examples
    ///
    /// ```
    /// use upbox_core::types::ObjectHandle;
    ///
    /// let h1 = ObjectHandle::new();
    /// let h2 = ObjectHandle::new();
    /// assert_ne!(h1, h2);
    /// ```
    pub fn new() -> Self {
        ObjectHandle(Uuid::new_v4())
    }

    /// Create ObjectHandle from raw bytes
    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        ObjectHandle(Uuid::from_bytes(bytes))
    }

    /// Get raw bytes representation
    pub fn as_bytes(&self) -> &[u8; 16] {
        self.0.as_bytes()
    }
}

impl Default for ObjectHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ObjectHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ObjectHandle {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim())
            .map(ObjectHandle)
            .map_err(|e| ParseIdError(format!("invalid handle '{}': {}", s, e)))
    }
}

/// Error returned when parsing an [`ObjectHandle`] or [`Address`] fails.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct ParseIdError(String);

/// Length of an address in bytes
pub const ADDRESS_LEN: usize = 20;

/// Address-like identity of a caller, owner or staker
///
/// Displayed and parsed as `0x` followed by 40 lowercase hex digits.
/// [`Address::ZERO`] is the null identity; it can never own a Box.
///
/// # Examples
///
/// ```
/// use upbox_core::types::Address;
///
/// let admin = Address::from_label("admin");
/// let parsed: Address = admin.to_string().parse().unwrap();
/// assert_eq!(admin, parsed);
/// assert!(!admin.is_zero());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address([u8; ADDRESS_LEN]);

impl Address {
    /// The null address
    pub const ZERO: Address = Address([0u8; ADDRESS_LEN]);

    /// Create an address from raw bytes
    pub const fn from_bytes(bytes: [u8; ADDRESS_LEN]) -> Self {
        Address(bytes)
    }

    /// Derive a deterministic address from a human label
    ///
    /// The address is the first 20 bytes of SHA-256(label). Used by tests
    /// and the CLI to name accounts like `admin` or `alice`.
    pub fn from_label(label: &str) -> Self {
        let digest = Sha256::digest(label.as_bytes());
        let mut bytes = [0u8; ADDRESS_LEN];
        bytes.copy_from_slice(&digest[..ADDRESS_LEN]);
        Address(bytes)
    }

    /// Get raw bytes representation
    pub fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
        &self.0
    }

    /// Check if this is the null address
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; ADDRESS_LEN]
    }
}

impl Default for Address {
    fn default() -> Self {
        Address::ZERO
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("0x")?;
        for byte in &self.0 {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self)
    }
}

impl FromStr for Address {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let hex = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .ok_or_else(|| ParseIdError(format!("address '{}' must start with 0x", s)))?;

        if hex.len() != ADDRESS_LEN * 2 {
            return Err(ParseIdError(format!(
                "address '{}' must have {} hex digits, got {}",
                s,
                ADDRESS_LEN * 2,
                hex.len()
            )));
        }

        let mut bytes = [0u8; ADDRESS_LEN];
        for (i, chunk) in hex.as_bytes().chunks(2).enumerate() {
            let pair = std::str::from_utf8(chunk)
                .map_err(|_| ParseIdError(format!("address '{}' is not ASCII", s)))?;
            bytes[i] = u8::from_str_radix(pair, 16)
                .map_err(|_| ParseIdError(format!("address '{}' has invalid hex '{}'", s, pair)))?;
        }
        Ok(Address(bytes))
    }
}

// Addresses travel as hex strings so they can key JSON maps.
impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

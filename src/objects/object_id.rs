//! Object identifier (content hash)
//!
//! Object ids are 40-character hexadecimal strings naming a 20-byte content
//! hash. They uniquely identify every record in a store (blobs, trees,
//! commits, tags).
//!
//! ## Format
//!
//! - Full: 40 hex characters
//! - Short: first 7 characters
//! - Storage path: `objects/<first-2-chars>/<remaining-38-chars>`

use crate::objects::OBJECT_ID_LENGTH;
use std::path::PathBuf;

/// Object identifier (content hash)
///
/// A validated 40-character hexadecimal string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct ObjectId(String);

impl ObjectId {
    /// Parse and validate an object id from a string
    ///
    /// # Returns
    ///
    /// Validated ObjectId or error if invalid length/characters
    pub fn try_parse(id: String) -> anyhow::Result<Self> {
        if id.len() != OBJECT_ID_LENGTH {
            return Err(anyhow::anyhow!("Invalid object id length: {}", id.len()));
        }
        if !id.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(anyhow::anyhow!("Invalid object id characters: {}", id));
        }
        Ok(Self(id.to_ascii_lowercase()))
    }

    /// Whether a string is a well-formed full hex id
    ///
    /// A full 40-hex spec is self-describing, so callers may accept it
    /// verbatim without a store round-trip.
    pub fn is_full_hex(spec: &str) -> bool {
        spec.len() == OBJECT_ID_LENGTH && spec.chars().all(|c| c.is_ascii_hexdigit())
    }

    /// Convert to the 20-byte binary form
    pub fn to_bytes(&self) -> anyhow::Result<[u8; OBJECT_ID_LENGTH / 2]> {
        let mut bytes = [0u8; OBJECT_ID_LENGTH / 2];

        // A nibble pair at a time
        for (i, byte) in bytes.iter_mut().enumerate() {
            *byte = u8::from_str_radix(&self.0[2 * i..2 * i + 2], 16)
                .map_err(|_| anyhow::anyhow!("Invalid hex digit in {}", self.0))?;
        }

        Ok(bytes)
    }

    /// Build an object id from its 20-byte binary form
    pub fn from_bytes(bytes: &[u8]) -> anyhow::Result<Self> {
        if bytes.len() != OBJECT_ID_LENGTH / 2 {
            return Err(anyhow::anyhow!(
                "Invalid binary object id length: {}",
                bytes.len()
            ));
        }

        let mut hex40 = String::with_capacity(OBJECT_ID_LENGTH);
        for byte in bytes {
            hex40.push_str(&format!("{:02x}", byte));
        }

        Self::try_parse(hex40)
    }

    /// Convert to the file system path used by loose storage
    ///
    /// Splits the hash as `XX/YYYYYY...` where XX is the first 2 chars.
    pub fn to_path(&self) -> PathBuf {
        let (dir, file) = self.0.split_at(2);
        PathBuf::from(dir).join(file)
    }

    /// Abbreviated form (first 7 characters)
    pub fn to_short_oid(&self) -> String {
        self.0.split_at(7).0.to_string()
    }
}

impl AsRef<str> for ObjectId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

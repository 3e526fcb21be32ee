//! Continuation tokens - opaque resume points for sorted scans.

use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::sort::SortValue;

/// Current wire version of the encoded token.
const TOKEN_VERSION: u32 = 2;

/// A structured resume point inside a sorted scan: the sort-key tuple,
/// id, and partition key of the last row already returned. Scans resume
/// strictly after it. The partition key is part of the position because
/// the same id may exist in several partitions, and the resume point has
/// to name exactly one row.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScanPosition {
    pub keys: Vec<SortValue>,
    pub id: String,
    pub partition_key: String,
}

/// Error raised when a continuation token cannot be encoded or decoded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TokenError {
    pub message: String,
}

impl fmt::Display for TokenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "continuation token error: {}", self.message)
    }
}

impl std::error::Error for TokenError {}

/// An opaque resume token for a sorted, size-bounded scan.
///
/// Callers treat the encoded form as a black box and hand it back
/// verbatim to fetch the next page. The token remembers the direction and
/// key arity of the scan that minted it, and only resumes a scan that
/// asks for the same order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ContinuationToken {
    version: u32,
    descending: bool,
    key_count: usize,
    position: ScanPosition,
}

impl ContinuationToken {
    pub fn new(descending: bool, key_count: usize, position: ScanPosition) -> Self {
        ContinuationToken {
            version: TOKEN_VERSION,
            descending,
            key_count,
            position,
        }
    }

    pub fn descending(&self) -> bool {
        self.descending
    }

    pub fn key_count(&self) -> usize {
        self.key_count
    }

    pub fn position(&self) -> &ScanPosition {
        &self.position
    }

    pub fn into_position(self) -> ScanPosition {
        self.position
    }

    /// Encodes the token to its opaque wire form: bitcode, then base64.
    pub fn encode(&self) -> Result<String, TokenError> {
        let bytes = bitcode::serialize(self).map_err(|e| TokenError {
            message: format!("encode: {}", e),
        })?;
        Ok(STANDARD.encode(bytes))
    }

    /// Decodes a token from its opaque wire form, rejecting payloads from
    /// incompatible wire versions.
    pub fn decode(encoded: &str) -> Result<Self, TokenError> {
        let bytes = STANDARD.decode(encoded).map_err(|e| TokenError {
            message: format!("base64 decode: {}", e),
        })?;
        let token: ContinuationToken = bitcode::deserialize(&bytes).map_err(|e| TokenError {
            message: format!("payload decode: {}", e),
        })?;
        if token.version != TOKEN_VERSION {
            return Err(TokenError {
                message: format!("unsupported token version {}", token.version),
            });
        }
        if token.key_count != token.position.keys.len() {
            return Err(TokenError {
                message: format!(
                    "key arity mismatch: {} declared, {} encoded",
                    token.key_count,
                    token.position.keys.len()
                ),
            });
        }
        Ok(token)
    }
}

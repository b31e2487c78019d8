//! Error types for next-hop key parsing and router interface tables.

use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while building a [`NextHopKey`](crate::NextHopKey).
///
/// There is a single kind: the input is not a valid next-hop encoding. The
/// [`EncodingFault`] only says which check rejected it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NextHopKeyError {
    #[error("invalid next-hop encoding '{input}': {reason}")]
    InvalidEncoding { input: String, reason: EncodingFault },
}

impl NextHopKeyError {
    pub(crate) fn invalid(input: impl Into<String>, reason: EncodingFault) -> Self {
        NextHopKeyError::InvalidEncoding {
            input: input.into(),
            reason,
        }
    }

    /// Returns the offending input string.
    pub fn input(&self) -> &str {
        match self {
            NextHopKeyError::InvalidEncoding { input, .. } => input,
        }
    }

    /// Returns the check that rejected the input.
    pub fn reason(&self) -> &EncodingFault {
        match self {
            NextHopKeyError::InvalidEncoding { reason, .. } => reason,
        }
    }
}

/// Detail attached to [`NextHopKeyError::InvalidEncoding`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodingFault {
    #[error("contains next-hop group delimiter ','")]
    GroupDelimiter,

    #[error("expected {expected} field(s), found {found}")]
    FieldCount { expected: &'static str, found: usize },

    #[error("invalid IP address '{0}'")]
    IpAddress(String),

    #[error("invalid VNI '{0}'")]
    Vni(String),

    #[error("invalid MAC address '{0}'")]
    MacAddress(String),

    #[error("{0} '{1}' contains a next-hop delimiter")]
    Delimiter(&'static str, String),

    #[error("empty SRv6 {0}")]
    EmptySrv6Field(&'static str),

    #[error("no router interface for {0}")]
    Unresolved(String),
}

/// Errors loading a router interface table.
#[derive(Debug, Error)]
pub enum RouterIntfsError {
    #[error("failed to read router interface config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid router interface config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("duplicate router interface '{0}'")]
    DuplicateInterface(String),
}

/// Result type alias for next-hop key construction.
pub type Result<T> = std::result::Result<T, NextHopKeyError>;

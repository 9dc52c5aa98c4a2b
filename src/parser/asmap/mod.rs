/*!
asmap snapshots: the [AsLookup] capability and the loader for binary and text asmap files.
*/
pub mod binary;
pub mod text;

pub use binary::BinaryAsMap;
pub use text::TextAsMap;

use crate::error::AsmapDiffError;
use crate::io::read_bytes;
use crate::models::{Asn, Prefix};
use log::info;
use std::path::Path;
use thiserror::Error;

/// Classifies a prefix into an autonomous system.
///
/// Implementations must be deterministic and side-effect free. `None` means the prefix is not
/// mapped; two `None`s compare equal.
pub trait AsLookup {
    fn lookup(&self, prefix: &Prefix) -> Option<Asn>;
}

impl<T: AsLookup + ?Sized> AsLookup for &T {
    fn lookup(&self, prefix: &Prefix) -> Option<Asn> {
        (**self).lookup(prefix)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AsmapFormatError {
    #[error("unparseable line '{0}'")]
    UnparseableLine(String),
    #[error("invalid ASN '{0}'")]
    InvalidAsn(String),
    #[error("invalid network '{0}'")]
    InvalidNetwork(String),
    #[error("invalid UTF-8")]
    InvalidUtf8,
    #[error("input is ambiguous")]
    Ambiguous,
    #[error("input is neither a valid binary asmap file nor valid text input ({0})")]
    Unrecognized(Box<AsmapFormatError>),
}

/// One loaded asmap snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AsMap {
    Binary(BinaryAsMap),
    Text(TextAsMap),
}

impl AsMap {
    /// Decodes asmap content, detecting whether it is binary or text.
    ///
    /// Non-empty content that is valid in both formats is rejected as ambiguous.
    pub fn from_bytes(bytes: &[u8]) -> Result<AsMap, AsmapFormatError> {
        let binary = BinaryAsMap::from_bytes(bytes);
        let text = std::str::from_utf8(bytes)
            .map_err(|_| AsmapFormatError::InvalidUtf8)
            .and_then(TextAsMap::parse);

        match (binary, text) {
            (Some(_), Ok(_)) if !bytes.is_empty() => Err(AsmapFormatError::Ambiguous),
            (_, Ok(text)) => Ok(AsMap::Text(text)),
            (Some(binary), Err(_)) => Ok(AsMap::Binary(binary)),
            (None, Err(e)) => Err(AsmapFormatError::Unrecognized(Box::new(e))),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            AsMap::Binary(_) => "binary",
            AsMap::Text(_) => "text",
        }
    }
}

impl AsLookup for AsMap {
    fn lookup(&self, prefix: &Prefix) -> Option<Asn> {
        match self {
            AsMap::Binary(asmap) => asmap.lookup(prefix),
            AsMap::Text(asmap) => asmap.lookup(prefix),
        }
    }
}

/// Loads an asmap snapshot from a file.
pub fn load_asmap(path: &Path) -> Result<AsMap, AsmapDiffError> {
    let bytes = read_bytes(path)?;
    let asmap = AsMap::from_bytes(&bytes).map_err(|e| AsmapDiffError::UnsupportedFormat {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    match &asmap {
        AsMap::Binary(binary) => info!(
            "loaded binary asmap from {} ({} bytes)",
            path.display(),
            binary.len()
        ),
        AsMap::Text(text) => info!(
            "loaded text asmap from {} ({} prefixes)",
            path.display(),
            text.len()
        ),
    }
    Ok(asmap)
}

/*!
error module defines the error types used in asmap-node-diff.
*/
use crate::models::Afi;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AsmapDiffError {
    /// A given input path does not exist.
    ///
    /// ## Occurs during:
    ///  - Input path checks before any file is read
    #[error("input '{}' doesn't exist.", .0.display())]
    InputNotFound(PathBuf),
    /// A given input path exists but is not a regular file.
    ///
    /// ## Occurs during:
    ///  - Input path checks before any file is read
    #[error("input '{}' isn't a file.", .0.display())]
    InputNotAFile(PathBuf),
    /// The file could not be opened, decompressed or read.
    #[error("unable to read '{}': {reason}", .path.display())]
    ReadFailed { path: PathBuf, reason: String },
    /// The node address file is not valid JSON, or an entry lacks a required field.
    ///
    /// ## Occurs during:
    ///  - Loading peers from a node address file
    #[error("malformed node address file '{}': {reason}", .path.display())]
    MalformedInput { path: PathBuf, reason: String },
    /// The file is neither a valid binary asmap nor valid text asmap input, or it is both.
    ///
    /// ## Occurs during:
    ///  - Loading an asmap snapshot
    #[error("unsupported asmap format '{}': {reason}", .path.display())]
    UnsupportedFormat { path: PathBuf, reason: String },
    /// A peer address is not an IP literal.
    ///
    /// ## Occurs during:
    ///  - Prefix normalization of a peer address
    #[error("invalid address '{0}'")]
    InvalidAddress(String),
    /// A peer address parses, but belongs to another family than its entry's `network` field.
    ///
    /// ## Occurs during:
    ///  - Prefix normalization of a peer address
    #[error("address '{address}' isn't an {network} address")]
    AddressFamilyMismatch { address: String, network: Afi },
    /// A horizon definition passed on the command line could not be parsed.
    #[error("invalid horizon '{0}'")]
    InvalidHorizon(String),
}

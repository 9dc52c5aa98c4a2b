/*!
Loading of node address files (the JSON output of the `getnodeaddresses 0` RPC).
*/
use crate::error::AsmapDiffError;
use crate::io::read_bytes;
use crate::models::{AddressEntry, Peer};
use log::{debug, info};
use std::path::Path;

/// Parses a JSON array of address entries and keeps the IPv4/IPv6 peers, in input order.
pub fn parse_peers(bytes: &[u8]) -> Result<Vec<Peer>, serde_json::Error> {
    let entries: Vec<AddressEntry> = serde_json::from_slice(bytes)?;
    let total = entries.len();
    let peers: Vec<Peer> = entries.into_iter().filter_map(Peer::from_entry).collect();
    debug!(
        "dropped {} entries on non-IP networks",
        total - peers.len()
    );
    Ok(peers)
}

/// Loads the clearnet peers of a node address file.
pub fn load_peers(path: &Path) -> Result<Vec<Peer>, AsmapDiffError> {
    let bytes = read_bytes(path)?;
    let peers = parse_peers(&bytes).map_err(|e| AsmapDiffError::MalformedInput {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    info!(
        "extracted {} clearnet nodes from {}",
        peers.len(),
        path.display()
    );
    Ok(peers)
}

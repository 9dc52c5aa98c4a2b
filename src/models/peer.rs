use crate::error::AsmapDiffError;
use crate::models::{Afi, Prefix};
use serde::Deserialize;

/// One entry of a node address file, as produced by the `getnodeaddresses 0` RPC.
///
/// Unknown fields (e.g. `services`) are ignored. All four fields below are required.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AddressEntry {
    pub network: String,
    pub address: String,
    pub port: u16,
    pub time: i64,
}

/// A peer reachable over IPv4 or IPv6.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Peer {
    /// Unix timestamp (seconds) of the last time the peer was seen.
    pub last_seen: i64,
    pub address: String,
    pub port: u16,
    pub afi: Afi,
}

impl Peer {
    /// Builds a peer from an address entry, or `None` if the entry's network is not routable IP.
    pub fn from_entry(entry: AddressEntry) -> Option<Peer> {
        let afi = Afi::from_network_name(&entry.network)?;
        Some(Peer {
            last_seen: entry.time,
            address: entry.address,
            port: entry.port,
            afi,
        })
    }

    /// Normalizes the peer's address into its lookup prefix.
    ///
    /// The address must belong to the family named by the entry's `network` field.
    pub fn prefix(&self) -> Result<Prefix, AsmapDiffError> {
        let prefix = Prefix::normalize(&self.address)?;
        match Afi::from(prefix.prefix.addr()) == self.afi {
            true => Ok(prefix),
            false => Err(AsmapDiffError::AddressFamilyMismatch {
                address: self.address.clone(),
                network: self.afi,
            }),
        }
    }

    /// Whether the peer was seen at or after `threshold`.
    #[inline]
    pub fn seen_since(&self, threshold: i64) -> bool {
        self.last_seen >= threshold
    }
}

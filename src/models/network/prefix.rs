use crate::error::AsmapDiffError;
use ipnet::{IpNet, Ipv4Net, Ipv6Net};
use std::fmt::{Display, Formatter};
use std::net::IpAddr;
use std::str::FromStr;

/// Width of every asmap lookup key. IPv4 lives inside it as `::ffff:0:0/96`.
pub const ASMAP_KEY_BITS: u8 = 128;

/// Granularity at which IPv6 peers are looked up.
///
/// The asmap codec walks keys of [ASMAP_KEY_BITS] bits, so peers are normalized to full host
/// prefixes. Lowering this constant shortens IPv6 keys: the text codec still answers with the
/// most specific entry covering the shorter prefix, while the binary interpreter answers
/// unknown for any lookup that needs more key bits than the prefix carries.
pub const ASMAP_IPV6_PREFIX_LEN: u8 = 128;

const IPV4_MAPPED_PREFIX: u128 = 0xffff << 32;
const IPV4_MAPPED_PREFIX_LEN: u8 = 96;

/// Canonical lookup key of a peer: an IPv4 /32, or an IPv6 address truncated to
/// [ASMAP_IPV6_PREFIX_LEN] bits.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Prefix {
    pub prefix: IpNet,
}

impl Prefix {
    /// Normalizes a textual peer address into its lookup prefix.
    ///
    /// ```rust
    /// use asmap_node_diff::models::Prefix;
    ///
    /// let prefix = Prefix::normalize("2001:db8::1").unwrap();
    /// assert_eq!(prefix.to_string(), "2001:db8::1/128");
    /// assert!(Prefix::normalize("example.onion").is_err());
    /// ```
    pub fn normalize(address: &str) -> Result<Prefix, AsmapDiffError> {
        let addr = IpAddr::from_str(address)
            .map_err(|_| AsmapDiffError::InvalidAddress(address.to_string()))?;
        let prefix = match addr {
            IpAddr::V4(v4) => IpNet::V4(Ipv4Net::from(v4)),
            IpAddr::V6(v6) => IpNet::V6(
                Ipv6Net::new(v6, ASMAP_IPV6_PREFIX_LEN)
                    .map_err(|_| AsmapDiffError::InvalidAddress(address.to_string()))?
                    .trunc(),
            ),
        };
        Ok(Prefix { prefix })
    }

    /// Returns the prefix bits left-aligned in a 128-bit key, together with the number of
    /// significant bits.
    pub fn key(&self) -> (u128, u8) {
        match self.prefix {
            IpNet::V4(net) => (
                IPV4_MAPPED_PREFIX | u32::from(net.network()) as u128,
                IPV4_MAPPED_PREFIX_LEN + net.prefix_len(),
            ),
            IpNet::V6(net) => (u128::from(net.network()), net.prefix_len()),
        }
    }
}

impl From<IpNet> for Prefix {
    fn from(value: IpNet) -> Self {
        Prefix {
            prefix: value.trunc(),
        }
    }
}

impl Display for Prefix {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.prefix)
    }
}

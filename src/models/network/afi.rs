use std::fmt::{Display, Formatter};
use std::net::IpAddr;

/// AFI -- Address Family Identifier
///
/// Only the two routable families are modelled. Overlay networks found in node address files
/// (`onion`, `i2p`, `cjdns`) have no AFI and are dropped by the peer loader.
#[derive(Debug, PartialEq, Clone, Copy, Eq, Hash)]
pub enum Afi {
    Ipv4,
    Ipv6,
}

impl Afi {
    /// Maps the `network` field of a node address entry to an AFI.
    ///
    /// Returns `None` for every network that is not reachable over plain IP.
    pub fn from_network_name(name: &str) -> Option<Afi> {
        match name {
            "ipv4" => Some(Afi::Ipv4),
            "ipv6" => Some(Afi::Ipv6),
            _ => None,
        }
    }

    pub const fn network_name(&self) -> &'static str {
        match self {
            Afi::Ipv4 => "ipv4",
            Afi::Ipv6 => "ipv6",
        }
    }
}

impl From<IpAddr> for Afi {
    #[inline]
    fn from(value: IpAddr) -> Self {
        match value {
            IpAddr::V4(_) => Afi::Ipv4,
            IpAddr::V6(_) => Afi::Ipv6,
        }
    }
}

impl Display for Afi {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.network_name())
    }
}

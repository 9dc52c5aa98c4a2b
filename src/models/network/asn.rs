use std::fmt::{Display, Formatter};

/// ASN -- Autonomous System Number
///
/// The asmap formats never store ASN 0: it is the marker for "not mapped", so lookups surface
/// it as `None` instead of constructing an `Asn`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd)]
pub struct Asn {
    pub asn: u32,
}

impl Asn {
    pub const fn new(asn: u32) -> Self {
        Asn { asn }
    }

    /// Turns a raw value decoded from an asmap into a lookup result. `0` means unknown.
    pub const fn from_mapped(asn: u32) -> Option<Asn> {
        match asn {
            0 => None,
            v => Some(Asn { asn: v }),
        }
    }
}

impl Display for Asn {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "AS{}", self.asn)
    }
}

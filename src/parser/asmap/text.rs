/*!
Text asmap: one `<prefix> AS<number>` mapping per line, `#` starting a comment.

```text
# prefix          asn
1.0.0.0/24        AS13335
2001:db8::/32     AS64496
```
*/
use crate::models::{Asn, Prefix};
use crate::parser::asmap::{AsLookup, AsmapFormatError};
use ipnet::IpNet;
use std::collections::HashMap;
use std::net::IpAddr;
use std::str::FromStr;

/// Longest-prefix-match table over the 128-bit key space.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextAsMap {
    entries: HashMap<(u8, u128), u32>,
    /// Distinct prefix lengths present in `entries`, longest first.
    lengths: Vec<u8>,
}

#[inline]
fn mask(bits: u128, len: u8) -> u128 {
    match len {
        0 => 0,
        l => bits & (u128::MAX << (128 - l as u32)),
    }
}

fn parse_network(s: &str) -> Option<IpNet> {
    let net = match IpNet::from_str(s) {
        Ok(net) => net,
        Err(_) => IpNet::from(IpAddr::from_str(s).ok()?),
    };
    // host bits must not be set
    match net.trunc() == net {
        true => Some(net),
        false => None,
    }
}

fn parse_asn(s: &str) -> Option<u32> {
    let digits = s.strip_prefix("AS")?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse::<u32>().ok()
}

impl TextAsMap {
    /// Parses text asmap content. Later entries for the same prefix override earlier ones.
    pub fn parse(text: &str) -> Result<TextAsMap, AsmapFormatError> {
        let mut asmap = TextAsMap::default();
        for line in text.split('\n') {
            let line = match line.find('#') {
                Some(idx) => &line[..idx],
                None => line,
            };
            let line = line
                .trim_start_matches(' ')
                .trim_end_matches([' ', '\t', '\r', '\n']);
            if line.is_empty() {
                continue;
            }
            let fields: Vec<&str> = line.split(' ').collect();
            let [prefix, asn] = fields.as_slice() else {
                return Err(AsmapFormatError::UnparseableLine(line.to_string()));
            };
            let asn = parse_asn(asn).ok_or_else(|| AsmapFormatError::InvalidAsn(asn.to_string()))?;
            let net = parse_network(prefix)
                .ok_or_else(|| AsmapFormatError::InvalidNetwork(prefix.to_string()))?;
            asmap.insert(Prefix::from(net), asn);
        }
        Ok(asmap)
    }

    fn insert(&mut self, prefix: Prefix, asn: u32) {
        let (bits, len) = prefix.key();
        self.entries.insert((len, mask(bits, len)), asn);
        if let Err(idx) = self.lengths.binary_search_by(|l| len.cmp(l)) {
            self.lengths.insert(idx, len);
        }
    }

    /// Number of distinct prefixes in the table.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl AsLookup for TextAsMap {
    fn lookup(&self, prefix: &Prefix) -> Option<Asn> {
        let (bits, len) = prefix.key();
        self.lengths
            .iter()
            .filter(|l| **l <= len)
            .find_map(|l| self.entries.get(&(*l, mask(bits, *l))))
            .and_then(|asn| Asn::from_mapped(*asn))
    }
}

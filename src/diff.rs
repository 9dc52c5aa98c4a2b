/*!
Horizon diff engine: compares how two asmap snapshots classify a set of peers, per recency
horizon.

```rust
use asmap_node_diff::diff::diff_snapshots;
use asmap_node_diff::models::{Afi, Horizon, Peer};
use asmap_node_diff::parser::asmap::TextAsMap;

let prev = TextAsMap::parse("192.0.2.0/24 AS64496\n").unwrap();
let cur = TextAsMap::parse("192.0.2.0/24 AS64497\n").unwrap();
let peers = vec![Peer {
    last_seen: 1_700_000_000,
    address: "192.0.2.1".to_string(),
    port: 8333,
    afi: Afi::Ipv4,
}];

let report = diff_snapshots(&prev, &cur, &peers, &Horizon::defaults(), 1_700_000_000);
assert_eq!(report.results[0].total, 1);
assert_eq!(report.results[0].changed, Some(1));
```
*/
use crate::models::{Asn, Horizon, HorizonResult, Peer};
use crate::parser::asmap::AsLookup;
use log::{debug, warn};

/// A peer whose AS classification differs between the two snapshots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeerChange {
    pub address: String,
    pub last_seen: i64,
    pub previous: Option<Asn>,
    pub current: Option<Asn>,
}

/// Output of [diff_snapshots].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DiffReport {
    /// One entry per horizon, in the order the horizons were given.
    pub results: Vec<HorizonResult>,
    /// Changed peers, in input order.
    pub changes: Vec<PeerChange>,
    /// Addresses that could not be normalized, or that do not match their entry's network.
    /// These peers count towards no horizon.
    pub invalid: Vec<String>,
}

/// Compares `prev` and `cur` over `peers` for every horizon, relative to `reference_time`.
///
/// Each peer is normalized and looked up once. Peers whose address does not parse, or parses
/// into the wrong family, are skipped and reported in [DiffReport::invalid]. Two unknown lookups count as unchanged.
pub fn diff_snapshots<P, C>(
    prev: &P,
    cur: &C,
    peers: &[Peer],
    horizons: &[Horizon],
    reference_time: i64,
) -> DiffReport
where
    P: AsLookup + ?Sized,
    C: AsLookup + ?Sized,
{
    let mut report = DiffReport::default();
    // (last_seen, changed) for every valid peer
    let mut classified: Vec<(i64, bool)> = Vec::with_capacity(peers.len());

    for peer in peers {
        let prefix = match peer.prefix() {
            Ok(prefix) => prefix,
            Err(e) => {
                warn!("skipping peer: {}", e);
                report.invalid.push(peer.address.clone());
                continue;
            }
        };
        let previous = prev.lookup(&prefix);
        let current = cur.lookup(&prefix);
        let changed = previous != current;
        if changed {
            debug!("{} changed: {:?} -> {:?}", prefix, previous, current);
            report.changes.push(PeerChange {
                address: peer.address.clone(),
                last_seen: peer.last_seen,
                previous,
                current,
            });
        }
        classified.push((peer.last_seen, changed));
    }

    report.results = horizons
        .iter()
        .map(|horizon| {
            let threshold = horizon.threshold(reference_time);
            let (total, changed) = classified
                .iter()
                .filter(|(last_seen, _)| *last_seen >= threshold)
                .fold((0, 0), |(total, changed), (_, c)| {
                    (total + 1, changed + usize::from(*c))
                });
            debug!(
                "horizon {} (threshold {}): {} of {} changed",
                horizon.label, threshold, changed, total
            );
            HorizonResult::new(&horizon.label, threshold, total, changed)
        })
        .collect();

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Afi, Prefix};
    use std::collections::HashMap;

    const NOW: i64 = 1_700_000_000;

    /// In-memory snapshot keyed by address.
    #[derive(Default)]
    struct MockAsMap(HashMap<Prefix, Asn>);

    impl MockAsMap {
        fn with(entries: &[(&str, u32)]) -> Self {
            MockAsMap(
                entries
                    .iter()
                    .map(|(addr, asn)| (Prefix::normalize(addr).unwrap(), Asn::new(*asn)))
                    .collect(),
            )
        }
    }

    impl AsLookup for MockAsMap {
        fn lookup(&self, prefix: &Prefix) -> Option<Asn> {
            self.0.get(prefix).copied()
        }
    }

    fn peer(address: &str, last_seen: i64) -> Peer {
        let afi = match address.contains(':') {
            true => Afi::Ipv6,
            false => Afi::Ipv4,
        };
        Peer {
            last_seen,
            address: address.to_string(),
            port: 8333,
            afi,
        }
    }

    fn population() -> Vec<Peer> {
        vec![
            peer("192.0.2.1", NOW),
            peer("192.0.2.2", NOW - 1_800),
            peer("192.0.2.3", NOW - 7_200),
            peer("192.0.2.4", NOW - 3 * 86_400),
            peer("192.0.2.5", NOW - 30 * 86_400),
            peer("2001:db8::1", NOW - 60),
        ]
    }

    #[test]
    fn test_identical_snapshots() {
        let asmap = MockAsMap::with(&[("192.0.2.1", 1), ("192.0.2.4", 2), ("2001:db8::1", 3)]);
        let report = diff_snapshots(&asmap, &asmap, &population(), &Horizon::defaults(), NOW);
        assert!(report.changes.is_empty());
        for result in &report.results {
            assert!(result.changed == Some(0) || result.total == 0);
        }
        assert_eq!(report.results[0].total, 6);
    }

    #[test]
    fn test_horizon_counts() {
        let prev = MockAsMap::with(&[
            ("192.0.2.1", 1),
            ("192.0.2.2", 1),
            ("192.0.2.3", 1),
            ("192.0.2.4", 1),
            ("192.0.2.5", 1),
        ]);
        let cur = MockAsMap::with(&[
            ("192.0.2.1", 2),
            ("192.0.2.2", 1),
            ("192.0.2.3", 1),
            ("192.0.2.4", 2),
            ("192.0.2.5", 2),
        ]);
        let report = diff_snapshots(&prev, &cur, &population(), &Horizon::defaults(), NOW);

        let summary: Vec<(&str, usize, Option<usize>)> = report
            .results
            .iter()
            .map(|r| (r.label.as_str(), r.total, r.changed))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("all", 6, Some(3)),
                ("last week", 5, Some(2)),
                ("last day", 4, Some(1)),
                ("last hour", 3, Some(1)),
            ]
        );
        assert_eq!(report.results[1].threshold, NOW - 604_800);

        let changed: Vec<&str> = report.changes.iter().map(|c| c.address.as_str()).collect();
        assert_eq!(changed, vec!["192.0.2.1", "192.0.2.4", "192.0.2.5"]);
        assert_eq!(report.changes[0].previous, Some(Asn::new(1)));
        assert_eq!(report.changes[0].current, Some(Asn::new(2)));
    }

    #[test]
    fn test_unknown_semantics() {
        // both unknown: unchanged; unknown vs known: changed
        let prev = MockAsMap::with(&[("192.0.2.2", 7)]);
        let cur = MockAsMap::with(&[("192.0.2.3", 7)]);
        let peers = vec![
            peer("192.0.2.1", NOW),
            peer("192.0.2.2", NOW),
            peer("192.0.2.3", NOW),
        ];
        let report = diff_snapshots(&prev, &cur, &peers, &[Horizon::unbounded("all")], NOW);
        assert_eq!(report.results[0].total, 3);
        assert_eq!(report.results[0].changed, Some(2));
        assert_eq!(report.changes[0].current, None);
        assert_eq!(report.changes[1].previous, None);
    }

    #[test]
    fn test_invalid_address_skipped() {
        let prev = MockAsMap::with(&[("192.0.2.1", 1)]);
        let cur = MockAsMap::with(&[("192.0.2.1", 2)]);
        let peers = vec![
            peer("192.0.2.1", NOW),
            peer("not-an-address", NOW),
            peer("192.0.2.999", NOW),
            // an ipv6 entry carrying an IPv4 literal
            Peer {
                afi: Afi::Ipv6,
                ..peer("192.0.2.1", NOW)
            },
        ];
        let report = diff_snapshots(&prev, &cur, &peers, &Horizon::defaults(), NOW);
        assert_eq!(
            report.invalid,
            vec!["not-an-address", "192.0.2.999", "192.0.2.1"]
        );
        for result in &report.results {
            assert_eq!(result.total, 1);
            assert_eq!(result.changed, Some(1));
        }
    }

    #[test]
    fn test_empty_horizon() {
        let asmap = MockAsMap::default();
        let peers = vec![peer("192.0.2.1", NOW - 86_400 * 2)];
        let report = diff_snapshots(&asmap, &asmap, &peers, &Horizon::defaults(), NOW);
        assert_eq!(report.results[2].label, "last day");
        assert_eq!(report.results[2].total, 0);
        assert_eq!(report.results[2].changed, None);
        assert_eq!(report.results[2].share(), None);

        let report = diff_snapshots(&asmap, &asmap, &[], &Horizon::defaults(), NOW);
        assert!(report.results.iter().all(|r| r.total == 0 && r.changed.is_none()));
    }

    #[test]
    fn test_invariants() {
        // deterministic pseudo-random peers and snapshots
        let mut state: u64 = 0x2545_f491_4f6c_dd1d;
        let mut next = move || {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            state
        };

        let mut prev = MockAsMap::default();
        let mut cur = MockAsMap::default();
        let mut peers = vec![];
        for i in 0..500u32 {
            let addr = format!("10.{}.{}.{}", i / 65536, (i / 256) % 256, i % 256);
            let prefix = Prefix::normalize(&addr).unwrap();
            match next() % 4 {
                0 => {}
                1 => {
                    prev.0.insert(prefix, Asn::new(1));
                }
                2 => {
                    prev.0.insert(prefix, Asn::new(1));
                    cur.0.insert(prefix, Asn::new(1));
                }
                _ => {
                    cur.0.insert(prefix, Asn::new((next() % 3) as u32 + 1));
                }
            }
            peers.push(peer(&addr, NOW - (next() % (14 * 86_400)) as i64));
        }

        let horizons = vec![
            Horizon::new("narrow", 600),
            Horizon::new("wide", 10 * 86_400),
            Horizon::unbounded("all"),
            Horizon::new("medium", 86_400),
        ];
        let report = diff_snapshots(&prev, &cur, &peers, &horizons, NOW);
        let labels: Vec<&str> = report.results.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, vec!["narrow", "wide", "all", "medium"]);

        for result in &report.results {
            match result.changed {
                Some(changed) => assert!(changed <= result.total && result.total > 0),
                None => assert_eq!(result.total, 0),
            }
        }

        // wider windows hold supersets of narrower ones
        let mut by_threshold: Vec<&HorizonResult> = report.results.iter().collect();
        by_threshold.sort_by_key(|r| r.threshold);
        for pair in by_threshold.windows(2) {
            assert!(pair[0].total >= pair[1].total);
            assert!(pair[0].changed.unwrap_or(0) >= pair[1].changed.unwrap_or(0));
        }
        assert_eq!(report.results[2].total, 500);
    }
}

/*!
asmap-node-diff measures how much an asmap changed between two versions, from the point of
view of the peers a node knows about.

Given a node address file (the output of `getnodeaddresses 0`) and two asmap files, every
IPv4/IPv6 peer is normalized into a lookup prefix, classified by both asmaps, and counted per
recency horizon (`all`, `last week`, `last day`, `last hour` by default):

```text
horizon=all, total=3, changed=1, share=33.3%
horizon=last week, total=3, changed=1, share=33.3%
horizon=last day, total=0
```

# Example

```no_run
use asmap_node_diff::diff::diff_snapshots;
use asmap_node_diff::formats::format_report;
use asmap_node_diff::models::Horizon;
use asmap_node_diff::parser::{load_asmap, load_peers};
use std::path::Path;

let peers = load_peers(Path::new("nodes.json")).unwrap();
let prev = load_asmap(Path::new("asmap-2024.dat")).unwrap();
let cur = load_asmap(Path::new("asmap-2025.dat")).unwrap();

let now = chrono::Utc::now().timestamp();
let report = diff_snapshots(&prev, &cur, &peers, &Horizon::defaults(), now);
println!("{}", format_report(&report.results));
```

Both binary asmap files and text asmap files (`<prefix> AS<number>` per line) are accepted,
optionally compressed with gzip or bzip2.
*/

pub mod diff;
pub mod error;
pub mod formats;
pub mod io;
pub mod models;
pub mod parser;

pub use diff::{diff_snapshots, DiffReport, PeerChange};
pub use error::AsmapDiffError;
pub use parser::{load_asmap, load_peers, AsLookup, AsMap};

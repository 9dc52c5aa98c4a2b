/*!
Input parsers: node address files and asmap snapshots.
*/
pub mod asmap;
pub mod peers;

pub use asmap::{load_asmap, AsLookup, AsMap, AsmapFormatError, BinaryAsMap, TextAsMap};
pub use peers::{load_peers, parse_peers};

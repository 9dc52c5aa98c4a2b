//! Data structures shared by the peer loader, the asmap codec and the diff engine.

mod horizon;
mod network;
mod peer;

pub use horizon::*;
pub use network::*;
pub use peer::*;

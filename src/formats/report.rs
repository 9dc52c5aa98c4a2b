use crate::diff::PeerChange;
use crate::models::{Asn, HorizonResult};
use itertools::Itertools;
use std::fmt::{Display, Formatter};

impl Display for HorizonResult {
    /// `horizon=<label>, total=<n>[, changed=<n>, share=<pct>%]`
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "horizon={}, total={}", self.label, self.total)?;
        if let (Some(changed), Some(share)) = (self.changed, self.share()) {
            write!(f, ", changed={}, share={:.1}%", changed, 100.0 * share)?;
        }
        Ok(())
    }
}

fn format_asn(asn: Option<Asn>) -> String {
    match asn {
        Some(asn) => asn.to_string(),
        None => "unknown".to_string(),
    }
}

impl Display for PeerChange {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "changed: {} {} -> {}",
            self.address,
            format_asn(self.previous),
            format_asn(self.current)
        )
    }
}

/// One line per horizon, in result order.
pub fn format_report(results: &[HorizonResult]) -> String {
    results.iter().map(|r| r.to_string()).join("\n")
}

/// One line per changed peer.
pub fn format_changes(changes: &[PeerChange]) -> String {
    changes.iter().map(|c| c.to_string()).join("\n")
}

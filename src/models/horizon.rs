use crate::error::AsmapDiffError;
use std::str::FromStr;

const MINUTE: i64 = 60;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;
const WEEK: i64 = 7 * DAY;

/// A named recency window.
///
/// A peer belongs to a horizon when its `last_seen` is at or after the horizon's threshold.
/// `span: None` means no lower bound (threshold `0`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Horizon {
    pub label: String,
    pub span: Option<i64>,
}

impl Horizon {
    pub fn new(label: &str, span: i64) -> Horizon {
        Horizon {
            label: label.to_string(),
            span: Some(span),
        }
    }

    pub fn unbounded(label: &str) -> Horizon {
        Horizon {
            label: label.to_string(),
            span: None,
        }
    }

    /// The default horizon set, widest first.
    pub fn defaults() -> Vec<Horizon> {
        vec![
            Horizon::unbounded("all"),
            Horizon::new("last week", WEEK),
            Horizon::new("last day", DAY),
            Horizon::new("last hour", HOUR),
        ]
    }

    /// Minimum `last_seen` for membership, relative to `reference_time`.
    pub fn threshold(&self, reference_time: i64) -> i64 {
        match self.span {
            None => 0,
            Some(span) => reference_time.saturating_sub(span),
        }
    }
}

/// Parses a duration such as `90`, `30m`, `1d12h` or `2weeks` into seconds.
///
/// A bare integer counts seconds; anything else goes through [humantime::parse_duration].
/// `all` and `0` both mean "no lower bound" and yield `None`.
fn parse_span(s: &str) -> Option<Option<i64>> {
    if s == "all" {
        return Some(None);
    }
    let secs = match s.bytes().all(|b| b.is_ascii_digit()) {
        true => s.parse::<u64>().ok()?,
        false => humantime::parse_duration(s).ok()?.as_secs(),
    };
    match i64::try_from(secs).ok()? {
        0 => Some(None),
        v => Some(Some(v)),
    }
}

impl FromStr for Horizon {
    type Err = AsmapDiffError;

    /// Parses `LABEL=DURATION`, e.g. `last month=30d`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (label, span) = s
            .rsplit_once('=')
            .ok_or_else(|| AsmapDiffError::InvalidHorizon(s.to_string()))?;
        let label = label.trim();
        if label.is_empty() {
            return Err(AsmapDiffError::InvalidHorizon(s.to_string()));
        }
        let span =
            parse_span(span.trim()).ok_or_else(|| AsmapDiffError::InvalidHorizon(s.to_string()))?;
        Ok(Horizon {
            label: label.to_string(),
            span,
        })
    }
}

/// Change statistics of one horizon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HorizonResult {
    pub label: String,
    pub threshold: i64,
    pub total: usize,
    /// Peers whose AS classification differs. `None` exactly when `total == 0`.
    pub changed: Option<usize>,
}

impl HorizonResult {
    pub fn new(label: &str, threshold: i64, total: usize, changed: usize) -> HorizonResult {
        HorizonResult {
            label: label.to_string(),
            threshold,
            total,
            changed: (total > 0).then_some(changed),
        }
    }

    /// Fraction of peers in this horizon whose classification changed.
    pub fn share(&self) -> Option<f64> {
        self.changed.map(|c| c as f64 / self.total as f64)
    }
}

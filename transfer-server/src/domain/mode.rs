//! Path search optimization modes.

use serde::{Deserialize, Serialize};

/// What the path search optimizes for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptimizeMode {
    /// Minimise cumulative effective ratio cost (points lost per point
    /// delivered).
    Value,
    /// Minimise cumulative transfer time.
    Time,
    /// Minimise the number of transfer steps.
    Hops,
}

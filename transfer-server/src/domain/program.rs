//! Loyalty program types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a loyalty program.
///
/// Program ids are assigned by the reference-data store; this service
/// only ever looks them up.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ProgramId(pub i64);

impl fmt::Display for ProgramId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A loyalty program: immutable reference data, read-only to this service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
    pub id: ProgramId,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_the_raw_id() {
        assert_eq!(ProgramId(42).to_string(), "42");
    }

    #[test]
    fn serializes_transparently() {
        assert_eq!(serde_json::to_string(&ProgramId(7)).unwrap(), "7");
        let id: ProgramId = serde_json::from_str("7").unwrap();
        assert_eq!(id, ProgramId(7));
    }
}

//! Transfer edge type.

use serde::{Deserialize, Serialize};

use super::program::ProgramId;
use super::ratio::{BonusTerms, Ratio};

/// A directed transfer rule between two programs.
///
/// Read-only reference data, fetched fresh for each query. The `ratio`
/// field keeps the raw "A:B" string for display;
/// [`TransferEdge::parsed_ratio`] parses it on demand with the lenient
/// parity fallback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferEdge {
    pub from_program_id: ProgramId,
    pub to_program_id: ProgramId,
    pub ratio: String,
    pub transfer_time_hours: f64,
    #[serde(default)]
    pub bonus_threshold: Option<u64>,
    #[serde(default)]
    pub bonus_amount: Option<u64>,
    #[serde(default)]
    pub bonus_applies: bool,
}

impl TransferEdge {
    /// The parsed transfer ratio.
    pub fn parsed_ratio(&self) -> Ratio {
        Ratio::parse(&self.ratio)
    }

    /// Active bonus terms, if any.
    ///
    /// Returns `Some` only when `bonus_applies` is set and both threshold
    /// and amount are present and positive. Otherwise the bonus columns
    /// are ignored entirely.
    pub fn bonus(&self) -> Option<BonusTerms> {
        if !self.bonus_applies {
            return None;
        }
        match (self.bonus_threshold, self.bonus_amount) {
            (Some(threshold), Some(amount)) if threshold > 0 && amount > 0 => {
                Some(BonusTerms { threshold, amount })
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge() -> TransferEdge {
        TransferEdge {
            from_program_id: ProgramId(1),
            to_program_id: ProgramId(2),
            ratio: "2:1".to_string(),
            transfer_time_hours: 24.0,
            bonus_threshold: None,
            bonus_amount: None,
            bonus_applies: false,
        }
    }

    #[test]
    fn bonus_requires_the_gate_flag() {
        let mut e = edge();
        e.bonus_threshold = Some(1000);
        e.bonus_amount = Some(200);
        assert_eq!(e.bonus(), None);

        e.bonus_applies = true;
        assert_eq!(
            e.bonus(),
            Some(BonusTerms {
                threshold: 1000,
                amount: 200
            })
        );
    }

    #[test]
    fn bonus_requires_both_terms_positive() {
        let mut e = edge();
        e.bonus_applies = true;

        e.bonus_threshold = Some(1000);
        e.bonus_amount = None;
        assert_eq!(e.bonus(), None);

        e.bonus_threshold = None;
        e.bonus_amount = Some(200);
        assert_eq!(e.bonus(), None);

        e.bonus_threshold = Some(0);
        e.bonus_amount = Some(200);
        assert_eq!(e.bonus(), None);

        e.bonus_threshold = Some(1000);
        e.bonus_amount = Some(0);
        assert_eq!(e.bonus(), None);
    }

    #[test]
    fn deserializes_without_bonus_columns() {
        let e: TransferEdge = serde_json::from_str(
            r#"{
                "from_program_id": 1,
                "to_program_id": 2,
                "ratio": "1:1",
                "transfer_time_hours": 24
            }"#,
        )
        .unwrap();
        assert!(!e.bonus_applies);
        assert_eq!(e.bonus(), None);
    }
}

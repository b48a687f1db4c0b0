//! Filing status and federal tax brackets

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{TreasureError, TreasureResult};

/// Federal filing status, decided by household size alone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FilingStatus {
    Individual,
    Joint,
}

impl FilingStatus {
    /// Individual for a household of one, joint otherwise
    pub fn for_household(household_size: u32) -> Self {
        if household_size == 1 {
            Self::Individual
        } else {
            Self::Joint
        }
    }
}

impl fmt::Display for FilingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Individual => f.pad("Individual"),
            Self::Joint => f.pad("Joint"),
        }
    }
}

/// One marginal bracket; `upper` is `None` for the top bracket
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TaxBracket {
    pub lower: f64,
    pub upper: Option<f64>,
    pub rate: f64,
}

impl TaxBracket {
    pub fn new(lower: f64, upper: Option<f64>, rate: f64) -> Self {
        Self { lower, upper, rate }
    }

    /// Tax owed on the part of `taxable` that falls inside this bracket
    pub fn tax_on(&self, taxable: f64) -> f64 {
        if taxable <= self.lower {
            return 0.0;
        }
        let top = self.upper.map_or(taxable, |upper| taxable.min(upper));
        (top - self.lower) * self.rate
    }
}

/// Ascending brackets partitioning [0, ∞) for one filing status
#[derive(Debug, Clone, PartialEq)]
pub struct BracketSchedule {
    brackets: Vec<TaxBracket>,
}

impl BracketSchedule {
    /// Validate and wrap a list of brackets
    ///
    /// The first bracket must start at zero, each bracket must start where
    /// the previous one ended, bounds must strictly increase, and only the
    /// last bracket may be unbounded (it must be).
    pub fn new(brackets: Vec<TaxBracket>) -> TreasureResult<Self> {
        let first = brackets
            .first()
            .ok_or_else(|| TreasureError::Dataset("Tax bracket list is empty".into()))?;
        if first.lower != 0.0 {
            return Err(TreasureError::Dataset(format!(
                "First tax bracket must start at 0, found {}",
                first.lower
            )));
        }

        for (i, bracket) in brackets.iter().enumerate() {
            if !(0.0..=1.0).contains(&bracket.rate) {
                return Err(TreasureError::Dataset(format!(
                    "Tax bracket starting at {} has rate {} outside [0, 1]",
                    bracket.lower, bracket.rate
                )));
            }

            let is_last = i == brackets.len() - 1;
            match (bracket.upper, is_last) {
                (None, true) => {}
                (None, false) => {
                    return Err(TreasureError::Dataset(format!(
                        "Only the last tax bracket may be unbounded (bracket starting at {})",
                        bracket.lower
                    )))
                }
                (Some(_), true) => {
                    return Err(TreasureError::Dataset(
                        "The last tax bracket must be unbounded".into(),
                    ))
                }
                (Some(upper), false) => {
                    if upper <= bracket.lower {
                        return Err(TreasureError::Dataset(format!(
                            "Tax bracket [{}, {}] has non-increasing bounds",
                            bracket.lower, upper
                        )));
                    }
                    let next = brackets[i + 1].lower;
                    if next != upper {
                        return Err(TreasureError::Dataset(format!(
                            "Tax brackets must be contiguous: {} is followed by a bracket starting at {}",
                            upper, next
                        )));
                    }
                }
            }
        }

        Ok(Self { brackets })
    }

    pub fn brackets(&self) -> &[TaxBracket] {
        &self.brackets
    }

    /// Progressive tax on a non-negative taxable income
    pub fn tax_on(&self, taxable: f64) -> f64 {
        self.brackets
            .iter()
            .take_while(|bracket| taxable > bracket.lower)
            .map(|bracket| bracket.tax_on(taxable))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn individual_2023() -> BracketSchedule {
        BracketSchedule::new(vec![
            TaxBracket::new(0.0, Some(11000.0), 0.10),
            TaxBracket::new(11000.0, Some(44725.0), 0.12),
            TaxBracket::new(44725.0, Some(95375.0), 0.22),
            TaxBracket::new(95375.0, None, 0.24),
        ])
        .unwrap()
    }

    #[test]
    fn test_filing_status_for_household() {
        assert_eq!(FilingStatus::for_household(1), FilingStatus::Individual);
        assert_eq!(FilingStatus::for_household(2), FilingStatus::Joint);
        assert_eq!(FilingStatus::for_household(7), FilingStatus::Joint);
    }

    #[test]
    fn test_bracket_tax_on() {
        let bracket = TaxBracket::new(11000.0, Some(44725.0), 0.12);
        assert_eq!(bracket.tax_on(5000.0), 0.0);
        assert!((bracket.tax_on(21000.0) - 1200.0).abs() < 1e-9);
        assert!((bracket.tax_on(100000.0) - 4047.0).abs() < 1e-9);
    }

    #[test]
    fn test_schedule_tax_on() {
        let schedule = individual_2023();
        assert!((schedule.tax_on(50000.0) - 6307.5).abs() < 1e-6);
        assert_eq!(schedule.tax_on(0.0), 0.0);
    }

    #[test]
    fn test_unbounded_top_bracket() {
        let schedule = individual_2023();
        let expected = 1100.0 + 4047.0 + 11143.0 + (100000.0 - 95375.0) * 0.24;
        assert!((schedule.tax_on(100000.0) - expected).abs() < 1e-6);
    }

    #[test]
    fn test_rejects_gap() {
        let err = BracketSchedule::new(vec![
            TaxBracket::new(0.0, Some(10000.0), 0.10),
            TaxBracket::new(12000.0, None, 0.12),
        ])
        .unwrap_err();
        assert!(err.to_string().contains("contiguous"));
    }

    #[test]
    fn test_rejects_bounded_last_bracket() {
        assert!(BracketSchedule::new(vec![TaxBracket::new(0.0, Some(10000.0), 0.10)]).is_err());
    }

    #[test]
    fn test_rejects_nonzero_start() {
        assert!(BracketSchedule::new(vec![TaxBracket::new(100.0, None, 0.10)]).is_err());
    }

    #[test]
    fn test_rejects_empty() {
        assert!(BracketSchedule::new(Vec::new()).is_err());
    }
}

//! Tax and demographic dataset
//!
//! Holds the published figures the budget-target calculator works from:
//! household income by percentile, the poverty-line formula, federal
//! brackets and standard deductions per filing status, FICA and a flat
//! state income tax rate.

pub mod loader;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{TreasureError, TreasureResult};
use crate::models::{BracketSchedule, FilingStatus};

pub use loader::load_dataset;

/// Social security and Medicare withholding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FicaRates {
    #[serde(rename = "socSecRate")]
    pub soc_sec_rate: f64,
    #[serde(rename = "socSecMaxIncome")]
    pub soc_sec_max_income: f64,
    #[serde(rename = "medicareRate")]
    pub medicare_rate: f64,
}

/// Medicare surtax on income above a threshold
///
/// Disabled unless the dataset turns it on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdditionalMedicare {
    #[serde(default)]
    pub enabled: bool,
    pub threshold: f64,
    pub rate: f64,
}

/// Standard deduction per filing status
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Deductions {
    #[serde(rename = "INDIVIDUAL")]
    pub individual: f64,
    #[serde(rename = "JOINT")]
    pub joint: f64,
}

impl Deductions {
    pub fn for_status(&self, status: FilingStatus) -> f64 {
        match status {
            FilingStatus::Individual => self.individual,
            FilingStatus::Joint => self.joint,
        }
    }
}

/// Everything the calculator needs, already validated
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    /// Unscaled household income keyed by percentile (1..=99)
    pub income_by_percentile: BTreeMap<i32, f64>,
    pub poverty_line_base: f64,
    pub poverty_line_per_person: f64,
    pub avg_household_size: f64,
    pub individual_brackets: BracketSchedule,
    pub joint_brackets: BracketSchedule,
    pub state_income_tax_rate: f64,
    pub fica: FicaRates,
    pub additional_medicare: Option<AdditionalMedicare>,
    pub deductions: Deductions,
}

impl Dataset {
    /// Income at a percentile
    pub fn income_at(&self, percentile: i32) -> TreasureResult<f64> {
        self.income_by_percentile
            .get(&percentile)
            .copied()
            .ok_or_else(|| TreasureError::percentile_not_found(percentile))
    }

    pub fn brackets(&self, status: FilingStatus) -> &BracketSchedule {
        match status {
            FilingStatus::Individual => &self.individual_brackets,
            FilingStatus::Joint => &self.joint_brackets,
        }
    }

    pub fn deduction(&self, status: FilingStatus) -> f64 {
        self.deductions.for_status(status)
    }

    /// Income of the reference household the percentile table describes
    pub fn reference_household_income(&self) -> f64 {
        self.poverty_line_base + self.poverty_line_per_person * self.avg_household_size
    }

    /// The additional Medicare surtax, if the dataset enables it
    pub fn active_additional_medicare(&self) -> Option<&AdditionalMedicare> {
        self.additional_medicare.as_ref().filter(|am| am.enabled)
    }

    /// Check the invariants bracket validation does not cover
    pub fn validate(&self) -> TreasureResult<()> {
        if let Some((&p, _)) = self
            .income_by_percentile
            .iter()
            .find(|(p, _)| !(1..=99).contains(*p))
        {
            return Err(TreasureError::Dataset(format!(
                "Income percentiles must be between 1 and 99, found {}",
                p
            )));
        }

        if let Some((p, income)) = self
            .income_by_percentile
            .iter()
            .find(|(_, v)| !is_amount(**v))
        {
            return Err(TreasureError::Dataset(format!(
                "Income at percentile {} must be a finite non-negative number, found {}",
                p, income
            )));
        }

        let amounts = [
            ("poverty line base", self.poverty_line_base),
            ("poverty line per person", self.poverty_line_per_person),
            ("social security maximum income", self.fica.soc_sec_max_income),
            ("individual standard deduction", self.deductions.individual),
            ("joint standard deduction", self.deductions.joint),
        ];
        for (label, value) in amounts {
            if !is_amount(value) {
                return Err(TreasureError::Dataset(format!(
                    "The {} must be a finite non-negative number, found {}",
                    label, value
                )));
            }
        }

        if !(self.avg_household_size.is_finite() && self.avg_household_size > 0.0) {
            return Err(TreasureError::Dataset(format!(
                "Average household size must be positive, found {}",
                self.avg_household_size
            )));
        }

        if self.reference_household_income() <= 0.0 {
            return Err(TreasureError::Dataset(
                "Reference household income must be positive".into(),
            ));
        }

        let rates = [
            ("state income tax rate", self.state_income_tax_rate),
            ("social security rate", self.fica.soc_sec_rate),
            ("medicare rate", self.fica.medicare_rate),
        ];
        for (label, rate) in rates {
            if !(0.0..=1.0).contains(&rate) {
                return Err(TreasureError::Dataset(format!(
                    "The {} must be within [0, 1], found {}",
                    label, rate
                )));
            }
        }

        if let Some(am) = &self.additional_medicare {
            if !(0.0..=1.0).contains(&am.rate) || !is_amount(am.threshold) {
                return Err(TreasureError::Dataset(format!(
                    "Invalid additional Medicare settings: threshold {}, rate {}",
                    am.threshold, am.rate
                )));
            }
        }

        Ok(())
    }
}

/// Finite and not negative; NaN and infinities never pass
fn is_amount(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}


#[cfg(test)]
mod tests {
    use super::fixtures::dataset_2023;
    use super::*;

    #[test]
    fn test_fixture_is_valid() {
        assert!(dataset_2023().validate().is_ok());
    }

    #[test]
    fn test_income_at() {
        let dataset = dataset_2023();
        assert_eq!(dataset.income_at(50).unwrap(), 64021.0);
        assert!(dataset.income_at(75).unwrap_err().is_not_found());
    }

    #[test]
    fn test_reference_household_income() {
        let dataset = dataset_2023();
        assert!((dataset.reference_household_income() - 18706.4).abs() < 1e-9);
    }

    #[test]
    fn test_rejects_out_of_range_percentile() {
        let mut dataset = dataset_2023();
        dataset.income_by_percentile.insert(100, 1.0);
        assert!(dataset.validate().is_err());
    }

    #[test]
    fn test_rejects_bad_rate() {
        let mut dataset = dataset_2023();
        dataset.state_income_tax_rate = 3.4;
        assert!(dataset.validate().is_err());
    }

    #[test]
    fn test_rejects_non_finite_income() {
        for bad in [f64::NAN, f64::INFINITY, -1.0] {
            let mut dataset = dataset_2023();
            dataset.income_by_percentile.insert(50, bad);
            let err = dataset.validate().unwrap_err();
            assert!(err.to_string().contains("percentile 50"), "{bad}");
        }
    }

    #[test]
    fn test_rejects_non_finite_figures() {
        let corruptions: [fn(&mut Dataset); 7] = [
            |d| d.poverty_line_base = f64::NAN,
            |d| d.poverty_line_per_person = f64::INFINITY,
            |d| d.avg_household_size = f64::NAN,
            |d| d.fica.soc_sec_max_income = f64::NAN,
            |d| d.deductions.individual = f64::NEG_INFINITY,
            |d| d.deductions.joint = f64::NAN,
            |d| {
                d.additional_medicare = Some(AdditionalMedicare {
                    enabled: true,
                    threshold: f64::NAN,
                    rate: 0.009,
                })
            },
        ];

        for (i, corrupt) in corruptions.iter().enumerate() {
            let mut dataset = dataset_2023();
            corrupt(&mut dataset);
            assert!(dataset.validate().is_err(), "corruption {i} was accepted");
        }
    }

    #[test]
    fn test_additional_medicare_disabled_by_default() {
        let mut dataset = dataset_2023();
        dataset.additional_medicare = Some(AdditionalMedicare {
            enabled: false,
            threshold: 200000.0,
            rate: 0.009,
        });
        assert!(dataset.active_additional_medicare().is_none());
    }
}

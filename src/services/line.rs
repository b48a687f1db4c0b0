//! Budget-target ("line") calculator
//!
//! Derives a monthly spending ceiling from household size and a target
//! income percentile:
//!
//! 1. scale the percentile's income to the household using the poverty
//!    line as the reference curve, rounded to whole dollars
//!    (ties to even);
//! 2. subtract the standard deduction for the filing status;
//! 3. apply the progressive federal brackets;
//! 4. subtract FICA and a flat state tax.
//!
//! The annual result divided by twelve is the monthly line.

use serde::Serialize;

use crate::dataset::Dataset;
use crate::error::{TreasureError, TreasureResult};
use crate::models::FilingStatus;

/// Every intermediate figure of a line computation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineBreakdown {
    pub household_size: u32,
    pub percentile: u32,
    pub filing_status: FilingStatus,
    pub scaled_gross_income: f64,
    pub federal_taxable_income: f64,
    pub federal_income_tax: f64,
    pub fica_tax: f64,
    pub state_tax: f64,
    pub annual_line: f64,
    pub monthly_line: f64,
}

/// Computes the line from a dataset
pub struct LineCalculator<'a> {
    dataset: &'a Dataset,
}

impl<'a> LineCalculator<'a> {
    pub fn new(dataset: &'a Dataset) -> Self {
        Self { dataset }
    }

    /// Monthly spending target: the annual line divided by twelve
    pub fn compute_monthly_target(
        &self,
        household_size: i32,
        percentile: i32,
    ) -> TreasureResult<f64> {
        Ok(self.compute_annual_line(household_size, percentile)? / 12.0)
    }

    /// Income left after federal, FICA and state taxes
    pub fn compute_annual_line(
        &self,
        household_size: i32,
        percentile: i32,
    ) -> TreasureResult<f64> {
        Ok(self.breakdown(household_size, percentile)?.annual_line)
    }

    /// Run all stages and keep each intermediate value
    pub fn breakdown(
        &self,
        household_size: i32,
        percentile: i32,
    ) -> TreasureResult<LineBreakdown> {
        let (household_size, percentile) = validate_inputs(household_size, percentile)?;
        let filing_status = FilingStatus::for_household(household_size);

        let scaled_gross_income = self.scaled_income(household_size, percentile)?;
        let federal_taxable_income =
            self.federal_taxable_income(scaled_gross_income, filing_status)?;
        let federal_income_tax = self.federal_income_tax(federal_taxable_income, filing_status)?;
        let fica_tax = self.fica_tax(scaled_gross_income)?;
        let state_tax = self.state_tax(scaled_gross_income)?;

        let annual_line = scaled_gross_income - federal_income_tax - fica_tax - state_tax;

        tracing::debug!(
            household_size,
            percentile,
            %filing_status,
            scaled_gross_income,
            annual_line,
            "Computed line"
        );

        Ok(LineBreakdown {
            household_size,
            percentile,
            filing_status,
            scaled_gross_income,
            federal_taxable_income,
            federal_income_tax,
            fica_tax,
            state_tax,
            annual_line,
            monthly_line: annual_line / 12.0,
        })
    }

    /// Gross income of the household at the percentile, in whole dollars
    ///
    /// The percentile table describes an average-sized household; the
    /// income is scaled by the ratio of this household's poverty line to
    /// the reference household's. Halves round to the nearest even dollar.
    pub fn scaled_income(&self, household_size: u32, percentile: u32) -> TreasureResult<f64> {
        let unscaled = self.dataset.income_at(percentile as i32)?;
        ensure_non_negative("Percentile income", unscaled)?;
        let scale = unscaled / self.dataset.reference_household_income();
        let household_poverty_line = self.dataset.poverty_line_base
            + self.dataset.poverty_line_per_person * f64::from(household_size);

        let scaled = (household_poverty_line * scale).round_ties_even();
        ensure_non_negative("Scaled income", scaled)?;
        Ok(scaled)
    }

    /// Gross income less the standard deduction, floored at zero
    pub fn federal_taxable_income(
        &self,
        gross_income: f64,
        filing_status: FilingStatus,
    ) -> TreasureResult<f64> {
        ensure_non_negative("Gross income", gross_income)?;
        Ok((gross_income - self.dataset.deduction(filing_status)).max(0.0))
    }

    /// Progressive federal tax on taxable income
    pub fn federal_income_tax(
        &self,
        taxable_income: f64,
        filing_status: FilingStatus,
    ) -> TreasureResult<f64> {
        ensure_non_negative("Taxable income", taxable_income)?;
        Ok(self.dataset.brackets(filing_status).tax_on(taxable_income))
    }

    /// Social security (capped) plus Medicare
    ///
    /// The additional Medicare surtax is included only when the dataset
    /// enables it.
    pub fn fica_tax(&self, gross_income: f64) -> TreasureResult<f64> {
        ensure_non_negative("Gross income", gross_income)?;
        let fica = &self.dataset.fica;

        let social_security = gross_income.min(fica.soc_sec_max_income) * fica.soc_sec_rate;
        let medicare = gross_income * fica.medicare_rate;
        let additional_medicare = self
            .dataset
            .active_additional_medicare()
            .map_or(0.0, |am| (gross_income - am.threshold).max(0.0) * am.rate);

        Ok(social_security + medicare + additional_medicare)
    }

    /// Flat state income tax
    pub fn state_tax(&self, gross_income: f64) -> TreasureResult<f64> {
        ensure_non_negative("Gross income", gross_income)?;
        Ok(gross_income * self.dataset.state_income_tax_rate)
    }
}

fn validate_inputs(household_size: i32, percentile: i32) -> TreasureResult<(u32, u32)> {
    if household_size < 1 {
        return Err(TreasureError::InvalidInput(format!(
            "household size must be positive, got {}",
            household_size
        )));
    }
    if !(1..=99).contains(&percentile) {
        return Err(TreasureError::InvalidInput(format!(
            "percentile out of range: {} is not between 1 and 99",
            percentile
        )));
    }
    Ok((household_size as u32, percentile as u32))
}

fn ensure_non_negative(label: &str, value: f64) -> TreasureResult<()> {
    if !(value.is_finite() && value >= 0.0) {
        return Err(TreasureError::InvalidInput(format!(
            "{} must be finite and non-negative, got {}",
            label, value
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::fixtures::dataset_2023;
    use crate::dataset::AdditionalMedicare;
    use std::collections::BTreeMap;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-6,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_scaled_income_reference_example() {
        let dataset = dataset_2023();
        let calculator = LineCalculator::new(&dataset);
        assert_eq!(calculator.scaled_income(4, 50).unwrap(), 85903.0);
    }

    #[test]
    fn test_scaled_income_rounds_half_to_even() {
        let mut dataset = dataset_2023();
        dataset.poverty_line_base = 1.0;
        dataset.poverty_line_per_person = 0.0;
        dataset.avg_household_size = 1.0;
        dataset.income_by_percentile = BTreeMap::from([(10, 2.5), (20, 3.5), (30, 3.6)]);
        let calculator = LineCalculator::new(&dataset);

        assert_eq!(calculator.scaled_income(1, 10).unwrap(), 2.0);
        assert_eq!(calculator.scaled_income(1, 20).unwrap(), 4.0);
        assert_eq!(calculator.scaled_income(1, 30).unwrap(), 4.0);
    }

    #[test]
    fn test_taxable_income_individual() {
        let dataset = dataset_2023();
        let calculator = LineCalculator::new(&dataset);
        let status = FilingStatus::Individual;

        assert_eq!(calculator.federal_taxable_income(10000.0, status).unwrap(), 0.0);
        assert_eq!(calculator.federal_taxable_income(13850.0, status).unwrap(), 0.0);
        assert_eq!(calculator.federal_taxable_income(20000.0, status).unwrap(), 6150.0);
    }

    #[test]
    fn test_taxable_income_joint() {
        let dataset = dataset_2023();
        let calculator = LineCalculator::new(&dataset);
        assert_eq!(
            calculator
                .federal_taxable_income(30000.0, FilingStatus::Joint)
                .unwrap(),
            2300.0
        );
    }

    #[test]
    fn test_taxable_income_rejects_negative_gross() {
        let dataset = dataset_2023();
        let calculator = LineCalculator::new(&dataset);
        let err = calculator
            .federal_taxable_income(-1.0, FilingStatus::Joint)
            .unwrap_err();
        assert!(matches!(err, TreasureError::InvalidInput(_)));
    }

    #[test]
    fn test_non_finite_inputs_are_rejected() {
        let dataset = dataset_2023();
        let calculator = LineCalculator::new(&dataset);
        let status = FilingStatus::Individual;

        for bad in [f64::NAN, f64::INFINITY] {
            assert!(calculator.federal_taxable_income(bad, status).is_err());
            assert!(calculator.federal_income_tax(bad, status).is_err());
            assert!(calculator.fica_tax(bad).is_err());
            assert!(calculator.state_tax(bad).is_err());
        }
    }

    #[test]
    fn test_nan_income_in_dataset_is_an_error() {
        let mut dataset = dataset_2023();
        dataset.income_by_percentile.insert(50, f64::NAN);
        let calculator = LineCalculator::new(&dataset);

        let err = calculator.compute_monthly_target(1, 50).unwrap_err();
        assert!(matches!(err, TreasureError::InvalidInput(_)));
    }

    #[test]
    fn test_federal_income_tax() {
        let dataset = dataset_2023();
        let calculator = LineCalculator::new(&dataset);
        let individual = FilingStatus::Individual;

        assert_close(calculator.federal_income_tax(0.0, individual).unwrap(), 0.0);
        assert_close(calculator.federal_income_tax(10000.0, individual).unwrap(), 1000.0);
        assert_close(calculator.federal_income_tax(50000.0, individual).unwrap(), 6307.5);
        assert_close(calculator.federal_income_tax(200000.0, individual).unwrap(), 42832.0);
        assert_close(
            calculator
                .federal_income_tax(50000.0, FilingStatus::Joint)
                .unwrap(),
            5560.0,
        );
        assert!(calculator.federal_income_tax(-1000.0, individual).is_err());
    }

    #[test]
    fn test_federal_income_tax_is_continuous_and_non_decreasing() {
        let dataset = dataset_2023();
        let calculator = LineCalculator::new(&dataset);
        let status = FilingStatus::Individual;

        let mut previous = 0.0;
        for step in 0..=700 {
            let income = f64::from(step) * 1000.0;
            let tax = calculator.federal_income_tax(income, status).unwrap();
            assert!(tax >= previous);
            // at most the top marginal rate per 1000 step
            assert!(tax - previous <= 370.0 + 1e-6);
            previous = tax;
        }

        for boundary in [11000.0, 44725.0, 95375.0, 578125.0] {
            let below = calculator.federal_income_tax(boundary - 0.01, status).unwrap();
            let at = calculator.federal_income_tax(boundary, status).unwrap();
            assert!((at - below).abs() < 0.01);
        }
    }

    #[test]
    fn test_fica() {
        let dataset = dataset_2023();
        let calculator = LineCalculator::new(&dataset);

        assert_close(calculator.fica_tax(0.0).unwrap(), 0.0);
        assert_close(calculator.fica_tax(160200.0).unwrap(), 12255.3);
        assert_close(calculator.fica_tax(200000.0).unwrap(), 12832.4);
    }

    #[test]
    fn test_social_security_stops_growing_at_cap() {
        let dataset = dataset_2023();
        let calculator = LineCalculator::new(&dataset);
        let medicare = |gross: f64| gross * 0.0145;

        let at_cap = calculator.fica_tax(160200.0).unwrap() - medicare(160200.0);
        assert_close(at_cap, 160200.0 * 0.062);

        let above_cap = calculator.fica_tax(300000.0).unwrap() - medicare(300000.0);
        assert_close(above_cap, at_cap);
    }

    #[test]
    fn test_additional_medicare_when_enabled() {
        let mut dataset = dataset_2023();
        dataset.additional_medicare = Some(AdditionalMedicare {
            enabled: true,
            threshold: 200000.0,
            rate: 0.009,
        });
        let calculator = LineCalculator::new(&dataset);

        assert_close(calculator.fica_tax(200000.0).unwrap(), 12832.4);
        assert_close(calculator.fica_tax(300000.0).unwrap(), 9932.4 + 4350.0 + 900.0);
    }

    #[test]
    fn test_state_tax() {
        let dataset = dataset_2023();
        let calculator = LineCalculator::new(&dataset);
        assert_close(calculator.state_tax(0.0).unwrap(), 0.0);
        assert_close(calculator.state_tax(100000.0).unwrap(), 3400.0);
    }

    #[test]
    fn test_annual_line() {
        let dataset = dataset_2023();
        let calculator = LineCalculator::new(&dataset);

        assert_close(calculator.compute_annual_line(1, 50).unwrap(), 33853.186);
        assert_close(calculator.compute_annual_line(2, 50).unwrap(), 47112.2435);
        assert_close(calculator.compute_annual_line(1, 25).unwrap(), 16755.7755);
        assert_close(calculator.compute_annual_line(2, 25).unwrap(), 23480.1315);
        assert_close(calculator.compute_annual_line(4, 50).unwrap(), 69866.3585);
    }

    #[test]
    fn test_monthly_target_is_annual_over_twelve() {
        let dataset = dataset_2023();
        let calculator = LineCalculator::new(&dataset);

        for (household_size, percentile) in [(1, 50), (2, 50), (1, 25), (3, 25), (6, 50)] {
            let annual = calculator
                .compute_annual_line(household_size, percentile)
                .unwrap();
            let monthly = calculator
                .compute_monthly_target(household_size, percentile)
                .unwrap();
            assert_eq!(monthly, annual / 12.0);
        }
    }

    #[test]
    fn test_breakdown() {
        let dataset = dataset_2023();
        let calculator = LineCalculator::new(&dataset);
        let breakdown = calculator.breakdown(2, 25).unwrap();

        assert_eq!(breakdown.filing_status, FilingStatus::Joint);
        assert_eq!(breakdown.scaled_gross_income, 26397.0);
        assert_eq!(breakdown.federal_taxable_income, 0.0);
        assert_eq!(breakdown.federal_income_tax, 0.0);
        assert_close(breakdown.fica_tax, 2019.3705);
        assert_close(breakdown.state_tax, 897.498);
        assert_close(breakdown.monthly_line, 1956.677625);
    }

    #[test]
    fn test_invalid_household_size() {
        let dataset = dataset_2023();
        let calculator = LineCalculator::new(&dataset);

        for household_size in [0, -1] {
            let err = calculator
                .compute_annual_line(household_size, 50)
                .unwrap_err();
            assert!(err.to_string().contains("household size must be positive"));
        }
    }

    #[test]
    fn test_invalid_percentile() {
        let dataset = dataset_2023();
        let calculator = LineCalculator::new(&dataset);

        for percentile in [0, 100, -5] {
            let err = calculator.compute_monthly_target(1, percentile).unwrap_err();
            assert!(err.to_string().contains("percentile out of range"));
        }
    }

    #[test]
    fn test_percentile_missing_from_dataset() {
        let dataset = dataset_2023();
        let calculator = LineCalculator::new(&dataset);
        assert!(calculator
            .compute_annual_line(1, 75)
            .unwrap_err()
            .is_not_found());
    }
}

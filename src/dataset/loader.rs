//! Loading the dataset from disk
//!
//! A dataset directory holds `numbers.json` plus the CSV tables it points
//! at. Relative CSV paths are resolved against the directory itself.
//!
//! ```text
//! flp/
//!   numbers.json         scalar figures and bracket file names
//!   income_data.csv      percentile,income
//!   brackets_individual.csv, brackets_joint.csv   lower,upper,rate
//! ```

use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::{AdditionalMedicare, Dataset, Deductions, FicaRates};
use crate::error::{TreasureError, TreasureResult};
use crate::models::{BracketSchedule, TaxBracket};

/// File name of the scalar figures inside a dataset directory
pub const NUMBERS_FILE: &str = "numbers.json";

#[derive(Debug, Deserialize)]
struct NumbersFile {
    poverty: PovertyLine,
    #[serde(rename = "avgHouseholdSize")]
    avg_household_size: f64,
    federal_tax_brackets: BracketFiles,
    state_income_tax_rate: f64,
    fica: FicaRates,
    deductions: Deductions,
    #[serde(default, rename = "additionalMedicare")]
    additional_medicare: Option<AdditionalMedicare>,
    #[serde(default = "default_income_file")]
    income_data: PathBuf,
}

#[derive(Debug, Deserialize)]
struct PovertyLine {
    #[serde(rename = "povLineBase")]
    base: f64,
    #[serde(rename = "povLinePerPerson")]
    per_person: f64,
}

#[derive(Debug, Deserialize)]
struct BracketFiles {
    #[serde(rename = "INDIVIDUAL")]
    individual: PathBuf,
    #[serde(rename = "JOINT")]
    joint: PathBuf,
}

#[derive(Debug, Deserialize)]
struct IncomeRow {
    percentile: i32,
    income: f64,
}

#[derive(Debug, Deserialize)]
struct BracketRow {
    lower: f64,
    upper: Option<f64>,
    rate: f64,
}

fn default_income_file() -> PathBuf {
    PathBuf::from("income_data.csv")
}

/// Load and validate the dataset stored in `dir`
pub fn load_dataset(dir: &Path) -> TreasureResult<Dataset> {
    let numbers_path = dir.join(NUMBERS_FILE);
    let numbers = read_numbers(&numbers_path)?;

    let income_by_percentile = read_income_table(&resolve(dir, &numbers.income_data))?;
    let individual_brackets =
        read_brackets(&resolve(dir, &numbers.federal_tax_brackets.individual))?;
    let joint_brackets = read_brackets(&resolve(dir, &numbers.federal_tax_brackets.joint))?;

    let dataset = Dataset {
        income_by_percentile,
        poverty_line_base: numbers.poverty.base,
        poverty_line_per_person: numbers.poverty.per_person,
        avg_household_size: numbers.avg_household_size,
        individual_brackets,
        joint_brackets,
        state_income_tax_rate: numbers.state_income_tax_rate,
        fica: numbers.fica,
        additional_medicare: numbers.additional_medicare,
        deductions: numbers.deductions,
    };
    dataset.validate()?;

    tracing::debug!(
        dir = %dir.display(),
        percentiles = dataset.income_by_percentile.len(),
        "Loaded tax dataset"
    );
    Ok(dataset)
}

fn resolve(dir: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        dir.join(path)
    }
}

fn read_numbers(path: &Path) -> TreasureResult<NumbersFile> {
    if !path.exists() {
        return Err(TreasureError::Dataset(format!(
            "File not found: {}",
            path.display()
        )));
    }

    let file = File::open(path).map_err(|e| {
        TreasureError::Dataset(format!("Failed to open {}: {}", path.display(), e))
    })?;
    serde_json::from_reader(BufReader::new(file))
        .map_err(|e| TreasureError::Dataset(format!("Failed to parse {}: {}", path.display(), e)))
}

fn open_csv(path: &Path) -> TreasureResult<csv::Reader<File>> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| TreasureError::Dataset(format!("Failed to open {}: {}", path.display(), e)))
}

fn read_income_table(path: &Path) -> TreasureResult<BTreeMap<i32, f64>> {
    let mut reader = open_csv(path)?;
    let mut table = BTreeMap::new();

    for (idx, row) in reader.deserialize::<IncomeRow>().enumerate() {
        let row = row.map_err(|e| {
            TreasureError::Dataset(format!("{} row {}: {}", path.display(), idx + 1, e))
        })?;
        if table.insert(row.percentile, row.income).is_some() {
            return Err(TreasureError::Dataset(format!(
                "{}: percentile {} appears more than once",
                path.display(),
                row.percentile
            )));
        }
    }

    Ok(table)
}

fn read_brackets(path: &Path) -> TreasureResult<BracketSchedule> {
    let mut reader = open_csv(path)?;
    let mut brackets = Vec::new();

    for (idx, row) in reader.deserialize::<BracketRow>().enumerate() {
        let row = row.map_err(|e| {
            TreasureError::Dataset(format!("{} row {}: {}", path.display(), idx + 1, e))
        })?;
        brackets.push(TaxBracket::new(row.lower, row.upper, row.rate));
    }

    BracketSchedule::new(brackets)
        .map_err(|e| TreasureError::Dataset(format!("{}: {}", path.display(), e)))
}

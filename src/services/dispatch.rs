//! Matching statement files to rule sets by file-name prefix

use crate::error::{TreasureError, TreasureResult};
use crate::models::RuleSet;

/// The single rule set whose prefix starts `filename`
///
/// No match, or more than one, is a [`TreasureError::Dispatch`].
pub fn dispatch<'a>(filename: &str, rule_sets: &'a [RuleSet]) -> TreasureResult<&'a RuleSet> {
    let matching: Vec<&RuleSet> = rule_sets
        .iter()
        .filter(|rs| filename.starts_with(rs.file_prefix()))
        .collect();

    match matching.as_slice() {
        [single] => Ok(*single),
        [] => Err(TreasureError::Dispatch(format!(
            "No processor prefix matches file: {}",
            filename
        ))),
        several => Err(TreasureError::Dispatch(format!(
            "Multiple processors: {} have prefixes matching file: {}",
            several
                .iter()
                .map(|rs| rs.name())
                .collect::<Vec<_>>()
                .join(", "),
            filename
        ))),
    }
}

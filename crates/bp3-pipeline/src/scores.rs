//! Score extraction from `raw_output.csv`.
use crate::error::PipelineError;
use std::fs::File;
use std::io::Read;
use std::path::Path;

pub const SCORE_COLUMN: &str = "BepiPred-3.0 score";

/// The `BepiPred-3.0 score` column as numbers, one per scored residue.
pub fn read_scores(path: &Path) -> Result<Vec<f64>, PipelineError> {
    let file = File::open(path)
        .map_err(|e| PipelineError::Scores(format!("{}: {e}", path.display())))?;
    read_scores_from_reader(file)
}

pub fn read_scores_from_reader<R: Read>(reader: R) -> Result<Vec<f64>, PipelineError> {
    let mut reader = csv::Reader::from_reader(reader);
    let column = reader
        .headers()?
        .iter()
        .position(|header| header == SCORE_COLUMN)
        .ok_or_else(|| PipelineError::Scores(format!("no `{SCORE_COLUMN}` column")))?;

    reader
        .records()
        .enumerate()
        .map(|(row, record)| {
            let record = record?;
            let cell = record.get(column).unwrap_or_default().trim();
            cell.parse::<f64>().map_err(|_| {
                PipelineError::Scores(format!("row {}: `{cell}` is not a number", row + 1))
            })
        })
        .collect()
}

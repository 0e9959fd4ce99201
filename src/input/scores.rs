use std::io::BufRead;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::input::{InputError, open_maybe_gz};
use crate::model::ScoreMatrix;

/// What to do with `NA` or empty cells when loading a score matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingPolicy {
    Error,
    Drop,
    One,
}

impl FromStr for MissingPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "error" => Ok(MissingPolicy::Error),
            "drop" => Ok(MissingPolicy::Drop),
            "one" => Ok(MissingPolicy::One),
            other => Err(format!(
                "unknown missing-value policy: {other} (use error|drop|one)"
            )),
        }
    }
}

pub fn read_scores(path: &Path, policy: MissingPolicy) -> Result<ScoreMatrix, InputError> {
    let reader = open_maybe_gz(path)?;
    let matrix = parse_scores(reader, policy)?;
    tracing::info!(
        path = %path.display(),
        genes = matrix.n_genes(),
        columns = matrix.n_columns(),
        "loaded score matrix"
    );
    Ok(matrix)
}

/// Header row with a leading gene-id column, then one row per gene. Tab or
/// comma separated, picked from the header line.
pub fn parse_scores<R: BufRead>(
    mut reader: R,
    policy: MissingPolicy,
) -> Result<ScoreMatrix, InputError> {
    let mut buf = String::new();
    let read = reader.read_line(&mut buf)?;
    if read == 0 {
        return Err(InputError::Parse("score file is empty".to_string()));
    }
    let header = buf.trim_end_matches(['\r', '\n']).to_string();
    let delim = if header.contains('\t') { '\t' } else { ',' };
    let header_cols: Vec<&str> = header.split(delim).map(str::trim).collect();
    if header_cols.len() < 2 {
        return Err(InputError::Parse(
            "score file header needs a gene column and at least one score column".to_string(),
        ));
    }
    let columns: Vec<String> = header_cols[1..].iter().map(|s| s.to_string()).collect();

    let mut genes = Vec::new();
    let mut rows = Vec::new();
    let mut dropped = 0usize;
    let mut line_no = 1usize;

    loop {
        buf.clear();
        let read = reader.read_line(&mut buf)?;
        if read == 0 {
            break;
        }
        line_no += 1;
        let line = buf.trim_end_matches(['\r', '\n']);
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split(delim).map(str::trim).collect();
        if fields.len() != columns.len() + 1 {
            return Err(InputError::Parse(format!(
                "score line {} has {} fields, expected {}",
                line_no,
                fields.len(),
                columns.len() + 1
            )));
        }

        let mut row = Vec::with_capacity(columns.len());
        let mut has_missing = false;
        for (col, field) in columns.iter().zip(&fields[1..]) {
            match parse_cell(field) {
                Some(v) => row.push(v),
                None if is_missing(field) => {
                    has_missing = true;
                    match policy {
                        MissingPolicy::Error => {
                            return Err(InputError::InvalidInput(format!(
                                "missing value at line {}, column {}",
                                line_no, col
                            )));
                        }
                        MissingPolicy::One => row.push(1.0),
                        MissingPolicy::Drop => row.push(f64::NAN),
                    }
                }
                None => {
                    return Err(InputError::Parse(format!(
                        "non-numeric value '{}' at line {}, column {}",
                        field, line_no, col
                    )));
                }
            }
        }
        if has_missing && policy == MissingPolicy::Drop {
            dropped += 1;
            continue;
        }
        genes.push(fields[0].to_string());
        rows.push(row);
    }

    if dropped > 0 {
        tracing::warn!(dropped, "rows with missing values removed from the score matrix");
    }

    ScoreMatrix::new(genes, columns, rows).map_err(|e| InputError::InvalidInput(e.to_string()))
}

fn is_missing(field: &str) -> bool {
    field.is_empty() || field.eq_ignore_ascii_case("na") || field.eq_ignore_ascii_case("nan")
}

fn parse_cell(field: &str) -> Option<f64> {
    if is_missing(field) {
        return None;
    }
    field.parse::<f64>().ok()
}

use std::collections::HashSet;

use crate::error::EngineError;

/// Gene-by-dataset p-value matrix, stored row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreMatrix {
    genes: Vec<String>,
    columns: Vec<String>,
    values: Vec<f64>,
}

impl ScoreMatrix {
    pub fn new(
        genes: Vec<String>,
        columns: Vec<String>,
        rows: Vec<Vec<f64>>,
    ) -> Result<Self, EngineError> {
        if columns.is_empty() {
            return Err(EngineError::invalid("score matrix has no columns"));
        }
        if genes.len() != rows.len() {
            return Err(EngineError::invalid(format!(
                "score matrix has {} gene labels but {} rows",
                genes.len(),
                rows.len()
            )));
        }
        check_unique("gene", &genes)?;
        check_unique("column", &columns)?;

        let mut values = Vec::with_capacity(genes.len() * columns.len());
        for (gene, row) in genes.iter().zip(rows) {
            if row.len() != columns.len() {
                return Err(EngineError::invalid(format!(
                    "row {} has {} values, expected {}",
                    gene,
                    row.len(),
                    columns.len()
                )));
            }
            for (col, &v) in columns.iter().zip(row.iter()) {
                if v.is_nan() {
                    return Err(EngineError::invalid(format!(
                        "missing value at gene {gene}, column {col}"
                    )));
                }
                if !(0.0..=1.0).contains(&v) {
                    return Err(EngineError::invalid(format!(
                        "p-value out of range [0, 1] at gene {gene}, column {col}: {v}"
                    )));
                }
            }
            values.extend(row);
        }

        Ok(ScoreMatrix {
            genes,
            columns,
            values,
        })
    }

    pub fn n_genes(&self) -> usize {
        self.genes.len()
    }

    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn genes(&self) -> &[String] {
        &self.genes
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn row(&self, gene_idx: usize) -> &[f64] {
        let k = self.columns.len();
        &self.values[gene_idx * k..(gene_idx + 1) * k]
    }

    pub fn column(&self, col_idx: usize) -> Vec<f64> {
        (0..self.genes.len())
            .map(|g| self.values[g * self.columns.len() + col_idx])
            .collect()
    }

    /// Keeps the rows whose gene passes `keep`, preserving row order.
    pub fn retain_genes(&self, keep: impl Fn(&str) -> bool) -> ScoreMatrix {
        let k = self.columns.len();
        let mut genes = Vec::new();
        let mut values = Vec::new();
        for (idx, gene) in self.genes.iter().enumerate() {
            if keep(gene) {
                genes.push(gene.clone());
                values.extend_from_slice(&self.values[idx * k..(idx + 1) * k]);
            }
        }
        ScoreMatrix {
            genes,
            columns: self.columns.clone(),
            values,
        }
    }
}

fn check_unique(kind: &str, labels: &[String]) -> Result<(), EngineError> {
    let mut seen = HashSet::with_capacity(labels.len());
    for label in labels {
        if !seen.insert(label.as_str()) {
            return Err(EngineError::invalid(format!("duplicate {kind} label: {label}")));
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/src_inline/model/matrix.rs"]
mod tests;

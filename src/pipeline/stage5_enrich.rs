use rayon::prelude::*;

use crate::error::EngineError;
use crate::model::{ScoreMatrix, Term};
use crate::pipeline::stage3_rank::{RankedList, rank};
use crate::pipeline::stage4_hypergeom::{PrefixTest, ranked_hypergeometric};

#[derive(Debug, Clone, PartialEq)]
pub struct TermTest {
    pub p_value: f64,
    /// Term genes in rank order, up to and including the best prefix.
    pub overlap: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnTests {
    pub column: String,
    pub n_ranked: usize,
    pub tests: Vec<TermTest>,
}

pub fn test_term(ranked: &RankedList, term: &Term, background_size: usize) -> TermTest {
    let genes = term.gene_set();
    let result: PrefixTest = ranked_hypergeometric(ranked, &genes, background_size);
    let overlap = ranked.genes()[..result.best_prefix]
        .iter()
        .filter(|g| genes.contains(g.as_str()))
        .cloned()
        .collect();
    TermTest {
        p_value: result.p_value,
        overlap,
    }
}

/// Tests every term against one ranking. Output order matches `terms`.
pub fn test_terms(ranked: &RankedList, terms: &[Term], background_size: usize) -> Vec<TermTest> {
    terms
        .par_iter()
        .map(|term| test_term(ranked, term, background_size))
        .collect()
}

/// Ranks each raw column on its own and tests every term against it.
pub fn test_columns(
    matrix: &ScoreMatrix,
    terms: &[Term],
    background_size: usize,
    cutoff: f64,
) -> Result<Vec<ColumnTests>, EngineError> {
    (0..matrix.n_columns())
        .into_par_iter()
        .map(|j| {
            let column = &matrix.columns()[j];
            let ranked = rank(matrix.genes(), &matrix.column(j), Some(cutoff))?;
            if ranked.is_empty() {
                tracing::debug!(column = %column, "no genes pass the cutoff in this column");
            }
            Ok(ColumnTests {
                column: column.clone(),
                n_ranked: ranked.len(),
                tests: test_terms(&ranked, terms, background_size),
            })
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage5_enrich.rs"]
mod tests;

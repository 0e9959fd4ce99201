pub mod stage1_filter;
pub mod stage2_merge;
pub mod stage3_rank;
pub mod stage4_hypergeom;
pub mod stage5_enrich;
pub mod stage6_adjust;
pub mod stage7_evidence;
pub mod stage8_report;

use crate::error::EngineError;
use crate::model::{AnalysisOptions, EnrichmentTable, GeneSetCollection, RunDiagnostics, ScoreMatrix};
use stage1_filter::run_stage1;
use stage2_merge::run_stage2;
use stage3_rank::rank;
use stage5_enrich::{test_columns, test_terms};
use stage6_adjust::adjust_p_values;
use stage7_evidence::{Stage7Inputs, run_stage7};

/// Runs the full enrichment analysis. Inputs are not modified; identical
/// inputs give identical tables.
pub fn analyze(
    matrix: &ScoreMatrix,
    collection: &GeneSetCollection,
    options: &AnalysisOptions,
) -> Result<EnrichmentTable, EngineError> {
    options.validate()?;

    let stage1 = run_stage1(matrix, collection, options)?;
    let background_size = stage1.universe.len();

    let stage2 = run_stage2(
        &stage1.matrix,
        options.merge_method,
        options.covariance_transform,
    )?;

    let ranked = rank(stage1.matrix.genes(), &stage2.merged, Some(options.cutoff))?;
    if ranked.is_empty() {
        return Err(EngineError::invalid(format!(
            "no genes have a merged p-value <= cutoff {}",
            options.cutoff
        )));
    }
    if ranked.len() < stage1.matrix.n_genes() {
        tracing::info!(
            removed = stage1.matrix.n_genes() - ranked.len(),
            kept = ranked.len(),
            "genes above the merged p-value cutoff removed from the ranking"
        );
    }

    let combined = test_terms(&ranked, &stage1.terms, background_size);
    let columns = test_columns(&stage1.matrix, &stage1.terms, background_size, options.cutoff)?;

    let raw: Vec<f64> = combined.iter().map(|t| t.p_value).collect();
    let adjusted = adjust_p_values(&raw, options.correction_method);

    let rows = run_stage7(&Stage7Inputs {
        terms: &stage1.terms,
        combined: &combined,
        adjusted: &adjusted,
        columns: &columns,
        options,
    })?;

    let diagnostics = RunDiagnostics {
        n_genes_input: matrix.n_genes(),
        n_genes_background: stage1.matrix.n_genes(),
        n_genes_ranked: ranked.len(),
        n_terms_input: collection.len(),
        n_terms_tested: stage1.terms.len(),
        n_terms_significant: adjusted.iter().filter(|&&p| p <= options.significant).count(),
        warnings: stage2.warning.into_iter().collect(),
    };

    Ok(EnrichmentTable {
        columns: stage1.matrix.columns().to_vec(),
        rows,
        diagnostics,
    })
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/analyze.rs"]
mod tests;

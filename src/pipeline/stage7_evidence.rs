use crate::error::EngineError;
use crate::model::{AnalysisOptions, EnrichmentResult, Evidence, Term};
use crate::pipeline::stage5_enrich::{ColumnTests, TermTest};
use crate::pipeline::stage6_adjust::adjust_p_values;

#[derive(Debug, Clone)]
pub struct Stage7Inputs<'a> {
    pub terms: &'a [Term],
    pub combined: &'a [TermTest],
    pub adjusted: &'a [f64],
    pub columns: &'a [ColumnTests],
    pub options: &'a AnalysisOptions,
}

/// Per-column support: each column's term p-values are adjusted over all
/// terms, and the column's overlap is kept where it passes the threshold.
/// A column that ranks none of the term's genes never supports it.
pub fn column_support(
    columns: &[ColumnTests],
    options: &AnalysisOptions,
) -> Vec<Vec<Option<Vec<String>>>> {
    columns
        .iter()
        .map(|col| {
            let raw: Vec<f64> = col.tests.iter().map(|t| t.p_value).collect();
            let adjusted = adjust_p_values(&raw, options.correction_method);
            col.tests
                .iter()
                .zip(adjusted)
                .map(|(test, adj)| {
                    (adj <= options.significant && !test.overlap.is_empty())
                        .then(|| test.overlap.clone())
                })
                .collect()
        })
        .collect()
}

pub fn run_stage7(inputs: &Stage7Inputs<'_>) -> Result<Vec<EnrichmentResult>, EngineError> {
    let n_terms = inputs.terms.len();
    if inputs.combined.len() != n_terms || inputs.adjusted.len() != n_terms {
        return Err(EngineError::invalid(
            "term results are not aligned with the tested terms",
        ));
    }
    let significant = inputs.options.significant;

    let keep: Vec<usize> = (0..n_terms)
        .filter(|&i| inputs.options.return_all || inputs.adjusted[i] <= significant)
        .collect();
    let n_significant = inputs.adjusted.iter().filter(|&&p| p <= significant).count();
    tracing::info!(
        significant = n_significant,
        tested = n_terms,
        "terms passing adjusted p <= {significant}"
    );
    if keep.is_empty() {
        return Err(EngineError::NoSignificantResults {
            threshold: significant,
        });
    }

    let support = column_support(inputs.columns, inputs.options);

    let mut out = Vec::with_capacity(keep.len());
    for i in keep {
        let term = &inputs.terms[i];
        let column_overlaps: Vec<Option<Vec<String>>> =
            support.iter().map(|col| col[i].clone()).collect();
        let supporting: Vec<String> = inputs
            .columns
            .iter()
            .zip(column_overlaps.iter())
            .filter(|(_, ov)| ov.is_some())
            .map(|(col, _)| col.column.clone())
            .collect();
        let evidence = if !supporting.is_empty() {
            Evidence::Columns(supporting)
        } else if inputs.adjusted[i] <= significant {
            Evidence::Combined
        } else {
            Evidence::None
        };

        out.push(EnrichmentResult {
            term_id: term.id.clone(),
            term_name: term.name.clone(),
            term_size: term.size(),
            combined_p: inputs.combined[i].p_value,
            adjusted_p: inputs.adjusted[i],
            overlap: inputs.combined[i].overlap.clone(),
            evidence,
            column_overlaps,
        });
    }
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage7_evidence.rs"]
mod tests;

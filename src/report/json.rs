use serde::Serialize;

use crate::model::{AnalysisOptions, CorrectionMethod, CovarianceTransform, EnrichmentTable, GeneSetFilter, MergeMethod};

#[derive(Debug, Clone, Serialize)]
pub struct ToolMeta {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct OptionsSummary {
    pub merge_method: MergeMethod,
    pub covariance_transform: CovarianceTransform,
    pub cutoff: f64,
    pub significant: f64,
    pub correction_method: CorrectionMethod,
    pub geneset_filter: Option<GeneSetFilter>,
    pub custom_background_size: Option<usize>,
    pub return_all: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct Counts {
    pub genes_input: usize,
    pub genes_in_background: usize,
    pub genes_ranked: usize,
    pub terms_input: usize,
    pub terms_tested: usize,
    pub terms_significant: usize,
    pub rows_reported: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub tool: ToolMeta,
    pub datasets: Vec<String>,
    pub options: OptionsSummary,
    pub counts: Counts,
    pub degenerate_covariance: bool,
    pub warnings: Vec<String>,
}

pub fn build_summary(table: &EnrichmentTable, options: &AnalysisOptions) -> RunSummary {
    let d = &table.diagnostics;
    RunSummary {
        tool: ToolMeta {
            name: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        datasets: table.columns.clone(),
        options: OptionsSummary {
            merge_method: options.merge_method,
            covariance_transform: options.covariance_transform,
            cutoff: options.cutoff,
            significant: options.significant,
            correction_method: options.correction_method,
            geneset_filter: options.geneset_filter,
            custom_background_size: options.background.as_ref().map(Vec::len),
            return_all: options.return_all,
        },
        counts: Counts {
            genes_input: d.n_genes_input,
            genes_in_background: d.n_genes_background,
            genes_ranked: d.n_genes_ranked,
            terms_input: d.n_terms_input,
            terms_tested: d.n_terms_tested,
            terms_significant: d.n_terms_significant,
            rows_reported: table.rows.len(),
        },
        degenerate_covariance: d.degenerate_covariance(),
        warnings: d.warnings.iter().map(|w| w.to_string()).collect(),
    }
}

pub fn render_summary_json(summary: &RunSummary) -> serde_json::Result<String> {
    serde_json::to_string_pretty(summary)
}

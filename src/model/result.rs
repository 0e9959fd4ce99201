use crate::error::EngineWarning;

/// Which individual datasets reproduce the enrichment of a term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Evidence {
    Columns(Vec<String>),
    Combined,
    None,
}

impl Evidence {
    pub fn labels(&self) -> Vec<&str> {
        match self {
            Evidence::Columns(cols) => cols.iter().map(String::as_str).collect(),
            Evidence::Combined => vec!["combined"],
            Evidence::None => vec!["none"],
        }
    }

    pub fn supports(&self, column: &str) -> bool {
        match self {
            Evidence::Columns(cols) => cols.iter().any(|c| c == column),
            _ => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnrichmentResult {
    pub term_id: String,
    pub term_name: String,
    pub term_size: usize,
    pub combined_p: f64,
    pub adjusted_p: f64,
    pub overlap: Vec<String>,
    pub evidence: Evidence,
    /// One entry per score column; `None` when that column alone does not
    /// detect the term.
    pub column_overlaps: Vec<Option<Vec<String>>>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunDiagnostics {
    pub n_genes_input: usize,
    pub n_genes_background: usize,
    pub n_genes_ranked: usize,
    pub n_terms_input: usize,
    pub n_terms_tested: usize,
    pub n_terms_significant: usize,
    pub warnings: Vec<EngineWarning>,
}

impl RunDiagnostics {
    pub fn degenerate_covariance(&self) -> bool {
        self.warnings
            .iter()
            .any(|w| matches!(w, EngineWarning::NumericalDegeneracy { .. }))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnrichmentTable {
    pub columns: Vec<String>,
    pub rows: Vec<EnrichmentResult>,
    pub diagnostics: RunDiagnostics,
}

impl EnrichmentTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn significant_rows(&self, threshold: f64) -> impl Iterator<Item = &EnrichmentResult> {
        self.rows.iter().filter(move |r| r.adjusted_p <= threshold)
    }
}

pub mod matrix;
pub mod options;
pub mod result;
pub mod term;

pub use matrix::ScoreMatrix;
pub use options::{AnalysisOptions, CorrectionMethod, CovarianceTransform, GeneSetFilter, MergeMethod};
pub use result::{EnrichmentResult, EnrichmentTable, Evidence, RunDiagnostics};
pub use term::{Background, GeneSetCollection, Term};

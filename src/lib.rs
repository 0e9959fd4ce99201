pub mod error;
pub mod input;
pub mod logging;
pub mod model;
pub mod pipeline;
pub mod report;

pub use error::{EngineError, EngineWarning};
pub use model::{
    AnalysisOptions, Background, CorrectionMethod, CovarianceTransform, EnrichmentResult,
    EnrichmentTable, Evidence, GeneSetCollection, GeneSetFilter, MergeMethod, ScoreMatrix, Term,
};
pub use pipeline::analyze;

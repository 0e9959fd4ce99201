use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("no significant terms (adjusted p <= {threshold})")]
    NoSignificantResults { threshold: f64 },
}

impl EngineError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        EngineError::InvalidInput(msg.into())
    }
}

/// Conditions the engine recovers from on its own. They are logged when they
/// happen and carried in the run diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineWarning {
    NumericalDegeneracy { reason: String },
}

impl std::fmt::Display for EngineWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineWarning::NumericalDegeneracy { reason } => {
                write!(f, "numerical degeneracy: {reason}; using Fisher's method")
            }
        }
    }
}

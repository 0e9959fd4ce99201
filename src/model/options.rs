use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MergeMethod {
    Fisher,
    Brown,
}

/// How score columns are put on a common scale before Brown's method
/// estimates their covariance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CovarianceTransform {
    /// Standardise, then `-2 ln ECDF`.
    Empirical,
    /// `Φ⁻¹(1 - p)`, with the Kost-McDermott polynomial mapping correlations
    /// to covariances of the log terms.
    Probit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CorrectionMethod {
    Holm,
    Hochberg,
    Hommel,
    Bonferroni,
    #[serde(rename = "fdr")]
    BenjaminiHochberg,
    #[serde(rename = "by")]
    BenjaminiYekutieli,
    None,
}

impl FromStr for MergeMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "fisher" => Ok(MergeMethod::Fisher),
            "brown" => Ok(MergeMethod::Brown),
            other => Err(format!("unknown merge method: {other} (use fisher|brown)")),
        }
    }
}

impl FromStr for CovarianceTransform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "empirical" => Ok(CovarianceTransform::Empirical),
            "probit" => Ok(CovarianceTransform::Probit),
            other => Err(format!(
                "unknown covariance transform: {other} (use empirical|probit)"
            )),
        }
    }
}

impl FromStr for CorrectionMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "holm" => Ok(CorrectionMethod::Holm),
            "hochberg" => Ok(CorrectionMethod::Hochberg),
            "hommel" => Ok(CorrectionMethod::Hommel),
            "bonferroni" => Ok(CorrectionMethod::Bonferroni),
            "fdr" | "bh" => Ok(CorrectionMethod::BenjaminiHochberg),
            "by" => Ok(CorrectionMethod::BenjaminiYekutieli),
            "none" => Ok(CorrectionMethod::None),
            other => Err(format!(
                "unknown correction method: {other} (use holm|hochberg|hommel|bonferroni|fdr|BH|BY|none)"
            )),
        }
    }
}

/// Inclusive term-size bounds applied after restricting terms to the
/// background.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneSetFilter {
    pub min_size: usize,
    pub max_size: usize,
}

impl Default for GeneSetFilter {
    fn default() -> Self {
        Self {
            min_size: 5,
            max_size: 1000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisOptions {
    pub merge_method: MergeMethod,
    pub covariance_transform: CovarianceTransform,
    pub cutoff: f64,
    pub significant: f64,
    pub correction_method: CorrectionMethod,
    pub geneset_filter: Option<GeneSetFilter>,
    pub background: Option<Vec<String>>,
    pub return_all: bool,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            merge_method: MergeMethod::Brown,
            covariance_transform: CovarianceTransform::Empirical,
            cutoff: 0.1,
            significant: 0.05,
            correction_method: CorrectionMethod::Holm,
            geneset_filter: Some(GeneSetFilter::default()),
            background: None,
            return_all: false,
        }
    }
}

impl AnalysisOptions {
    pub fn validate(&self) -> Result<(), EngineError> {
        if !(0.0..=1.0).contains(&self.cutoff) {
            return Err(EngineError::invalid(format!(
                "cutoff must be within [0, 1], got {}",
                self.cutoff
            )));
        }
        if !(0.0..=1.0).contains(&self.significant) {
            return Err(EngineError::invalid(format!(
                "significance threshold must be within [0, 1], got {}",
                self.significant
            )));
        }
        if let Some(filter) = &self.geneset_filter {
            if filter.min_size > filter.max_size {
                return Err(EngineError::invalid(format!(
                    "gene set filter min size {} exceeds max size {}",
                    filter.min_size, filter.max_size
                )));
            }
        }
        if let Some(bg) = &self.background {
            if bg.is_empty() {
                return Err(EngineError::invalid("background gene list is empty"));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/model/options.rs"]
mod tests;

use rayon::prelude::*;
use statrs::distribution::{ChiSquared, ContinuousCDF, Normal};

use crate::error::{EngineError, EngineWarning};
use crate::model::{CovarianceTransform, MergeMethod, ScoreMatrix};

/// Zero p-values are lifted to this floor before taking logarithms.
pub const P_FLOOR: f64 = 1e-300;

const PROBIT_CEIL: f64 = 1.0 - 1e-12;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrownParams {
    pub n_columns: usize,
    pub scale: f64,
    pub df: f64,
}

impl BrownParams {
    /// Moment-matches `c * χ²(f)` to the Fisher statistic under the given
    /// covariance of the `-2 ln p` terms.
    pub fn from_covariance(cov: &[Vec<f64>]) -> Result<Self, String> {
        let k = cov.len();
        let expected = 2.0 * k as f64;
        let mut lower_sum = 0.0;
        for (i, row) in cov.iter().enumerate() {
            for &c in &row[..i] {
                lower_sum += c;
            }
        }
        let variance = 4.0 * k as f64 + 2.0 * lower_sum;
        if !variance.is_finite() || variance <= 0.0 {
            return Err(format!(
                "variance of the combined statistic is {variance}"
            ));
        }

        let mut scale = variance / (2.0 * expected);
        let mut df = 2.0 * expected * expected / variance;
        if df > expected {
            df = expected;
            scale = 1.0;
        }
        Ok(BrownParams {
            n_columns: k,
            scale,
            df,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MergeModel {
    Fisher,
    Brown(BrownParams),
}

impl MergeModel {
    pub fn merge(&self, row: &[f64]) -> Result<f64, EngineError> {
        match self {
            MergeModel::Fisher => fisher(row),
            MergeModel::Brown(params) => brown(row, params),
        }
    }

    pub fn method(&self) -> MergeMethod {
        match self {
            MergeModel::Fisher => MergeMethod::Fisher,
            MergeModel::Brown(_) => MergeMethod::Brown,
        }
    }
}

#[derive(Debug)]
pub struct Stage2Output {
    pub merged: Vec<f64>,
    pub model: MergeModel,
    pub warning: Option<EngineWarning>,
}

pub fn run_stage2(
    matrix: &ScoreMatrix,
    method: MergeMethod,
    transform: CovarianceTransform,
) -> Result<Stage2Output, EngineError> {
    let mut warning = None;
    let model = match method {
        MergeMethod::Fisher => MergeModel::Fisher,
        MergeMethod::Brown if matrix.n_columns() == 1 => MergeModel::Fisher,
        MergeMethod::Brown => match estimate_brown_params(matrix, transform) {
            Ok(params) => MergeModel::Brown(params),
            Err(reason) => {
                let w = EngineWarning::NumericalDegeneracy { reason };
                tracing::warn!("{w}");
                warning = Some(w);
                MergeModel::Fisher
            }
        },
    };

    let merged = (0..matrix.n_genes())
        .into_par_iter()
        .map(|g| model.merge(matrix.row(g)))
        .collect::<Result<Vec<_>, _>>()?;

    tracing::debug!(
        genes = merged.len(),
        method = ?model.method(),
        "merged p-values across {} columns",
        matrix.n_columns()
    );

    Ok(Stage2Output {
        merged,
        model,
        warning,
    })
}

pub fn clean_p_value(p: f64) -> Result<f64, EngineError> {
    if p.is_nan() || !(0.0..=1.0).contains(&p) {
        return Err(EngineError::invalid(format!(
            "p-value out of range [0, 1]: {p}"
        )));
    }
    Ok(p.max(P_FLOOR))
}

pub fn chi_squared_sf(x: f64, df: f64) -> Result<f64, EngineError> {
    if x <= 0.0 {
        return Ok(1.0);
    }
    let dist = ChiSquared::new(df).map_err(|e| {
        EngineError::invalid(format!("chi-squared with {df} degrees of freedom: {e}"))
    })?;
    Ok(dist.sf(x).clamp(0.0, 1.0))
}

fn fisher_statistic(row: &[f64]) -> Result<f64, EngineError> {
    let mut stat = 0.0;
    for &p in row {
        stat -= 2.0 * clean_p_value(p)?.ln();
    }
    Ok(stat)
}

fn single_or_empty(row: &[f64]) -> Result<Option<f64>, EngineError> {
    match row {
        [] => Err(EngineError::invalid("cannot merge an empty row of p-values")),
        [p] => {
            clean_p_value(*p)?;
            Ok(Some(*p))
        }
        _ => Ok(None),
    }
}

pub fn fisher(row: &[f64]) -> Result<f64, EngineError> {
    if let Some(p) = single_or_empty(row)? {
        return Ok(p);
    }
    chi_squared_sf(fisher_statistic(row)?, 2.0 * row.len() as f64)
}

pub fn brown(row: &[f64], params: &BrownParams) -> Result<f64, EngineError> {
    if row.len() != params.n_columns {
        return Err(EngineError::invalid(format!(
            "row has {} p-values but the covariance was estimated on {} columns",
            row.len(),
            params.n_columns
        )));
    }
    if let Some(p) = single_or_empty(row)? {
        return Ok(p);
    }
    chi_squared_sf(fisher_statistic(row)? / params.scale, params.df)
}

pub fn estimate_brown_params(
    matrix: &ScoreMatrix,
    transform: CovarianceTransform,
) -> Result<BrownParams, String> {
    if matrix.n_genes() < 2 {
        return Err("fewer than two genes to estimate covariance".to_string());
    }

    let mut transformed = Vec::with_capacity(matrix.n_columns());
    for (j, name) in matrix.columns().iter().enumerate() {
        let column = matrix.column(j);
        let values = match transform {
            CovarianceTransform::Empirical => empirical_log_transform(&column),
            CovarianceTransform::Probit => probit_transform(&column),
        }
        .map_err(|reason| format!("column {name}: {reason}"))?;
        transformed.push(values);
    }

    let cov = match transform {
        CovarianceTransform::Empirical => covariance_matrix(&transformed),
        CovarianceTransform::Probit => {
            let mut m = correlation_matrix(&transformed);
            for row in m.iter_mut() {
                for r in row.iter_mut() {
                    *r = kost_mcdermott(*r);
                }
            }
            m
        }
    };
    if cov.iter().flatten().any(|c| !c.is_finite()) {
        return Err("covariance matrix has non-finite entries".to_string());
    }

    BrownParams::from_covariance(&cov)
}

fn mean_and_population_sd(values: &[f64]) -> Result<(f64, f64), String> {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n;
    let sd = var.sqrt();
    if !sd.is_finite() || sd <= f64::EPSILON * mean.abs().max(1.0) {
        return Err("zero variance".to_string());
    }
    Ok((mean, sd))
}

/// Standardises the column, then maps each value to `-2 ln F(s)` where `F`
/// is the empirical CDF of the standardised column.
pub fn empirical_log_transform(values: &[f64]) -> Result<Vec<f64>, String> {
    let (mean, sd) = mean_and_population_sd(values)?;
    let n = values.len() as f64;
    let standardized: Vec<f64> = values.iter().map(|v| (v - mean) / sd).collect();
    let mut sorted = standardized.clone();
    sorted.sort_by(f64::total_cmp);
    Ok(standardized
        .iter()
        .map(|&s| {
            let count = sorted.partition_point(|&v| v <= s);
            -2.0 * (count as f64 / n).ln()
        })
        .collect())
}

pub fn probit_transform(values: &[f64]) -> Result<Vec<f64>, String> {
    mean_and_population_sd(values)?;
    let normal = Normal::new(0.0, 1.0).map_err(|e| e.to_string())?;
    Ok(values
        .iter()
        .map(|&p| -normal.inverse_cdf(p.clamp(P_FLOOR, PROBIT_CEIL)))
        .collect())
}

// cov(-2 ln p_i, -2 ln p_j) as a polynomial in the normal-scale correlation
fn kost_mcdermott(rho: f64) -> f64 {
    3.263 * rho + 0.710 * rho * rho + 0.027 * rho * rho * rho
}

pub fn covariance_matrix(columns: &[Vec<f64>]) -> Vec<Vec<f64>> {
    let k = columns.len();
    let means: Vec<f64> = columns
        .iter()
        .map(|c| c.iter().sum::<f64>() / c.len() as f64)
        .collect();
    let mut cov = vec![vec![0.0; k]; k];
    for i in 0..k {
        for j in 0..=i {
            let n = columns[i].len();
            let mut acc = 0.0;
            for g in 0..n {
                acc += (columns[i][g] - means[i]) * (columns[j][g] - means[j]);
            }
            let c = acc / (n as f64 - 1.0);
            cov[i][j] = c;
            cov[j][i] = c;
        }
    }
    cov
}

fn correlation_matrix(columns: &[Vec<f64>]) -> Vec<Vec<f64>> {
    let mut cov = covariance_matrix(columns);
    let sds: Vec<f64> = (0..cov.len()).map(|i| cov[i][i].sqrt()).collect();
    for (i, row) in cov.iter_mut().enumerate() {
        for (j, c) in row.iter_mut().enumerate() {
            *c /= sds[i] * sds[j];
        }
    }
    cov
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage2_merge.rs"]
mod tests;

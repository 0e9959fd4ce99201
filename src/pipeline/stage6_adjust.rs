//! Multiple-testing correction over a vector of term p-values.
//!
//! Every method returns adjusted values in input order and follows the usual
//! step-down (Holm), step-up (Hochberg, BH, BY) and closed-testing (Hommel)
//! definitions.

use crate::model::CorrectionMethod;

pub fn adjust_p_values(p_values: &[f64], method: CorrectionMethod) -> Vec<f64> {
    let n = p_values.len();
    if n <= 1 {
        return p_values.to_vec();
    }
    match method {
        CorrectionMethod::None => p_values.to_vec(),
        CorrectionMethod::Bonferroni => bonferroni(p_values),
        CorrectionMethod::Holm => holm(p_values),
        CorrectionMethod::Hochberg => hochberg(p_values),
        CorrectionMethod::Hommel if n == 2 => hochberg(p_values),
        CorrectionMethod::Hommel => hommel(p_values),
        CorrectionMethod::BenjaminiHochberg => step_up(p_values, 1.0, |rank, n| n / rank),
        CorrectionMethod::BenjaminiYekutieli => {
            let q: f64 = (1..=n).map(|i| 1.0 / i as f64).sum();
            step_up(p_values, q, |rank, n| n / rank)
        }
    }
}

fn ascending_order(p_values: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..p_values.len()).collect();
    order.sort_by(|&a, &b| p_values[a].total_cmp(&p_values[b]));
    order
}

pub fn bonferroni(p_values: &[f64]) -> Vec<f64> {
    let n = p_values.len() as f64;
    p_values.iter().map(|&p| (p * n).min(1.0)).collect()
}

pub fn holm(p_values: &[f64]) -> Vec<f64> {
    let n = p_values.len();
    let order = ascending_order(p_values);
    let mut adjusted = vec![0.0; n];
    let mut running = 0.0f64;
    for (i, &idx) in order.iter().enumerate() {
        let v = (n - i) as f64 * p_values[idx];
        running = running.max(v);
        adjusted[idx] = running.min(1.0);
    }
    adjusted
}

pub fn hochberg(p_values: &[f64]) -> Vec<f64> {
    step_up(p_values, 1.0, |rank, n| n - rank + 1.0)
}

// Walks from the largest p-value down, keeping a running minimum of
// `factor * multiplier(rank, n) * p`.
fn step_up(p_values: &[f64], factor: f64, multiplier: impl Fn(f64, f64) -> f64) -> Vec<f64> {
    let n = p_values.len();
    let order = ascending_order(p_values);
    let mut adjusted = vec![0.0; n];
    let mut running = f64::INFINITY;
    for i in (0..n).rev() {
        let idx = order[i];
        let v = factor * multiplier((i + 1) as f64, n as f64) * p_values[idx];
        running = running.min(v);
        adjusted[idx] = running.min(1.0);
    }
    adjusted
}

pub fn hommel(p_values: &[f64]) -> Vec<f64> {
    let n = p_values.len();
    let order = ascending_order(p_values);
    let p: Vec<f64> = order.iter().map(|&i| p_values[i]).collect();

    let init = p
        .iter()
        .enumerate()
        .map(|(i, &v)| n as f64 * v / (i + 1) as f64)
        .fold(f64::INFINITY, f64::min);
    let mut q = vec![init; n];
    let mut pa = vec![init; n];

    for m in (2..n).rev() {
        // 0-based: i1 = 0..=n-m, i2 = n-m+1..n
        let split = n - m + 1;
        let q1 = (split..n)
            .enumerate()
            .map(|(k, i)| m as f64 * p[i] / (k + 2) as f64)
            .fold(f64::INFINITY, f64::min);
        for i in 0..split {
            q[i] = (m as f64 * p[i]).min(q1);
        }
        let tail = q[split - 1];
        for qi in q.iter_mut().skip(split) {
            *qi = tail;
        }
        for (a, &b) in pa.iter_mut().zip(q.iter()) {
            *a = a.max(b);
        }
    }

    let mut adjusted = vec![0.0; n];
    for (sorted_idx, &orig_idx) in order.iter().enumerate() {
        adjusted[orig_idx] = pa[sorted_idx].max(p[sorted_idx]);
    }
    adjusted
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage6_adjust.rs"]
mod tests;

use std::collections::HashSet;

use statrs::function::factorial::ln_binomial;

use crate::pipeline::stage3_rank::RankedList;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrefixTest {
    pub p_value: f64,
    /// Length of the ranked prefix that gave `p_value`; 0 when the term has
    /// no hits in the ranking.
    pub best_prefix: usize,
    pub hits_in_prefix: usize,
}

impl PrefixTest {
    pub fn no_enrichment() -> Self {
        PrefixTest {
            p_value: 1.0,
            best_prefix: 0,
            hits_in_prefix: 0,
        }
    }
}

/// Ranked hypergeometric test of one term.
///
/// `term_genes` must already be restricted to the background of size
/// `background_size`. Every ranked position holding a term gene is a
/// candidate cutoff; the p-value can only drop at those positions, so only
/// they are evaluated. The smallest `P(X >= hits)` wins, the earliest prefix
/// on ties.
///
/// The point probability `P(X = hits)` is carried from one prefix to the
/// next, so each position costs O(1) and each tail is summed outward from
/// the carried term.
pub fn ranked_hypergeometric(
    ranked: &RankedList,
    term_genes: &HashSet<&str>,
    background_size: usize,
) -> PrefixTest {
    let n_pop = background_size as u64;
    let k_succ = (term_genes.len() as u64).min(n_pop);
    if k_succ == 0 {
        return PrefixTest::no_enrichment();
    }

    let is_hit: Vec<bool> = ranked
        .iter()
        .map(|g| term_genes.contains(g.as_str()))
        .collect();
    let Some(last_hit) = is_hit.iter().rposition(|&h| h) else {
        return PrefixTest::no_enrichment();
    };

    let mut cursor = PointMass::new(n_pop, k_succ);
    let mut best = PrefixTest::no_enrichment();
    for (pos, &hit) in is_hit[..=last_hit].iter().enumerate() {
        cursor.step(hit);
        if !hit {
            continue;
        }
        let p = match cursor.upper_tail() {
            Some(p) => p,
            None => hypergeom_upper_tail(
                cursor.hits,
                (pos as u64 + 1).min(n_pop),
                k_succ,
                n_pop,
            ),
        };
        if p < best.p_value || best.best_prefix == 0 {
            best = PrefixTest {
                p_value: p,
                best_prefix: pos + 1,
                hits_in_prefix: cursor.hits as usize,
            };
        }
    }
    best
}

// Relative size below which further tail terms are dropped.
const TAIL_EPS: f64 = 1e-17;

/// `ln P(X = hits)` after `draws` draws, updated by the ratio of
/// consecutive hypergeometric probabilities.
#[derive(Debug, Clone, Copy)]
struct PointMass {
    population: f64,
    successes: f64,
    draws: u64,
    hits: u64,
    ln_pmf: f64,
}

impl PointMass {
    fn new(population: u64, successes: u64) -> Self {
        PointMass {
            population: population as f64,
            successes: successes as f64,
            draws: 0,
            hits: 0,
            ln_pmf: 0.0,
        }
    }

    fn step(&mut self, hit: bool) {
        let n = self.draws as f64;
        let j = self.hits as f64;
        let (big_n, k) = (self.population, self.successes);
        let ratio = if hit {
            (k - j) * (n + 1.0) / ((j + 1.0) * (big_n - n))
        } else {
            (big_n - k - n + j) * (n + 1.0) / ((n + 1.0 - j) * (big_n - n))
        };
        self.ln_pmf = if ratio > 0.0 && ratio.is_finite() {
            self.ln_pmf + ratio.ln()
        } else {
            f64::NEG_INFINITY
        };
        self.draws += 1;
        if hit {
            self.hits += 1;
        }
    }

    /// `P(X >= hits)`, or `None` when the prefix is not a valid draw from the
    /// population.
    fn upper_tail(&self) -> Option<f64> {
        if !self.ln_pmf.is_finite() || self.draws as f64 > self.population {
            return None;
        }
        let n = self.draws as f64;
        let x = self.hits as f64;
        let (big_n, k) = (self.population, self.successes);
        let lo = (n + k - big_n).max(0.0);
        let hi = n.min(k);
        if x <= lo {
            return Some(1.0);
        }
        let mode = ((n + 1.0) * (k + 1.0) / (big_n + 2.0)).floor();

        if x > mode {
            // terms decrease away from the mode
            let (mut term, mut sum, mut i) = (1.0, 1.0, x);
            while i < hi {
                term *= (k - i) * (n - i) / ((i + 1.0) * (big_n - k - n + i + 1.0));
                sum += term;
                i += 1.0;
                if term < sum * TAIL_EPS {
                    break;
                }
            }
            Some((self.ln_pmf + sum.ln()).exp().min(1.0))
        } else {
            // complement of P(X <= hits - 1), summed downward from hits - 1
            let (mut term, mut sum, mut i) = (1.0, 0.0, x);
            while i > lo {
                term *= i * (big_n - k - n + i) / ((k - i + 1.0) * (n - i + 1.0));
                sum += term;
                i -= 1.0;
                if term < sum * TAIL_EPS {
                    break;
                }
            }
            let lower = (self.ln_pmf + sum.ln()).exp();
            Some((1.0 - lower).clamp(0.0, 1.0))
        }
    }
}

/// `P(X >= x)` for `X ~ Hypergeometric(population, successes, draws)`,
/// summed in log space.
pub fn hypergeom_upper_tail(x: u64, draws: u64, successes: u64, population: u64) -> f64 {
    let lo = (draws + successes).saturating_sub(population);
    let hi = draws.min(successes);
    if x <= lo {
        return 1.0;
    }
    if x > hi {
        return 0.0;
    }

    let ln_total = ln_binomial(population, draws);
    let failures = population - successes;
    let log_terms: Vec<f64> = (x..=hi)
        .map(|i| ln_binomial(successes, i) + ln_binomial(failures, draws - i) - ln_total)
        .collect();

    let max = log_terms.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if max == f64::NEG_INFINITY {
        return 0.0;
    }
    let sum: f64 = log_terms.iter().map(|l| (l - max).exp()).sum();
    (max.exp() * sum).min(1.0)
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage4_hypergeom.rs"]
mod tests;

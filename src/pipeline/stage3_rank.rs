use crate::error::EngineError;

/// Genes ordered most significant first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RankedList {
    genes: Vec<String>,
}

impl RankedList {
    pub fn genes(&self) -> &[String] {
        &self.genes
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.genes.iter()
    }

    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }
}

impl<'a> IntoIterator for &'a RankedList {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.genes.iter()
    }
}

/// Sorts genes by ascending p-value. The sort is stable, so equal p-values
/// keep their input order. With a cutoff only genes with `p <= cutoff` are
/// kept.
pub fn rank(
    genes: &[String],
    p_values: &[f64],
    cutoff: Option<f64>,
) -> Result<RankedList, EngineError> {
    if genes.len() != p_values.len() {
        return Err(EngineError::invalid(format!(
            "{} genes but {} p-values to rank",
            genes.len(),
            p_values.len()
        )));
    }
    if let Some(idx) = p_values.iter().position(|p| p.is_nan()) {
        return Err(EngineError::invalid(format!(
            "missing p-value for gene {} cannot be ranked",
            genes[idx]
        )));
    }

    let mut order: Vec<usize> = (0..genes.len())
        .filter(|&i| cutoff.is_none_or(|c| p_values[i] <= c))
        .collect();
    order.sort_by(|&a, &b| p_values[a].total_cmp(&p_values[b]));

    Ok(RankedList {
        genes: order.into_iter().map(|i| genes[i].clone()).collect(),
    })
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage3_rank.rs"]
mod tests;

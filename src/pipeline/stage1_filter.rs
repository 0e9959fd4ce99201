use crate::error::EngineError;
use crate::model::{AnalysisOptions, Background, GeneSetCollection, ScoreMatrix, Term};

#[derive(Debug)]
pub struct Stage1Output {
    pub universe: Background,
    pub matrix: ScoreMatrix,
    pub terms: Vec<Term>,
}

/// Restricts the matrix and the terms to the analysis universe: background
/// genes annotated by at least one term. Terms are then size-filtered.
pub fn run_stage1(
    matrix: &ScoreMatrix,
    collection: &GeneSetCollection,
    options: &AnalysisOptions,
) -> Result<Stage1Output, EngineError> {
    if matrix.n_genes() == 0 {
        return Err(EngineError::invalid("score matrix has no genes"));
    }
    if collection.is_empty() {
        return Err(EngineError::invalid("gene set collection is empty"));
    }

    let annotated = Background::from_collection(collection);
    let universe = match &options.background {
        Some(genes) => Background::new(genes.iter().cloned()).intersect(&annotated),
        None => annotated,
    };
    if universe.is_empty() {
        return Err(EngineError::invalid(
            "background shares no genes with the gene set collection",
        ));
    }

    let filtered = matrix.retain_genes(|g| universe.contains(g));
    if filtered.n_genes() == 0 {
        return Err(EngineError::invalid(
            "score matrix does not contain any genes in the background",
        ));
    }
    if filtered.n_genes() < matrix.n_genes() {
        tracing::info!(
            removed = matrix.n_genes() - filtered.n_genes(),
            kept = filtered.n_genes(),
            "genes outside the background removed from the score matrix"
        );
    }

    let terms = filter_terms(collection, &universe, options)?;

    Ok(Stage1Output {
        universe,
        matrix: filtered,
        terms,
    })
}

pub fn filter_terms(
    collection: &GeneSetCollection,
    universe: &Background,
    options: &AnalysisOptions,
) -> Result<Vec<Term>, EngineError> {
    let mut terms = Vec::with_capacity(collection.len());
    for term in collection {
        let restricted = term.restricted_to(universe);
        if let Some(filter) = &options.geneset_filter {
            let size = restricted.size();
            if size < filter.min_size || size > filter.max_size {
                continue;
            }
        }
        terms.push(restricted);
    }

    if terms.is_empty() {
        return Err(EngineError::invalid(
            "no terms in the gene set collection passed the gene set filter",
        ));
    }
    if terms.len() < collection.len() {
        tracing::info!(
            removed = collection.len() - terms.len(),
            kept = terms.len(),
            "terms removed by the gene set size filter"
        );
    }
    Ok(terms)
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage1_filter.rs"]
mod tests;

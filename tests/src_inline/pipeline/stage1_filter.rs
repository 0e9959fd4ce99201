use super::*;
use crate::model::GeneSetFilter;

fn labels(v: &[&str]) -> Vec<String> {
    v.iter().map(|s| s.to_string()).collect()
}

fn matrix(genes: &[&str]) -> ScoreMatrix {
    let rows = genes.iter().map(|_| vec![0.01, 0.02]).collect();
    ScoreMatrix::new(labels(genes), labels(&["a", "b"]), rows).unwrap()
}

fn collection() -> GeneSetCollection {
    GeneSetCollection::from_terms(vec![
        Term::new("small", "small", ["g1", "g2"]),
        Term::new("mid", "mid", ["g1", "g2", "g3", "g4"]),
        Term::new("wide", "wide", ["g1", "g2", "g3", "g4", "g5", "g6"]),
    ])
}

fn options(min: usize, max: usize) -> AnalysisOptions {
    AnalysisOptions {
        geneset_filter: Some(GeneSetFilter {
            min_size: min,
            max_size: max,
        }),
        ..AnalysisOptions::default()
    }
}

#[test]
fn test_size_filter_bounds_are_inclusive() {
    let out = run_stage1(&matrix(&["g1", "g2", "g3"]), &collection(), &options(4, 4)).unwrap();
    assert_eq!(out.terms.len(), 1);
    assert_eq!(out.terms[0].id, "mid");
}

#[test]
fn test_matrix_restricted_to_annotated_background() {
    let out = run_stage1(
        &matrix(&["g1", "x1", "g3", "x2"]),
        &collection(),
        &options(1, 1000),
    )
    .unwrap();
    assert_eq!(out.matrix.genes(), &labels(&["g1", "g3"])[..]);
    assert_eq!(out.universe.len(), 6);
}

#[test]
fn test_explicit_background_limits_terms() {
    let opts = AnalysisOptions {
        background: Some(labels(&["g1", "g2", "g3", "unrelated"])),
        ..options(3, 1000)
    };
    let out = run_stage1(&matrix(&["g1", "g2", "g3"]), &collection(), &opts).unwrap();
    // both larger terms shrink to {g1, g2, g3}; "small" stays below the minimum
    let ids: Vec<&str> = out.terms.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["mid", "wide"]);
    assert!(out.terms.iter().all(|t| t.size() == 3));
    assert_eq!(out.universe.len(), 3);
}

#[test]
fn test_errors_on_empty_filter_result_and_disjoint_matrix() {
    let err = run_stage1(&matrix(&["g1"]), &collection(), &options(50, 100)).unwrap_err();
    assert!(matches!(err, EngineError::InvalidInput(_)));

    let err = run_stage1(&matrix(&["x1", "x2"]), &collection(), &options(1, 10)).unwrap_err();
    assert!(matches!(err, EngineError::InvalidInput(_)));
}

#[test]
fn test_no_filter_keeps_every_term() {
    let opts = AnalysisOptions {
        geneset_filter: None,
        ..AnalysisOptions::default()
    };
    let out = run_stage1(&matrix(&["g1"]), &collection(), &opts).unwrap();
    assert_eq!(out.terms.len(), 3);
}

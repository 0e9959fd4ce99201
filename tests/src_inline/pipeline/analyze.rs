use super::*;
use crate::model::{CorrectionMethod, Evidence, MergeMethod, Term};
use crate::report::table::render_table_tsv;

fn s(v: &[&str]) -> Vec<String> {
    v.iter().map(|x| x.to_string()).collect()
}

fn small_case() -> (ScoreMatrix, GeneSetCollection) {
    let matrix = ScoreMatrix::new(
        s(&["g1", "g2", "g3"]),
        s(&["rna", "protein"]),
        vec![vec![0.001, 0.8], vec![0.5, 0.5], vec![0.9, 0.9]],
    )
    .unwrap();
    // the second term puts g3 in the annotated universe
    let collection = GeneSetCollection::from_terms(vec![
        Term::new("T", "pair", ["g1", "g2"]),
        Term::new("U", "single", ["g3"]),
    ]);
    (matrix, collection)
}

fn small_options() -> AnalysisOptions {
    AnalysisOptions {
        merge_method: MergeMethod::Fisher,
        cutoff: 1.0,
        correction_method: CorrectionMethod::None,
        geneset_filter: None,
        return_all: true,
        ..AnalysisOptions::default()
    }
}

#[test]
fn test_three_gene_scenario() {
    let (matrix, collection) = small_case();
    let options = small_options();

    let merged = run_stage2(&matrix, options.merge_method, options.covariance_transform).unwrap();
    let ranked = rank(matrix.genes(), &merged.merged, None).unwrap();
    assert_eq!(ranked.genes(), &s(&["g1", "g2", "g3"])[..]);

    let table = analyze(&matrix, &collection, &options).unwrap();
    assert_eq!(table.len(), 2);
    let row = &table.rows[0];
    assert_eq!(row.term_id, "T");
    // N=3, K=2: one hit at n=1 gives 2/3, both hits at n=2 give 1/3
    assert!((row.combined_p - 1.0 / 3.0).abs() < 1e-9);
    assert_eq!(row.overlap, s(&["g1", "g2"]));
    assert_eq!(row.evidence, Evidence::None);
    assert_eq!(table.rows[1].combined_p, 1.0);
    assert_eq!(table.diagnostics.n_genes_ranked, 3);
}

fn gene_names(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("g{i}")).collect()
}

fn larger_case() -> (ScoreMatrix, GeneSetCollection) {
    let genes = gene_names(40);
    let rows: Vec<Vec<f64>> = (0..40)
        .map(|i| {
            (0..3)
                .map(|j| {
                    if i < 8 {
                        1e-4 * ((i + 1) * (j + 1)) as f64
                    } else {
                        ((i * 7 + j * 13) % 40 + 1) as f64 / 41.0
                    }
                })
                .collect()
        })
        .collect();
    let matrix = ScoreMatrix::new(genes, s(&["a", "b", "c"]), rows).unwrap();

    let pick = |ids: &[usize]| ids.iter().map(|i| format!("g{i}")).collect::<Vec<_>>();
    let collection = GeneSetCollection::from_terms(vec![
        Term::new("top", "top genes", pick(&[0, 1, 2, 3, 4, 5, 6, 7, 20, 21])),
        Term::new("mid", "middle", pick(&(10..20).collect::<Vec<_>>())),
        Term::new("tail", "tail", pick(&(30..40).collect::<Vec<_>>())),
        Term::new("mixed", "mixed", pick(&[0, 2, 4, 6, 8, 10, 12, 14, 16, 18])),
    ]);
    (matrix, collection)
}

fn larger_options() -> AnalysisOptions {
    AnalysisOptions {
        cutoff: 0.5,
        return_all: true,
        ..AnalysisOptions::default()
    }
}

#[test]
fn test_top_term_is_most_enriched() {
    let (matrix, collection) = larger_case();
    let table = analyze(&matrix, &collection, &larger_options()).unwrap();
    assert_eq!(table.len(), 4);
    let top = &table.rows[0];
    assert_eq!(top.term_id, "top");
    for other in &table.rows[1..] {
        assert!(top.combined_p <= other.combined_p);
    }
    assert!(top.adjusted_p <= 0.05);
    assert!(top.evidence.supports("a"));
    assert_eq!(top.overlap.len(), 9);
    assert_eq!(top.overlap.last().map(String::as_str), Some("g21"));
    // g22..g29 are in no term
    assert_eq!(table.diagnostics.n_genes_background, 32);
}

#[test]
fn test_analyze_is_deterministic() {
    let (matrix, collection) = larger_case();
    let options = larger_options();
    let first = render_table_tsv(&analyze(&matrix, &collection, &options).unwrap());
    let second = render_table_tsv(&analyze(&matrix, &collection, &options).unwrap());
    assert_eq!(first, second);
}

#[test]
fn test_removing_unannotated_background_gene_keeps_results() {
    let (matrix, collection) = larger_case();
    let full = AnalysisOptions {
        background: Some(gene_names(40)),
        ..larger_options()
    };
    let reduced = AnalysisOptions {
        background: Some(gene_names(40).into_iter().filter(|g| g != "g25").collect()),
        ..larger_options()
    };
    let a = analyze(&matrix, &collection, &full).unwrap();
    let b = analyze(&matrix, &collection, &reduced).unwrap();
    assert_eq!(a.rows, b.rows);
}

#[test]
fn test_return_all_with_zero_threshold() {
    let (matrix, collection) = larger_case();
    let options = AnalysisOptions {
        significant: 0.0,
        ..larger_options()
    };
    let table = analyze(&matrix, &collection, &options).unwrap();
    assert_eq!(table.len(), table.diagnostics.n_terms_tested);
    assert_eq!(table.len(), 4);

    let strict = AnalysisOptions {
        return_all: false,
        ..options
    };
    let err = analyze(&matrix, &collection, &strict).unwrap_err();
    assert!(matches!(err, EngineError::NoSignificantResults { .. }));
}

#[test]
fn test_cutoff_removing_every_gene_is_invalid() {
    let (matrix, collection) = small_case();
    let options = AnalysisOptions {
        cutoff: 0.0,
        ..small_options()
    };
    let err = analyze(&matrix, &collection, &options).unwrap_err();
    assert!(matches!(err, EngineError::InvalidInput(_)));
}

#[test]
fn test_evidence_agrees_with_column_genes() {
    let matrix = ScoreMatrix::new(
        s(&["g1", "g2", "g3", "g4"]),
        s(&["a", "b"]),
        vec![
            vec![0.001, 0.9],
            vec![0.2, 0.9],
            vec![0.01, 0.01],
            vec![0.02, 0.02],
        ],
    )
    .unwrap();
    let collection = GeneSetCollection::from_terms(vec![
        Term::new("T", "pair", ["g1", "g2"]),
        Term::new("U", "other", ["g3", "g4"]),
    ]);
    let options = AnalysisOptions {
        cutoff: 0.05,
        significant: 1.0,
        ..small_options()
    };
    let table = analyze(&matrix, &collection, &options).unwrap();
    let row = &table.rows[0];
    assert_eq!(row.term_id, "T");
    assert_eq!(row.evidence, Evidence::Columns(s(&["a"])));
    assert!(!row.evidence.supports("b"));
    assert_eq!(row.column_overlaps, vec![Some(s(&["g1"])), None]);

    let tsv = render_table_tsv(&table);
    let line = tsv.lines().nth(1).unwrap();
    assert!(line.ends_with("\ta\tg1\tNA"), "{line}");
}

use super::*;

fn labels(v: &[&str]) -> Vec<String> {
    v.iter().map(|s| s.to_string()).collect()
}

fn ranked(v: &[&str]) -> RankedList {
    let genes = labels(v);
    let ps: Vec<f64> = (0..genes.len()).map(|i| (i + 1) as f64 / 100.0).collect();
    rank(&genes, &ps, None).unwrap()
}

#[test]
fn test_overlap_stops_at_best_prefix() {
    let r = ranked(&["g1", "g2", "x1", "x2", "x3", "x4", "x5", "g3"]);
    let term = Term::new("T", "t", ["g3", "g2", "g1"]);
    let res = test_term(&r, &term, 20);
    assert_eq!(res.overlap, labels(&["g1", "g2"]));
    assert!(res.p_value < 1.0);
}

#[test]
fn test_terms_keep_input_order() {
    let r = ranked(&["a", "b", "c", "d", "e", "f"]);
    let terms = vec![
        Term::new("late", "late", ["e", "f"]),
        Term::new("none", "none", ["z"]),
        Term::new("early", "early", ["a", "b"]),
    ];
    let res = test_terms(&r, &terms, 10);
    assert_eq!(res.len(), 3);
    assert!(res[2].p_value < res[0].p_value);
    assert_eq!(res[1].p_value, 1.0);
    assert!(res[1].overlap.is_empty());
    assert_eq!(res[2].overlap, labels(&["a", "b"]));
}

#[test]
fn test_columns_rank_independently_with_cutoff() {
    let genes = labels(&["a", "b", "c", "d"]);
    let m = ScoreMatrix::new(
        genes,
        labels(&["rna", "protein"]),
        vec![
            vec![0.001, 0.9],
            vec![0.002, 0.8],
            vec![0.5, 0.001],
            vec![0.6, 0.002],
        ],
    )
    .unwrap();
    let terms = vec![
        Term::new("ab", "ab", ["a", "b"]),
        Term::new("cd", "cd", ["c", "d"]),
    ];
    let cols = test_columns(&m, &terms, 4, 0.1).unwrap();
    assert_eq!(cols.len(), 2);
    assert_eq!(cols[0].column, "rna");
    assert_eq!(cols[0].n_ranked, 2);
    assert_eq!(cols[0].tests[0].overlap, labels(&["a", "b"]));
    assert_eq!(cols[0].tests[1].p_value, 1.0);
    assert_eq!(cols[1].tests[1].overlap, labels(&["c", "d"]));
    assert_eq!(cols[1].tests[0].p_value, 1.0);
}

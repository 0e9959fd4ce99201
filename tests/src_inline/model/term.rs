use super::*;

#[test]
fn test_term_dedups_genes_in_order() {
    let term = Term::new("T1", "Term one", ["A", "B", "A", "C", "B"]);
    assert_eq!(term.genes, vec!["A", "B", "C"]);
    assert_eq!(term.size(), 3);
}

#[test]
fn test_duplicate_ids_merge_into_first() {
    let collection = GeneSetCollection::from_terms(vec![
        Term::new("T1", "first", ["A", "B"]),
        Term::new("T2", "other", ["C"]),
        Term::new("T1", "second", ["B", "D"]),
    ]);
    assert_eq!(collection.len(), 2);
    let t1 = collection.get("T1").unwrap();
    assert_eq!(t1.name, "first");
    assert_eq!(t1.genes, vec!["A", "B", "D"]);
    assert_eq!(collection.terms()[1].id, "T2");
}

#[test]
fn test_gene_universe_is_union_in_first_seen_order() {
    let collection = GeneSetCollection::from_terms(vec![
        Term::new("T1", "t1", ["B", "A"]),
        Term::new("T2", "t2", ["A", "C"]),
    ]);
    assert_eq!(collection.gene_universe(), vec!["B", "A", "C"]);

    let bg = Background::from_collection(&collection);
    assert_eq!(bg.len(), 3);
    assert!(bg.contains("C"));
    assert!(!bg.contains("D"));
}

#[test]
fn test_restrict_term_to_background() {
    let term = Term::new("T1", "t1", ["A", "B", "C"]);
    let bg = Background::new(["C", "A", "Z"]);
    let restricted = term.restricted_to(&bg);
    assert_eq!(restricted.genes, vec!["A", "C"]);
    assert_eq!(restricted.id, "T1");
}

#[test]
fn test_background_intersection() {
    let a = Background::new(["A", "B", "C"]);
    let b = Background::new(["B", "C", "D"]);
    let both = a.intersect(&b);
    assert_eq!(both.len(), 2);
    assert!(both.contains("B") && both.contains("C"));
}

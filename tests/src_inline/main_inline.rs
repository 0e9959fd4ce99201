use super::*;

fn parse(extra: &[&str]) -> RunArgs {
    let mut argv = vec![
        "rankpath", "run", "--scores", "scores.tsv", "--gmt", "sets.gmt", "--out", "out",
    ];
    argv.extend_from_slice(extra);
    let cli = Cli::try_parse_from(argv).unwrap();
    match cli.command {
        Command::Run(args) => args,
    }
}

#[test]
fn test_run_defaults_match_analysis_defaults() {
    let args = parse(&[]);
    let options = build_options(&args, None);
    let defaults = AnalysisOptions::default();
    assert_eq!(options.merge_method, defaults.merge_method);
    assert_eq!(options.covariance_transform, defaults.covariance_transform);
    assert_eq!(options.cutoff, defaults.cutoff);
    assert_eq!(options.significant, defaults.significant);
    assert_eq!(options.correction_method, defaults.correction_method);
    assert_eq!(options.geneset_filter, defaults.geneset_filter);
    assert!(!options.return_all);
    assert_eq!(args.missing, MissingPolicy::Error);
}

#[test]
fn test_run_flags_map_onto_options() {
    let args = parse(&[
        "--merge-method",
        "fisher",
        "--correction-method",
        "fdr",
        "--cutoff",
        "0.5",
        "--no-geneset-filter",
        "--return-all",
        "--missing",
        "drop",
        "--viz-prefix",
        "net_",
    ]);
    let options = build_options(&args, Some(vec!["g1".into()]));
    assert_eq!(options.merge_method, MergeMethod::Fisher);
    assert_eq!(options.correction_method, CorrectionMethod::BenjaminiHochberg);
    assert_eq!(options.cutoff, 0.5);
    assert!(options.geneset_filter.is_none());
    assert!(options.return_all);
    assert_eq!(options.background, Some(vec!["g1".to_string()]));
    assert_eq!(args.missing, MissingPolicy::Drop);
    assert_eq!(args.viz_prefix.as_deref(), Some("net_"));
}

#[test]
fn test_unknown_method_is_rejected() {
    let argv = [
        "rankpath", "run", "--scores", "s", "--gmt", "g", "--out", "o", "--merge-method", "stouffer",
    ];
    assert!(Cli::try_parse_from(argv).is_err());
}

#[test]
fn test_missing_required_flag_is_rejected() {
    assert!(Cli::try_parse_from(["rankpath", "run", "--gmt", "g"]).is_err());
}

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use rankpath::input::{MissingPolicy, read_gene_list, read_gmt, read_scores};
use rankpath::logging::init_logging;
use rankpath::pipeline::stage8_report::{Stage8Input, write_reports};
use rankpath::{
    AnalysisOptions, CorrectionMethod, CovarianceTransform, EngineError, GeneSetFilter,
    MergeMethod, analyze,
};

#[derive(Debug, Parser)]
#[command(name = "rankpath", version)]
#[command(about = "Ranked hypergeometric pathway enrichment over merged gene p-values")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Log level used when RUST_LOG is unset
    #[arg(long, global = true, default_value = "info")]
    log_level: String,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Merge, rank and test every gene set, then write the result table
    Run(RunArgs),
}

#[derive(Debug, Clone, Args)]
struct RunArgs {
    /// Gene-by-dataset p-value matrix (tsv/csv, optionally .gz)
    #[arg(long)]
    scores: PathBuf,

    /// Gene sets in GMT format
    #[arg(long)]
    gmt: PathBuf,

    #[arg(long)]
    out: PathBuf,

    #[arg(long, default_value = "brown")]
    merge_method: MergeMethod,

    #[arg(long, default_value = "empirical")]
    covariance_transform: CovarianceTransform,

    #[arg(long, default_value_t = 0.1)]
    cutoff: f64,

    #[arg(long, default_value_t = 0.05)]
    significant: f64,

    #[arg(long, default_value = "holm")]
    correction_method: CorrectionMethod,

    #[arg(long, default_value_t = 5)]
    min_size: usize,

    #[arg(long, default_value_t = 1000)]
    max_size: usize,

    #[arg(long)]
    no_geneset_filter: bool,

    /// Gene list overriding the default background (union of all gene sets)
    #[arg(long)]
    background: Option<PathBuf>,

    #[arg(long)]
    return_all: bool,

    #[arg(long, default_value = "error")]
    missing: MissingPolicy,

    /// Also write visualisation side files named `<prefix>pathways.txt` etc.
    #[arg(long)]
    viz_prefix: Option<String>,
}

fn main() {
    let cli = Cli::parse();
    init_logging(&cli.log_level);
    if let Err(err) = run(cli) {
        tracing::error!("{err}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), String> {
    match cli.command {
        Command::Run(args) => run_analysis(&args),
    }
}

fn run_analysis(args: &RunArgs) -> Result<(), String> {
    let matrix = read_scores(&args.scores, args.missing).map_err(|e| e.to_string())?;
    let collection = read_gmt(&args.gmt).map_err(|e| e.to_string())?;
    let background = match &args.background {
        Some(path) => Some(read_gene_list(path).map_err(|e| e.to_string())?),
        None => None,
    };
    let options = build_options(args, background);

    let table = match analyze(&matrix, &collection, &options) {
        Ok(table) => table,
        Err(EngineError::NoSignificantResults { threshold }) => {
            tracing::warn!(
                "no significant terms were found at adjusted p <= {threshold}; nothing written"
            );
            return Ok(());
        }
        Err(e) => return Err(e.to_string()),
    };

    write_reports(
        &Stage8Input {
            table: &table,
            options: &options,
            collection: &collection,
            viz_prefix: args.viz_prefix.as_deref(),
        },
        &args.out,
    )
    .map_err(|e| e.to_string())?;

    Ok(())
}

fn build_options(args: &RunArgs, background: Option<Vec<String>>) -> AnalysisOptions {
    AnalysisOptions {
        merge_method: args.merge_method,
        covariance_transform: args.covariance_transform,
        cutoff: args.cutoff,
        significant: args.significant,
        correction_method: args.correction_method,
        geneset_filter: (!args.no_geneset_filter).then_some(GeneSetFilter {
            min_size: args.min_size,
            max_size: args.max_size,
        }),
        background,
        return_all: args.return_all,
    }
}

#[cfg(test)]
#[path = "../tests/src_inline/main_inline.rs"]
mod tests;

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::input::write_gmt;
use crate::model::{AnalysisOptions, EnrichmentTable, GeneSetCollection};
use crate::report::json::{build_summary, render_summary_json};
use crate::report::table::render_table_tsv;
use crate::report::viz::{render_pathways, render_subgroups};

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone)]
pub struct Stage8Input<'a> {
    pub table: &'a EnrichmentTable,
    pub options: &'a AnalysisOptions,
    pub collection: &'a GeneSetCollection,
    pub viz_prefix: Option<&'a str>,
}

#[derive(Debug, Clone, Default)]
pub struct WrittenReports {
    pub table: PathBuf,
    pub summary: PathBuf,
    pub viz: Vec<PathBuf>,
}

pub fn write_reports(input: &Stage8Input<'_>, out_dir: &Path) -> Result<WrittenReports, ReportError> {
    fs::create_dir_all(out_dir)?;

    let table_path = out_dir.join("enriched_pathways.tsv");
    write_text(&table_path, &render_table_tsv(input.table))?;

    let summary_path = out_dir.join("summary.json");
    let summary = build_summary(input.table, input.options);
    write_text(&summary_path, &render_summary_json(&summary)?)?;

    let mut written = WrittenReports {
        table: table_path,
        summary: summary_path,
        viz: Vec::new(),
    };

    if let Some(prefix) = input.viz_prefix {
        written.viz = write_viz_files(input, out_dir, prefix)?;
    }

    tracing::info!(out_dir = %out_dir.display(), rows = input.table.len(), "reports written");
    Ok(written)
}

fn write_viz_files(
    input: &Stage8Input<'_>,
    out_dir: &Path,
    prefix: &str,
) -> Result<Vec<PathBuf>, ReportError> {
    let significant = input.options.significant;

    let pathways = out_dir.join(format!("{prefix}pathways.txt"));
    write_text(&pathways, &render_pathways(input.table, significant))?;

    let subgroups = out_dir.join(format!("{prefix}subgroups.txt"));
    write_text(&subgroups, &render_subgroups(input.table, significant))?;

    let gmt = out_dir.join(format!("{prefix}pathways.gmt"));
    let terms = input
        .table
        .significant_rows(significant)
        .filter_map(|row| input.collection.get(&row.term_id));
    write_gmt(&gmt, terms)?;

    Ok(vec![pathways, subgroups, gmt])
}

fn write_text(path: &Path, content: &str) -> std::io::Result<()> {
    let mut w = BufWriter::new(File::create(path)?);
    w.write_all(content.as_bytes())?;
    w.flush()
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage8_report.rs"]
mod tests;

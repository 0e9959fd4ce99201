use crate::model::EnrichmentTable;
use crate::report::{format_p, join_list, join_optional};

pub fn table_header(table: &EnrichmentTable) -> Vec<String> {
    let mut header: Vec<String> = [
        "term.id",
        "term.name",
        "term.size",
        "adjusted.p.val",
        "overlap",
        "evidence",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();
    for col in &table.columns {
        header.push(format!("Genes_{}", col));
    }
    header
}

/// Tab-separated rendering of the result table, rows in term order.
pub fn render_table_tsv(table: &EnrichmentTable) -> String {
    let mut out = String::new();
    out.push_str(&table_header(table).join("\t"));
    out.push('\n');

    for row in &table.rows {
        let evidence: Vec<String> = row.evidence.labels().iter().map(|s| s.to_string()).collect();
        let mut fields = vec![
            row.term_id.clone(),
            row.term_name.clone(),
            row.term_size.to_string(),
            format_p(row.adjusted_p),
            join_list(&row.overlap),
            join_list(&evidence),
        ];
        for ov in &row.column_overlaps {
            fields.push(join_optional(ov.as_deref()));
        }
        out.push_str(&fields.join("\t"));
        out.push('\n');
    }
    out
}

//! Plain-text side files for network visualisation of significant terms.

use crate::model::{EnrichmentTable, Evidence};
use crate::report::format_p;

/// `term.id`, `term.name`, `adjusted.p.val` for every row passing
/// `significant`.
pub fn render_pathways(table: &EnrichmentTable, significant: f64) -> String {
    let mut out = String::from("term.id\tterm.name\tadjusted.p.val\n");
    for row in table.significant_rows(significant) {
        out.push_str(&format!(
            "{}\t{}\t{}\n",
            row.term_id,
            row.term_name,
            format_p(row.adjusted_p)
        ));
    }
    out
}

/// Binary term-by-dataset support matrix; the trailing `combined` column
/// marks terms found only by the merged ranking.
pub fn render_subgroups(table: &EnrichmentTable, significant: f64) -> String {
    let mut out = String::from("term.id");
    for col in &table.columns {
        out.push('\t');
        out.push_str(col);
    }
    out.push_str("\tcombined\n");

    for row in table.significant_rows(significant) {
        out.push_str(&row.term_id);
        for col in &table.columns {
            out.push('\t');
            out.push(if row.evidence.supports(col) { '1' } else { '0' });
        }
        out.push('\t');
        out.push(if row.evidence == Evidence::Combined {
            '1'
        } else {
            '0'
        });
        out.push('\n');
    }
    out
}

use std::io::Read;
use std::path::Path;

use crate::input::{InputError, open_maybe_gz};

/// Reads gene ids separated by newlines, tabs, commas or spaces. Repeats are
/// dropped, first occurrence wins.
pub fn read_gene_list(path: &Path) -> Result<Vec<String>, InputError> {
    let mut reader = open_maybe_gz(path)?;
    let mut content = String::new();
    reader.read_to_string(&mut content)?;

    let mut seen = std::collections::HashSet::new();
    let mut genes = Vec::new();
    for token in content.split(|c: char| c.is_whitespace() || c == ',') {
        if token.is_empty() {
            continue;
        }
        if seen.insert(token) {
            genes.push(token.to_string());
        }
    }
    if genes.is_empty() {
        return Err(InputError::Parse(format!(
            "gene list {} is empty",
            path.display()
        )));
    }
    Ok(genes)
}

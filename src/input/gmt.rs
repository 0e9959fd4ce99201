use std::fs::File;
use std::io::{BufRead, BufWriter, Write};
use std::path::Path;

use crate::input::{InputError, open_maybe_gz};
use crate::model::{GeneSetCollection, Term};

pub fn read_gmt(path: &Path) -> Result<GeneSetCollection, InputError> {
    let reader = open_maybe_gz(path)?;
    let collection = parse_gmt(reader)?;
    tracing::info!(
        path = %path.display(),
        terms = collection.len(),
        "loaded gene set collection"
    );
    Ok(collection)
}

/// One term per line: `id<TAB>name<TAB>gene<TAB>gene...`.
pub fn parse_gmt<R: BufRead>(mut reader: R) -> Result<GeneSetCollection, InputError> {
    let mut buf = String::new();
    let mut terms = Vec::new();
    let mut line_no = 0usize;

    loop {
        buf.clear();
        let read = reader.read_line(&mut buf)?;
        if read == 0 {
            break;
        }
        line_no += 1;
        let line = buf.trim_end_matches(['\r', '\n']);
        if line.trim().is_empty() {
            continue;
        }
        let cols: Vec<&str> = line.split('\t').collect();
        if cols.len() < 3 {
            return Err(InputError::Parse(format!(
                "gmt line {} has <3 columns",
                line_no
            )));
        }
        let id = cols[0].trim();
        if id.is_empty() {
            return Err(InputError::Parse(format!(
                "gmt line {} has an empty term id",
                line_no
            )));
        }
        let genes = cols[2..]
            .iter()
            .map(|g| g.trim())
            .filter(|g| !g.is_empty())
            .map(str::to_string);
        terms.push(Term::new(id, cols[1].trim(), genes));
    }

    if terms.is_empty() {
        return Err(InputError::Parse("gmt file is empty".to_string()));
    }
    Ok(GeneSetCollection::from_terms(terms))
}

pub fn write_gmt<'a, I>(path: &Path, terms: I) -> std::io::Result<()>
where
    I: IntoIterator<Item = &'a Term>,
{
    let mut w = BufWriter::new(File::create(path)?);
    for term in terms {
        write!(w, "{}\t{}", term.id, term.name)?;
        for gene in &term.genes {
            write!(w, "\t{}", gene)?;
        }
        writeln!(w)?;
    }
    w.flush()
}

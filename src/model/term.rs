use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Term {
    pub id: String,
    pub name: String,
    pub genes: Vec<String>,
}

impl Term {
    /// Builds a term; repeated gene ids keep their first position.
    pub fn new<I, S>(id: impl Into<String>, name: impl Into<String>, genes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for gene in genes {
            let gene = gene.into();
            if seen.insert(gene.clone()) {
                out.push(gene);
            }
        }
        Term {
            id: id.into(),
            name: name.into(),
            genes: out,
        }
    }

    pub fn size(&self) -> usize {
        self.genes.len()
    }

    pub fn gene_set(&self) -> HashSet<&str> {
        self.genes.iter().map(String::as_str).collect()
    }

    pub fn restricted_to(&self, universe: &Background) -> Term {
        Term {
            id: self.id.clone(),
            name: self.name.clone(),
            genes: self
                .genes
                .iter()
                .filter(|g| universe.contains(g))
                .cloned()
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneSetCollection {
    terms: Vec<Term>,
}

impl GeneSetCollection {
    /// Terms sharing an id collapse into the first one: its name is kept and
    /// the genes of later records are appended.
    pub fn from_terms(terms: Vec<Term>) -> Self {
        let mut index: HashMap<String, usize> = HashMap::new();
        let mut out: Vec<Term> = Vec::with_capacity(terms.len());
        for term in terms {
            if let Some(&idx) = index.get(&term.id) {
                tracing::warn!(
                    term_id = %term.id,
                    "duplicate term id; merging gene sets into the first occurrence"
                );
                let existing = &mut out[idx];
                let merged = Term::new(
                    existing.id.clone(),
                    existing.name.clone(),
                    existing.genes.iter().chain(term.genes.iter()).cloned(),
                );
                *existing = merged;
                continue;
            }
            index.insert(term.id.clone(), out.len());
            out.push(term);
        }
        GeneSetCollection { terms: out }
    }

    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Term> {
        self.terms.iter()
    }

    pub fn get(&self, id: &str) -> Option<&Term> {
        self.terms.iter().find(|t| t.id == id)
    }

    /// Union of all term genes in first-seen order.
    pub fn gene_universe(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for term in &self.terms {
            for gene in &term.genes {
                if seen.insert(gene.as_str()) {
                    out.push(gene.clone());
                }
            }
        }
        out
    }
}

impl<'a> IntoIterator for &'a GeneSetCollection {
    type Item = &'a Term;
    type IntoIter = std::slice::Iter<'a, Term>;

    fn into_iter(self) -> Self::IntoIter {
        self.terms.iter()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Background {
    genes: HashSet<String>,
}

impl Background {
    pub fn new<I, S>(genes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Background {
            genes: genes.into_iter().map(Into::into).collect(),
        }
    }

    pub fn from_collection(collection: &GeneSetCollection) -> Self {
        Background::new(collection.gene_universe())
    }

    pub fn contains(&self, gene: &str) -> bool {
        self.genes.contains(gene)
    }

    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    pub fn intersect(&self, other: &Background) -> Background {
        Background {
            genes: self.genes.intersection(&other.genes).cloned().collect(),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/model/term.rs"]
mod tests;

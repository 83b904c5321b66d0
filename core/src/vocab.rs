use crate::TermId;
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};

/// Sorted, deduplicated term universe shared by every vector of an index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Vocabulary {
    terms: Vec<String>,
    #[serde(skip)]
    positions: HashMap<String, TermId>,
}

impl Vocabulary {
    /// Collects every distinct term across `docs`, ordered lexicographically.
    ///
    /// An empty collection yields an empty vocabulary.
    pub fn build<S: AsRef<str>>(docs: &[Vec<S>]) -> Self {
        let set: BTreeSet<&str> = docs
            .iter()
            .flat_map(|doc| doc.iter().map(|t| t.as_ref()))
            .collect();
        let terms: Vec<String> = set.into_iter().map(str::to_string).collect();
        let positions = terms
            .iter()
            .enumerate()
            .map(|(i, t)| (t.clone(), i as TermId))
            .collect();
        Self { terms, positions }
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Vector position of `term`, or `None` when the term was never indexed.
    pub fn position(&self, term: &str) -> Option<TermId> {
        self.positions.get(term).copied()
    }

    pub fn term(&self, id: TermId) -> Option<&str> {
        self.terms.get(id as usize).map(String::as_str)
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// Binary vector with a 1 at the position of every known term in `terms`.
    ///
    /// Unknown terms contribute nothing.
    pub fn indicator<S: AsRef<str>>(&self, terms: &[S]) -> Vec<f32> {
        let mut v = vec![0.0; self.len()];
        for t in terms {
            if let Some(id) = self.position(t.as_ref()) {
                v[id as usize] = 1.0;
            }
        }
        v
    }
}

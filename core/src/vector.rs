//! Projection of term sequences onto a [`Vocabulary`].
//!
//! All three vectorizers emit one number per vocabulary position. Terms that
//! are not in the vocabulary are ignored.

use crate::vocab::Vocabulary;
use crate::{DocId, Error};
use serde::Serialize;

/// Dense vector aligned to a [`Vocabulary`]: position `i` always refers to term `i`.
pub type DocumentVector = Vec<f32>;

/// Turns a normalized term sequence into a [`DocumentVector`].
pub trait Vectorizer {
    /// Returns `None` when the representation is undefined for `terms`.
    fn vectorize(&self, terms: &[String], vocab: &Vocabulary) -> Option<DocumentVector>;

    /// Vectorizes every document of a collection, in order.
    fn vectorize_all(
        &self,
        docs: &[Vec<String>],
        vocab: &Vocabulary,
    ) -> Result<Vec<DocumentVector>, Error> {
        docs.iter()
            .enumerate()
            .map(|(i, terms)| {
                self.vectorize(terms, vocab)
                    .ok_or(Error::EmptyDocument { doc_id: i as DocId })
            })
            .collect()
    }
}

/// Presence flags: 1 where the term occurs at least once.
#[derive(Debug, Clone, Copy, Default)]
pub struct Binary;

impl Vectorizer for Binary {
    fn vectorize(&self, terms: &[String], vocab: &Vocabulary) -> Option<DocumentVector> {
        Some(vocab.indicator(terms))
    }
}

/// Bag-of-words occurrence counts.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawCount;

impl Vectorizer for RawCount {
    fn vectorize(&self, terms: &[String], vocab: &Vocabulary) -> Option<DocumentVector> {
        Some(counts(terms, vocab))
    }
}

/// Collection-wide inverse document frequency, one weight per vocabulary position.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Idf {
    weights: Vec<f32>,
    doc_frequency: Vec<u32>,
    num_docs: u32,
}

impl Idf {
    /// `idf(t) = ln(N / (1 + df(t)))` over the whole collection.
    pub fn fit(docs: &[Vec<String>], vocab: &Vocabulary) -> Self {
        let mut doc_frequency = vec![0u32; vocab.len()];
        let mut seen = vec![false; vocab.len()];
        for terms in docs {
            seen.iter_mut().for_each(|s| *s = false);
            for t in terms {
                if let Some(id) = vocab.position(t) {
                    let id = id as usize;
                    if !seen[id] {
                        seen[id] = true;
                        doc_frequency[id] += 1;
                    }
                }
            }
        }
        let n = docs.len() as f32;
        let weights = doc_frequency
            .iter()
            .map(|&df| (n / (1.0 + df as f32)).ln())
            .collect();
        Self {
            weights,
            doc_frequency,
            num_docs: docs.len() as u32,
        }
    }

    pub fn weights(&self) -> &[f32] {
        &self.weights
    }

    /// Number of documents containing the term at `id`.
    pub fn doc_frequency(&self, id: usize) -> u32 {
        self.doc_frequency.get(id).copied().unwrap_or(0)
    }

    pub fn num_docs(&self) -> u32 {
        self.num_docs
    }
}

/// Length-normalized term frequency scaled by a precomputed [`Idf`].
///
/// Undefined for an empty term sequence.
#[derive(Debug, Clone, Copy)]
pub struct TfIdf<'a> {
    idf: &'a Idf,
}

impl<'a> TfIdf<'a> {
    pub fn new(idf: &'a Idf) -> Self {
        Self { idf }
    }
}

impl Vectorizer for TfIdf<'_> {
    fn vectorize(&self, terms: &[String], vocab: &Vocabulary) -> Option<DocumentVector> {
        if terms.is_empty() {
            return None;
        }
        let total = terms.len() as f32;
        let mut v = counts(terms, vocab);
        for (w, idf) in v.iter_mut().zip(self.idf.weights()) {
            *w = (*w / total) * idf;
        }
        Some(v)
    }
}

fn counts(terms: &[String], vocab: &Vocabulary) -> DocumentVector {
    let mut v = vec![0.0; vocab.len()];
    for t in terms {
        if let Some(id) = vocab.position(t) {
            v[id as usize] += 1.0;
        }
    }
    v
}

#[cfg(test)]
mod tests {
    use super::*;

    fn docs(raw: &[&str]) -> Vec<Vec<String>> {
        raw.iter()
            .map(|d| d.split_whitespace().map(str::to_string).collect())
            .collect()
    }

    #[test]
    fn binary_and_counts() {
        let d = docs(&["B A B", "C"]);
        let vocab = Vocabulary::build(&d);
        assert_eq!(Binary.vectorize(&d[0], &vocab), Some(vec![1.0, 1.0, 0.0]));
        assert_eq!(RawCount.vectorize(&d[0], &vocab), Some(vec![1.0, 2.0, 0.0]));
    }

    #[test]
    fn idf_uses_smoothed_denominator() {
        let d = docs(&["A B", "A", "C", "D"]);
        let vocab = Vocabulary::build(&d);
        let idf = Idf::fit(&d, &vocab);
        assert_eq!(idf.doc_frequency(0), 2);
        assert!((idf.weights()[0] - (4.0f32 / 3.0).ln()).abs() < 1e-6);
        assert!((idf.weights()[1] - 2.0f32.ln()).abs() < 1e-6);
    }

    #[test]
    fn tfidf_weights_by_document_length() {
        let d = docs(&["A A B", "C", "D", "E"]);
        let vocab = Vocabulary::build(&d);
        let idf = Idf::fit(&d, &vocab);
        let v = TfIdf::new(&idf).vectorize(&d[0], &vocab).unwrap();
        let w = 2.0f32.ln();
        assert!((v[0] - (2.0 / 3.0) * w).abs() < 1e-6);
        assert!((v[1] - (1.0 / 3.0) * w).abs() < 1e-6);
        assert_eq!(v[2], 0.0);
    }

    #[test]
    fn tfidf_rejects_empty_documents() {
        let d = docs(&["A", ""]);
        let vocab = Vocabulary::build(&d);
        let idf = Idf::fit(&d, &vocab);
        let err = TfIdf::new(&idf).vectorize_all(&d, &vocab).unwrap_err();
        assert_eq!(err, Error::EmptyDocument { doc_id: 1 });
        // Binary and count vectors stay defined for the same document.
        assert_eq!(Binary.vectorize_all(&d, &vocab).unwrap()[1], vec![0.0]);
    }

    #[test]
    fn vector_length_matches_vocabulary() {
        let d = docs(&["X Y", "Z", "X"]);
        let vocab = Vocabulary::build(&d);
        for v in RawCount.vectorize_all(&d, &vocab).unwrap() {
            assert_eq!(v.len(), vocab.len());
        }
    }
}

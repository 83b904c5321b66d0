//! Per-document evidence for a parsed [`Query`].
//!
//! Each scorer consumes the document vectors produced by its matching
//! vectorizer: [`BooleanMatch`] reads binary vectors, [`CosineSimilarity`]
//! reads TF-IDF vectors and [`FuzzyAlgebraic`] reads raw counts.

use crate::query::{Operator, Query};
use crate::rank::{self, Ranking};
use crate::vector::{DocumentVector, Idf, TfIdf, Vectorizer};
use crate::vocab::Vocabulary;
use crate::Error;

/// Raw scorer output, before ranking.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// One match flag per document.
    Matched(Vec<bool>),
    /// One score per document.
    Scored(Vec<f32>),
}

impl Outcome {
    pub fn into_ranking(self) -> Ranking {
        match self {
            Outcome::Matched(flags) => Ranking::Matches(rank::matches(&flags)),
            Outcome::Scored(scores) => Ranking::Scored(rank::rank(&scores)),
        }
    }
}

/// Scores every document of a collection against one query.
pub trait Scorer {
    fn score(
        &self,
        query: &Query,
        vocab: &Vocabulary,
        docs: &[DocumentVector],
    ) -> Result<Outcome, Error>;
}

/// Strict set matching over binary document vectors.
///
/// Only positions of known query terms are inspected, so a query whose terms
/// are all unknown matches every document under AND and NOT and none under OR.
#[derive(Debug, Clone, Copy, Default)]
pub struct BooleanMatch;

impl Scorer for BooleanMatch {
    fn score(
        &self,
        query: &Query,
        vocab: &Vocabulary,
        docs: &[DocumentVector],
    ) -> Result<Outcome, Error> {
        let qv = vocab.indicator(&query.terms());
        let positions: Vec<usize> = qv
            .iter()
            .enumerate()
            .filter(|&(_, &q)| q > 0.0)
            .map(|(i, _)| i)
            .collect();
        let op = query.operator();
        let flags = docs
            .iter()
            .map(|d| match op {
                Some(Operator::And) => positions.iter().all(|&i| d[i] > 0.0),
                Some(Operator::Not) => positions.iter().all(|&i| d[i] == 0.0),
                Some(Operator::Or) | None => positions.iter().any(|&i| d[i] > 0.0),
            })
            .collect();
        Ok(Outcome::Matched(flags))
    }
}

/// Cosine similarity between a TF-IDF query vector and each document.
///
/// The query is a single bag of terms; operators only delimit operands.
#[derive(Debug, Clone, Copy)]
pub struct CosineSimilarity<'a> {
    idf: &'a Idf,
}

impl<'a> CosineSimilarity<'a> {
    pub fn new(idf: &'a Idf) -> Self {
        Self { idf }
    }
}

impl Scorer for CosineSimilarity<'_> {
    fn score(
        &self,
        query: &Query,
        vocab: &Vocabulary,
        docs: &[DocumentVector],
    ) -> Result<Outcome, Error> {
        let qv = TfIdf::new(self.idf)
            .vectorize(&query.terms(), vocab)
            .ok_or(Error::EmptyQuery)?;
        Ok(Outcome::Scored(docs.iter().map(|d| cosine(&qv, d)).collect()))
    }
}

/// Extended Boolean scoring over raw-count vectors.
///
/// An operand's similarity is the sum of the document's counts for the
/// operand terms divided by the vocabulary size. Two operands combine as
/// `a * b` (AND) or `a + b - a * b` (OR).
#[derive(Debug, Clone, Copy, Default)]
pub struct FuzzyAlgebraic;

impl FuzzyAlgebraic {
    /// Similarity of one document to one operand.
    pub fn similarity(operand: &[f32], doc: &[f32]) -> f32 {
        if operand.is_empty() {
            return 0.0;
        }
        let hits: f32 = operand
            .iter()
            .zip(doc)
            .filter(|&(&q, _)| q > 0.0)
            .map(|(_, &c)| c)
            .sum();
        hits / operand.len() as f32
    }

    pub fn and(a: f32, b: f32) -> f32 {
        a * b
    }

    pub fn or(a: f32, b: f32) -> f32 {
        a + b - a * b
    }
}

impl Scorer for FuzzyAlgebraic {
    fn score(
        &self,
        query: &Query,
        vocab: &Vocabulary,
        docs: &[DocumentVector],
    ) -> Result<Outcome, Error> {
        let scores = match query {
            Query::Terms(terms) => {
                let qv = vocab.indicator(terms);
                docs.iter().map(|d| Self::similarity(&qv, d)).collect()
            }
            Query::Not(_) => {
                return Err(Error::UnsupportedQuery(
                    "NOT has no fuzzy-algebraic combination",
                ))
            }
            Query::And(l, r) | Query::Or(l, r) => {
                if l.len() != 1 || r.len() != 1 {
                    return Err(Error::UnsupportedQuery(
                        "fuzzy AND/OR operands must be single terms",
                    ));
                }
                let combine: fn(f32, f32) -> f32 = match query {
                    Query::And(..) => Self::and,
                    _ => Self::or,
                };
                let (q1, q2) = (vocab.indicator(l), vocab.indicator(r));
                docs.iter()
                    .map(|d| combine(Self::similarity(&q1, d), Self::similarity(&q2, d)))
                    .collect()
            }
        };
        Ok(Outcome::Scored(scores))
    }
}

/// Dot product over the product of Euclidean norms; 0 when either norm is 0.
pub fn cosine(a: &[f32], b: &[f32]) -> f32 {
    let mut dot = 0.0f32;
    let mut na = 0.0f32;
    let mut nb = 0.0f32;
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        na += x * x;
        nb += y * y;
    }
    if na == 0.0 || nb == 0.0 {
        return 0.0;
    }
    (dot / (na.sqrt() * nb.sqrt())).clamp(-1.0, 1.0)
}

use crate::DocId;
use serde::Serialize;

/// A document together with its model-specific relevance score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoredDocument {
    pub doc_id: DocId,
    pub score: f32,
}

/// Final, ordered result of a query.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "hits", rename_all = "lowercase")]
pub enum Ranking {
    /// Matching documents in collection order (strict Boolean model).
    Matches(Vec<DocId>),
    /// Positive-scored documents, best first.
    Scored(Vec<ScoredDocument>),
}

impl Ranking {
    pub fn len(&self) -> usize {
        match self {
            Ranking::Matches(m) => m.len(),
            Ranking::Scored(s) => s.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Document ids in result order.
    pub fn doc_ids(&self) -> Vec<DocId> {
        match self {
            Ranking::Matches(m) => m.clone(),
            Ranking::Scored(s) => s.iter().map(|d| d.doc_id).collect(),
        }
    }

    /// Keeps at most `k` results.
    pub fn truncate(&mut self, k: usize) {
        match self {
            Ranking::Matches(m) => m.truncate(k),
            Ranking::Scored(s) => s.truncate(k),
        }
    }
}

/// Indices of the documents whose flag is set, in collection order.
pub fn matches(flags: &[bool]) -> Vec<DocId> {
    flags
        .iter()
        .enumerate()
        .filter(|&(_, &m)| m)
        .map(|(i, _)| i as DocId)
        .collect()
}

/// Drops non-positive scores and orders the rest.
pub fn rank(scores: &[f32]) -> Vec<ScoredDocument> {
    let mut scored: Vec<ScoredDocument> = scores
        .iter()
        .enumerate()
        .filter(|(_, s)| s.is_finite() && **s > 0.0)
        .map(|(i, &score)| ScoredDocument {
            doc_id: i as DocId,
            score,
        })
        .collect();
    sort(&mut scored);
    scored
}

/// Deterministic order: score desc, then doc_id asc.
pub fn sort(scored: &mut [ScoredDocument]) {
    scored.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| a.doc_id.cmp(&b.doc_id))
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filters_and_orders() {
        let ranked = rank(&[0.2, 0.0, 0.5, -0.1, 0.2, f32::NAN]);
        let ids: Vec<DocId> = ranked.iter().map(|d| d.doc_id).collect();
        assert_eq!(ids, vec![2, 0, 4]);
    }

    #[test]
    fn sorting_is_idempotent() {
        let mut ranked = rank(&[0.3, 0.3, 0.9, 0.1]);
        let once = ranked.clone();
        sort(&mut ranked);
        assert_eq!(ranked, once);
    }

    #[test]
    fn matches_keep_collection_order() {
        assert_eq!(matches(&[true, false, false, true, true]), vec![0, 3, 4]);
        assert!(matches(&[]).is_empty());
    }

    #[test]
    fn truncate_limits_both_kinds() {
        let mut r = Ranking::Matches(vec![1, 2, 3]);
        r.truncate(2);
        assert_eq!(r.doc_ids(), vec![1, 2]);
        let mut r = Ranking::Scored(rank(&[0.1, 0.2]));
        r.truncate(1);
        assert_eq!(r.doc_ids(), vec![1]);
    }
}

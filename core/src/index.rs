use crate::query::Query;
use crate::rank::Ranking;
use crate::score::{BooleanMatch, CosineSimilarity, FuzzyAlgebraic, Scorer};
use crate::vector::{Binary, DocumentVector, Idf, RawCount, TfIdf, Vectorizer};
use crate::vocab::Vocabulary;
use crate::{DocId, Error};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Retrieval model, fixed for the lifetime of an [`Index`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Model {
    /// Strict Boolean matching over presence flags.
    #[default]
    Boolean,
    /// TF-IDF vectors ranked by cosine similarity.
    Cosine,
    /// Raw counts ranked by fuzzy-algebraic AND/OR.
    Fuzzy,
}

impl Model {
    pub const ALL: [Model; 3] = [Model::Boolean, Model::Cosine, Model::Fuzzy];

    pub fn as_str(&self) -> &'static str {
        match self {
            Model::Boolean => "boolean",
            Model::Cosine => "cosine",
            Model::Fuzzy => "fuzzy",
        }
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Model {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "boolean" | "bool" => Ok(Model::Boolean),
            "cosine" | "tfidf" | "tf-idf" => Ok(Model::Cosine),
            "fuzzy" | "extended" => Ok(Model::Fuzzy),
            other => Err(format!("unknown model `{other}`")),
        }
    }
}

/// Immutable document index for one [`Model`].
///
/// Build order is fixed: vocabulary, then IDF, then one vector per document.
#[derive(Debug, Clone)]
pub struct Index {
    model: Model,
    vocab: Vocabulary,
    idf: Idf,
    vectors: Vec<DocumentVector>,
}

impl Index {
    /// Builds an index from every document's normalized term sequence.
    ///
    /// Under [`Model::Cosine`] a document without terms fails with
    /// [`Error::EmptyDocument`].
    pub fn build(docs: &[Vec<String>], model: Model) -> Result<Self, Error> {
        let vocab = Vocabulary::build(docs);
        let idf = Idf::fit(docs, &vocab);
        let vectors = match model {
            Model::Boolean => Binary.vectorize_all(docs, &vocab)?,
            Model::Cosine => TfIdf::new(&idf).vectorize_all(docs, &vocab)?,
            Model::Fuzzy => RawCount.vectorize_all(docs, &vocab)?,
        };
        tracing::debug!(
            %model,
            num_docs = docs.len(),
            num_terms = vocab.len(),
            "built index"
        );
        Ok(Self {
            model,
            vocab,
            idf,
            vectors,
        })
    }

    /// Evaluates a parsed query against every document.
    pub fn search(&self, query: &Query) -> Result<Ranking, Error> {
        let outcome = match self.model {
            Model::Boolean => BooleanMatch.score(query, &self.vocab, &self.vectors)?,
            Model::Cosine => {
                CosineSimilarity::new(&self.idf).score(query, &self.vocab, &self.vectors)?
            }
            Model::Fuzzy => FuzzyAlgebraic.score(query, &self.vocab, &self.vectors)?,
        };
        let ranking = outcome.into_ranking();
        tracing::debug!(model = %self.model, %query, hits = ranking.len(), "evaluated query");
        Ok(ranking)
    }

    /// Parses `input` with [`Query::parse`] and evaluates it.
    pub fn search_str(&self, input: &str) -> Result<Ranking, Error> {
        self.search(&Query::parse(input)?)
    }

    pub fn model(&self) -> Model {
        self.model
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocab
    }

    pub fn idf(&self) -> &Idf {
        &self.idf
    }

    pub fn num_docs(&self) -> usize {
        self.vectors.len()
    }

    pub fn vector(&self, doc_id: DocId) -> Option<&DocumentVector> {
        self.vectors.get(doc_id as usize)
    }
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
    fn model_parsing() {
        assert_eq!("Cosine".parse::<Model>(), Ok(Model::Cosine));
        assert_eq!("tf-idf".parse::<Model>(), Ok(Model::Cosine));
        assert_eq!("fuzzy".parse::<Model>(), Ok(Model::Fuzzy));
        assert!("bm25".parse::<Model>().is_err());
        for m in Model::ALL {
            assert_eq!(m.to_string().parse::<Model>(), Ok(m));
        }
    }

    #[test]
    fn empty_collection_builds() {
        for model in Model::ALL {
            let index = Index::build(&[], model).unwrap();
            assert_eq!(index.num_docs(), 0);
            assert!(index.vocabulary().is_empty());
            assert!(index.search_str("anything").unwrap().is_empty());
        }
    }

    #[test]
    fn empty_document_only_fails_under_tfidf() {
        let d = docs(&["A B", ""]);
        assert_eq!(
            Index::build(&d, Model::Cosine).unwrap_err(),
            Error::EmptyDocument { doc_id: 1 }
        );
        let index = Index::build(&d, Model::Boolean).unwrap();
        assert_eq!(index.vector(1), Some(&vec![0.0, 0.0]));
        assert!(Index::build(&d, Model::Fuzzy).is_ok());
    }

    #[test]
    fn every_vector_matches_vocabulary_length() {
        let d = docs(&["A B C", "C D", "E"]);
        for model in Model::ALL {
            let index = Index::build(&d, model).unwrap();
            for id in 0..index.num_docs() {
                assert_eq!(index.vector(id as DocId).unwrap().len(), index.vocabulary().len());
            }
        }
    }

    #[test]
    fn index_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Index>();

        let index = Index::build(&docs(&["A", "B", "A B"]), Model::Boolean).unwrap();
        let index = std::sync::Arc::new(index);
        let handles: Vec<_> = ["a", "b", "a and b"]
            .into_iter()
            .map(|q| {
                let index = index.clone();
                std::thread::spawn(move || index.search_str(q).unwrap().doc_ids())
            })
            .collect();
        let results: Vec<Vec<DocId>> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(results, vec![vec![0, 2], vec![1, 2], vec![2]]);
    }
}

//! Vector-space ranking of a fixed document collection.
//!
//! Documents arrive as normalized term sequences (see [`normalize`]), are
//! projected onto a sorted [`Vocabulary`], and are scored against a parsed
//! [`Query`] by one of three models:
//!
//! - [`Model::Boolean`]: strict set matching over binary vectors, no ranking.
//! - [`Model::Cosine`]: TF-IDF weighted vectors compared by cosine similarity.
//! - [`Model::Fuzzy`]: raw-count vectors combined with fuzzy-algebraic AND/OR.
//!
//! The [`Index`] is built once and is read-only afterwards, so a single value
//! can serve any number of concurrent queries.

pub mod index;
pub mod normalize;
pub mod query;
pub mod rank;
pub mod score;
pub mod source;
pub mod vector;
pub mod vocab;

pub use error::Error;
pub use index::{Index, Model};
pub use query::{Operator, Query};
pub use rank::{Ranking, ScoredDocument};
pub use vector::DocumentVector;
pub use vocab::Vocabulary;

/// Position of a term in the [`Vocabulary`].
pub type TermId = u32;
/// 0-based position of a document in the original collection.
pub type DocId = u32;

mod error {
    use crate::DocId;

    /// Errors raised while building an index or evaluating a query.
    #[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
    pub enum Error {
        /// A document normalized to zero terms, so its term frequencies are undefined.
        #[error("document {doc_id} has no terms")]
        EmptyDocument {
            /// Index of the offending document.
            doc_id: DocId,
        },
        /// The query had no operand terms.
        #[error("empty query")]
        EmptyQuery,
        /// The query shape is not expressible in the active model.
        #[error("unsupported query: {0}")]
        UnsupportedQuery(&'static str),
    }
}

//! Text normalization into index terms.
//!
//! The index only ever sees the output of a [`Normalizer`]; any analyzer that
//! produces consistent terms for documents and queries can be plugged in.

use lazy_static::lazy_static;
use regex::Regex;
use rust_stemmers::{Algorithm, Stemmer};
use std::collections::HashSet;
use unicode_normalization::UnicodeNormalization;

lazy_static! {
    static ref RE: Regex = Regex::new(r"(?u)\p{L}[\p{L}\p{N}_']*").expect("valid regex");
    static ref STEMMER: Stemmer = Stemmer::create(Algorithm::English);
    static ref STOPWORDS: HashSet<&'static str> = {
        let words: &[&str] = &[
            "a","about","above","after","again","against","all","am","an","and","any","are","aren't","as","at",
            "be","because","been","before","being","below","between","both","but","by",
            "can","can't","cannot","could","couldn't",
            "did","didn't","do","does","doesn't","doing","don't","down","during",
            "each","few","for","from","further",
            "had","hadn't","has","hasn't","have","haven't","having","he","he'd","he'll","he's","her","here","here's","hers","herself","him","himself","his","how","how's",
            "i","i'd","i'll","i'm","i've","if","in","into","is","isn't","it","it's","its","itself",
            "let's","me","more","most","mustn't","my","myself",
            "no","nor","not","of","off","on","once","only","or","other","ought","our","ours","ourselves","out","over","own",
            "same","she","she'd","she'll","she's","should","shouldn't","so","some","such",
            "than","that","that's","the","their","theirs","them","themselves","then","there","there's","these","they","they'd","they'll","they're","they've","this","those","through","to","too",
            "under","until","up","very",
            "was","wasn't","we","we'd","we'll","we're","we've","were","weren't","what","what's","when","when's","where","where's","which","while","who","who's","whom","why","why's","with","won't","would","wouldn't",
            "you","you'd","you'll","you're","you've","your","yours","yourself","yourselves"
        ];
        words.iter().copied().collect()
    };
}

/// Turns raw text into the ordered term sequence the index consumes.
pub trait Normalizer: Send + Sync {
    /// Normalizes a document or a single query token.
    fn normalize(&self, text: &str) -> Vec<String>;
}

/// NFKC folding, stop-word removal, English stemming, upper-cased output.
#[derive(Debug, Clone, Copy, Default)]
pub struct StemNormalizer;

impl Normalizer for StemNormalizer {
    fn normalize(&self, text: &str) -> Vec<String> {
        let folded = text.nfkc().collect::<String>().to_lowercase();
        RE.find_iter(&folded)
            .map(|m| m.as_str())
            .filter(|token| !is_stopword(token))
            .map(|token| STEMMER.stem(token).to_uppercase())
            .collect()
    }
}

/// Splits on whitespace and upper-cases; no stemming or stop words.
///
/// Useful when the input is already a list of normalized terms.
#[derive(Debug, Clone, Copy, Default)]
pub struct Whitespace;

impl Normalizer for Whitespace {
    fn normalize(&self, text: &str) -> Vec<String> {
        text.split_whitespace().map(str::to_uppercase).collect()
    }
}

fn is_stopword(token: &str) -> bool {
    STOPWORDS.contains(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stems_and_uppercases() {
        let t = StemNormalizer.normalize("Running, runner's run!");
        assert!(t.iter().any(|w| w == "RUN"));
        assert!(t.iter().all(|w| w.chars().all(|c| !c.is_lowercase())));
    }

    #[test]
    fn query_terms_share_document_forms() {
        let doc = StemNormalizer.normalize("quantum technologies");
        let term = StemNormalizer.normalize("TECHNOLOGY");
        assert_eq!(term.len(), 1);
        assert!(doc.contains(&term[0]));
        assert!(StemNormalizer.normalize("the").is_empty());
    }

    #[test]
    fn whitespace_keeps_every_token() {
        assert_eq!(Whitespace.normalize("ai and  Robots"), vec!["AI", "AND", "ROBOTS"]);
    }
}

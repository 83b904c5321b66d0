//! Loading a document collection from disk.
//!
//! Plain files become one document each. `.json` files hold one record or an
//! array of records, `.jsonl` files one record per line.

use crate::normalize::Normalizer;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::Path;
use walkdir::WalkDir;

/// Raw document handed to a normalizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Display name: the record id, or the file path for plain files.
    pub name: String,
    pub text: String,
}

#[derive(Debug, Deserialize)]
struct InputDoc {
    id: String,
    #[serde(default)]
    title: Option<String>,
    body: String,
}

impl From<InputDoc> for Document {
    fn from(doc: InputDoc) -> Self {
        let text = match doc.title {
            Some(title) => format!("{title}\n{}", doc.body),
            None => doc.body,
        };
        Document { name: doc.id, text }
    }
}

/// Extracts the full text of one file.
pub trait TextSource {
    fn extract(&self, path: &Path) -> Result<String>;
}

/// Reads files as UTF-8 text.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainText;

impl TextSource for PlainText {
    fn extract(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
    }
}

/// Loads every document under `path` (a file or a directory).
///
/// Directories are walked recursively in file-name order so the resulting
/// document indices are stable across runs. Hidden files and hidden
/// directories (and everything below them) are skipped.
pub fn load_corpus(path: &Path, source: &dyn TextSource) -> Result<Vec<Document>> {
    let mut docs = Vec::new();
    if path.is_dir() {
        let walker = WalkDir::new(path)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_hidden(e.path()));
        for entry in walker {
            let entry = entry?;
            if entry.file_type().is_file() {
                load_file(entry.path(), source, &mut docs)?;
            }
        }
    } else {
        load_file(path, source, &mut docs)?;
    }
    tracing::debug!(path = %path.display(), num_docs = docs.len(), "loaded corpus");
    Ok(docs)
}

/// Normalized collection ready for [`crate::Index::build`].
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    /// Document names, aligned with `terms`.
    pub names: Vec<String>,
    pub terms: Vec<Vec<String>>,
}

impl Corpus {
    /// Normalizes every document.
    ///
    /// With `skip_empty`, documents that normalize to no terms are dropped
    /// and the rest are renumbered densely.
    pub fn normalize(docs: Vec<Document>, normalizer: &dyn Normalizer, skip_empty: bool) -> Self {
        let mut corpus = Corpus::default();
        for doc in docs {
            let terms = normalizer.normalize(&doc.text);
            if skip_empty && terms.is_empty() {
                tracing::warn!(name = %doc.name, "skipping document without terms");
                continue;
            }
            corpus.names.push(doc.name);
            corpus.terms.push(terms);
        }
        corpus
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

fn load_file(path: &Path, source: &dyn TextSource, docs: &mut Vec<Document>) -> Result<()> {
    match path.extension().and_then(|s| s.to_str()) {
        Some("jsonl") => {
            let reader = BufReader::new(File::open(path)?);
            for (n, line) in reader.lines().enumerate() {
                let line = line?;
                if line.trim().is_empty() {
                    continue;
                }
                let doc: InputDoc = serde_json::from_str(&line)
                    .with_context(|| format!("{}:{}", path.display(), n + 1))?;
                docs.push(doc.into());
            }
        }
        Some("json") => {
            let reader = BufReader::new(File::open(path)?);
            let json: serde_json::Value = serde_json::from_reader(reader)
                .with_context(|| format!("parsing {}", path.display()))?;
            match json {
                serde_json::Value::Array(arr) => {
                    for v in arr {
                        let doc: InputDoc = serde_json::from_value(v)?;
                        docs.push(doc.into());
                    }
                }
                other => {
                    let doc: InputDoc = serde_json::from_value(other)?;
                    docs.push(doc.into());
                }
            }
        }
        _ => docs.push(Document {
            name: path.display().to_string(),
            text: source.extract(path)?,
        }),
    }
    Ok(())
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with('.'))
}

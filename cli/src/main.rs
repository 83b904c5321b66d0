use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing_subscriber::{fmt, EnvFilter};
use vecrank::normalize::{Normalizer, StemNormalizer, Whitespace};
use vecrank::source::{load_corpus, Corpus, PlainText};
use vecrank::{Index, Model, Query, Ranking};

use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "vecrank")]
#[command(
    about = "Rank a document collection with Boolean, TF-IDF or fuzzy retrieval",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum AnalyzerArg {
    /// Stop words removed, English stemming, upper-cased
    Stem,
    /// Whitespace split, upper-cased
    Whitespace,
}

impl AnalyzerArg {
    fn normalizer(self) -> Box<dyn Normalizer> {
        match self {
            AnalyzerArg::Stem => Box::new(StemNormalizer),
            AnalyzerArg::Whitespace => Box::new(Whitespace),
        }
    }
}

#[derive(clap::Args)]
struct CorpusArgs {
    /// Input path (file or directory)
    #[arg(long)]
    input: PathBuf,
    /// Text analyzer applied to documents and query terms
    #[arg(long, value_enum, default_value = "stem")]
    analyzer: AnalyzerArg,
    /// Drop documents that normalize to no terms instead of failing
    #[arg(long, default_value_t = false)]
    skip_empty: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank the collection against a query
    Search {
        #[command(flatten)]
        corpus: CorpusArgs,
        /// Retrieval model: boolean, cosine or fuzzy
        #[arg(long, default_value = "cosine")]
        model: Model,
        /// Maximum number of results to print
        #[arg(short = 'k', long, default_value_t = 10)]
        limit: usize,
        /// Print results as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
        /// Query, e.g. `quantum`, `not quantum`, `technology or quantum`
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },
    /// Print the vocabulary with document frequencies
    Vocab {
        #[command(flatten)]
        corpus: CorpusArgs,
    },
}

#[derive(Serialize)]
struct SearchOutput<'a> {
    query: String,
    model: Model,
    total_hits: usize,
    results: Vec<Hit<'a>>,
}

#[derive(Serialize)]
struct Hit<'a> {
    doc_id: u32,
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    score: Option<f32>,
}

fn main() -> Result<()> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Search { corpus, model, limit, json, query } => {
            search(&corpus, model, limit, json, &query.join(" "))
        }
        Commands::Vocab { corpus } => vocab(&corpus),
    }
}

fn load(args: &CorpusArgs) -> Result<(Corpus, Box<dyn Normalizer>)> {
    let docs = load_corpus(&args.input, &PlainText)?;
    let normalizer = args.analyzer.normalizer();
    let corpus = Corpus::normalize(docs, normalizer.as_ref(), args.skip_empty);
    tracing::info!(input = %args.input.display(), num_docs = corpus.len(), "loaded documents");
    Ok((corpus, normalizer))
}

fn search(
    args: &CorpusArgs,
    model: Model,
    limit: usize,
    json: bool,
    raw_query: &str,
) -> Result<()> {
    let (corpus, normalizer) = load(args)?;
    let index = Index::build(&corpus.terms, model)?;
    tracing::info!(%model, num_terms = index.vocabulary().len(), "index built");

    let query = Query::parse(raw_query)?.normalize_terms(|t| normalizer.normalize(t))?;
    let mut ranking = index.search(&query)?;
    let total_hits = ranking.len();
    ranking.truncate(limit);

    let results: Vec<Hit> = match &ranking {
        Ranking::Matches(ids) => ids
            .iter()
            .map(|&doc_id| Hit { doc_id, name: &corpus.names[doc_id as usize], score: None })
            .collect(),
        Ranking::Scored(scored) => scored
            .iter()
            .map(|d| Hit {
                doc_id: d.doc_id,
                name: &corpus.names[d.doc_id as usize],
                score: Some(d.score),
            })
            .collect(),
    };

    if json {
        let out = SearchOutput { query: query.to_string(), model, total_hits, results };
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!("{model}: {query} ({total_hits} hits)");
    for (rank, hit) in results.iter().enumerate() {
        match hit.score {
            Some(score) => {
                println!("{:>4}  {:>6}  {:.6}  {}", rank + 1, hit.doc_id, score, hit.name)
            }
            None => println!("{:>6}  {}", hit.doc_id, hit.name),
        }
    }
    Ok(())
}

fn vocab(args: &CorpusArgs) -> Result<()> {
    let (corpus, _) = load(args)?;
    let index = Index::build(&corpus.terms, Model::Boolean)?;
    for (pos, term) in index.vocabulary().terms().iter().enumerate() {
        println!("{pos:>6}  {:>6}  {term}", index.idf().doc_frequency(pos));
    }
    Ok(())
}

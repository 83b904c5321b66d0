use anyhow::Result;
use axum::Router;
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, EnvFilter};
use vecrank::normalize::StemNormalizer;
use vecrank::source::{load_corpus, Corpus, PlainText};
use vecrank::Model;
use vecrank_server::{build_app, AppState};

#[derive(Parser)]
struct Args {
    /// Input path (file or directory)
    #[arg(long)]
    input: PathBuf,
    /// Retrieval model: boolean, cosine or fuzzy
    #[arg(long, default_value = "cosine")]
    model: Model,
    /// Drop documents that normalize to no terms instead of failing
    #[arg(long, default_value_t = false)]
    skip_empty: bool,
    /// Host to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,
    /// Port to bind
    #[arg(long, default_value_t = 8080)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();

    let docs = load_corpus(&args.input, &PlainText)?;
    let corpus = Corpus::normalize(docs, &StemNormalizer, args.skip_empty);
    tracing::info!(input = %args.input.display(), num_docs = corpus.len(), "loaded documents");
    let state = AppState::build(corpus, args.model, Arc::new(StemNormalizer))?;
    let app: Router = build_app(state);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "server listening");
    axum::serve(listener, app).await?;
    Ok(())
}

use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pairquiz::{
    config::SessionConfig, corpus::CorpusSource, scoring::SpeedScorer, state::AppState,
};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present (before any env var reads)
    if let Err(e) = dotenvy::dotenv() {
        // Not an error if .env doesn't exist, only log if it's a different issue
        if !matches!(e, dotenvy::Error::Io(_)) {
            eprintln!("Warning: Failed to load .env file: {}", e);
        }
    }

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pairquiz=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting pairquiz...");

    let config = SessionConfig::from_env();
    tracing::info!(
        "Matches start at {} players, {} rounds of {}s, questions from {}",
        config.min_players,
        config.round_count,
        config.round_seconds,
        config.questions_csv.display()
    );

    let addr = config.bind_addr;
    let corpus = CorpusSource::File(config.questions_csv.clone());
    let state = Arc::new(AppState::spawn(
        config,
        corpus,
        Box::new(SpeedScorer::default()),
    ));

    let app = pairquiz::app(state);

    tracing::info!("Listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await
}

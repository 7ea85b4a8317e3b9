use std::sync::{Arc, Mutex};

use anyhow::Context;
use axum::routing::get;
use axum::Router;
use clap::Parser;
use tower_http::cors::{Any, CorsLayer};
use url::Url;

use card_cache::{ResponseCache, DEFAULT_CACHE_BYTES};
use card_stats::AggregatePolicy;
use card_upstream::{UpstreamClient, UpstreamConfig};

mod error;
mod handlers;

/// Shared per-process state: the upstream client and the injected response
/// cache. No other state outlives a request.
pub(crate) struct AppState {
    client: UpstreamClient,
    cache: Mutex<ResponseCache>,
    policy: AggregatePolicy,
}

#[derive(Parser, Debug)]
#[clap(name = "card-server")]
#[clap(about = "Serve language-learning stats cards as SVG", long_about = None)]
struct Cli {
    /// Port to listen on
    #[clap(long, env = "PORT", default_value_t = 8080)]
    port: u16,

    /// Address to bind
    #[clap(long, default_value = "0.0.0.0")]
    host: String,

    /// Override the profile API base URL
    #[clap(long)]
    api_base: Option<Url>,

    /// Override the flag asset base URL
    #[clap(long)]
    flag_base: Option<Url>,

    /// Response cache bound in bytes
    #[clap(long, default_value_t = DEFAULT_CACHE_BYTES)]
    cache_bytes: usize,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = UpstreamConfig::default();
    if let Some(api_base) = cli.api_base {
        config.api_base = api_base;
    }
    if let Some(flag_base) = cli.flag_base {
        config.flag_base = flag_base;
    }

    let state = Arc::new(AppState {
        client: UpstreamClient::new(config).context("building upstream client")?,
        cache: Mutex::new(ResponseCache::new("responses", cli.cache_bytes)),
        policy: AggregatePolicy::default(),
    });

    let app = Router::new()
        .route("/", get(handlers::no_content))
        .route("/favicon.ico", get(handlers::no_content))
        .route("/:identifier", get(handlers::card))
        .route("/:identifier/s", get(handlers::card_with_specials))
        .layer(CorsLayer::new().allow_origin(Any))
        .with_state(state);

    let addr = format!("{}:{}", cli.host, cli.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    log::info!("server: listening on {addr}");
    axum::serve(listener, app).await?;
    Ok(())
}

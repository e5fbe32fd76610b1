//! OpenSASE Storefront - listing gateway over the storefront backend

use anyhow::Result;
use opensase_storefront::client::StorefrontClient;
use opensase_storefront::config::Config;
use opensase_storefront::domain::store::{CartStore, SessionStore};
use opensase_storefront::gateway::{router, AppState};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry().with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into())).with(tracing_subscriber::fmt::layer()).init();
    let config = Config::from_env()?;
    let session = match &config.session_file {
        Some(path) => SessionStore::with_file(path)?,
        None => SessionStore::new(),
    };
    let client = StorefrontClient::new(&config, Arc::new(session), Arc::new(CartStore::new()))?;
    let state = AppState { source: Arc::new(client), page_size: config.page_size, shipping: config.shipping };

    tracing::info!(api = %config.api_url, "🚀 OpenSASE Storefront listening on 0.0.0.0:{}", config.port);
    axum::serve(tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await?, router(state)).await?;
    Ok(())
}

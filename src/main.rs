//! Shoplite - storefront catalog and order service

use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use shoplite::catalog::{CatalogStore, FileCatalog, GithubCatalog};
use shoplite::db::FileDb;
use shoplite::http::{self, AppState};
use shoplite::Config;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    tokio::fs::create_dir_all(&config.upload_dir).await?;
    let db = FileDb::open(&config.database_file);

    // Catalog backend: GitHub-hosted when credentials are configured,
    // otherwise the local database file.
    let catalog: Arc<dyn CatalogStore> = match &config.github {
        Some(gh) => {
            tracing::info!(repo = %gh.repo, path = %gh.path, "using GitHub catalog backend");
            Arc::new(GithubCatalog::new(gh.clone())?)
        }
        None => Arc::new(FileCatalog::new(db.clone())),
    };

    let port = config.port;
    let state = AppState { db, catalog, config: Arc::new(config), started: Instant::now() };
    let app = http::router(state);

    tracing::info!("shoplite listening on 0.0.0.0:{}", port);
    axum::serve(tokio::net::TcpListener::bind(format!("0.0.0.0:{port}")).await?, app).await?;
    Ok(())
}

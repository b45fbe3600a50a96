//! Kindra API Server
//!
//! Main entry point for the Kindra backend service.

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use kindra_api::{AppState, create_router};
use kindra_core::storage::{StorageConfig, StorageProvider, StorageService};
use kindra_db::connect;
use kindra_shared::config::StorageSettings;
use kindra_shared::{AppConfig, JwtConfig, JwtService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kindra=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load().context("Failed to load configuration")?;

    // Connect to database
    let db = connect(&config.database.url).await?;
    info!("Connected to database");

    // Create JWT service
    let jwt_service = JwtService::new(JwtConfig {
        secret: config.jwt.secret.clone(),
        #[allow(clippy::cast_possible_wrap)]
        access_token_expiry_secs: config.jwt.access_token_expiry_secs as i64,
    });

    // Create storage service when configured
    let storage = match &config.storage {
        Some(settings) => {
            let service = build_storage(settings).context("Failed to initialize storage")?;
            info!(provider = settings.provider, "Image storage configured");
            Some(Arc::new(service))
        }
        None => {
            info!("Image storage not configured; uploads disabled");
            None
        }
    };

    // Create application state
    let state = AppState {
        db: Arc::new(db),
        jwt_service: Arc::new(jwt_service),
        storage,
    };

    // Create router
    let app = create_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Builds the storage service from the loaded settings.
fn build_storage(settings: &StorageSettings) -> anyhow::Result<StorageService> {
    let provider = match settings.provider.as_str() {
        "s3" => StorageProvider::s3(
            settings.endpoint.clone().context("storage.endpoint missing")?,
            settings.bucket.clone().context("storage.bucket missing")?,
            settings
                .access_key_id
                .clone()
                .context("storage.access_key_id missing")?,
            settings
                .secret_access_key
                .clone()
                .context("storage.secret_access_key missing")?,
            settings.region.clone().unwrap_or_else(|| "auto".to_string()),
        ),
        "fs" => StorageProvider::local_fs(
            settings.root.clone().context("storage.root missing")?,
        ),
        other => anyhow::bail!("unknown storage provider '{other}'"),
    };

    let config = StorageConfig::new(provider, settings.public_base_url.clone());
    Ok(StorageService::from_config(config)?)
}

mod channel;
mod docs;
mod errors;
mod handlers;
mod health;
mod http;
mod router;
mod setup;

use crate::{
    channel::repository::ChannelRepository,
    router::build_router,
    setup::{shutdown_signal, AppConfig},
};
use std::{error::Error, net::SocketAddr};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

pub type BoxedError = Box<dyn Error + Send + Sync>;

pub const ENCODING_FAILED_BODY: &[u8] =
    br#"{"message":"Failed to encode the response body","error_code":50002}"#;

const DEFAULT_LOG_FILTER: &str = "tv_channel_directory=info,tower_http=info";

async fn body() -> Result<(), BoxedError> {
    #[cfg(feature = "dotenv")]
    dotenvy::dotenv().ok();

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    #[cfg(feature = "json-log")]
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .json()
        .try_init()?;

    #[cfg(not(feature = "json-log"))]
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .try_init()?;

    let config = AppConfig::from_env()?;

    #[cfg(feature = "postgres")]
    let channel_repo = {
        let repo = crate::channel::postgres_repository::PostgresChannelRepository::connect(
            &config.database_url,
            config.db_max_connections,
        )
        .await?;
        tracing::info!("Connected to the postgres channel store");
        repo
    };

    #[cfg(not(feature = "postgres"))]
    let channel_repo = {
        tracing::warn!("Using the in-memory channel store, records will not outlive the process");
        crate::channel::memory_repository::InMemoryChannelRepository::new()
    };

    let docs = if config.docs_enabled {
        tracing::info!("Interactive API documentation served at /api-docs");
        Some(docs::openapi(&config.public_url))
    } else {
        None
    };

    #[allow(unused_mut)]
    let mut app = build_router(channel_repo.clone(), docs);

    #[cfg(feature = "http-cors")]
    {
        app = setup::setup_app_cors(app, config.cors_max_age);
    }

    let listener = TcpListener::bind(SocketAddr::from(([0, 0, 0, 0], config.port))).await?;
    tracing::info!(port = config.port, "Server listening");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    channel_repo.close().await;
    tracing::info!("Channel store closed");

    Ok(())
}

fn main() -> Result<(), BoxedError> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("Failed building the Runtime")
        .block_on(body())
}

use crate::errors::ApiError;
use axum::{body::Body, http::Response, response::IntoResponse};
use std::{
    env,
    fmt::{Debug, Display},
    str::FromStr,
};
use tower_http::catch_panic::ResponseForPanic;

#[derive(Debug, Default, Clone, Copy)]
pub struct JsonPanicHandler;

impl ResponseForPanic for JsonPanicHandler {
    type ResponseBody = Body;

    fn response_for_panic(
        &mut self,
        err: Box<dyn std::any::Any + Send + 'static>,
    ) -> Response<Self::ResponseBody> {
        if let Some(s) = err.downcast_ref::<String>() {
            tracing::error!("Service panicked: {}", s);
        } else if let Some(s) = err.downcast_ref::<&str>() {
            tracing::error!("Service panicked: {}", s);
        } else {
            tracing::error!(
                "Service panicked but `CatchPanic` was unable to downcast the panic info"
            );
        }

        ApiError::ServicePanicked.into_response()
    }
}

#[cfg(feature = "http-cors")]
use axum::routing::Router;

#[cfg(feature = "http-cors")]
pub fn setup_app_cors(app: Router, max_age: u64) -> Router {
    use std::time::Duration;
    use tower_http::cors::{
        AllowHeaders, AllowMethods, AllowOrigin, AllowPrivateNetwork, CorsLayer, ExposeHeaders,
        MaxAge,
    };

    app.layer(
        CorsLayer::new()
            .allow_headers(AllowHeaders::any())
            .allow_methods(AllowMethods::any())
            .allow_origin(AllowOrigin::any())
            .allow_private_network(AllowPrivateNetwork::yes())
            .expose_headers(ExposeHeaders::any())
            .max_age(MaxAge::exact(Duration::from_secs(max_age))),
    )
}

#[derive(thiserror::Error)]
pub enum VarError {
    #[error("The environment variable \"{0}\" was not provided")]
    NotProvided(&'static str),
    #[error("The environment variable \"{0}\" could not be parsed")]
    Invalid(&'static str),
}

impl Debug for VarError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self, f)
    }
}

pub fn env_param<T: FromStr>(key: &'static str) -> Result<T, VarError> {
    impl VarError {
        fn from_std(err: env::VarError, key: &'static str) -> Self {
            match err {
                env::VarError::NotPresent => Self::NotProvided(key),
                env::VarError::NotUnicode(_) => Self::Invalid(key),
            }
        }
    }

    match env::var(key) {
        Ok(v) => T::from_str(&v).map_err(|_| VarError::Invalid(key)),
        Err(err) => Err(VarError::from_std(err, key)),
    }
}

/// Like [`env_param`], but an absent variable yields `default`. A present
/// but unparsable one is still an error.
pub fn env_param_or<T: FromStr>(key: &'static str, default: T) -> Result<T, VarError> {
    match env_param(key) {
        Err(VarError::NotProvided(_)) => Ok(default),
        res => res,
    }
}

/// Everything the process reads from the environment, loaded once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub docs_enabled: bool,
    pub public_url: String,
    #[cfg_attr(not(feature = "http-cors"), allow(dead_code))]
    pub cors_max_age: u64,
    #[cfg(feature = "postgres")]
    pub database_url: String,
    #[cfg(feature = "postgres")]
    pub db_max_connections: u32,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, VarError> {
        let port = env_param_or("APP_PORT", 3001_u16)?;
        let public_url = env_param_or("APP_PUBLIC_URL", format!("http://localhost:{port}"))?;

        Ok(Self {
            port,
            docs_enabled: env_param_or("APP_ENABLE_DOCS", false)?,
            public_url,
            cors_max_age: env_param_or("APP_CORS_MAX_AGE", 3600_u64)?,
            #[cfg(feature = "postgres")]
            database_url: env_param("DATABASE_URL")?,
            #[cfg(feature = "postgres")]
            db_max_connections: env_param_or("APP_DB_MAX_CONNECTIONS", 10_u32)?,
        })
    }
}

pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = e.to_string(), "Failed to listen for Ctrl-C");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut s) => {
                s.recv().await;
            }
            Err(e) => {
                tracing::error!(error = e.to_string(), "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

//! # gatewatch: intruder detection over uploaded images
//!
//! `gatewatch` exposes a single endpoint, `POST /detect-intruder`, that takes an uploaded image,
//! stores it in S3, asks Amazon Rekognition whether a person is in it, and if so looks the
//! stored image URL up in a table of known identities.
//!
//! ## Request Flow
//!
//! 1. The multipart `image` field is read into memory ([`api::handlers::detect`]).
//! 2. The bytes are written to the upload bucket under `uploads/<epoch millis>-<file name>`
//!    ([`storage`]).
//! 3. Rekognition runs label detection on the stored object by reference ([`detection`]).
//! 4. Without a `Person` label the request ends with "No person detected".
//! 5. Otherwise the stored URL is looked up in PostgreSQL ([`db`]) and the response names the
//!    known person or reports an unknown one together with the URL.
//!
//! Any collaborator failure is logged and answered with a plain `500 Error processing image`.
//! Uploaded objects are never deleted.
//!
//! ## Quick Start
//!
//! ```no_run
//! use clap::Parser;
//! use gatewatch::{Application, Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let args = gatewatch::config::Args::parse();
//!     let config = Config::load(&args)?;
//!
//!     gatewatch::telemetry::init_telemetry(config.enable_otel_export)?;
//!
//!     let app = Application::new(config).await?;
//!     app.serve(async {
//!         tokio::signal::ctrl_c().await.expect("Failed to listen for Ctrl+C");
//!     }).await?;
//!
//!     Ok(())
//! }
//! ```
pub mod api;
pub mod config;
pub mod db;
pub mod detection;
pub mod errors;
pub mod intruder;
pub mod openapi;
pub mod storage;
pub mod telemetry;

#[cfg(test)]
mod test_utils;

use std::sync::Arc;
use std::time::Duration;

use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_credential_types::Credentials;
use axum::{
    Json, Router,
    extract::DefaultBodyLimit,
    http::HeaderValue,
    routing::{get, post},
};
use axum_prometheus::PrometheusMetricLayer;
use bon::Builder;
use sqlx::{PgPool, postgres::PgPoolOptions};
use tokio::net::TcpListener;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{Level, debug, info, instrument};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

use crate::config::AwsConfig;
use crate::db::PgIdentityRecords;
use crate::detection::RekognitionDetector;
use crate::intruder::IntruderDetection;
use crate::openapi::ApiDoc;
use crate::storage::S3ObjectStore;

pub use config::Config;

/// Application state shared across all request handlers.
///
/// ```ignore
/// let state = AppState::builder()
///     .config(config)
///     .detection(detection)
///     .build();
/// ```
#[derive(Clone, Builder)]
pub struct AppState {
    pub config: Config,
    pub detection: IntruderDetection,
}

/// Get the gatewatch database migrator
pub fn migrator() -> sqlx::migrate::Migrator {
    sqlx::migrate!("./migrations")
}

async fn setup_database(config: &Config) -> anyhow::Result<PgPool> {
    let url = config
        .database
        .url
        .as_deref()
        .ok_or_else(|| anyhow::anyhow!("No database url configured"))?;
    let pool_settings = &config.database.pool;

    let pool = PgPoolOptions::new()
        .max_connections(pool_settings.max_connections)
        .min_connections(pool_settings.min_connections)
        .acquire_timeout(Duration::from_secs(pool_settings.acquire_timeout_secs))
        .connect(url)
        .await?;

    migrator().run(&pool).await?;
    info!("Database connected and migrations applied");

    Ok(pool)
}

/// Shared SDK configuration for the S3 and Rekognition clients.
///
/// Explicit region and credentials from the config win; anything unset comes from the default
/// AWS provider chain.
async fn load_aws_config(aws: &AwsConfig) -> SdkConfig {
    let mut loader = aws_config::defaults(BehaviorVersion::latest());

    if let Some(region) = &aws.region {
        loader = loader.region(Region::new(region.clone()));
    }

    if let (Some(access_key_id), Some(secret_access_key)) = (&aws.access_key_id, &aws.secret_access_key) {
        loader = loader.credentials_provider(Credentials::new(
            access_key_id,
            secret_access_key,
            None,
            None,
            "gatewatch-config",
        ));
    }

    loader.load().await
}

/// Create CORS layer from configuration
fn create_cors_layer(config: &Config) -> anyhow::Result<CorsLayer> {
    let cors = &config.cors;

    let allow_origin = if cors.allowed_origins.is_empty() {
        AllowOrigin::any()
    } else {
        let origins = cors
            .allowed_origins
            .iter()
            .map(|url| url.origin().ascii_serialization().parse::<HeaderValue>())
            .collect::<Result<Vec<_>, _>>()?;
        AllowOrigin::list(origins)
    };

    let mut layer = CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(tower_http::cors::Any)
        .allow_headers(tower_http::cors::Any);

    if let Some(max_age) = cors.max_age {
        layer = layer.max_age(Duration::from_secs(max_age));
    }

    Ok(layer)
}

/// Build the application router with all endpoints and middleware.
///
/// - `POST /detect-intruder` with the configured upload size limit
/// - `GET /healthz`
/// - OpenAPI document and UI
/// - Optional Prometheus metrics
/// - CORS and request tracing
#[instrument(skip_all)]
pub fn build_router(state: &AppState) -> anyhow::Result<Router> {
    let upload_limit = usize::try_from(state.config.max_upload_size)?;

    let router = Router::new()
        .route(
            "/detect-intruder",
            post(api::handlers::detect::detect_intruder).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/healthz", get(api::handlers::health::healthz))
        .route("/api-docs/openapi.json", get(|| async { Json(ApiDoc::openapi()) }))
        .with_state(state.clone())
        .merge(Scalar::with_url("/docs", ApiDoc::openapi()));

    let mut router = router.layer(create_cors_layer(&state.config)?);

    if state.config.enable_metrics {
        let (prometheus_layer, metric_handle) = PrometheusMetricLayer::pair();
        router = router
            .route("/internal/metrics", get(|| async move { metric_handle.render() }))
            .layer(prometheus_layer);
    }

    let router = router.layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
            .on_request(DefaultOnRequest::new().level(Level::INFO))
            .on_response(DefaultOnResponse::new().level(Level::INFO)),
    );

    Ok(router)
}

pub struct Application {
    router: Router,
    config: Config,
    pool: PgPool,
}

impl Application {
    /// Create a new application instance with all clients initialized
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        debug!("Starting gatewatch with configuration: {:#?}", config);

        let pool = setup_database(&config).await?;
        let sdk_config = load_aws_config(&config.aws).await;

        let detection = IntruderDetection::new(
            Arc::new(S3ObjectStore::new(&sdk_config, &config.aws)),
            Arc::new(RekognitionDetector::new(&sdk_config)),
            Arc::new(PgIdentityRecords::new(pool.clone())),
            config.detection.clone(),
        );

        let state = AppState::builder().config(config.clone()).detection(detection).build();
        let router = build_router(&state)?;

        Ok(Self { router, config, pool })
    }

    /// Start serving the application
    pub async fn serve<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let bind_addr = self.config.bind_address();
        let listener = TcpListener::bind(&bind_addr).await?;
        info!("Server running on http://{}", listener.local_addr()?);

        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("Closing database connections...");
        self.pool.close().await;

        info!("Shutting down telemetry...");
        telemetry::shutdown_telemetry();

        Ok(())
    }
}

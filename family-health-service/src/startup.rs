//! Application startup and lifecycle management.

use crate::config::FamilyHealthConfig;
use crate::handlers::{
    appointments, ask, family_members, health, records, reminders, summary, vaccines,
};
use crate::services::providers::openai::OpenAiConfig;
use crate::services::providers::{ChatProvider, OpenAiProvider};
use crate::services::{init_metrics, Database};
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::metrics::metrics_middleware;
use service_core::middleware::security_headers::security_headers_middleware;
use service_core::middleware::tracing::request_id_middleware;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: FamilyHealthConfig,
    pub db: Arc<Database>,
    /// `None` when no API key is configured; the ask endpoint answers 503.
    pub assistant: Option<Arc<dyn ChatProvider>>,
}

/// Build the full HTTP router for the given state.
pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/family-members", get(family_members::list_family_members))
        .route("/family-members/:id", get(family_members::get_family_member))
        .route("/allergies", get(records::list_allergies))
        .route("/medications", get(records::list_medications))
        .route("/vitals", get(records::list_vitals))
        .route("/lab-results", get(records::list_lab_results))
        .route("/documents", get(records::list_documents))
        .route("/vaccines", get(vaccines::list_vaccines))
        // POST takes a family member id, PATCH and DELETE a vaccine id.
        .route(
            "/vaccines/:id",
            post(vaccines::create_vaccine)
                .patch(vaccines::update_vaccine)
                .delete(vaccines::delete_vaccine),
        )
        .route("/reminders", get(reminders::list_reminders))
        .route("/reminders/:id/complete", post(reminders::complete_reminder))
        .route("/appointments", get(appointments::list_appointments))
        .route("/doctors", get(appointments::list_doctors))
        .route("/clinics", get(appointments::list_clinics))
        .route("/health-summary", get(summary::health_summary))
        .route("/ask", post(ask::ask));

    Router::new()
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        .route("/metrics", get(health::metrics_handler))
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(middleware::from_fn(security_headers_middleware))
        .with_state(state)
}

/// Build the chat provider from configuration. No API key means no assistant.
pub fn build_assistant(
    config: &FamilyHealthConfig,
) -> Result<Option<Arc<dyn ChatProvider>>, AppError> {
    let Some(api_key) = config.assistant.api_key.clone() else {
        tracing::info!("OPENAI_API_KEY not set - ask endpoint disabled");
        return Ok(None);
    };

    let provider = OpenAiProvider::new(OpenAiConfig {
        api_key,
        model: config.assistant.model.clone(),
        base_url: config.assistant.base_url.clone(),
        timeout: Duration::from_secs(config.assistant.timeout_secs),
    })
    .map_err(|e| AppError::ConfigError(anyhow::anyhow!("Failed to create assistant: {}", e)))?;

    tracing::info!(
        model = %config.assistant.model,
        base_url = %config.assistant.base_url,
        "Assistant provider configured"
    );
    Ok(Some(Arc::new(provider)))
}

/// Application container for managing server lifecycle.
pub struct Application {
    http_port: u16,
    http_listener: TcpListener,
    state: AppState,
}

impl Application {
    /// Build the application with the given configuration.
    pub async fn build(config: FamilyHealthConfig) -> Result<Self, AppError> {
        Self::build_internal(config, true).await
    }

    /// Build the application without running migrations.
    /// Use this in tests when the harness has already migrated the database.
    pub async fn build_without_migrations(config: FamilyHealthConfig) -> Result<Self, AppError> {
        Self::build_internal(config, false).await
    }

    async fn build_internal(
        config: FamilyHealthConfig,
        run_migrations: bool,
    ) -> Result<Self, AppError> {
        init_metrics();

        let db = Database::new(
            &config.database.url,
            config.database.max_connections,
            config.database.min_connections,
        )
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to connect to PostgreSQL");
            e
        })?;

        if run_migrations {
            db.run_migrations(config.database.migration_url())
                .await
                .map_err(|e| {
                    tracing::error!(error = %e, "Failed to run migrations");
                    e
                })?;
        }

        let assistant = build_assistant(&config)?;

        let http_addr = config.common.socket_addr();
        let http_listener = TcpListener::bind(http_addr).await.map_err(|e| {
            tracing::error!(error = %e, addr = %http_addr, "Failed to bind HTTP listener");
            AppError::from(e)
        })?;
        let http_port = http_listener.local_addr()?.port();

        tracing::info!(http_port = http_port, "Family health service listener bound");

        Ok(Self {
            http_port,
            http_listener,
            state: AppState {
                config,
                db: Arc::new(db),
                assistant,
            },
        })
    }

    /// Get the HTTP port the server is listening on.
    pub fn http_port(&self) -> u16 {
        self.http_port
    }

    /// Get a reference to the database.
    pub fn db(&self) -> &Database {
        &self.state.db
    }

    /// Run the application until stopped.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        let router = build_router(self.state.clone());

        tracing::info!(
            service = %self.state.config.service_name,
            version = env!("CARGO_PKG_VERSION"),
            http_port = self.http_port,
            assistant_enabled = self.state.assistant.is_some(),
            "Service ready to accept connections"
        );

        axum::serve(self.http_listener, router).await.map_err(|e| {
            tracing::error!(error = %e, "HTTP server error");
            std::io::Error::other(format!("HTTP server error: {}", e))
        })
    }
}

pub mod config;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod services;

use std::sync::Arc;

use axum::{
    middleware as axum_middleware,
    routing::{get, put},
    Router,
};
use sqlx::PgPool;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use config::AppConfig;
use middleware::{api_key_middleware, request_id_middleware, Authorizer, StaticKeyAuthorizer};
use repositories::{InquiryRepository, PgInquiryRepository};
use services::InquiryService;

/// Everything a request handler can reach. Built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub inquiries: InquiryService,
    pub repository: Arc<dyn InquiryRepository>,
    pub authorizer: Arc<dyn Authorizer>,
}

impl AppState {
    pub fn new(pool: PgPool, config: &AppConfig) -> Self {
        let repository: Arc<dyn InquiryRepository> = Arc::new(PgInquiryRepository::new(pool));
        let authorizer: Arc<dyn Authorizer> = Arc::new(StaticKeyAuthorizer::new(config.api_key.clone()));
        Self::with_dependencies(repository, authorizer, config.preferred_time_min)
    }

    pub fn with_dependencies(
        repository: Arc<dyn InquiryRepository>,
        authorizer: Arc<dyn Authorizer>,
        preferred_time_min: Option<chrono::DateTime<chrono::Utc>>,
    ) -> Self {
        Self {
            inquiries: InquiryService::new(repository.clone(), preferred_time_min),
            repository,
            authorizer,
        }
    }
}

pub fn create_app(state: AppState) -> Router {
    use handlers::{
        health::{health, ready},
        inquiries::{create_inquiry, list_inquiries, update_inquiry_status},
    };

    let api = Router::new()
        .route("/inquiries", get(list_inquiries).post(create_inquiry))
        .route("/inquiries/:id/status", put(update_inquiry_status))
        .layer(axum_middleware::from_fn_with_state(state.clone(), api_key_middleware));

    Router::new()
        .route("/health", get(health))
        .route("/ready", get(ready))
        .nest("/api", api)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(axum_middleware::from_fn(request_id_middleware)),
        )
        .with_state(state)
}

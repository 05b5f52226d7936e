// ============================================================================
// Authorization Gate - Static API Key
// ============================================================================
//
// Every route under /api must carry `X-Api-Key` equal to the secret loaded at
// startup. Handlers never see the check: the middleware asks the
// `Authorizer` held in the application state and rejects with 401 before the
// request body is read.
//
// The gate is a trait so a real credential scheme can replace the static key
// without touching route handlers.
//
// ============================================================================

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use subtle::ConstantTimeEq;

use crate::middleware::error_handling::AppError;
use crate::AppState;

pub const API_KEY_HEADER: &str = "x-api-key";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthDecision {
    Allowed,
    Denied,
}

pub trait Authorizer: Send + Sync {
    fn authorize(&self, headers: &HeaderMap) -> AuthDecision;
}

/// Compares `X-Api-Key` against one process-wide secret.
pub struct StaticKeyAuthorizer {
    api_key: String,
}

impl StaticKeyAuthorizer {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self { api_key: api_key.into() }
    }
}

impl Authorizer for StaticKeyAuthorizer {
    fn authorize(&self, headers: &HeaderMap) -> AuthDecision {
        let Some(presented) = headers.get(API_KEY_HEADER) else {
            return AuthDecision::Denied;
        };

        let presented = presented.as_bytes();
        let expected = self.api_key.as_bytes();

        // 🔒 Constant-time comparison; length mismatch is not secret
        if presented.len() == expected.len() && bool::from(presented.ct_eq(expected)) {
            AuthDecision::Allowed
        } else {
            AuthDecision::Denied
        }
    }
}

pub async fn api_key_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    match state.authorizer.authorize(request.headers()) {
        AuthDecision::Allowed => Ok(next.run(request).await),
        AuthDecision::Denied => {
            tracing::warn!(
                method = %request.method(),
                uri = %request.uri(),
                "Rejected request without a valid API key"
            );
            Err(AppError::Unauthorized)
        }
    }
}

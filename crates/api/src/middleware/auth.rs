//! OIDC-based authentication extractor for Axum handlers.

use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use orgdesk_core::error::CoreError;
use orgdesk_core::roles::is_admin;
use orgdesk_directory::DirectorySource;

use crate::auth::oidc::validate_token;
use crate::error::AppError;
use crate::state::AppState;
use crate::workflow_store::SessionOwner;

/// Caller extracted from the OIDC Bearer token in the `Authorization` header.
///
/// The raw token is kept so upstream directory calls can be made on the
/// caller's behalf:
///
/// ```ignore
/// async fn my_handler(State(state): State<AppState>, user: AuthUser) -> AppResult<Json<()>> {
///     let directory = user.directory(&state);
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// Identity provider subject (`claims.sub`).
    pub subject: String,
    /// Tenant key: the active company, or the subject before one exists.
    pub tenant: String,
    pub roles: Vec<String>,
    pub access_token: String,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        is_admin(&self.roles)
    }

    /// Key of this caller's wizard sessions in the active tenant.
    pub fn session_owner(&self) -> SessionOwner {
        SessionOwner::new(self.tenant.clone(), self.subject.clone())
    }

    /// A directory client bound to this caller's token.
    pub fn directory(&self, state: &AppState) -> Arc<dyn DirectorySource> {
        state.directory.scoped(&self.access_token)
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Missing Authorization header".into(),
                ))
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid Authorization format. Expected: Bearer <token>".into(),
            ))
        })?;

        let claims = validate_token(token, &state.config.oidc).map_err(|e| {
            tracing::debug!(error = %e, "Access token rejected");
            AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
        })?;

        let roles = claims.roles(&state.config.oidc.role_claim);
        let tenant = claims
            .tenant_id
            .clone()
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| format!("user:{}", claims.sub));

        Ok(AuthUser {
            subject: claims.sub,
            tenant,
            roles,
            access_token: token.to_string(),
        })
    }
}

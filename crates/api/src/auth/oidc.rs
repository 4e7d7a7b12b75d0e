//! OIDC access-token verification.
//!
//! Tokens are issued by the identity provider; this service only verifies
//! them (signature, `exp`, `iss`, `aud`) and reads the caller's subject,
//! active tenant and roles. Tokens are HS256-signed with a shared secret.

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

/// Claims read from every access token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject: the identity provider's user id.
    pub sub: String,
    /// Active company of the caller. Absent before onboarding created one.
    #[serde(default)]
    pub tenant_id: Option<String>,
    pub exp: i64,
    #[serde(default)]
    pub iat: i64,
    pub iss: String,
    /// Everything else, including the role claim whose name is configurable.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Claims {
    /// Roles carried under `claim`, accepting either an array or a single
    /// string.
    pub fn roles(&self, claim: &str) -> Vec<String> {
        match self.extra.get(claim) {
            Some(serde_json::Value::Array(values)) => values
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect(),
            Some(serde_json::Value::String(role)) => vec![role.clone()],
            _ => Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct OidcConfig {
    pub issuer: String,
    pub audience: String,
    /// Shared HMAC-SHA256 secret used to verify signatures.
    pub hs256_secret: String,
    /// Name of the claim holding the caller's roles.
    pub role_claim: String,
}

impl OidcConfig {
    /// Load OIDC configuration from environment variables.
    ///
    /// | Env Var             | Required | Default |
    /// |---------------------|----------|---------|
    /// | `OIDC_ISSUER`       | **yes**  | --      |
    /// | `OIDC_AUDIENCE`     | **yes**  | --      |
    /// | `OIDC_HS256_SECRET` | **yes**  | --      |
    /// | `ROLE_CLAIM`        | no       | `roles` |
    ///
    /// # Panics
    ///
    /// Panics if a required variable is missing or empty.
    pub fn from_env() -> Self {
        let issuer = std::env::var("OIDC_ISSUER").expect("OIDC_ISSUER must be set in the environment");
        let audience =
            std::env::var("OIDC_AUDIENCE").expect("OIDC_AUDIENCE must be set in the environment");
        let hs256_secret = std::env::var("OIDC_HS256_SECRET")
            .expect("OIDC_HS256_SECRET must be set in the environment");
        assert!(!hs256_secret.is_empty(), "OIDC_HS256_SECRET must not be empty");

        let role_claim = std::env::var("ROLE_CLAIM").unwrap_or_else(|_| "roles".into());

        Self {
            issuer,
            audience,
            hs256_secret,
            role_claim,
        }
    }
}

/// Validate and decode an access token, returning the embedded [`Claims`].
pub fn validate_token(token: &str, config: &OidcConfig) -> Result<Claims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[&config.issuer]);
    validation.set_audience(&[&config.audience]);
    validation.set_required_spec_claims(&["exp", "iss", "aud", "sub"]);

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.hs256_secret.as_bytes()),
        &validation,
    )?;
    Ok(token_data.claims)
}

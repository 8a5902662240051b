use async_trait::async_trait;
use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::{config::JwtConfig, error::ApiError, state::AppState};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// Payload of tokens minted by the identity service. `sub` keys the
/// stored profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub iat: usize,
    pub exp: usize,
    pub iss: String,
    pub aud: String,
    pub kind: TokenKind,
}

/// Verification half of the shared-secret JWT setup. Tokens are minted by
/// the identity service; this service only checks them.
#[derive(Clone)]
pub struct JwtKeys {
    pub decoding: DecodingKey,
    pub issuer: String,
    pub audience: String,
}

impl From<&JwtConfig> for JwtKeys {
    fn from(cfg: &JwtConfig) -> Self {
        Self {
            decoding: DecodingKey::from_secret(cfg.secret.as_bytes()),
            issuer: cfg.issuer.clone(),
            audience: cfg.audience.clone(),
        }
    }
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        JwtKeys::from(&state.config.jwt)
    }
}

impl JwtKeys {
    pub fn verify(&self, token: &str) -> anyhow::Result<Claims> {
        let mut validation = Validation::default();
        validation.set_audience(std::slice::from_ref(&self.audience));
        validation.set_issuer(std::slice::from_ref(&self.issuer));
        let data = decode::<Claims>(token, &self.decoding, &validation)?;
        debug!(user_id = %data.claims.sub, kind = ?data.claims.kind, "jwt verified");
        Ok(data.claims)
    }
}

/// Extracts and validates the bearer token, yielding the user ID.
pub struct AuthUser(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let keys = JwtKeys::from_ref(state);
        let auth_header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ApiError::Unauthorized("Missing Authorization header".into()))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .or_else(|| auth_header.strip_prefix("bearer "))
            .ok_or_else(|| ApiError::Unauthorized("Invalid Authorization header".into()))?;

        let claims = match keys.verify(token) {
            Ok(c) => c,
            Err(e) => {
                warn!(error = %e, "invalid or expired token");
                return Err(ApiError::Unauthorized("Invalid or expired token".into()));
            }
        };

        if claims.kind != TokenKind::Access {
            return Err(ApiError::Unauthorized("Access token required".into()));
        }

        Ok(AuthUser(claims.sub))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{mint_token, test_jwt_config};

    fn keys() -> JwtKeys {
        JwtKeys::from(&test_jwt_config())
    }

    #[test]
    fn verifies_access_token() {
        let user_id = Uuid::new_v4();
        let token = mint_token(&test_jwt_config(), user_id, TokenKind::Access);
        let claims = keys().verify(&token).expect("verify token");
        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.kind, TokenKind::Access);
    }

    #[test]
    fn rejects_wrong_issuer_or_audience() {
        let mut other = test_jwt_config();
        other.issuer = "someone-else".into();
        other.audience = "other-aud".into();
        let token = mint_token(&other, Uuid::new_v4(), TokenKind::Access);
        assert!(keys().verify(&token).is_err());
    }

    #[test]
    fn rejects_wrong_secret() {
        let mut other = test_jwt_config();
        other.secret = "not-the-secret".into();
        let token = mint_token(&other, Uuid::new_v4(), TokenKind::Access);
        assert!(keys().verify(&token).is_err());
    }

    #[tokio::test]
    async fn extractor_rejects_refresh_tokens() {
        use crate::test_support::TestApp;
        use axum::http::StatusCode;

        let app = TestApp::new();
        let token = mint_token(&test_jwt_config(), Uuid::new_v4(), TokenKind::Refresh);
        let (status, body) = app.get_with_token("/api/fitness/tips", &token).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Access token required");
    }

    #[tokio::test]
    async fn extractor_rejects_other_schemes() {
        use crate::test_support::TestApp;
        use axum::http::StatusCode;

        let app = TestApp::new();
        let (status, body) = app
            .get_with_header("/api/fitness/tips", "Basic dXNlcjpwYXNz")
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Invalid Authorization header");
    }
}

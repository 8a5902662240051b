use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use crate::{
    app::build_app,
    auth::jwt::{Claims, TokenKind},
    config::JwtConfig,
    nutrition::model::ProfileFields,
    state::AppState,
};

pub fn test_jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "test-secret".into(),
        issuer: "test-issuer".into(),
        audience: "test-aud".into(),
    }
}

/// Signs a token the way the identity service would.
pub fn mint_token(cfg: &JwtConfig, user_id: Uuid, kind: TokenKind) -> String {
    let now = time::OffsetDateTime::now_utc().unix_timestamp() as usize;
    let claims = Claims {
        sub: user_id,
        iat: now,
        exp: now + 3600,
        iss: cfg.issuer.clone(),
        aud: cfg.audience.clone(),
        kind,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(cfg.secret.as_bytes()),
    )
    .expect("sign test token")
}

/// The full router over a fake state, driven in-process.
pub struct TestApp {
    pub state: AppState,
    router: Router,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_state(AppState::fake())
    }

    pub fn with_state(state: AppState) -> Self {
        let router = build_app(state.clone());
        Self { state, router }
    }

    pub async fn seed_profile(&self, user_id: Uuid, fields: ProfileFields) {
        self.state
            .profiles
            .upsert(user_id, &fields)
            .await
            .expect("seed profile");
    }

    fn bearer(&self, user_id: Uuid) -> String {
        let token = mint_token(&self.state.config.jwt, user_id, TokenKind::Access);
        format!("Bearer {token}")
    }

    pub async fn get(&self, user_id: Uuid, path: &str) -> (StatusCode, Value) {
        self.send(Method::GET, path, Some(self.bearer(user_id)), None).await
    }

    pub async fn get_anonymous(&self, path: &str) -> (StatusCode, Value) {
        self.send(Method::GET, path, None, None).await
    }

    pub async fn get_with_token(&self, path: &str, token: &str) -> (StatusCode, Value) {
        self.send(Method::GET, path, Some(format!("Bearer {token}")), None)
            .await
    }

    pub async fn get_with_header(&self, path: &str, authorization: &str) -> (StatusCode, Value) {
        self.send(Method::GET, path, Some(authorization.to_string()), None)
            .await
    }

    pub async fn post(&self, user_id: Uuid, path: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, path, Some(self.bearer(user_id)), Some(body))
            .await
    }

    pub async fn post_anonymous(&self, path: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, path, None, Some(body)).await
    }

    pub async fn put(&self, user_id: Uuid, path: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::PUT, path, Some(self.bearer(user_id)), Some(body))
            .await
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        authorization: Option<String>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut req = Request::builder().method(method).uri(path);
        if let Some(auth) = authorization {
            req = req.header(header::AUTHORIZATION, auth);
        }
        let body = match body {
            Some(json) => {
                req = req.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let res = self
            .router
            .clone()
            .oneshot(req.body(body).expect("build request"))
            .await
            .expect("router is infallible");
        let status = res.status();
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
            .await
            .expect("read body");
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }
}

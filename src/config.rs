use std::path::PathBuf;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    /// Overrides the food catalog bundled into the binary.
    pub food_catalog_path: Option<PathBuf>,
    /// Overrides the tips/exercises document bundled into the binary.
    pub guidance_path: Option<PathBuf>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "fitnesspoint".into()),
            audience: std::env::var("JWT_AUDIENCE")
                .unwrap_or_else(|_| "fitnesspoint-users".into()),
        };
        Ok(Self {
            database_url,
            jwt,
            food_catalog_path: optional_path("FOOD_CATALOG_PATH"),
            guidance_path: optional_path("FITNESS_GUIDANCE_PATH"),
        })
    }
}

fn optional_path(var: &str) -> Option<PathBuf> {
    std::env::var(var)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

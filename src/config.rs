// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.

use std::env;

/// Manufacturer stamped on every bike record unless `BRAND` overrides it.
pub const DEFAULT_BRAND: &str = "Bulls";

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Firebase/GCP project ID (Firestore project and ID-token audience)
    pub firebase_project_id: String,
    /// Email of the single administrator account
    pub admin_email: String,
    /// Frontend URL (CORS origin, cookie security)
    pub frontend_url: String,
    /// Prefix for static asset URLs, e.g. "/inventory" or ""
    pub base_path: String,
    /// Directory holding `jpeg/` images and the built frontend
    pub static_dir: String,
    /// Manufacturer constant
    pub brand: String,
    /// Server port
    pub port: u16,
    /// Keep data in process memory instead of Firestore (local runs)
    pub in_memory_store: bool,
    /// JWT signing key for session tokens (raw bytes)
    pub jwt_signing_key: Vec<u8>,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            firebase_project_id: "test-project".to_string(),
            admin_email: "admin@example.com".to_string(),
            frontend_url: "http://localhost:3000".to_string(),
            base_path: String::new(),
            static_dir: "public".to_string(),
            brand: DEFAULT_BRAND.to_string(),
            port: 8080,
            in_memory_store: true,
            jwt_signing_key: b"test_jwt_key_32_bytes_minimum!!".to_vec(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let jwt_signing_key = env::var("JWT_SIGNING_KEY")
            .map_err(|_| ConfigError::Missing("JWT_SIGNING_KEY"))?
            .into_bytes();
        if jwt_signing_key.len() < 32 {
            return Err(ConfigError::Invalid(
                "JWT_SIGNING_KEY",
                "must be at least 32 bytes".to_string(),
            ));
        }

        let port = match env::var("PORT") {
            Ok(raw) => raw
                .parse()
                .map_err(|_| ConfigError::Invalid("PORT", format!("not a port number: {raw}")))?,
            Err(_) => 8080,
        };

        Ok(Self {
            firebase_project_id: env::var("FIREBASE_PROJECT_ID")
                .unwrap_or_else(|_| "local-dev".to_string()),
            admin_email: env::var("ADMIN_EMAIL")
                .map(|v| v.trim().to_lowercase())
                .map_err(|_| ConfigError::Missing("ADMIN_EMAIL"))?,
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            base_path: normalize_base_path(&env::var("BASE_PATH").unwrap_or_default()),
            static_dir: env::var("STATIC_DIR").unwrap_or_else(|_| "public".to_string()),
            brand: env::var("BRAND").unwrap_or_else(|_| DEFAULT_BRAND.to_string()),
            port,
            in_memory_store: env::var("IN_MEMORY_STORE")
                .map(|v| crate::values::parse_truthy(&v))
                .unwrap_or(false),
            jwt_signing_key,
        })
    }

    /// Whether cookies should carry the `Secure` attribute.
    pub fn secure_cookies(&self) -> bool {
        self.frontend_url.starts_with("https://")
    }

    /// Whether `email` belongs to the configured administrator.
    pub fn is_admin_email(&self, email: &str) -> bool {
        email.trim().eq_ignore_ascii_case(&self.admin_email)
    }
}

/// Normalize a base path to either "" or "/segment[/segment...]".
pub fn normalize_base_path(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{trimmed}")
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1}")]
    Invalid(&'static str, String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_base_path() {
        assert_eq!(normalize_base_path(""), "");
        assert_eq!(normalize_base_path("/"), "");
        assert_eq!(normalize_base_path("inventory"), "/inventory");
        assert_eq!(normalize_base_path("/inventory/"), "/inventory");
        assert_eq!(normalize_base_path(" /a/b/ "), "/a/b");
    }

    #[test]
    fn test_admin_email_is_case_insensitive() {
        let config = Config::default();
        assert!(config.is_admin_email("Admin@Example.com"));
        assert!(!config.is_admin_email("someone@example.com"));
    }

    #[test]
    fn test_secure_cookies_follow_frontend_scheme() {
        let mut config = Config::default();
        assert!(!config.secure_cookies());
        config.frontend_url = "https://bikes.example.com".to_string();
        assert!(config.secure_cookies());
    }
}

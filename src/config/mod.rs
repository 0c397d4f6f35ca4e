use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub database: DatabaseConfig,
    pub api: ApiConfig,
    pub security: SecurityConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub max_connections: u32,
    pub connection_timeout: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub enable_rate_limiting: bool,
    pub rate_limit_requests: u32,
    pub rate_limit_window_secs: u64,
    /// Hard cap on per_page for any paginated listing
    pub max_page_size: i64,
    pub default_page_size: i64,
    pub max_upload_bytes: usize,
    pub max_images_per_design: i64,
    pub max_share_designs: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub enable_cors: bool,
    pub cors_origins: Vec<String>,
    pub jwt_secret: String,
    pub jwt_expiry_secs: u64,
    pub bcrypt_cost: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub bucket: String,
    /// Base URL prefix for client-facing object URLs (CDN or bucket endpoint)
    pub public_base_url: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Database overrides
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout =
                v.parse().unwrap_or(self.database.connection_timeout);
        }

        // API overrides
        if let Ok(v) = env::var("API_ENABLE_RATE_LIMITING") {
            self.api.enable_rate_limiting = v.parse().unwrap_or(self.api.enable_rate_limiting);
        }
        if let Ok(v) = env::var("API_RATE_LIMIT_REQUESTS") {
            self.api.rate_limit_requests = v.parse().unwrap_or(self.api.rate_limit_requests);
        }
        if let Ok(v) = env::var("API_RATE_LIMIT_WINDOW_SECS") {
            self.api.rate_limit_window_secs = v.parse().unwrap_or(self.api.rate_limit_window_secs);
        }
        if let Ok(v) = env::var("API_MAX_PAGE_SIZE") {
            self.api.max_page_size = v.parse().unwrap_or(self.api.max_page_size);
        }
        if let Ok(v) = env::var("API_MAX_UPLOAD_BYTES") {
            self.api.max_upload_bytes = v.parse().unwrap_or(self.api.max_upload_bytes);
        }

        // Security overrides
        if let Ok(v) = env::var("SECURITY_ENABLE_CORS") {
            self.security.enable_cors = v.parse().unwrap_or(self.security.enable_cors);
        }
        if let Ok(v) = env::var("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v.split(',').map(|s| s.trim().to_string()).collect();
        }
        if let Ok(v) = env::var("JWT_SECRET") {
            self.security.jwt_secret = v;
        }
        if let Ok(v) = env::var("JWT_EXPIRY_SECS") {
            self.security.jwt_expiry_secs = v.parse().unwrap_or(self.security.jwt_expiry_secs);
        }
        if let Ok(v) = env::var("BCRYPT_COST") {
            self.security.bcrypt_cost = v.parse().unwrap_or(self.security.bcrypt_cost);
        }

        // Storage overrides
        if let Ok(v) = env::var("STORAGE_BUCKET") {
            self.storage.bucket = v;
        }
        if let Ok(v) = env::var("STORAGE_PUBLIC_BASE_URL") {
            self.storage.public_base_url = v;
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            database: DatabaseConfig {
                max_connections: 10,
                connection_timeout: 30,
            },
            api: ApiConfig {
                enable_rate_limiting: false,
                rate_limit_requests: 1000,
                rate_limit_window_secs: 60,
                max_page_size: 100,
                default_page_size: 20,
                max_upload_bytes: 10 * 1024 * 1024, // 10MB
                max_images_per_design: 10,
                max_share_designs: 20,
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec![
                    "http://localhost:3000".to_string(),
                    "http://localhost:5173".to_string(),
                ],
                jwt_secret: "dev-only-secret".to_string(),
                jwt_expiry_secs: 60 * 60 * 24 * 7, // 1 week
                bcrypt_cost: 8,
            },
            storage: StorageConfig {
                bucket: "atelier-dev".to_string(),
                public_base_url: "http://localhost:9000/atelier-dev/".to_string(),
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            database: DatabaseConfig {
                max_connections: 20,
                connection_timeout: 10,
            },
            api: ApiConfig {
                enable_rate_limiting: true,
                rate_limit_requests: 100,
                rate_limit_window_secs: 60,
                max_page_size: 100,
                default_page_size: 20,
                max_upload_bytes: 5 * 1024 * 1024, // 5MB
                max_images_per_design: 10,
                max_share_designs: 20,
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["https://staging.example.com".to_string()],
                jwt_secret: String::new(), // must come from JWT_SECRET
                jwt_expiry_secs: 60 * 60 * 24,
                bcrypt_cost: 10,
            },
            storage: StorageConfig {
                bucket: "atelier-staging".to_string(),
                public_base_url: "https://media-staging.example.com/".to_string(),
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            database: DatabaseConfig {
                max_connections: 50,
                connection_timeout: 5,
            },
            api: ApiConfig {
                enable_rate_limiting: true,
                rate_limit_requests: 60,
                rate_limit_window_secs: 60,
                max_page_size: 100,
                default_page_size: 20,
                max_upload_bytes: 2 * 1024 * 1024, // 2MB
                max_images_per_design: 10,
                max_share_designs: 20,
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["https://app.example.com".to_string()],
                jwt_secret: String::new(), // must come from JWT_SECRET
                jwt_expiry_secs: 60 * 60 * 4,
                bcrypt_cost: 12,
            },
            storage: StorageConfig {
                bucket: "atelier-prod".to_string(),
                public_base_url: "https://media.example.com/".to_string(),
            },
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_development_config() {
        let config = AppConfig::development();
        assert!(!config.api.enable_rate_limiting);
        assert_eq!(config.api.max_page_size, 100);
        assert_eq!(config.security.jwt_expiry_secs, 60 * 60 * 24 * 7);
    }

    #[test]
    fn test_default_production_config() {
        let config = AppConfig::production();
        assert!(config.api.enable_rate_limiting);
        assert!(
            config.security.jwt_secret.is_empty(),
            "prod secret must come from env"
        );
        assert_eq!(config.security.bcrypt_cost, 12);
        assert_eq!(config.api.max_images_per_design, 10);
    }
}

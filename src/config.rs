use std::net::IpAddr;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub db_max_connections: u32,
    pub db_acquire_timeout: Duration,
    pub host: IpAddr,
    pub port: u16,
    pub api_prefix: String,
    pub debug: bool,
    pub log_level: String,
    pub max_body_size: usize,
    pub app: AppInfo,
}

/// Metadata published at `/` and in the OpenAPI document.
#[derive(Debug, Clone)]
pub struct AppInfo {
    pub name: String,
    pub description: String,
    pub version: String,
    pub contact_name: String,
    pub contact_email: String,
    pub license: String,
    pub docs_url: String,
}

impl Default for AppInfo {
    fn default() -> Self {
        AppInfo {
            name: "Appointment Manager".to_string(),
            description: "Application to manage professional appointments".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            contact_name: "Lucas Lucyk".to_string(),
            contact_email: "lucaslucyk@gmail.com".to_string(),
            license: "MIT".to_string(),
            docs_url: "/openapi.json".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let database_url = match std::env::var("DATABASE_URL") {
            Ok(url) => url,
            Err(_) => compose_database_url(
                &env_or("POSTGRES_USER", "root"),
                &env_or("POSTGRES_PASSWORD", "root"),
                &env_or("POSTGRES_HOST", "localhost"),
                &env_or("POSTGRES_PORT", "54320"),
                &env_or("POSTGRES_DB", "appointment_mgr"),
            ),
        };

        let db_max_connections: u32 = env_or("DB_MAX_CONNECTIONS", "10")
            .parse()
            .map_err(|e| format!("Invalid DB_MAX_CONNECTIONS: {e}"))?;

        let db_acquire_timeout: u64 = env_or("DB_ACQUIRE_TIMEOUT_SECS", "5")
            .parse()
            .map_err(|e| format!("Invalid DB_ACQUIRE_TIMEOUT_SECS: {e}"))?;

        let host: IpAddr = env_or("APP_HOST", "0.0.0.0")
            .parse()
            .map_err(|e| format!("Invalid APP_HOST: {e}"))?;

        let port: u16 = env_or("APP_PORT", "8000")
            .parse()
            .map_err(|e| format!("Invalid APP_PORT: {e}"))?;

        let api_prefix = normalize_prefix(&env_or("API_V1_STR", "/api/v1"));

        let debug = parse_bool(&env_or("DEBUG", "true"))
            .ok_or_else(|| "Invalid DEBUG: expected true/false".to_string())?;

        let log_level = env_or("LOG_LEVEL", if debug { "debug" } else { "info" });

        let max_body_size: usize = env_or("MAX_BODY_SIZE", "1048576")
            .parse()
            .map_err(|e| format!("Invalid MAX_BODY_SIZE: {e}"))?;

        let defaults = AppInfo::default();
        let app = AppInfo {
            name: env_or("PROJECT_NAME", &defaults.name),
            description: env_or("PROJECT_DESCRIPTION", &defaults.description),
            version: env_or("APP_VERSION", &defaults.version),
            contact_name: env_or("APP_CONTACT_NAME", &defaults.contact_name),
            contact_email: env_or("APP_CONTACT_EMAIL", &defaults.contact_email),
            license: env_or("APP_LICENSE", &defaults.license),
            docs_url: defaults.docs_url,
        };

        Ok(Config {
            database_url,
            db_max_connections,
            db_acquire_timeout: Duration::from_secs(db_acquire_timeout),
            host,
            port,
            api_prefix,
            debug,
            log_level,
            max_body_size,
            app,
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

pub fn compose_database_url(user: &str, password: &str, host: &str, port: &str, db: &str) -> String {
    format!("postgres://{user}:{password}@{host}:{port}/{db}")
}

/// Leading slash, no trailing slash. The root prefix becomes an empty string.
pub fn normalize_prefix(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

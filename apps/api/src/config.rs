use anyhow::{Context, Result};

/// Key handed to the local model server, which accepts any bearer token.
const DEFAULT_LLM_API_KEY: &str = "sk-111111111111111111111111111111111111111111111111";

/// How the service reaches PostgreSQL.
#[derive(Debug, Clone, PartialEq)]
pub enum DatabaseConfig {
    /// A full connection URL from `DATABASE_URL`.
    Url(String),
    /// Discrete settings from the compose environment.
    Parts {
        host: String,
        name: String,
        user: String,
        password: String,
    },
}

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub db_max_connections: u32,
    pub llm_base_url: String,
    pub llm_api_key: String,
    pub llm_max_attempts: u32,
    pub tts_url: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |key: &str| {
            lookup(key).with_context(|| format!("Required environment variable '{key}' is not set"))
        };
        let or_default = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let database = match lookup("DATABASE_URL") {
            Some(url) => DatabaseConfig::Url(url),
            None => DatabaseConfig::Parts {
                host: or_default("DB_HOST", "db"),
                name: require("POSTGRES_DB")?,
                user: require("POSTGRES_USER")?,
                password: require("POSTGRES_PASSWORD")?,
            },
        };

        Ok(Config {
            database,
            db_max_connections: or_default("DB_MAX_CONNECTIONS", "10")
                .parse::<u32>()
                .context("DB_MAX_CONNECTIONS must be a positive integer")?,
            llm_base_url: or_default("LOCAL_AI_URL", "http://local-ai:8080/v1"),
            llm_api_key: or_default("LOCAL_AI_API_KEY", DEFAULT_LLM_API_KEY),
            llm_max_attempts: or_default("LLM_MAX_ATTEMPTS", "1")
                .parse::<u32>()
                .context("LLM_MAX_ATTEMPTS must be a positive integer")?
                .max(1),
            tts_url: or_default("TTS_URL", "http://local-ai:8080/tts"),
            port: or_default("PORT", "5000")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: or_default("RUST_LOG", "info"),
        })
    }
}

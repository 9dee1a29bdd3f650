use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub jwt_secret: String,
    pub jwt_issuer: String,
    /// Serper API keys, rotated round-robin by the hunt pacer.
    pub serper_api_keys: Vec<String>,
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub whatsapp_api_key: Option<String>,
    pub whatsapp_phone_number_id: Option<String>,
    pub whatsapp_webhook_token: String,
    pub allowed_origins: Vec<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            jwt_secret: env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
            jwt_issuer: env::var("JWT_ISSUER").unwrap_or_else(|_| "lead-hunter-api".to_string()),
            serper_api_keys: split_csv(&env::var("SERPER_API_KEYS").unwrap_or_default()),
            openai_api_key: env::var("OPENAI_API_KEY").ok(),
            openai_model: env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string()),
            whatsapp_api_key: env::var("WHATSAPP_API_KEY").ok(),
            whatsapp_phone_number_id: env::var("WHATSAPP_PHONE_NUMBER_ID").ok(),
            whatsapp_webhook_token: env::var("WHATSAPP_WEBHOOK_TOKEN")
                .unwrap_or_else(|_| "change-me".to_string()),
            allowed_origins: split_csv(
                &env::var("ALLOWED_ORIGINS")
                    .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            ),
        })
    }

    /// Whether hunts can run at all.
    pub fn search_configured(&self) -> bool {
        !self.serper_api_keys.is_empty()
    }
}

fn split_csv(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_csv_trims_and_drops_empties() {
        assert_eq!(split_csv("a, b ,,c"), vec!["a", "b", "c"]);
        assert!(split_csv("").is_empty());
    }
}

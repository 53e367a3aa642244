use std::env;

use log::warn;

pub const DEFAULT_AI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_AI_MODEL: &str = "gemini-2.5-flash";

#[derive(Debug, Clone)]
pub struct SiteConfig {
    pub name: String,
    pub description: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            name: String::from("ScholarFlow"),
            description: String::from(
                "A home for peer-reviewed journals: browse issues, read articles and manage submissions.",
            ),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AiConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_AI_MODEL.to_string(),
            base_url: DEFAULT_AI_BASE_URL.to_string(),
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub session_secret: Option<String>,
    pub site: SiteConfig,
    pub ai: AiConfig,
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

impl AppConfig {
    /// Reads the process environment (after `.env` has been loaded).
    pub fn from_env() -> Result<Self, String> {
        let host = non_empty_var("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = match non_empty_var("PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|_| format!("PORT must be a valid number, got {:?}", raw))?,
            None => 8080,
        };

        let session_secret = non_empty_var("SESSION_SECRET_KEY");
        if let Some(secret) = &session_secret {
            if secret.len() < 64 {
                return Err("SESSION_SECRET_KEY must be at least 64 bytes long".to_string());
            }
        }

        let timeout_secs = match non_empty_var("AI_TIMEOUT_SECS") {
            Some(raw) => raw
                .parse::<u64>()
                .map_err(|_| format!("AI_TIMEOUT_SECS must be a number, got {:?}", raw))?,
            None => AiConfig::default().timeout_secs,
        };

        let ai = AiConfig {
            api_key: non_empty_var("API_KEY").or_else(|| non_empty_var("GEMINI_API_KEY")),
            model: non_empty_var("AI_MODEL").unwrap_or_else(|| DEFAULT_AI_MODEL.to_string()),
            base_url: non_empty_var("AI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_AI_BASE_URL.to_string()),
            timeout_secs,
        };
        if ai.api_key.is_none() {
            warn!("Neither API_KEY nor GEMINI_API_KEY is set");
        }

        Ok(Self {
            host,
            port,
            session_secret,
            site: SiteConfig::default(),
            ai,
        })
    }
}

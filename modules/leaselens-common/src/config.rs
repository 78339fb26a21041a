use std::env;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // AI provider
    pub anthropic_api_key: String,

    /// Model for listing-text and photo analysis.
    pub analysis_model: String,
    /// Lightweight model for borderline sentiment classification.
    pub sentiment_model: String,
    /// Lightweight model for question generation.
    pub question_model: String,

    /// Timeout applied to every external model call, in seconds.
    pub llm_timeout_secs: u64,

    /// How many community comments to pull per request.
    pub comment_limit: usize,

    // Web server
    pub web_host: String,
    pub web_port: u16,
}

impl Config {
    /// Load configuration from environment variables.
    /// Panics with a clear message if required vars are missing.
    pub fn from_env() -> Self {
        Self {
            anthropic_api_key: required_env("ANTHROPIC_API_KEY"),
            analysis_model: env::var("ANALYSIS_MODEL")
                .unwrap_or_else(|_| "claude-sonnet-4-5-20250929".to_string()),
            sentiment_model: env::var("SENTIMENT_MODEL")
                .unwrap_or_else(|_| "claude-haiku-4-5-20251001".to_string()),
            question_model: env::var("QUESTION_MODEL")
                .unwrap_or_else(|_| "claude-haiku-4-5-20251001".to_string()),
            llm_timeout_secs: env::var("LLM_TIMEOUT_SECS")
                .unwrap_or_else(|_| "20".to_string())
                .parse()
                .expect("LLM_TIMEOUT_SECS must be a number"),
            comment_limit: env::var("COMMENT_LIMIT")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .expect("COMMENT_LIMIT must be a number"),
            web_host: env::var("WEB_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            web_port: env::var("WEB_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .expect("WEB_PORT must be a number"),
        }
    }
}

fn required_env(key: &str) -> String {
    env::var(key).unwrap_or_else(|_| panic!("{key} environment variable is required"))
}

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LeaseLensError {
    #[error("Validation error: {0}")]
    Validation(String),

    /// The listing-text analyzer was completely unavailable. The only
    /// external failure that aborts a request: an assessment without any
    /// text analysis has no meaningful risk score.
    #[error("Text analysis failed: {0}")]
    TextAnalysis(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

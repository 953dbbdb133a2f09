use thiserror::Error;

#[derive(Error, Debug)]
pub enum NarrativeError {
    #[error("Narrative generation is not configured. Missing API key.")]
    NotConfigured,

    #[error("Unknown {0} '{1}'")]
    UnknownKind(&'static str, String),

    #[error("Failed to send the LLM request: {0}")]
    Request(#[from] reqwest::Error),

    #[error("The LLM API returned status {0}: {1}")]
    Upstream(u16, String),

    #[error("The LLM response contained no text")]
    EmptyResponse,

    #[error("Narrative cache error: {0}")]
    Cache(String),
}

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SiteError {
    #[error("Fetch error: {0}")]
    Fetch(String),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Catalog error: {0}")]
    Catalog(String),
    #[error("Config validation error: {0}")]
    Config(String),
    #[error("Missing DOM element: #{0}")]
    Dom(String),
}

pub type Result<T, E = SiteError> = std::result::Result<T, E>;

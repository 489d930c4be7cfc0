use thiserror::Error;

/// Errors that can occur while scraping and extracting recipes
#[derive(Error, Debug)]
pub enum ScrapeError {
    /// Transport-level failure talking to the source site
    #[error("Failed to fetch URL: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// The source site answered with a non-success status
    #[error("Unexpected HTTP status {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    /// The listing page structure was not recognized
    #[error("Failed to parse page: {0}")]
    ParseError(String),

    /// The requested recipe id is not in the listing
    #[error("Recipe #{0} was not found in the listing")]
    NotFound(u32),

    /// An assembled record does not meet storage requirements
    #[error("Validation failed: {0}")]
    ValidationError(String),

    /// Invalid combination of caller options
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(#[from] config::ConfigError),

    /// A configured or scraped URL could not be parsed
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The listing link pattern is not a valid regex
    #[error("Invalid link pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
}

impl ScrapeError {
    /// Whether this error came from fetching a page, as opposed to parsing or local I/O.
    pub fn is_network(&self) -> bool {
        matches!(
            self,
            ScrapeError::NetworkError(_) | ScrapeError::HttpStatus { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, ScrapeError>;

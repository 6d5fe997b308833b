use thiserror::Error;

pub type Result<T> = std::result::Result<T, ClientError>;

const API_KEY_URL: &str = "https://linear.app/settings/api";

/// Linear's documented budget for personal API keys.
pub const RATE_LIMIT_PER_HOUR: u32 = 1500;

/// Every failure a command can hit after argument parsing.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("No API key provided. Set the LINEAR_API_KEY environment variable ({url}).", url = API_KEY_URL)]
    MissingCredential,

    #[error("Authentication failed. Check your API key ({url}).", url = API_KEY_URL)]
    Unauthorized,

    #[error(
        "Rate limit exceeded. Linear allows {limit} requests per hour; wait before retrying.",
        limit = RATE_LIMIT_PER_HOUR
    )]
    RateLimited,

    #[error("HTTP error: {status} - {body}")]
    Http { status: u16, body: String },

    /// Display omits the reqwest text; it is reachable as the source.
    #[error("Network error")]
    Network(#[from] reqwest::Error),

    #[error("GraphQL error: {0}")]
    GraphQl(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Invalid {resource} in response: {message}")]
    Validation {
        resource: &'static str,
        message: String,
    },

    #[error("{} '{id}' not found", capitalize(.resource))]
    NotFound { resource: &'static str, id: String },
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TalkSubError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Malformed provider payload: {0}")]
    Parse(String),

    #[error("No captions available: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid subtitle request: {0}")]
    InvalidRequest(String),
}

impl From<reqwest::Error> for TalkSubError {
    fn from(err: reqwest::Error) -> Self {
        TalkSubError::Network(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, TalkSubError>;

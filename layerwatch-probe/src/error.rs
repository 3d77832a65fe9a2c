use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP error, status {0}")]
    HttpStatus(u16),

    #[error("received non-JSON response")]
    NonJson,

    #[error("{0}")]
    Service(String),

    #[error("token acquisition failed: {0}")]
    Auth(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

pub type Result<T> = std::result::Result<T, ProbeError>;

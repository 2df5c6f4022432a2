use reqwest::StatusCode;
use thiserror::Error;

/// Everything that can go wrong while talking to TFS.
#[derive(Debug, Error)]
pub enum TfsError {
    #[error("TFS {name} isn't specified, but is required")]
    MissingParameter { name: String },
    #[error("Unable to format url: {source}")]
    InvalidUrl {
        #[from]
        source: url::ParseError,
    },
    #[error("There was a problem calling TFS: {source}")]
    Transport {
        #[from]
        source: reqwest::Error,
    },
    #[error("There was a problem calling TFS: stopped after {limit} redirects")]
    TooManyRedirects { limit: usize },
    #[error("There was an error getting information from TFS: {status}")]
    Api { status: StatusCode },
    #[error("There was a problem decoding the response from TFS: {source}")]
    Decode { source: serde_json::Error },
    #[error("Sorry -- I couldn't find the group '{name}'")]
    NotFound { name: String },
    #[error("Sorry -- Too many groups match '{name}' -- please be more specific")]
    Ambiguous { name: String },
    #[error("{message}")]
    InvalidArgument { message: String },
}

impl TfsError {
    pub fn missing(name: &str) -> Self {
        TfsError::MissingParameter {
            name: name.to_string(),
        }
    }
}

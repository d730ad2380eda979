use thiserror::Error;

/// Errors that can occur when talking to a Hive API node.
#[derive(Debug, Error)]
pub enum SdkError {
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),
    #[error("no API endpoints configured")]
    NoEndpoints,
    #[error("url error: {0}")]
    Url(#[from] url::ParseError),
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server error (status {status}): {message}")]
    ServerError { status: u16, message: String },
    #[error("rpc error (code {code}): {message}")]
    Rpc { code: i64, message: String },
    #[error("parse error: {0}")]
    Parse(String),
}

impl SdkError {
    pub(crate) fn parse_error(msg: impl Into<String>) -> Self {
        SdkError::Parse(msg.into())
    }

    pub(crate) fn server_error(status: u16, message: impl Into<String>) -> Self {
        SdkError::ServerError {
            status,
            message: message.into(),
        }
    }

    /// Whether another API endpoint might succeed where this one failed.
    ///
    /// Transport failures and 5xx responses qualify; RPC-level errors and
    /// undecodable payloads do not.
    pub fn is_transient(&self) -> bool {
        match self {
            SdkError::Http(err) => !err.is_decode(),
            SdkError::ServerError { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

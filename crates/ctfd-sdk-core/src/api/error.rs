use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(
        "Unable to get response in method {method} from url {url} in CTFd (status {status}): {}",
        truncate_body(.body)
    )]
    Status {
        method: String,
        url: String,
        status: u16,
        /// Raw response body, untruncated
        body: String,
    },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

/// Truncate a response body to avoid logging excessive data
fn truncate_body(body: &str) -> String {
    if body.len() <= MAX_ERROR_BODY_LENGTH {
        return body.to_string();
    }
    let mut end = MAX_ERROR_BODY_LENGTH;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
}

impl ApiError {
    pub fn from_status(
        method: &reqwest::Method,
        url: &str,
        status: reqwest::StatusCode,
        body: String,
    ) -> Self {
        ApiError::Status {
            method: method.to_string(),
            url: url.to_string(),
            status: status.as_u16(),
            body,
        }
    }

    /// Raw body of a rejected call
    pub fn body(&self) -> Option<&str> {
        match self {
            ApiError::Status { body, .. } => Some(body),
            _ => None,
        }
    }
}

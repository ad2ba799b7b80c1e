use serde_json::Value;
use thiserror::Error;

/// Errors from calls to the GoHighLevel API
#[derive(Debug, Error)]
pub enum ApiError {
    /// Connection, TLS, timeout or body transfer failure
    #[error("Request to GoHighLevel failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Upstream answered with a non-2xx status
    #[error("GoHighLevel API error {status}: {message}")]
    Status {
        status: u16,
        message: String,
        body: String,
    },

    /// Upstream answered 2xx with a body that is not JSON
    #[error("Invalid JSON in GoHighLevel response: {0}")]
    Decode(#[source] serde_json::Error),

    /// A request payload could not be encoded
    #[error("Failed to encode request: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("Invalid client configuration: {0}")]
    Config(String),
}

impl ApiError {
    /// Build a status error, pulling a readable message out of the upstream body.
    ///
    /// GoHighLevel returns `{"message": "..."}` or `{"message": ["...", "..."]}`
    /// for validation failures; anything else falls back to the raw body.
    pub fn status(status: u16, body: String) -> Self {
        let message = serde_json::from_str::<Value>(&body)
            .ok()
            .and_then(|v| match v.get("message") {
                Some(Value::String(s)) => Some(s.clone()),
                Some(Value::Array(items)) => Some(
                    items
                        .iter()
                        .map(|i| i.as_str().map(str::to_string).unwrap_or_else(|| i.to_string()))
                        .collect::<Vec<_>>()
                        .join("; "),
                ),
                _ => None,
            })
            .unwrap_or_else(|| {
                if body.trim().is_empty() {
                    "empty response".to_string()
                } else {
                    body.clone()
                }
            });

        ApiError::Status {
            status,
            message,
            body,
        }
    }

    /// HTTP status returned by the upstream, if the request got that far
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Request(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_message_from_string() {
        let err = ApiError::status(404, r#"{"statusCode":404,"message":"Contact not found"}"#.into());
        assert_eq!(err.to_string(), "GoHighLevel API error 404: Contact not found");
        assert_eq!(err.status_code(), Some(404));
    }

    #[test]
    fn test_status_message_from_array() {
        let err = ApiError::status(422, r#"{"message":["email must be an email","phone invalid"]}"#.into());
        assert_eq!(
            err.to_string(),
            "GoHighLevel API error 422: email must be an email; phone invalid"
        );
    }

    #[test]
    fn test_status_message_raw_body() {
        let err = ApiError::status(502, "Bad Gateway".into());
        assert_eq!(err.to_string(), "GoHighLevel API error 502: Bad Gateway");

        let err = ApiError::status(500, "".into());
        assert_eq!(err.to_string(), "GoHighLevel API error 500: empty response");
    }
}

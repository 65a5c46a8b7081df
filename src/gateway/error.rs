use thiserror::Error;

/// Why a backend call produced no usable result
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The request never got a response
    #[error("network error: {0}")]
    Network(String),

    /// The response body was not JSON
    #[error("invalid response body: {0}")]
    Decode(String),

    /// Non-2xx status; `message` is the body's `error` field when present
    #[error("{message}")]
    Api { status: u16, message: String },

    /// 2xx without a summary
    #[error("no result returned")]
    NoResult { detail: String },
}

impl GatewayError {
    pub fn status(&self) -> Option<u16> {
        match self {
            GatewayError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() { GatewayError::Decode(err.to_string()) } else { GatewayError::Network(err.to_string()) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_displays_message_only() {
        let err = GatewayError::Api { status: 500, message: "model overloaded".to_string() };
        assert_eq!(err.to_string(), "model overloaded");
        assert_eq!(err.status(), Some(500));
    }

    #[test]
    fn test_other_errors_have_no_status() {
        assert_eq!(GatewayError::Network("refused".into()).status(), None);
        assert_eq!(GatewayError::NoResult { detail: String::new() }.status(), None);
    }
}

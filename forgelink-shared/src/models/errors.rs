use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Generic error payload returned by simple failure paths.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct ErrorResponse {
    /// Human-readable description of the failure.
    pub error: String,
}

impl ErrorResponse {
    /// Builds an error response from any displayable message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_the_error_field() {
        let response = ErrorResponse::new("boom");
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["error"], "boom");
    }
}

//! Shared API response envelope
//!
//! Every JSON endpoint answers with either
//! `{ "success": true, "data": ... }` or
//! `{ "success": false, "message": ... }`.

use serde::{Deserialize, Serialize};

/// Successful response envelope
///
/// # Examples
///
/// ```
/// use coursehub_common::api::types::ApiResponse;
///
/// let body = ApiResponse::ok(vec![1, 2, 3]);
/// let json = serde_json::to_value(&body).unwrap();
/// assert_eq!(json["success"], true);
/// assert_eq!(json["data"][2], 3);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Always `true`
    pub success: bool,
    /// Response payload
    pub data: T,
}

impl<T> ApiResponse<T> {
    /// Wrap a payload in a success envelope
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Failure response envelope
///
/// # Examples
///
/// ```
/// use coursehub_common::api::types::ErrorResponse;
///
/// let error = ErrorResponse::new("Course not found");
/// assert!(!error.success);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Always `false`
    pub success: bool,
    /// Human-readable error message
    pub message: String,
}

impl ErrorResponse {
    /// Create new error response
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_response_serialization() {
        let error = ErrorResponse::new("Course not found");

        let json = serde_json::to_string(&error).unwrap();
        assert_eq!(json, r#"{"success":false,"message":"Course not found"}"#);
    }

    #[test]
    fn test_api_response_deserialization() {
        let json = r#"{"success": true, "data": {"id": 7}}"#;
        let response: ApiResponse<serde_json::Value> = serde_json::from_str(json).unwrap();

        assert!(response.success);
        assert_eq!(response.data["id"], 7);
    }
}

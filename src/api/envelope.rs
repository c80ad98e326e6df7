//! Response wrappers shared by every endpoint.

use serde::{Deserialize, Serialize};

use crate::stylists::model::PaginationMetadata;

/// `{success, data, message?}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    #[serde(default = "default_success")]
    pub success: bool,
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiEnvelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }
}

/// `{success, data: [...], pagination}` returned by the paginated list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedEnvelope<T> {
    #[serde(default = "default_success")]
    pub success: bool,
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
    /// Absent when `success` is false.
    pub pagination: Option<PaginationMetadata>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Standard HTTP error body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}

fn default_success() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_success_defaults_true() {
        let env: ApiEnvelope<u32> = serde_json::from_str(r#"{"data": 3}"#).unwrap();
        assert!(env.success);
        assert_eq!(env.data, Some(3));
    }

    #[test]
    fn refused_envelope_keeps_message() {
        let env: ApiEnvelope<serde_json::Value> =
            serde_json::from_str(r#"{"success": false, "message": "Invite already used"}"#).unwrap();
        assert!(!env.success);
        assert_eq!(env.message.as_deref(), Some("Invite already used"));
    }

    #[test]
    fn refused_page_needs_no_pagination() {
        let env: PaginatedEnvelope<serde_json::Value> =
            serde_json::from_str(r#"{"success": false, "message": "Invalid sort field"}"#).unwrap();
        assert!(!env.success);
        assert!(env.data.is_empty());
        assert!(env.pagination.is_none());
        assert_eq!(env.message.as_deref(), Some("Invalid sort field"));
    }

    #[test]
    fn error_body_tolerates_extra_fields() {
        let body: ErrorBody =
            serde_json::from_str(r#"{"message": "Not found", "statusCode": 404}"#).unwrap();
        assert_eq!(body.message.as_deref(), Some("Not found"));
    }
}

//! DTOs for registering link metadata with the analytics service.

use regex::Regex;
use serde::Deserialize;
use std::sync::LazyLock;
use validator::Validate;

use crate::domain::entities::{LinkMetadata, MetadataStatus};

static SHORT_CODE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("valid short code pattern"));

/// Request to register or refresh a link's metadata.
///
/// Enrichment fields that are omitted keep their stored values.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterLinkRequest {
    #[validate(length(min = 1, max = 64))]
    #[validate(regex(path = *SHORT_CODE_REGEX, message = "Invalid short code"))]
    pub short_code: String,

    #[validate(url(message = "Invalid URL format"))]
    pub long_url: String,

    #[validate(length(max = 512))]
    pub title: Option<String>,

    #[validate(length(max = 2048))]
    pub description: Option<String>,

    #[validate(url(message = "Invalid favicon URL"))]
    pub favicon_url: Option<String>,

    #[serde(default)]
    pub status: MetadataStatus,
}

impl From<RegisterLinkRequest> for LinkMetadata {
    fn from(request: RegisterLinkRequest) -> Self {
        LinkMetadata {
            code: request.short_code,
            target_url: request.long_url,
            title: request.title,
            description: request.description,
            favicon_url: request.favicon_url,
            status: request.status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_request_defaults_to_pending() {
        let request: RegisterLinkRequest = serde_json::from_str(
            r#"{"short_code":"ab12cd","long_url":"https://example.com"}"#,
        )
        .unwrap();

        assert!(request.validate().is_ok());

        let metadata = LinkMetadata::from(request);
        assert_eq!(metadata.status, MetadataStatus::Pending);
        assert!(metadata.title.is_none());
    }

    #[test]
    fn test_bad_code_fails_validation() {
        let request: RegisterLinkRequest = serde_json::from_str(
            r#"{"short_code":"a b","long_url":"https://example.com"}"#,
        )
        .unwrap();

        assert!(request.validate().is_err());
    }

    #[test]
    fn test_unknown_status_is_rejected() {
        let result = serde_json::from_str::<RegisterLinkRequest>(
            r#"{"short_code":"ab12cd","long_url":"https://example.com","status":"done"}"#,
        );

        assert!(result.is_err());
    }
}

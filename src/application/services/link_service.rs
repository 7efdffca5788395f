//! Link creation and retrieval service.

use std::sync::Arc;

use crate::domain::entities::{NewShortLink, ShortLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::utils::code_generator::generate_code;
use crate::utils::url_validator::validate_target_url;
use serde_json::json;

/// Attempts at inserting a freshly generated code before giving up.
pub const MAX_CODE_ATTEMPTS: usize = 10;

/// Service for creating and retrieving shortened links.
///
/// Code uniqueness is left to the store's constraint: a colliding insert comes
/// back as [`AppError::Conflict`] and is retried with a new code, so two
/// concurrent creations can never end up sharing one.
pub struct LinkService {
    link_repository: Arc<dyn LinkRepository>,
    public_base_url: String,
}

impl LinkService {
    /// Creates a new link service.
    ///
    /// `public_base_url` prefixes every returned short URL; a trailing slash
    /// is ignored.
    pub fn new(link_repository: Arc<dyn LinkRepository>, public_base_url: impl Into<String>) -> Self {
        let public_base_url = public_base_url.into().trim_end_matches('/').to_string();
        Self {
            link_repository,
            public_base_url,
        }
    }

    /// Creates a short link for `long_url`.
    ///
    /// The URL is stored exactly as submitted (minus surrounding whitespace).
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the URL is empty, malformed or not
    /// http(s); nothing is written in that case.
    ///
    /// Returns [`AppError::Internal`] after [`MAX_CODE_ATTEMPTS`] collisions
    /// or on database errors.
    pub async fn create_short_link(&self, long_url: &str) -> Result<ShortLink, AppError> {
        let target_url = validate_target_url(long_url).map_err(|e| {
            AppError::bad_request("Invalid URL format", json!({ "reason": e.to_string() }))
        })?;

        for attempt in 1..=MAX_CODE_ATTEMPTS {
            let new_link = NewShortLink {
                code: generate_code(),
                target_url: target_url.to_string(),
            };

            match self.link_repository.create(new_link).await {
                Ok(link) => {
                    tracing::info!(code = %link.code, "Short link created");
                    return Ok(link);
                }
                Err(AppError::Conflict { .. }) => {
                    tracing::debug!(attempt, "Short code collision, retrying");
                }
                Err(e) => return Err(e),
            }
        }

        Err(AppError::internal(
            "Failed to generate unique code",
            json!({ "reason": "Too many collisions", "attempts": MAX_CODE_ATTEMPTS }),
        ))
    }

    /// Retrieves a link by its short code.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link matches the code.
    pub async fn get_link_by_code(&self, code: &str) -> Result<ShortLink, AppError> {
        self.link_repository
            .find_by_code(code)
            .await?
            .ok_or_else(|| AppError::not_found("Short link not found", json!({ "code": code })))
    }

    /// Lists the most recently created links.
    pub async fn list_recent(&self, limit: i64) -> Result<Vec<ShortLink>, AppError> {
        self.link_repository.list_recent(limit).await
    }

    /// Total number of stored links.
    pub async fn count_links(&self) -> Result<i64, AppError> {
        self.link_repository.count().await
    }

    /// Constructs the public short URL for a code.
    pub fn short_url(&self, code: &str) -> String {
        format!("{}/{}", self.public_base_url, code)
    }
}

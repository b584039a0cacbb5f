//! Template record models and request payloads.

use crate::error::AppError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A named unit of insertable text.
///
/// Records arrive from two places: the user-defined list persisted in the
/// store, and the remote source payload. Remote payloads are only required
/// to carry `id`/`name`/`content`, so every field defaults when absent; an
/// empty `id` means "unknown" and such records neither collide nor lock.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Template {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Request payload for creating a template.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTemplateRequest {
    pub name: String,
    pub content: String,
}

/// Request payload for updating a template.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTemplateRequest {
    pub name: Option<String>,
    pub content: Option<String>,
}

impl Template {
    /// Create a new user-defined template with a fresh id and timestamps.
    ///
    /// # Returns
    /// A new [`Template`] instance.
    pub fn new(name: String, content: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            content,
            created_at: Some(now),
            updated_at: Some(now),
        }
    }

    /// A record may appear in the menu only with a non-empty name and content.
    pub fn is_menu_ready(&self) -> bool {
        !self.name.is_empty() && !self.content.is_empty()
    }
}

impl CreateTemplateRequest {
    /// Validate the payload and build the template to persist.
    ///
    /// # Returns
    /// A new [`Template`] with an assigned id.
    ///
    /// # Errors
    /// Returns [`AppError::BadRequest`] when name or content is empty.
    pub fn into_template(self) -> Result<Template, AppError> {
        if self.name.trim().is_empty() {
            return Err(AppError::BadRequest("template name is required".to_string()));
        }
        if self.content.is_empty() {
            return Err(AppError::BadRequest(
                "template content is required".to_string(),
            ));
        }
        Ok(Template::new(self.name, self.content))
    }
}

/// Apply a partial update to a stored template, bumping its updated stamp.
pub fn apply_update_request(template: &mut Template, update: &UpdateTemplateRequest) {
    if let Some(name) = &update.name {
        template.name = name.clone();
    }
    if let Some(content) = &update.content {
        template.content = content.clone();
    }
    template.updated_at = Some(Utc::now());
}

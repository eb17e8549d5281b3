//! The generative-AI service boundary.

use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::ImageRef;
use crate::models::DietPreference;

/// Recipe text and its ingredient list as returned by the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeText {
    pub recipe: String,
    pub ingredients: String,
}

#[derive(Debug, Error)]
pub enum AiError {
    #[error("AI service not configured. Set ai.api_key in config or PLANNER_AI_API_KEY.")]
    NotConfigured,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("AI service returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("AI service returned an empty response")]
    EmptyResponse,

    #[error("Failed to parse AI response: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid image data: {0}")]
    InvalidImage(#[from] base64::DecodeError),
}

/// Capabilities of the generative-AI service.
///
/// Every call is a single request with no retry; callers decide how to
/// degrade when one fails.
pub trait AiBackend: Send + Sync {
    fn suggest_meals(&self, diet: DietPreference) -> BoxFuture<'_, Result<Vec<String>, AiError>>;

    fn fetch_ingredients<'a>(
        &'a self,
        meal: &'a str,
        diet: DietPreference,
    ) -> BoxFuture<'a, Result<String, AiError>>;

    /// Structured recipe with a separate ingredient list.
    fn fetch_recipe<'a>(
        &'a self,
        meal: &'a str,
        diet: DietPreference,
    ) -> BoxFuture<'a, Result<RecipeText, AiError>>;

    /// `Ok(None)` when the model answered without an image.
    fn fetch_image<'a>(
        &'a self,
        meal: &'a str,
        diet: DietPreference,
    ) -> BoxFuture<'a, Result<Option<ImageRef>, AiError>>;

    fn converse<'a>(
        &'a self,
        text: &'a str,
        diet: DietPreference,
    ) -> BoxFuture<'a, Result<String, AiError>>;
}

//! Gemini `generateContent` client.
//!
//! Text requests go to the text model with a system instruction describing
//! the household's diet. List and object answers use JSON response mode with
//! a schema; images come back as base64 `inlineData` parts.

use futures::future::BoxFuture;
use futures::FutureExt;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::{prompt, AiBackend, AiError, ImageRef, RecipeText};
use crate::models::DietPreference;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_TEXT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_IMAGE_MODEL: &str = "gemini-2.5-flash-image";

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub base_url: String,
    pub text_model: String,
    pub image_model: String,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            text_model: DEFAULT_TEXT_MODEL.to_string(),
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<Value>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Default, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Default, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Content,
}

impl GenerateResponse {
    fn parts(&self) -> impl Iterator<Item = &Part> {
        self.candidates
            .first()
            .into_iter()
            .flat_map(|c| c.content.parts.iter())
    }

    /// Concatenated text of the first candidate.
    fn text(&self) -> Option<String> {
        let text: String = self.parts().filter_map(|p| p.text.as_deref()).collect();
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }

    fn image(&self) -> Option<&InlineData> {
        self.parts()
            .filter_map(|p| p.inline_data.as_ref())
            .find(|d| !d.data.is_empty())
    }
}

fn text_content(role: Option<&str>, text: &str) -> Content {
    Content {
        role: role.map(str::to_string),
        parts: vec![Part {
            text: Some(text.to_string()),
            inline_data: None,
        }],
    }
}

fn user_text(text: &str) -> Content {
    text_content(Some("user"), text)
}

fn system_text(diet: DietPreference) -> Content {
    text_content(None, &prompt::system_instruction(diet))
}

#[derive(Debug, Clone)]
pub struct GeminiBackend {
    config: GeminiConfig,
    client: reqwest::Client,
}

impl GeminiBackend {
    pub fn new(config: GeminiConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    fn endpoint(&self, model: &str) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            model
        )
    }

    async fn generate(
        &self,
        model: &str,
        request: &GenerateRequest,
    ) -> Result<GenerateResponse, AiError> {
        if self.config.api_key.is_empty() {
            return Err(AiError::NotConfigured);
        }

        tracing::debug!("POST {}", self.endpoint(model));
        let response = self
            .client
            .post(self.endpoint(model))
            .header("x-goog-api-key", &self.config.api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json().await?)
    }

    async fn generate_text(&self, prompt: &str, diet: DietPreference) -> Result<String, AiError> {
        let request = GenerateRequest {
            contents: vec![user_text(prompt)],
            system_instruction: Some(system_text(diet)),
            generation_config: None,
        };
        self.generate(&self.config.text_model, &request)
            .await?
            .text()
            .ok_or(AiError::EmptyResponse)
    }

    async fn generate_json<T: DeserializeOwned>(
        &self,
        request: &GenerateRequest,
    ) -> Result<T, AiError> {
        let text = self
            .generate(&self.config.text_model, request)
            .await?
            .text()
            .ok_or(AiError::EmptyResponse)?;
        Ok(serde_json::from_str(text.trim())?)
    }
}

/// Builds a JSON-mode request. Suggestions go out without a system
/// instruction; the diet is already part of their prompt.
fn json_request(prompt: &str, system: Option<Content>, schema: Value) -> GenerateRequest {
    GenerateRequest {
        contents: vec![user_text(prompt)],
        system_instruction: system,
        generation_config: Some(json!({
            "responseMimeType": "application/json",
            "responseSchema": schema,
        })),
    }
}

fn suggestions_schema() -> Value {
    json!({ "type": "ARRAY", "items": { "type": "STRING" } })
}

fn recipe_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "recipe": { "type": "STRING", "description": "The full recipe in Markdown format." },
            "ingredients": { "type": "STRING", "description": "A comma-separated list of ingredients." },
        },
        "required": ["recipe", "ingredients"],
    })
}

impl AiBackend for GeminiBackend {
    fn suggest_meals(&self, diet: DietPreference) -> BoxFuture<'_, Result<Vec<String>, AiError>> {
        async move {
            let prompt = prompt::suggestions(diet);
            let request = json_request(&prompt, None, suggestions_schema());
            match self.generate_json(&request).await {
                Err(AiError::EmptyResponse) => Ok(Vec::new()),
                other => other,
            }
        }
        .boxed()
    }

    fn fetch_ingredients<'a>(
        &'a self,
        meal: &'a str,
        diet: DietPreference,
    ) -> BoxFuture<'a, Result<String, AiError>> {
        async move {
            match self.generate_text(&prompt::ingredients(meal, diet), diet).await {
                Err(AiError::EmptyResponse) => Ok(String::new()),
                other => other,
            }
        }
        .boxed()
    }

    fn fetch_recipe<'a>(
        &'a self,
        meal: &'a str,
        diet: DietPreference,
    ) -> BoxFuture<'a, Result<RecipeText, AiError>> {
        async move {
            let request = json_request(
                &prompt::structured_recipe(meal, diet),
                Some(system_text(diet)),
                recipe_schema(),
            );
            self.generate_json(&request).await
        }
        .boxed()
    }

    fn fetch_image<'a>(
        &'a self,
        meal: &'a str,
        diet: DietPreference,
    ) -> BoxFuture<'a, Result<Option<ImageRef>, AiError>> {
        async move {
            let request = GenerateRequest {
                contents: vec![user_text(&prompt::image(meal, diet))],
                system_instruction: None,
                generation_config: Some(json!({ "responseModalities": ["IMAGE"] })),
            };
            let response = self.generate(&self.config.image_model, &request).await?;
            match response.image() {
                Some(data) => Ok(Some(ImageRef::from_base64(&data.mime_type, &data.data)?)),
                None => Ok(None),
            }
        }
        .boxed()
    }

    fn converse<'a>(
        &'a self,
        text: &'a str,
        diet: DietPreference,
    ) -> BoxFuture<'a, Result<String, AiError>> {
        async move { self.generate_text(text, diet).await }.boxed()
    }
}

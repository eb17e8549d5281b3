//! Generative-AI assistance.
//!
//! The planner core never depends on the AI service directly. [`AiBackend`]
//! is the fallible service boundary, [`Assistant`] turns every failure into a
//! fixed fallback, and [`GeminiBackend`] is the HTTP implementation.

mod assistant;
mod backend;
mod gemini;
mod image;
mod panel;
pub mod prompt;
mod request;

pub use assistant::{
    fallback_suggestions, Assistant, MealSuggestion, RecipeDetails, RECIPE_FALLBACK,
    RESPONSE_FALLBACK,
};
pub use backend::{AiBackend, AiError, RecipeText};
pub use gemini::{
    GeminiBackend, GeminiConfig, DEFAULT_BASE_URL, DEFAULT_IMAGE_MODEL, DEFAULT_TEXT_MODEL,
};
pub use image::ImageRef;
pub use panel::SuggestionPanel;
pub use request::{RequestSlot, SlotState, Ticket};

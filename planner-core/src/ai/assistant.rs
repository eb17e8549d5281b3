//! Fallback-applying front for an [`AiBackend`].
//!
//! Every method here always produces a value. A failed backend call is logged
//! and replaced with a fixed fallback so callers never see an AI error.

use serde::Serialize;

use super::{prompt, AiBackend, ImageRef, RecipeText};
use crate::models::DietPreference;

pub const RESPONSE_FALLBACK: &str = "Sorry, I couldn't fetch a response. Please try again.";
pub const RECIPE_FALLBACK: &str = "Sorry, I couldn't fetch the recipe. Please try again.";

/// Fixed suggestions used when the service cannot be reached.
pub fn fallback_suggestions(diet: DietPreference) -> Vec<String> {
    let names: [&str; 5] = match diet {
        DietPreference::Vegan => [
            "Lentil Soup",
            "Vegetable Stir-fry",
            "Chickpea Curry",
            "Mushroom Risotto (Vegan)",
            "Black Bean Burgers",
        ],
        DietPreference::Vegetarian => [
            "Mushroom Risotto",
            "Vegetable Lasagna",
            "Egg Fried Rice",
            "Caprese Pasta",
            "Halloumi Skewers",
        ],
        _ => [
            "Tuna Pasta Bake",
            "Chicken Fajitas",
            "Mushroom Risotto",
            "Vegetable Stir-fry",
            "Lentil Soup",
        ],
    };
    names.iter().map(|s| s.to_string()).collect()
}

/// A recipe with its ingredient list and optional photo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeDetails {
    pub meal_name: String,
    pub recipe: String,
    pub ingredients: String,
    pub image: Option<ImageRef>,
}

impl RecipeDetails {
    pub fn placeholder(meal_name: &str) -> Self {
        Self {
            meal_name: meal_name.to_string(),
            recipe: RECIPE_FALLBACK.to_string(),
            ingredients: String::new(),
            image: None,
        }
    }

    /// The meal to add to the plan. Only available when the recipe came
    /// with ingredients.
    pub fn to_suggestion(&self) -> Option<MealSuggestion> {
        if self.ingredients.trim().is_empty() {
            return None;
        }
        Some(MealSuggestion {
            name: self.meal_name.clone(),
            ingredients: self.ingredients.clone(),
        })
    }
}

/// A suggested meal ready to be placed on the calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MealSuggestion {
    pub name: String,
    pub ingredients: String,
}

#[derive(Debug, Clone)]
pub struct Assistant<B> {
    backend: B,
}

impl<B: AiBackend> Assistant<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Up to five meal ideas for `diet`.
    pub async fn suggest_meals(&self, diet: DietPreference) -> Vec<String> {
        match self.backend.suggest_meals(diet).await {
            Ok(names) => names
                .into_iter()
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty())
                .take(prompt::SUGGESTION_COUNT)
                .collect(),
            Err(e) => {
                tracing::warn!("Error fetching meal suggestions: {}", e);
                fallback_suggestions(diet)
            }
        }
    }

    /// Comma-separated ingredients for `meal`, or an empty string.
    pub async fn fetch_ingredients(&self, meal: &str, diet: DietPreference) -> String {
        match self.backend.fetch_ingredients(meal, diet).await {
            Ok(text) => text.trim().to_string(),
            Err(e) => {
                tracing::warn!("Error fetching ingredients for {}: {}", meal, e);
                String::new()
            }
        }
    }

    pub async fn converse(&self, text: &str, diet: DietPreference) -> String {
        match self.backend.converse(text, diet).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::warn!("Error fetching AI response: {}", e);
                RESPONSE_FALLBACK.to_string()
            }
        }
    }

    /// Recipe, ingredients and photo for `meal`, fetched concurrently.
    ///
    /// A failed structured recipe is rebuilt from a plain-text recipe and a
    /// separate ingredients request. A failed image request replaces the
    /// whole result with the placeholder.
    pub async fn fetch_recipe_details(&self, meal: &str, diet: DietPreference) -> RecipeDetails {
        let (text, image) = futures::join!(
            self.recipe_text(meal, diet),
            self.backend.fetch_image(meal, diet)
        );

        match image {
            Ok(image) => RecipeDetails {
                meal_name: meal.to_string(),
                recipe: text.recipe,
                ingredients: text.ingredients,
                image,
            },
            Err(e) => {
                tracing::warn!("Error fetching details for {}: {}", meal, e);
                RecipeDetails::placeholder(meal)
            }
        }
    }

    async fn recipe_text(&self, meal: &str, diet: DietPreference) -> RecipeText {
        match self.backend.fetch_recipe(meal, diet).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("Error fetching structured recipe for {}: {}", meal, e);
                let recipe = self.converse(&prompt::plain_recipe(meal, diet), diet).await;
                let ingredients = self.fetch_ingredients(meal, diet).await;
                RecipeText {
                    recipe,
                    ingredients,
                }
            }
        }
    }
}

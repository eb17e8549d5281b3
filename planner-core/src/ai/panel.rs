//! Suggestion browsing state.
//!
//! Mirrors the suggestion sidebar: a list of meal ideas, one selected meal
//! whose recipe is loading or shown, and the "add to plan" step. Results are
//! delivered through [`RequestSlot`] tickets so a recipe that finishes after
//! the user went back to the list is discarded.

use super::{MealSuggestion, RecipeDetails, RequestSlot, Ticket};

#[derive(Debug, Default)]
pub struct SuggestionPanel {
    suggestions: RequestSlot<Vec<String>>,
    selected: Option<String>,
    details: RequestSlot<RecipeDetails>,
}

impl SuggestionPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts (re)loading the suggestion list, e.g. after the diet changed.
    pub fn begin_suggestions(&mut self) -> Ticket {
        self.suggestions.begin()
    }

    pub fn finish_suggestions(&mut self, ticket: Ticket, names: Vec<String>) -> bool {
        self.suggestions.complete(ticket, names)
    }

    pub fn suggestions(&self) -> &[String] {
        self.suggestions.value().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_loading_suggestions(&self) -> bool {
        self.suggestions.is_loading()
    }

    /// Selects a meal and starts loading its recipe.
    pub fn select(&mut self, meal: impl Into<String>) -> Ticket {
        self.selected = Some(meal.into());
        self.details.begin()
    }

    pub fn finish_details(&mut self, ticket: Ticket, details: RecipeDetails) -> bool {
        let matches_selection = self.selected.as_deref() == Some(details.meal_name.as_str());
        matches_selection && self.details.complete(ticket, details)
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn details(&self) -> Option<&RecipeDetails> {
        self.details.value()
    }

    pub fn is_loading_details(&self) -> bool {
        self.details.is_loading()
    }

    /// Returns to the suggestion list, discarding the selected recipe.
    pub fn back(&mut self) {
        self.selected = None;
        self.details.dismiss();
    }

    /// The meal to add, available once the selected recipe has ingredients.
    pub fn add_to_plan(&self) -> Option<MealSuggestion> {
        self.details().and_then(RecipeDetails::to_suggestion)
    }
}

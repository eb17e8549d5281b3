//! Prompt text sent to the generative model.

use crate::models::DietPreference;

pub const SUGGESTION_COUNT: usize = 5;

pub fn system_instruction(diet: DietPreference) -> String {
    format!(
        "You are a helpful culinary assistant for a couple in Australia of Sri Lankan descent.\n\
         You specialize in suggesting creative Sri Lankan recipes, fusion dishes that blend Sri Lankan and Australian cuisines, and practical meal plans.\n\
         The user has a dietary preference for {} meals. All your suggestions and recipes MUST adhere to this preference.\n\
         When asked for ingredients, provide them as a simple comma-separated list.\n\
         When providing recipes, format them using Markdown with headings for titles, lists for ingredients and steps, and bold for emphasis.\n\
         Keep your suggestions exciting, practical, and tailored to a modern household.",
        diet.description()
    )
}

pub fn suggestions(diet: DietPreference) -> String {
    format!(
        "List {} simple, budget-conscious, {} meal ideas focusing on international cuisine.\n\
         The meals should be easy for a couple to cook at home.\n\
         Return the list as a JSON array of strings, like [\"Tuna Pasta Bake\", \"Chicken Fajitas\", \"Mushroom Risotto\", \"Vegetable Stir-fry\", \"Lentil Soup\"].",
        SUGGESTION_COUNT,
        diet.description()
    )
}

pub fn ingredients(meal: &str, diet: DietPreference) -> String {
    format!(
        "List the common ingredients for a {} version of \"{}\" as a simple, comma-separated list.",
        diet.description(),
        meal
    )
}

pub fn structured_recipe(meal: &str, diet: DietPreference) -> String {
    format!(
        "Provide a simple, step-by-step recipe for a {} version of {}. \
         Format the response as a JSON object with two keys: \"recipe\" (a string containing the full recipe in Markdown format, \
         including title, description, ingredients list, and instructions) and \"ingredients\" \
         (a string containing a simple comma-separated list of the ingredients).",
        diet.description(),
        meal
    )
}

pub fn plain_recipe(meal: &str, diet: DietPreference) -> String {
    format!(
        "Provide a simple, step-by-step recipe for a {} version of {}. Format the response using Markdown. \
         Include a title, a short description, an ingredients list, and instructions.",
        diet.description(),
        meal
    )
}

pub fn image(meal: &str, diet: DietPreference) -> String {
    format!(
        "A vibrant, appetizing, high-quality photo of a freshly made {} version of {}, \
         plated beautifully on a clean, modern dish.",
        diet.description(),
        meal
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompts_carry_diet_description() {
        let diet = DietPreference::Vegan;
        assert!(system_instruction(diet).contains("strictly vegan"));
        assert!(suggestions(diet).contains("strictly vegan"));
        assert!(ingredients("Dhal", diet).contains("\"Dhal\""));
        assert!(structured_recipe("Dhal", diet).contains("JSON object"));
        assert!(plain_recipe("Dhal", diet).contains("Markdown"));
        assert!(image("Dhal", diet).contains("Dhal"));
    }
}

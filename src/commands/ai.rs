//! AI assistant commands.
//!
//! Every answer comes through `Assistant`, so a missing key or a failed
//! request prints the canned fallback instead of an error.

use clap::{Args, Subcommand};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use planner_core::ai::{ImageRef, SuggestionPanel};
use planner_core::calendar::{format_date_key, parse_date_key};
use planner_core::MealSlot;

use super::{assistant, open_planner, settle_outcome, ConfirmArgs, OutputFormat};
use crate::config::Config;

#[derive(Args)]
pub struct AiCommand {
    #[command(subcommand)]
    pub command: AiSubcommand,
}

#[derive(Subcommand)]
pub enum AiSubcommand {
    /// Suggest meals for the current diet preference
    Suggest {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Fetch a recipe with ingredients and a photo
    Recipe {
        /// Meal name
        meal: String,

        /// Add the meal to the plan on this date (YYYY-MM-DD)
        #[arg(long)]
        add: Option<String>,

        /// Slot to use with --add
        #[arg(long, short, default_value = "dinner")]
        slot: MealSlot,

        /// Write the recipe photo to this path
        #[arg(long)]
        save_image: Option<PathBuf>,

        #[command(flatten)]
        confirm: ConfirmArgs,
    },

    /// List ingredients for a meal
    Ingredients {
        /// Meal name
        meal: String,
    },

    /// Ask the assistant a question
    Ask {
        /// Question text
        #[arg(required = true, num_args = 1..)]
        question: Vec<String>,
    },

    /// Chat with the assistant until an empty line or "exit"
    Chat,
}

impl AiCommand {
    pub fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        let mut planner = open_planner(config);
        let diet = planner.diet();
        let assistant = assistant(config);
        let rt = tokio::runtime::Runtime::new()?;

        match &self.command {
            AiSubcommand::Suggest { format } => {
                let mut panel = SuggestionPanel::new();
                let ticket = panel.begin_suggestions();
                let names = rt.block_on(assistant.suggest_meals(diet));
                panel.finish_suggestions(ticket, names);

                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(panel.suggestions())?);
                    }
                    OutputFormat::Text => {
                        println!("Suggestions ({})", diet);
                        println!("{}", "=".repeat(30));
                        if panel.suggestions().is_empty() {
                            println!("No suggestions right now.");
                        }
                        for (i, name) in panel.suggestions().iter().enumerate() {
                            println!("{}. {}", i + 1, name);
                        }
                    }
                }
                Ok(())
            }

            AiSubcommand::Recipe {
                meal,
                add,
                slot,
                save_image,
                confirm,
            } => {
                // Validate before spending a request
                let add_date = add.as_deref().map(parse_date_key).transpose()?;

                let mut panel = SuggestionPanel::new();
                let ticket = panel.select(meal.trim());
                let details = rt.block_on(assistant.fetch_recipe_details(meal.trim(), diet));
                panel.finish_details(ticket, details);

                let Some(details) = panel.details() else {
                    return Ok(());
                };
                println!("{}\n", details.recipe);
                if !details.ingredients.is_empty() {
                    println!("Ingredients: {}", details.ingredients);
                }

                if let Some(path) = save_image {
                    match &details.image {
                        Some(image) => {
                            let written = save_image_to(image, path)?;
                            println!("Saved photo to {}", written.display());
                        }
                        None => println!("No photo available for {}.", details.meal_name),
                    }
                }

                if let Some(date) = add_date {
                    let suggestion = panel.add_to_plan().ok_or_else(|| {
                        format!("No ingredients for {}; not adding it to the plan", meal)
                    })?;
                    let outcome = planner.add_suggested_meal(date, *slot, &suggestion)?;
                    if settle_outcome(&mut planner, outcome, *confirm)? {
                        println!(
                            "Planned {} for {} {}",
                            suggestion.name,
                            format_date_key(date),
                            slot
                        );
                    }
                }
                Ok(())
            }

            AiSubcommand::Ingredients { meal } => {
                let ingredients = rt.block_on(assistant.fetch_ingredients(meal, diet));
                if ingredients.is_empty() {
                    println!("No ingredients found for {}.", meal);
                } else {
                    println!("{}", ingredients);
                }
                Ok(())
            }

            AiSubcommand::Ask { question } => {
                let question = question.join(" ");
                println!("{}", rt.block_on(assistant.converse(&question, diet)));
                Ok(())
            }

            AiSubcommand::Chat => {
                println!("Ask about meals and recipes ({}). Empty line to quit.", diet);
                let stdin = io::stdin();
                loop {
                    print!("> ");
                    io::stdout().flush()?;

                    let mut line = String::new();
                    if stdin.lock().read_line(&mut line)? == 0 {
                        break;
                    }
                    let line = line.trim();
                    if line.is_empty() || line.eq_ignore_ascii_case("exit") {
                        break;
                    }
                    println!("{}\n", rt.block_on(assistant.converse(line, diet)));
                }
                Ok(())
            }
        }
    }
}

/// Writes the decoded photo, adding the extension for its type when `path`
/// has none.
fn save_image_to(image: &ImageRef, path: &Path) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let path = if path.extension().is_none() {
        path.with_extension(image.extension())
    } else {
        path.to_path_buf()
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&path, image.to_bytes()?)?;
    Ok(path)
}

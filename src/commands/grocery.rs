//! Grocery list commands.
//!
//! The list is rebuilt from the planned meals whenever the plan changes;
//! these commands cover the manual edits in between.

use clap::{Args, Subcommand};
use uuid::Uuid;

use planner_core::{GroceryItem, GroceryList};

use super::{open_planner, OutputFormat};
use crate::config::Config;

#[derive(Args)]
pub struct GroceryCommand {
    #[command(subcommand)]
    pub command: GrocerySubcommand,
}

#[derive(Subcommand)]
pub enum GrocerySubcommand {
    /// List grocery items
    List {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Add an item by hand
    Add {
        /// Item name
        name: String,
    },

    /// Check or uncheck an item
    Toggle {
        /// Item id or name
        item: String,
    },

    /// Remove an item
    Remove {
        /// Item id or name
        item: String,
    },
}

impl GroceryCommand {
    pub fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        let mut planner = open_planner(config);

        match &self.command {
            GrocerySubcommand::List { format } => {
                let grocery = planner.grocery();
                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(grocery.as_ref())?);
                    }
                    OutputFormat::Text => {
                        println!(
                            "Grocery List ({}/{} checked)",
                            grocery.checked_count(),
                            grocery.len()
                        );
                        println!("{}", "=".repeat(30));
                        if grocery.is_empty() {
                            println!("Nothing to buy.");
                        }
                        for item in grocery.iter() {
                            println!("{}", item);
                        }
                    }
                }
                Ok(())
            }

            GrocerySubcommand::Add { name } => {
                let name = name.trim();
                if name.is_empty() {
                    return Err("Item name cannot be empty".into());
                }
                if let Some(existing) = planner.grocery().find_by_name(name) {
                    println!("Already on the list: {}", existing.name);
                    return Ok(());
                }
                planner.add_grocery_item(name);
                println!("Added: {}", name);
                Ok(())
            }

            GrocerySubcommand::Toggle { item } => {
                let target = resolve_item(&planner.grocery(), item)?;
                planner.toggle_grocery_item(target.id);
                let state = if target.checked { "Unchecked" } else { "Checked" };
                println!("{}: {}", state, target.name);
                Ok(())
            }

            GrocerySubcommand::Remove { item } => {
                let target = resolve_item(&planner.grocery(), item)?;
                planner.remove_grocery_item(target.id);
                println!("Removed: {}", target.name);
                Ok(())
            }
        }
    }
}

/// Finds an item by id, falling back to a case-insensitive name match.
fn resolve_item(list: &GroceryList, item: &str) -> Result<GroceryItem, String> {
    let item = item.trim();
    let by_id = Uuid::parse_str(item).ok().and_then(|id| list.get(id));
    by_id
        .or_else(|| list.find_by_name(item))
        .cloned()
        .ok_or_else(|| format!("Grocery item not found: {}", item))
}

use clap::{Args, Subcommand};
use serde_json::json;

use planner_core::DietPreference;

use super::{open_planner, OutputFormat};
use crate::config::Config;

#[derive(Args)]
pub struct DietCommand {
    #[command(subcommand)]
    pub command: DietSubcommand,
}

#[derive(Subcommand)]
pub enum DietSubcommand {
    /// Show the current dietary preference
    Show {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Set the dietary preference used for AI suggestions
    Set {
        /// Preference name or number (0 = vegan ... 4 = carnivore)
        preference: DietPreference,
    },

    /// List the available preferences
    List,
}

impl DietCommand {
    pub fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        let mut planner = open_planner(config);

        match &self.command {
            DietSubcommand::Show { format } => {
                let diet = planner.diet();
                match format {
                    OutputFormat::Json => {
                        let output = json!({
                            "preference": diet.label(),
                            "ordinal": diet.ordinal(),
                            "description": diet.description(),
                        });
                        println!("{}", serde_json::to_string_pretty(&output)?);
                    }
                    OutputFormat::Text => {
                        println!("{}: {}", diet, diet.description());
                    }
                }
                Ok(())
            }

            DietSubcommand::Set { preference } => {
                planner.set_diet_preference(*preference);
                println!("Diet preference set to {}", preference);
                Ok(())
            }

            DietSubcommand::List => {
                let current = planner.diet();
                for diet in DietPreference::ALL {
                    let marker = if diet == current { "*" } else { " " };
                    println!(
                        "{} {} {:<12} {}",
                        marker,
                        diet.ordinal(),
                        diet.label(),
                        diet.description()
                    );
                }
                Ok(())
            }
        }
    }
}

//! Meal calendar commands.

use chrono::{Datelike, NaiveDate};
use clap::{Args, Subcommand};
use serde_json::json;

use planner_core::calendar::{calendar_dates, format_date_key, parse_date_key, shift_month, today};
use planner_core::{DayRecord, Meal, MealSlot};

use super::{assistant, open_planner, settle_outcome, ConfirmArgs, OutputFormat};
use crate::config::Config;

#[derive(Args)]
pub struct MealCommand {
    #[command(subcommand)]
    pub command: MealSubcommand,
}

#[derive(Subcommand)]
pub enum MealSubcommand {
    /// Plan a meal, replacing whatever is in the slot
    Set {
        /// Date (YYYY-MM-DD)
        date: String,

        /// Lunch or dinner
        slot: MealSlot,

        /// Meal name
        name: String,

        /// Comma-separated ingredients
        #[arg(long, short, default_value = "")]
        ingredients: String,

        /// Append ingredients suggested by the AI assistant
        #[arg(long)]
        suggest_ingredients: bool,

        #[command(flatten)]
        confirm: ConfirmArgs,
    },

    /// Remove a planned meal
    Delete {
        /// Date (YYYY-MM-DD)
        date: String,

        /// Lunch or dinner
        slot: MealSlot,
    },

    /// Toggle eating out for a day
    EatingOut {
        /// Date (YYYY-MM-DD)
        date: String,
    },

    /// Show the meals planned for one day
    Show {
        /// Date (YYYY-MM-DD), defaults to today
        date: Option<String>,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// List planned days in a month view
    List {
        /// Month (YYYY-MM), defaults to the current month
        #[arg(long, short)]
        month: Option<String>,

        /// Months to move from the chosen month (e.g. -1 for the previous one)
        #[arg(long, allow_hyphen_values = true, default_value_t = 0)]
        offset: i32,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

impl MealCommand {
    pub fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        let mut planner = open_planner(config);

        match &self.command {
            MealSubcommand::Set {
                date,
                slot,
                name,
                ingredients,
                suggest_ingredients,
                confirm,
            } => {
                let date = parse_date_key(date)?;
                let mut meal = match planner.meals().meal(date, *slot) {
                    Some(existing) => existing.edited(name, ingredients)?,
                    None => Meal::new(name, ingredients)?,
                };

                if *suggest_ingredients {
                    let assistant = assistant(config);
                    let rt = tokio::runtime::Runtime::new()?;
                    let fetched =
                        rt.block_on(assistant.fetch_ingredients(&meal.name, planner.diet()));
                    if fetched.is_empty() {
                        println!("No ingredients suggested for {}.", meal.name);
                    }
                    meal = meal.append_ingredients(&fetched);
                }

                let outcome = planner.save_meal(date, *slot, meal.clone())?;
                if settle_outcome(&mut planner, outcome, *confirm)? {
                    println!("Planned {} for {}: {}", slot, format_date_key(date), meal);
                }
                Ok(())
            }

            MealSubcommand::Delete { date, slot } => {
                let date = parse_date_key(date)?;
                let removed = planner.meals().meal(date, *slot).map(|m| m.name.clone());
                planner.delete_meal(date, *slot)?;
                match removed {
                    Some(name) => {
                        println!("Removed {} from {} {}", name, format_date_key(date), slot)
                    }
                    None => println!("No {} planned for {}", slot, format_date_key(date)),
                }
                Ok(())
            }

            MealSubcommand::EatingOut { date } => {
                let date = parse_date_key(date)?;
                planner.toggle_eating_out(date);
                let eating_out = planner
                    .meals()
                    .day(date)
                    .is_some_and(|record| record.is_eating_out);
                if eating_out {
                    println!("Eating out on {}", format_date_key(date));
                } else {
                    println!("Eating at home on {}", format_date_key(date));
                }
                Ok(())
            }

            MealSubcommand::Show { date, format } => {
                let date = match date {
                    Some(s) => parse_date_key(s)?,
                    None => today(),
                };
                let meals = planner.meals();
                let record = meals.day(date);

                match format {
                    OutputFormat::Json => {
                        let output = day_json(date, record);
                        println!("{}", serde_json::to_string_pretty(&output)?);
                    }
                    OutputFormat::Text => {
                        println!("{}", date.format("%A %-d %B %Y"));
                        println!("{}", "=".repeat(30));
                        print_day(record);
                    }
                }
                Ok(())
            }

            MealSubcommand::List {
                month,
                offset,
                format,
            } => {
                let anchor = match month {
                    Some(s) => parse_month(s)?,
                    None => today(),
                };
                let first = shift_month(anchor, *offset)
                    .ok_or_else(|| format!("Month out of range: {}", offset))?;
                let dates = calendar_dates(first.year(), first.month())
                    .ok_or_else(|| format!("Month out of range: {}", first))?;
                let (Some(start), Some(end)) = (dates.first(), dates.last()) else {
                    return Ok(());
                };

                let meals = planner.meals();
                let days: Vec<_> = meals.days_in_range(*start, *end).collect();

                match format {
                    OutputFormat::Json => {
                        let output = json!({
                            "month": first.format("%Y-%m").to_string(),
                            "from": format_date_key(*start),
                            "to": format_date_key(*end),
                            "days": days
                                .iter()
                                .map(|(date, record)| day_json(*date, Some(*record)))
                                .collect::<Vec<_>>(),
                        });
                        println!("{}", serde_json::to_string_pretty(&output)?);
                    }
                    OutputFormat::Text => {
                        let title = first.format("%B %Y").to_string();
                        println!("{}", title);
                        println!("{}", "=".repeat(title.len()));

                        if days.is_empty() {
                            println!("No meals planned.");
                        }
                        for (date, record) in &days {
                            let marker = if date.month() == first.month() { "" } else { " *" };
                            println!("\n{}{}", date.format("%a %Y-%m-%d"), marker);
                            print_day(Some(*record));
                        }
                    }
                }
                Ok(())
            }
        }
    }
}

fn parse_month(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(&format!("{}-01", s.trim()), "%Y-%m-%d")
        .map_err(|_| format!("Invalid month format '{}'. Use YYYY-MM.", s))
}

fn print_day(record: Option<&DayRecord>) {
    let Some(record) = record else {
        println!("  Nothing planned.");
        return;
    };

    if record.is_eating_out {
        println!("  Eating out");
    }
    for slot in MealSlot::ALL {
        match record.meal(slot) {
            Some(meal) => println!("  {:<7} {}", slot, meal),
            None => println!("  {:<7} -", slot),
        }
    }
}

fn day_json(date: NaiveDate, record: Option<&DayRecord>) -> serde_json::Value {
    json!({
        "date": format_date_key(date),
        "lunch": record.and_then(|r| r.lunch.as_ref()),
        "dinner": record.and_then(|r| r.dinner.as_ref()),
        "is_eating_out": record.is_some_and(|r| r.is_eating_out),
    })
}

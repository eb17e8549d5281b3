mod ai;
mod config_cmd;
mod diet;
mod grocery;
mod meal;
mod watch;

pub use ai::AiCommand;
pub use config_cmd::ConfigCommand;
pub use diet::DietCommand;
pub use grocery::GroceryCommand;
pub use meal::MealCommand;
pub use watch::WatchCommand;

use clap::{Args, ValueEnum};
use std::io::{self, IsTerminal, Write};

use planner_core::{Assistant, FileStore, GeminiBackend, Planner, SaveOutcome};

use crate::config::Config;

#[derive(Clone, Copy, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// How to answer the repeated-meal question without a prompt.
#[derive(Args, Clone, Copy, Default)]
pub struct ConfirmArgs {
    /// Keep the meal even if the same meal was planned the two days before
    #[arg(long, short = 'y', conflicts_with = "no_confirm")]
    pub yes: bool,

    /// Drop the meal if it repeats the two days before, without asking
    #[arg(long)]
    pub no_confirm: bool,
}

pub fn open_planner(config: &Config) -> Planner<FileStore> {
    tracing::debug!("Opening planner data in {}", config.data_dir.value.display());
    Planner::load(FileStore::new(config.data_dir.value.clone()))
}

pub fn assistant(config: &Config) -> Assistant<GeminiBackend> {
    if !config.ai.is_configured() {
        eprintln!("No AI API key configured; set PLANNER_AI_API_KEY for live answers.");
    }
    Assistant::new(GeminiBackend::new(config.ai.gemini()))
}

/// Settles a guarded write, asking on the terminal when the meal repeats.
///
/// Returns true if the meal ended up in the plan.
pub fn settle_outcome(
    planner: &mut Planner<FileStore>,
    outcome: SaveOutcome,
    confirm: ConfirmArgs,
) -> Result<bool, Box<dyn std::error::Error>> {
    let warning = match outcome {
        SaveOutcome::Saved => return Ok(true),
        SaveOutcome::Blocked(warning) => warning,
    };

    let keep = if confirm.yes {
        true
    } else if confirm.no_confirm || !io::stdin().is_terminal() {
        false
    } else {
        print!(
            "'{}' is already planned for {} on the two previous days. Add it again for {}? [y/N] ",
            warning.meal.name, warning.slot, warning.date
        );
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        input.trim().eq_ignore_ascii_case("y")
    };

    if keep {
        planner.confirm_repetition()?;
        Ok(true)
    } else {
        planner.cancel_repetition();
        println!("Kept the plan unchanged.");
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use planner_core::{Meal, MealSlot};
    use tempfile::tempdir;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    fn curry() -> Meal {
        Meal::new("Rice and Curry", "rice, dhal").unwrap()
    }

    /// Plans the same lunch twice, then returns the held third one.
    fn held_repeat(planner: &mut Planner<FileStore>) -> SaveOutcome {
        for d in [1, 2] {
            planner.save_meal(date(d), MealSlot::Lunch, curry()).unwrap();
        }
        let outcome = planner.save_meal(date(3), MealSlot::Lunch, curry()).unwrap();
        assert!(matches!(outcome, SaveOutcome::Blocked(_)));
        outcome
    }

    #[test]
    fn test_yes_keeps_repeated_meal() {
        let temp_dir = tempdir().unwrap();
        let mut planner = Planner::load(FileStore::new(temp_dir.path().to_path_buf()));
        let outcome = held_repeat(&mut planner);

        let confirm = ConfirmArgs {
            yes: true,
            ..Default::default()
        };
        assert!(settle_outcome(&mut planner, outcome, confirm).unwrap());

        assert!(planner.pending().is_none());
        assert!(planner.meals().meal(date(3), MealSlot::Lunch).is_some());
        let reloaded = Planner::load(FileStore::new(temp_dir.path().to_path_buf()));
        assert!(reloaded.meals().meal(date(3), MealSlot::Lunch).is_some());
    }

    #[test]
    fn test_no_confirm_drops_repeated_meal() {
        let temp_dir = tempdir().unwrap();
        let mut planner = Planner::load(FileStore::new(temp_dir.path().to_path_buf()));
        let outcome = held_repeat(&mut planner);

        let confirm = ConfirmArgs {
            no_confirm: true,
            ..Default::default()
        };
        assert!(!settle_outcome(&mut planner, outcome, confirm).unwrap());

        assert!(planner.pending().is_none());
        assert!(planner.meals().meal(date(3), MealSlot::Lunch).is_none());
        assert_eq!(planner.meals().len(), 2);
    }

    #[test]
    fn test_saved_outcome_needs_no_answer() {
        let temp_dir = tempdir().unwrap();
        let mut planner = Planner::load(FileStore::new(temp_dir.path().to_path_buf()));
        let outcome = planner.save_meal(date(1), MealSlot::Dinner, curry()).unwrap();

        assert!(settle_outcome(&mut planner, outcome, ConfirmArgs::default()).unwrap());
        assert_eq!(planner.meals().len(), 1);
    }
}

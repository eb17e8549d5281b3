use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;

use commands::{AiCommand, ConfigCommand, DietCommand, GroceryCommand, MealCommand, WatchCommand};
use config::Config;

#[derive(Parser)]
#[command(name = "planner")]
#[command(version)]
#[command(about = "A meal planner for two", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Plan lunches and dinners
    Meal(MealCommand),

    /// Manage the grocery list
    Grocery(GroceryCommand),

    /// Manage the dietary preference
    Diet(DietCommand),

    /// Ask the AI assistant for ideas and recipes
    Ai(AiCommand),

    /// Follow changes made by other planner processes
    Watch(WatchCommand),

    /// Manage configuration
    Config(ConfigCommand),
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "planner=warn,planner_core=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Kept for `config init`
    let cli_config_path = cli.config.clone();

    let config = Config::load(cli.config)?;

    match &cli.command {
        Some(Commands::Meal(cmd)) => cmd.run(&config)?,
        Some(Commands::Grocery(cmd)) => cmd.run(&config)?,
        Some(Commands::Diet(cmd)) => cmd.run(&config)?,
        Some(Commands::Ai(cmd)) => cmd.run(&config)?,
        Some(Commands::Watch(cmd)) => cmd.run(&config)?,
        Some(Commands::Config(cmd)) => cmd.run(&config, cli_config_path)?,
        None => {
            println!("Use --help to see available commands");
        }
    }

    Ok(())
}

use clap::{Args, Subcommand};
use std::fs;
use std::io::Write;
use std::path::PathBuf;

use super::OutputFormat;
use crate::config::Config;

#[derive(Args)]
pub struct ConfigCommand {
    #[command(subcommand)]
    pub command: ConfigSubcommand,
}

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Show current configuration values
    Show {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Initialize configuration file
    Init,
}

const DEFAULT_CONFIG: &str = r#"# meal-planner configuration

# Directory shared by every planner process (default: platform data dir)
# data_dir: ~/.local/share/meal-planner

# How often `planner watch` checks for changes, in milliseconds
# watch_interval_ms: 500

# Generative-AI service
# ai:
#   api_key: your-key
#   model: gemini-2.5-flash
#   image_model: gemini-2.5-flash-image
"#;

impl ConfigCommand {
    pub fn run(
        &self,
        config: &Config,
        cli_config_path: Option<PathBuf>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            ConfigSubcommand::Show { format } => {
                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(config)?);
                    }
                    OutputFormat::Text => {
                        println!("Configuration");
                        println!("=============\n");

                        if let Some(path) = &config.config_file {
                            println!("Config file: {}", path.display());
                        } else {
                            println!(
                                "Config file: {} (not found)",
                                Config::default_config_path().display()
                            );
                        }
                        println!();

                        println!("data_dir: {}", config.data_dir.value.display());
                        println!("  source: {}", config.data_dir.source);
                        println!();

                        println!("watch_interval_ms: {}", config.watch_interval_ms.value);
                        println!("  source: {}", config.watch_interval_ms.source);
                        println!();

                        let key = if config.ai.is_configured() { "set" } else { "not set" };
                        println!("ai.api_key: {}", key);
                        println!("ai.model: {}", config.ai.model.value);
                        println!("  source: {}", config.ai.model.source);
                        println!("ai.image_model: {}", config.ai.image_model.value);
                        println!("  source: {}", config.ai.image_model.source);
                        println!("ai.base_url: {}", config.ai.base_url.value);
                        println!("  source: {}", config.ai.base_url.source);
                    }
                }
                Ok(())
            }

            ConfigSubcommand::Init => {
                let config_path = cli_config_path.unwrap_or_else(Config::default_config_path);

                if config_path.exists() {
                    println!("Config file already exists: {}", config_path.display());
                    println!("Use 'planner config show' to view current configuration.");
                    return Ok(());
                }

                if let Some(parent) = config_path.parent() {
                    fs::create_dir_all(parent)?;
                }

                let mut file = fs::File::create(&config_path)?;
                file.write_all(DEFAULT_CONFIG.as_bytes())?;

                println!("Created config file: {}", config_path.display());
                println!("\nEdit this file to customize your settings.");
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_init_writes_loadable_config() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("nested/config.yaml");
        let config = Config::load(Some(path.clone())).unwrap();

        let cmd = ConfigCommand {
            command: ConfigSubcommand::Init,
        };
        cmd.run(&config, Some(path.clone())).unwrap();

        assert!(path.exists());
        let reloaded = Config::load(Some(path.clone())).unwrap();
        assert_eq!(reloaded.config_file, Some(path));
    }
}

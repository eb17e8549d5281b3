//! Follow changes made by other planner processes.

use clap::Args;

use planner_core::{FileStore, Planner, StorageEvent, StoreKey};

use super::open_planner;
use crate::config::Config;

#[derive(Args)]
pub struct WatchCommand {
    /// Poll interval in milliseconds (overrides the configured value)
    #[arg(long)]
    interval: Option<u64>,
}

impl WatchCommand {
    pub fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        let mut planner = open_planner(config);
        let interval = match self.interval {
            Some(ms) => std::time::Duration::from_millis(ms.max(1)),
            None => config.watch_interval(),
        };

        println!(
            "Watching {} (Ctrl-C to stop)",
            config.data_dir.value.display()
        );
        print_summary(&planner);

        let rt = tokio::runtime::Runtime::new()?;
        rt.block_on(async {
            let mut subscription = planner.store().watch(interval)?;
            let ctrl_c = tokio::signal::ctrl_c();
            tokio::pin!(ctrl_c);
            loop {
                tokio::select! {
                    event = subscription.next() => {
                        let Some(event) = event else { break };
                        if planner.apply_external_change(&event) {
                            print_change(&planner, &event);
                        }
                    }
                    _ = &mut ctrl_c => break,
                }
            }
            Ok::<(), Box<dyn std::error::Error>>(())
        })?;

        println!("Stopped watching.");
        Ok(())
    }
}

fn print_summary(planner: &Planner<FileStore>) {
    let grocery = planner.grocery();
    println!(
        "{} planned days, {} grocery items ({} checked), diet {}",
        planner.meals().len(),
        grocery.len(),
        grocery.checked_count(),
        planner.diet()
    );
}

fn print_change(planner: &Planner<FileStore>, event: &StorageEvent) {
    match event.key {
        StoreKey::Meals => println!("Meals updated: {} planned days", planner.meals().len()),
        StoreKey::Grocery => {
            let grocery = planner.grocery();
            println!(
                "Grocery list updated: {} items ({} checked)",
                grocery.len(),
                grocery.checked_count()
            );
        }
        StoreKey::DietPreference => println!("Diet preference changed to {}", planner.diet()),
    }
}

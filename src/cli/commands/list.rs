//! List command - show cached scripts

use crate::cli::args::{ListArgs, OutputFormat};
use crate::error::MarathonResult;
use crate::script::{display_name, CacheStore, ManagedScript};
use crate::ui::{self, UiContext};
use chrono::Utc;
use console::style;
use indicatif::HumanDuration;
use std::path::Path;

/// Execute the list command
pub async fn execute(args: ListArgs, root: &Path) -> MarathonResult<()> {
    let scripts = CacheStore::new(root).list_managed().await?;

    if scripts.is_empty() {
        match args.format {
            OutputFormat::Json => println!("[]"),
            OutputFormat::Plain => {}
            OutputFormat::Table => ui::step_info(&UiContext::detect(), "No cached scripts"),
        }
        return Ok(());
    }

    match args.format {
        OutputFormat::Table => print_table(&scripts),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&scripts)?),
        OutputFormat::Plain => {
            for script in &scripts {
                println!("{}", script.original.display());
            }
        }
    }

    Ok(())
}

fn print_table(scripts: &[ManagedScript]) {
    ui::intro(&UiContext::detect(), "Cached scripts");

    println!(
        "{:<20} {:<18} {}",
        style("NAME").bold(),
        style("UPDATED").bold(),
        style("SCRIPT").bold()
    );
    println!("{}", "-".repeat(72));

    for script in scripts {
        println!(
            "{:<20} {:<18} {}",
            display_name(&script.identifier),
            updated(script),
            script.original.display()
        );
    }

    println!();
    println!("{} script(s)", scripts.len());
}

fn updated(script: &ManagedScript) -> String {
    match script.modified_at {
        Some(at) => match (Utc::now() - at).to_std() {
            Ok(age) => format!("{} ago", HumanDuration(age)),
            Err(_) => at.format("%Y-%m-%d %H:%M").to_string(),
        },
        None => style("unknown").dim().to_string(),
    }
}

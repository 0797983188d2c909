//! Config command - show or initialize configuration

use crate::cli::args::{ConfigAction, ConfigArgs};
use crate::config::{Config, ConfigManager};
use crate::error::MarathonResult;
use crate::ui::{self, UiContext};
use std::path::Path;

/// Execute the config command
pub async fn execute(
    args: ConfigArgs,
    manager: &ConfigManager,
    config: &Config,
    root: &Path,
) -> MarathonResult<()> {
    match args.action {
        None | Some(ConfigAction::Show) => show_config(config, root)?,
        Some(ConfigAction::Path) => println!("{}", manager.path().display()),
        Some(ConfigAction::Init { force }) => init_config(manager, force).await?,
    }

    Ok(())
}

fn show_config(config: &Config, root: &Path) -> MarathonResult<()> {
    println!("{}", toml::to_string_pretty(config)?);
    println!("# effective root: {}", root.display());
    Ok(())
}

async fn init_config(manager: &ConfigManager, force: bool) -> MarathonResult<()> {
    let ctx = UiContext::detect();
    let path = manager.path();

    if path.exists() && !force {
        ui::step_warn_hint(
            &ctx,
            &format!("Config already exists at {}", path.display()),
            "Use --force to overwrite",
        );
        return Ok(());
    }

    manager.save(&Config::default()).await?;
    ui::step_ok_detail(&ctx, "Configuration initialized", &path.display().to_string());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn init_writes_defaults_once() {
        let temp = TempDir::new().unwrap();
        let manager = ConfigManager::with_path(temp.path().join("marathon").join("config.toml"));

        init_config(&manager, false).await.unwrap();
        let written = std::fs::read_to_string(manager.path()).unwrap();
        assert!(written.contains("git_host"));

        std::fs::write(manager.path(), "[remote]\nallow = false\n").unwrap();
        init_config(&manager, false).await.unwrap();
        assert!(!manager.load().await.unwrap().remote.allow);

        init_config(&manager, true).await.unwrap();
        assert!(manager.load().await.unwrap().remote.allow);
    }
}

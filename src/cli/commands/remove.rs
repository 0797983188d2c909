//! Remove command - delete cache entries

use crate::cli::args::RemoveArgs;
use crate::error::{MarathonError, MarathonResult};
use crate::script::identifier::SCRIPT_EXTENSION;
use crate::script::reference::expand_path;
use crate::script::{derive_identifier, CacheStore};
use crate::ui::{self, UiContext};
use std::path::Path;

/// Execute the remove command
pub async fn execute(args: RemoveArgs, root: &Path) -> MarathonResult<()> {
    let ctx = UiContext::detect().with_auto_yes(args.yes);
    let store = CacheStore::new(root);

    if args.all {
        if !ui::confirm(&ctx, "Remove all cached scripts?", false).await? {
            ui::step_info(&ctx, "Nothing removed (pass --yes to skip confirmation)");
            return Ok(());
        }
        store.remove_all().await?;
        ui::step_ok(&ctx, "Removed all cached scripts");
        return Ok(());
    }

    let cwd = std::env::current_dir()
        .map_err(|e| MarathonError::io("getting current directory", e))?;

    for reference in &args.references {
        let identifier = identifier_for(reference, &cwd);
        if !store.folder(&identifier).exists() {
            ui::step_info(&ctx, &format!("{} is not cached", reference));
            continue;
        }

        store.remove(&identifier).await?;
        ui::step_ok(&ctx, &format!("Removed {}", reference));
    }

    Ok(())
}

/// Identifier of the cache entry a script path resolves to
fn identifier_for(reference: &str, cwd: &Path) -> String {
    let with_extension = if reference.ends_with(SCRIPT_EXTENSION) {
        reference.to_string()
    } else {
        format!("{}{}", reference, SCRIPT_EXTENSION)
    };

    let path = expand_path(&with_extension, cwd);
    let path = std::fs::canonicalize(&path).unwrap_or(path);
    derive_identifier(&path.to_string_lossy())
}

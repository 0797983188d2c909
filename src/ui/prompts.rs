//! Confirmation prompts

use super::context::UiContext;
use crate::error::{MarathonError, MarathonResult};

/// Ask a yes/no question.
///
/// Auto-yes answers `true`; without a terminal the default is returned.
pub async fn confirm(ctx: &UiContext, message: &str, default: bool) -> MarathonResult<bool> {
    if ctx.auto_yes() {
        return Ok(true);
    }
    if !ctx.is_interactive() {
        return Ok(default);
    }

    let message = message.to_string();
    tokio::task::spawn_blocking(move || {
        cliclack::confirm(message).initial_value(default).interact()
    })
    .await
    .map_err(|e| MarathonError::Internal(format!("Prompt task failed: {}", e)))?
    .map_err(|e| MarathonError::io("reading confirmation", e))
}

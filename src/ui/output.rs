//! Line-oriented output with plain fallback

use super::context::UiContext;
use console::style;
use std::fmt::Display;

#[derive(Debug, Clone, Copy)]
enum Level {
    Ok,
    Info,
    Warn,
}

impl Level {
    fn tag(self) -> String {
        match self {
            Self::Ok => style("[OK]").green().to_string(),
            Self::Info => style("[INFO]").cyan().to_string(),
            Self::Warn => style("[WARN]").yellow().to_string(),
        }
    }
}

fn step(ctx: &UiContext, level: Level, message: impl Display) {
    if ctx.use_fancy_output() {
        let message = message.to_string();
        let _ = match level {
            Level::Ok => cliclack::log::success(message),
            Level::Info => cliclack::log::info(message),
            Level::Warn => cliclack::log::warning(message),
        };
    } else {
        println!("  {} {}", level.tag(), message);
    }
}

/// Title line opening a command's output
pub fn intro(ctx: &UiContext, title: &str) {
    if ctx.use_fancy_output() {
        let _ = cliclack::intro(style(title).magenta().bold());
    } else {
        println!("{}", style(title).bold());
    }
}

pub fn step_ok(ctx: &UiContext, message: &str) {
    step(ctx, Level::Ok, message);
}

/// Success line with a dimmed detail, e.g. a path
pub fn step_ok_detail(ctx: &UiContext, message: &str, detail: &str) {
    step(ctx, Level::Ok, format!("{} ({})", message, style(detail).dim()));
}

pub fn step_info(ctx: &UiContext, message: &str) {
    step(ctx, Level::Info, message);
}

/// Warning followed by what to do about it
pub fn step_warn_hint(ctx: &UiContext, message: &str, hint: &str) {
    step(ctx, Level::Warn, format!("{} - {}", message, style(hint).dim()));
}

/// Dimmed secondary text
pub fn remark(ctx: &UiContext, message: &str) {
    if ctx.use_fancy_output() {
        let _ = cliclack::log::remark(message);
    } else {
        println!("  {}", style(message).dim());
    }
}

pub fn key_value(ctx: &UiContext, key: &str, value: &str) {
    if ctx.use_fancy_output() {
        println!("  {}: {}", style(key).dim(), value);
    } else {
        println!("  {}: {}", key, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_output_does_not_panic() {
        let ctx = UiContext::non_interactive();
        intro(&ctx, "Marathon");
        step_ok(&ctx, "Resolved");
        step_ok_detail(&ctx, "Resolved", "/tmp/entry");
        step_info(&ctx, "Nothing to do");
        step_warn_hint(&ctx, "Already exists", "Use --force");
        remark(&ctx, "note");
        key_value(&ctx, "Folder", "/tmp");
    }

    #[test]
    fn tags_are_bracketed() {
        console::set_colors_enabled(false);
        assert_eq!(Level::Warn.tag(), "[WARN]");
    }
}

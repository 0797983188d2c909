//! Terminal output
//!
//! `cliclack` framing and spinners on an interactive terminal, plain
//! `[OK]`/`[INFO]` lines otherwise (pipes, CI).

mod context;
mod output;
mod progress;
mod prompts;
mod theme;

pub use context::UiContext;
pub use output::{intro, key_value, remark, step_info, step_ok, step_ok_detail, step_warn_hint};
pub use progress::{SpinnerReporter, TaskSpinner};
pub use prompts::confirm;
pub use theme::{init_theme, MarathonTheme};

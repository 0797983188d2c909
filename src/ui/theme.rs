//! cliclack theme

use cliclack::ThemeState;
use console::Style;

/// Magenta framing, green on completion
#[derive(Debug, Clone, Default)]
pub struct MarathonTheme;

impl cliclack::Theme for MarathonTheme {
    fn bar_color(&self, state: &ThemeState) -> Style {
        match state {
            ThemeState::Active | ThemeState::Submit => Style::new().magenta(),
            ThemeState::Error(_) => Style::new().red(),
            ThemeState::Cancel => Style::new().dim(),
        }
    }

    fn state_symbol_color(&self, state: &ThemeState) -> Style {
        match state {
            ThemeState::Active => Style::new().magenta(),
            ThemeState::Submit => Style::new().green(),
            ThemeState::Error(_) => Style::new().red(),
            ThemeState::Cancel => Style::new().dim(),
        }
    }
}

/// Install [`MarathonTheme`] for all prompts and spinners
pub fn init_theme() {
    cliclack::set_theme(MarathonTheme);
}

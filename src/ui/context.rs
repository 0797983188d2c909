//! Terminal detection for output decisions

use std::io::IsTerminal;

/// Environment variables set by common CI providers
const CI_VARIABLES: &[&str] = &[
    "CI",
    "GITHUB_ACTIONS",
    "GITLAB_CI",
    "CIRCLECI",
    "BUILDKITE",
    "JENKINS_URL",
    "TF_BUILD",
];

/// How the current invocation should present output
#[derive(Debug, Clone)]
pub struct UiContext {
    interactive: bool,
    auto_yes: bool,
}

impl UiContext {
    /// Inspect the terminal and environment
    pub fn detect() -> Self {
        let terminal = std::io::stdout().is_terminal() && std::io::stdin().is_terminal();
        Self {
            interactive: terminal && !running_in_ci(),
            auto_yes: false,
        }
    }

    /// Plain output, prompts answered with their defaults
    pub fn non_interactive() -> Self {
        Self {
            interactive: false,
            auto_yes: false,
        }
    }

    /// Answer every confirmation with yes
    pub fn with_auto_yes(mut self, yes: bool) -> Self {
        self.auto_yes = yes;
        self
    }

    pub fn is_interactive(&self) -> bool {
        self.interactive
    }

    pub fn auto_yes(&self) -> bool {
        self.auto_yes
    }

    /// Spinners and cliclack framing
    pub fn use_fancy_output(&self) -> bool {
        self.interactive
    }
}

fn running_in_ci() -> bool {
    CI_VARIABLES.iter().any(|var| std::env::var_os(var).is_some())
}

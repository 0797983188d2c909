//! Spinners with plain fallback

use super::context::UiContext;
use crate::script::ProgressReporter;
use console::style;
use std::sync::Mutex;

/// One spinner line that can be restarted with new messages
pub struct TaskSpinner {
    spinner: Option<cliclack::ProgressBar>,
    interactive: bool,
}

impl TaskSpinner {
    pub fn new(ctx: &UiContext) -> Self {
        Self {
            spinner: None,
            interactive: ctx.use_fancy_output(),
        }
    }

    /// Show `message`, starting the spinner if needed
    pub fn start(&mut self, message: &str) {
        if !self.interactive {
            println!("{} {}", style("...").dim(), message);
            return;
        }

        match self.spinner {
            Some(ref spinner) => spinner.start(message),
            None => {
                let spinner = cliclack::spinner();
                spinner.start(message);
                self.spinner = Some(spinner);
            }
        }
    }

    /// Stop with a success message
    pub fn stop(&mut self, message: &str) {
        match self.spinner.take() {
            Some(spinner) => spinner.stop(message),
            None => println!("{} {}", style("[OK]").green(), message),
        }
    }

    /// Stop with a failure message
    pub fn stop_error(&mut self, message: &str) {
        match self.spinner.take() {
            Some(spinner) => spinner.error(message),
            None => println!("{} {}", style("[FAIL]").red(), message),
        }
    }
}

/// Shows resolution progress on a [`TaskSpinner`]
pub struct SpinnerReporter {
    spinner: Mutex<TaskSpinner>,
}

impl SpinnerReporter {
    pub fn new(ctx: &UiContext) -> Self {
        Self {
            spinner: Mutex::new(TaskSpinner::new(ctx)),
        }
    }

    pub fn finish(&self, message: &str) {
        if let Ok(mut spinner) = self.spinner.lock() {
            spinner.stop(message);
        }
    }

    pub fn fail(&self, message: &str) {
        if let Ok(mut spinner) = self.spinner.lock() {
            spinner.stop_error(message);
        }
    }
}

impl ProgressReporter for SpinnerReporter {
    fn report(&self, message: &str) {
        if let Ok(mut spinner) = self.spinner.lock() {
            spinner.start(message);
        }
    }
}

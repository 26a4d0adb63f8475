use crate::ports::outbound::ProgressReporter;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::cell::RefCell;

const BAR_TEMPLATE: &str = "   {spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} lookups - {msg}";

/// StderrProgressReporter adapter for reporting lookup progress to stderr
///
/// Writes to stderr so the report on stdout stays clean. The bar is created
/// lazily on the first progress update and cleared on completion or error.
pub struct StderrProgressReporter {
    progress_bar: RefCell<Option<ProgressBar>>,
}

impl StderrProgressReporter {
    pub fn new() -> Self {
        Self {
            progress_bar: RefCell::new(None),
        }
    }

    fn progress_bar(&self, total: usize) -> ProgressBar {
        let mut slot = self.progress_bar.borrow_mut();
        if let Some(pb) = slot.as_ref() {
            return pb.clone();
        }

        let pb = ProgressBar::with_draw_target(Some(total as u64), ProgressDrawTarget::stderr());
        match ProgressStyle::default_bar().template(BAR_TEMPLATE) {
            Ok(style) => pb.set_style(style.progress_chars("=>-")),
            Err(e) => tracing::debug!("Falling back to default progress style: {}", e),
        }
        *slot = Some(pb.clone());
        pb
    }

    fn clear(&self) {
        if let Some(pb) = self.progress_bar.borrow_mut().take() {
            pb.finish_and_clear();
        }
    }
}

impl Default for StderrProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressReporter for StderrProgressReporter {
    fn report(&self, message: &str) {
        match self.progress_bar.borrow().as_ref() {
            Some(pb) => pb.println(message),
            None => eprintln!("{}", message),
        }
    }

    fn report_progress(&self, current: usize, total: usize, message: Option<&str>) {
        let pb = self.progress_bar(total);
        pb.set_length(total as u64);
        pb.set_position(current as u64);
        if let Some(msg) = message {
            pb.set_message(msg.to_string());
        }
    }

    fn report_error(&self, message: &str) {
        self.clear();
        eprintln!("{}", message);
    }

    fn report_completion(&self, message: &str) {
        self.clear();
        eprintln!("{}", message);
    }
}

/// Progress reporter for `--no-progress` and non-interactive runs.
///
/// Phase messages go to the debug log instead of the terminal.
#[derive(Debug, Default)]
pub struct SilentProgressReporter;

impl SilentProgressReporter {
    pub fn new() -> Self {
        Self
    }
}

impl ProgressReporter for SilentProgressReporter {
    fn report(&self, message: &str) {
        tracing::debug!("{}", message);
    }

    fn report_progress(&self, _current: usize, _total: usize, _message: Option<&str>) {}

    fn report_error(&self, message: &str) {
        tracing::debug!("{}", message);
    }

    fn report_completion(&self, message: &str) {
        tracing::debug!("{}", message);
    }
}

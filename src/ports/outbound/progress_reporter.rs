/// ProgressReporter port for reporting progress during an inventory run
///
/// This port abstracts progress reporting (e.g., to stderr)
/// to provide user feedback while remote lookups are running.
pub trait ProgressReporter {
    /// Reports a progress message
    fn report(&self, message: &str);

    /// Reports progress with a count
    ///
    /// # Arguments
    /// * `current` - Lookups finished so far
    /// * `total` - Total expected lookups
    /// * `message` - Optional message to include
    fn report_progress(&self, current: usize, total: usize, message: Option<&str>);

    /// Reports a warning that should stay visible after the progress display ends
    fn report_error(&self, message: &str);

    /// Reports completion of a phase
    fn report_completion(&self, message: &str);
}

use crate::adapters::outbound::formatters::{JsonFormatter, TableFormatter};
use crate::application::dto::OutputFormat;
use crate::ports::outbound::ReportFormatter;

/// Rendering options only the table format cares about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FormatterOptions {
    pub color: bool,
    pub details: bool,
}

/// Factory for creating report formatters
///
/// Keeps the choice of formatter adapter out of `main` so the CLI only deals
/// with the application-level [`OutputFormat`].
pub struct FormatterFactory;

impl FormatterFactory {
    /// Creates a formatter instance for the specified output format
    ///
    /// # Examples
    /// ```
    /// use pipinfo::application::dto::OutputFormat;
    /// use pipinfo::application::factories::{FormatterFactory, FormatterOptions};
    ///
    /// let formatter = FormatterFactory::create(OutputFormat::Json, FormatterOptions::default());
    /// ```
    pub fn create(format: OutputFormat, options: FormatterOptions) -> Box<dyn ReportFormatter> {
        match format {
            OutputFormat::Table => Box::new(TableFormatter::new(options.color, options.details)),
            OutputFormat::Json => Box::new(JsonFormatter::new()),
        }
    }
}

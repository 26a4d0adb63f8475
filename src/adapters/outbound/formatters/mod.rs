/// Formatter adapters for the supported report formats
mod json_formatter;
mod table_formatter;

pub use json_formatter::JsonFormatter;
pub use table_formatter::TableFormatter;

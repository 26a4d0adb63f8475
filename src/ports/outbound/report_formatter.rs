use crate::application::dto::InventoryResponse;
use crate::shared::Result;

/// ReportFormatter port for rendering an inventory
///
/// This port abstracts the formatting logic for different report formats
/// (terminal table, JSON).
pub trait ReportFormatter {
    /// Formats the inventory
    ///
    /// # Arguments
    /// * `response` - Classified packages, already filtered by the selection flags,
    ///   and the summary counts
    ///
    /// # Returns
    /// Formatted report content as a string
    ///
    /// # Errors
    /// Returns an error if formatting or serialization fails
    fn format(&self, response: &InventoryResponse) -> Result<String>;
}

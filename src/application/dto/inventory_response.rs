use super::PackageSelection;
use crate::inventory::domain::{ClassifiedPackage, Diagnostic, InventorySummary};

/// InventoryResponse - Output of the inventory use case
///
/// Packages are sorted by normalized name, then scope (System first).
/// Diagnostics collect every non-fatal problem met along the way.
#[derive(Debug, Clone)]
pub struct InventoryResponse {
    pub packages: Vec<ClassifiedPackage>,
    pub summary: InventorySummary,
    pub diagnostics: Vec<Diagnostic>,
}

impl InventoryResponse {
    pub fn new(packages: Vec<ClassifiedPackage>, diagnostics: Vec<Diagnostic>) -> Self {
        let summary = InventorySummary::from_packages(&packages);
        Self {
            packages,
            summary,
            diagnostics,
        }
    }

    /// Keeps the packages matching `selection`, preserving order, and recounts the summary.
    pub fn select(self, selection: &PackageSelection) -> Self {
        if selection.is_empty() {
            return self;
        }
        let packages: Vec<ClassifiedPackage> = self
            .packages
            .into_iter()
            .filter(|p| selection.matches(p))
            .collect();
        Self::new(packages, self.diagnostics)
    }

    /// Diagnostics worth showing without `--debug`.
    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.is_warning())
    }
}

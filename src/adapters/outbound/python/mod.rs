/// Python interpreter adapters
mod site_locator;

pub use site_locator::{PythonSiteLocator, SiteReport};

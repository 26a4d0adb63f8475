/// Network adapters for the package index and advisory database
mod http;
mod osv_client;
mod pypi_client;

pub use osv_client::OsvClient;
pub use pypi_client::PyPiClient;

/// Inventory core: value objects and the pure services that scan results flow through.
pub mod domain;
pub mod services;

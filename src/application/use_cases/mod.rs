/// Use cases module containing application business logic orchestration
mod take_inventory;

pub use take_inventory::TakeInventoryUseCase;

pub mod gas_service;
pub mod gas_strategy;

pub use gas_service::{GasService, ResolvedPrice};
pub use gas_strategy::{FeeModel, GasPrice, TxPriority};

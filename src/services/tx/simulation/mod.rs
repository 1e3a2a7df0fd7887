pub mod abi_codec;
pub mod simulation_service;

pub use abi_codec::{AbiCodec, parse_abi, tokenize_args};
pub use simulation_service::SimulationService;

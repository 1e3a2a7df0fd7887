pub mod builder;
pub mod gas;
pub mod nonce;
pub mod receipt;
pub mod signer;
pub mod simulation;
pub mod types;

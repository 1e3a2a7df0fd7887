pub mod tx_builder;

pub use tx_builder::{UnsignedTransaction, build_transaction};

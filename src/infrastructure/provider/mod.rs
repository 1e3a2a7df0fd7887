pub mod connection;
pub mod ethereum_provider;

pub use connection::Connection;
pub use ethereum_provider::{EthereumProvider, ProviderTrait};

pub mod local_signer;
pub mod signer_trait;

pub use local_signer::LocalSigner;
pub use signer_trait::{SignedTransaction, TxSigner};

use crate::errors::error::AppError;
use crate::services::tx::builder::UnsignedTransaction;
use async_trait::async_trait;
use ethers_core::types::transaction::eip2718::TypedTransaction;
use ethers_core::types::{Address, Bytes, H160, H256, Signature};

/// 已签名交易，绑定到签名时使用的 chain id
#[derive(Debug, Clone)]
pub struct SignedTransaction {
    pub chain_id: u64,
    pub tx: TypedTransaction,
    pub signature: Signature,
    pub raw: Bytes,
    pub hash: H256,
}

impl SignedTransaction {
    /// 从签名恢复发送方地址
    pub fn recover_sender(&self) -> Result<Address, AppError> {
        self.signature
            .recover(self.tx.sighash())
            .map_err(|e| AppError::Signing(format!("recover sender failed: {}", e)))
    }
}

#[async_trait]
pub trait TxSigner: Send + Sync {
    async fn sign_tx(
        &self,
        chain_id: u64,
        tx: &UnsignedTransaction,
    ) -> Result<SignedTransaction, AppError>;
    fn address(&self) -> H160;
}

// services/tx/signer/local_signer.rs

use crate::errors::error::AppError;
use crate::services::tx::builder::UnsignedTransaction;
use crate::services::tx::signer::{SignedTransaction, TxSigner};
use ethers_core::types::{H160, H256};
use ethers_core::utils::keccak256;
use ethers_signers::{LocalWallet, Signer};
use std::fmt;
use std::sync::Arc;

/// 本地私钥身份。私钥只存在于 wallet 内部，不序列化、不打印
#[derive(Clone)]
pub struct LocalSigner {
    wallet: Arc<LocalWallet>,
}

impl LocalSigner {
    pub fn new(wallet: LocalWallet) -> Self {
        Self {
            wallet: Arc::new(wallet),
        }
    }

    /// 解析十六进制私钥（可带 0x 前缀）
    pub fn from_hex(private_key: &str) -> Result<Self, AppError> {
        let wallet = private_key
            .trim()
            .parse::<LocalWallet>()
            .map_err(|e| AppError::KeyFormat(e.to_string()))?;
        Ok(Self::new(wallet))
    }

    /// 从环境变量读取私钥
    pub fn from_env(var: &str) -> Result<Self, AppError> {
        let private_key = std::env::var(var)
            .map_err(|_| AppError::KeyFormat(format!("环境变量 {} 未设置", var)))?;
        Self::from_hex(&private_key)
    }
}

impl fmt::Debug for LocalSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalSigner")
            .field("address", &self.wallet.address())
            .finish()
    }
}

#[async_trait::async_trait]
impl TxSigner for LocalSigner {
    async fn sign_tx(
        &self,
        chain_id: u64,
        tx: &UnsignedTransaction,
    ) -> Result<SignedTransaction, AppError> {
        // chain id 已写入交易，sighash 与 v 都按 EIP-155 计算
        let typed = tx.to_typed(chain_id);
        let signature = self
            .wallet
            .sign_transaction_sync(&typed)
            .map_err(|e| AppError::Signing(format!("Signing failed: {}", e)))?;

        let raw = typed.rlp_signed(&signature);
        let hash = H256::from(keccak256(&raw));

        Ok(SignedTransaction {
            chain_id,
            tx: typed,
            signature,
            raw,
            hash,
        })
    }

    fn address(&self) -> H160 {
        self.wallet.address()
    }
}

use crate::errors::error::AppError;
use async_trait::async_trait;
use ethers_core::types::transaction::eip2718::TypedTransaction;
use ethers_core::types::{Address, BlockNumber, Bytes, H256, TransactionReceipt, U256};
use ethers_providers::{Http, JsonRpcClient, Middleware, Provider, Ws};
use std::time::Duration;

/// 节点 RPC 能力的抽象，流水线只依赖这个 trait
#[async_trait]
pub trait ProviderTrait: Send + Sync {
    async fn get_chain_id(&self) -> Result<U256, AppError>;
    /// pending 区块上的 nonce（包含自己尚未打包的交易）
    async fn get_pending_nonce(&self, address: Address) -> Result<U256, AppError>;
    async fn get_gas_price(&self) -> Result<U256, AppError>;
    /// 返回 (max_fee_per_gas, max_priority_fee_per_gas)
    async fn estimate_eip1559_fees(&self) -> Result<(U256, U256), AppError>;
    async fn estimate_gas(&self, tx: &TypedTransaction) -> Result<U256, AppError>;
    async fn send_raw_transaction(&self, rlp: Bytes) -> Result<H256, AppError>;
    async fn get_transaction_receipt(
        &self,
        tx_hash: H256,
    ) -> Result<Option<TransactionReceipt>, AppError>;
    async fn call(&self, tx: &TypedTransaction) -> Result<Bytes, AppError>;
}

pub struct EthereumProvider<P> {
    provider: Provider<P>,
}

impl EthereumProvider<Http> {
    pub fn http(url: &str) -> Result<Self, AppError> {
        let provider = Provider::<Http>::try_from(url)
            .map_err(|e| AppError::Connection(format!("无效的 RPC URL {}: {}", url, e)))?
            .interval(Duration::from_millis(1200));
        Ok(Self { provider })
    }
}

impl EthereumProvider<Ws> {
    pub async fn ws(url: &str) -> Result<Self, AppError> {
        let provider = Provider::<Ws>::connect(url)
            .await
            .map_err(|e| AppError::Connection(format!("WebSocket 连接失败 {}: {}", url, e)))?;
        Ok(Self { provider })
    }
}

#[async_trait]
impl<P> ProviderTrait for EthereumProvider<P>
where
    P: JsonRpcClient + 'static,
{
    async fn get_chain_id(&self) -> Result<U256, AppError> {
        self.provider.get_chainid().await.map_err(AppError::from)
    }

    async fn get_pending_nonce(&self, address: Address) -> Result<U256, AppError> {
        self.provider
            .get_transaction_count(address, Some(BlockNumber::Pending.into()))
            .await
            .map_err(AppError::from)
    }

    async fn get_gas_price(&self) -> Result<U256, AppError> {
        self.provider.get_gas_price().await.map_err(AppError::from)
    }

    async fn estimate_eip1559_fees(&self) -> Result<(U256, U256), AppError> {
        self.provider
            .estimate_eip1559_fees(None)
            .await
            .map_err(|e| AppError::Rpc(format!("EIP1559 费用估算失败: {}", e)))
    }

    async fn estimate_gas(&self, tx: &TypedTransaction) -> Result<U256, AppError> {
        self.provider
            .estimate_gas(tx, None)
            .await
            .map_err(|e| AppError::Rpc(format!("estimate_gas failed: {}", e)))
    }

    async fn send_raw_transaction(&self, rlp: Bytes) -> Result<H256, AppError> {
        // 只广播，等待确认由 ReceiptService 负责
        let pending_tx = self
            .provider
            .send_raw_transaction(rlp)
            .await
            .map_err(|e| AppError::Rpc(format!("Broadcast failed: {}", e)))?;
        Ok(pending_tx.tx_hash())
    }

    async fn get_transaction_receipt(
        &self,
        tx_hash: H256,
    ) -> Result<Option<TransactionReceipt>, AppError> {
        self.provider
            .get_transaction_receipt(tx_hash)
            .await
            .map_err(AppError::from)
    }

    async fn call(&self, tx: &TypedTransaction) -> Result<Bytes, AppError> {
        self.provider
            .call(tx, None)
            .await
            .map_err(|e| AppError::Rpc(format!("Call simulation failed: {}", e)))
    }
}

//! 测试用的假节点与收集器

use crate::errors::error::AppError;
use crate::infrastructure::provider::ProviderTrait;
use crate::utils::LineSink;
use async_trait::async_trait;
use ethers_core::types::transaction::eip2718::TypedTransaction;
use ethers_core::types::{Address, Bytes, H256, TransactionReceipt, U64, U256};
use ethers_core::utils::keccak256;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// anvil 默认账户 #0（公开的测试私钥）
pub const TEST_PRIVATE_KEY: &str =
    "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
pub const TEST_ADDRESS: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";

pub const ERC20_BALANCE_OF_ABI: &str = r#"[
  {
    "type": "function",
    "name": "balanceOf",
    "stateMutability": "view",
    "inputs": [{ "name": "owner", "type": "address" }],
    "outputs": [{ "name": "", "type": "uint256" }]
  }
]"#;

/// 可编程的假节点。字段为 None 表示对应 RPC 调用失败
pub struct FakeProvider {
    pub chain_id: Option<u64>,
    pub nonce: Option<u64>,
    /// pending nonce 随已广播交易数递增，模拟节点 mempool
    pub nonce_follows_mempool: bool,
    pub gas_price: Option<U256>,
    pub eip1559_fees: Option<(U256, U256)>,
    pub gas_estimate: Option<U256>,
    pub broadcast_ok: bool,
    /// 第几次轮询时返回已打包回执；None 表示永不打包
    pub receipt_after_polls: Option<usize>,
    pub receipt_status: u64,
    pub call_result: Option<Bytes>,

    // 调用记录；`..Default::default()` 需要这些字段对测试模块可见
    pub(crate) chain_id_requests: AtomicUsize,
    pub(crate) gas_price_requests: AtomicUsize,
    pub(crate) receipt_polls: AtomicUsize,
    pub(crate) nonce_queries: Mutex<Vec<Address>>,
    pub(crate) estimate_requests: Mutex<Vec<TypedTransaction>>,
    pub(crate) call_requests: Mutex<Vec<TypedTransaction>>,
    pub(crate) sent: Mutex<Vec<Bytes>>,
}

impl Default for FakeProvider {
    fn default() -> Self {
        Self {
            chain_id: Some(1337),
            nonce: Some(5),
            nonce_follows_mempool: false,
            gas_price: Some(U256::from(20)),
            eip1559_fees: Some((U256::from(100), U256::from(2))),
            gas_estimate: Some(U256::from(21_000)),
            broadcast_ok: true,
            receipt_after_polls: Some(1),
            receipt_status: 1,
            call_result: Some(Bytes::default()),
            chain_id_requests: AtomicUsize::new(0),
            gas_price_requests: AtomicUsize::new(0),
            receipt_polls: AtomicUsize::new(0),
            nonce_queries: Mutex::new(Vec::new()),
            estimate_requests: Mutex::new(Vec::new()),
            call_requests: Mutex::new(Vec::new()),
            sent: Mutex::new(Vec::new()),
        }
    }
}

impl FakeProvider {
    pub fn chain_id_requests(&self) -> usize {
        self.chain_id_requests.load(Ordering::SeqCst)
    }

    pub fn gas_price_requests(&self) -> usize {
        self.gas_price_requests.load(Ordering::SeqCst)
    }

    pub fn receipt_polls(&self) -> usize {
        self.receipt_polls.load(Ordering::SeqCst)
    }

    pub fn nonce_queries(&self) -> Vec<Address> {
        self.nonce_queries.lock().unwrap().clone()
    }

    pub fn estimate_requests(&self) -> Vec<TypedTransaction> {
        self.estimate_requests.lock().unwrap().clone()
    }

    pub fn call_requests(&self) -> Vec<TypedTransaction> {
        self.call_requests.lock().unwrap().clone()
    }

    pub fn sent_transactions(&self) -> Vec<Bytes> {
        self.sent.lock().unwrap().clone()
    }

    fn rpc_error(method: &str) -> AppError {
        AppError::Rpc(format!("{} failed", method))
    }
}

#[async_trait]
impl ProviderTrait for FakeProvider {
    async fn get_chain_id(&self) -> Result<U256, AppError> {
        self.chain_id_requests.fetch_add(1, Ordering::SeqCst);
        self.chain_id
            .map(U256::from)
            .ok_or_else(|| Self::rpc_error("eth_chainId"))
    }

    async fn get_pending_nonce(&self, address: Address) -> Result<U256, AppError> {
        self.nonce_queries.lock().unwrap().push(address);
        // 让出调度，给并发提交交错执行的机会
        tokio::task::yield_now().await;
        let base = self
            .nonce
            .ok_or_else(|| Self::rpc_error("eth_getTransactionCount"))?;
        let in_mempool = if self.nonce_follows_mempool {
            self.sent.lock().unwrap().len() as u64
        } else {
            0
        };
        Ok(U256::from(base + in_mempool))
    }

    async fn get_gas_price(&self) -> Result<U256, AppError> {
        self.gas_price_requests.fetch_add(1, Ordering::SeqCst);
        self.gas_price.ok_or_else(|| Self::rpc_error("eth_gasPrice"))
    }

    async fn estimate_eip1559_fees(&self) -> Result<(U256, U256), AppError> {
        self.gas_price_requests.fetch_add(1, Ordering::SeqCst);
        self.eip1559_fees
            .ok_or_else(|| Self::rpc_error("eth_feeHistory"))
    }

    async fn estimate_gas(&self, tx: &TypedTransaction) -> Result<U256, AppError> {
        self.estimate_requests.lock().unwrap().push(tx.clone());
        tokio::task::yield_now().await;
        self.gas_estimate
            .ok_or_else(|| AppError::Rpc("execution reverted".to_string()))
    }

    async fn send_raw_transaction(&self, rlp: Bytes) -> Result<H256, AppError> {
        if !self.broadcast_ok {
            return Err(AppError::Rpc("nonce too low".to_string()));
        }
        let hash = H256::from(keccak256(&rlp));
        self.sent.lock().unwrap().push(rlp);
        Ok(hash)
    }

    async fn get_transaction_receipt(
        &self,
        tx_hash: H256,
    ) -> Result<Option<TransactionReceipt>, AppError> {
        let polls = self.receipt_polls.fetch_add(1, Ordering::SeqCst) + 1;
        match self.receipt_after_polls {
            Some(n) if polls >= n => Ok(Some(TransactionReceipt {
                transaction_hash: tx_hash,
                block_number: Some(U64::from(100)),
                status: Some(U64::from(self.receipt_status)),
                ..Default::default()
            })),
            _ => Ok(None),
        }
    }

    async fn call(&self, tx: &TypedTransaction) -> Result<Bytes, AppError> {
        self.call_requests.lock().unwrap().push(tx.clone());
        self.call_result
            .clone()
            .ok_or_else(|| AppError::Rpc("execution reverted".to_string()))
    }
}

/// 把进度行收集到内存里
#[derive(Default)]
pub struct MemorySink {
    lines: Mutex<Vec<String>>,
}

impl MemorySink {
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }
}

impl LineSink for MemorySink {
    fn record(&self, line: &str) {
        self.lines.lock().unwrap().push(line.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn overridden_fake_keeps_fresh_recorders() {
        let fake = FakeProvider {
            nonce: Some(9),
            gas_price: None,
            ..Default::default()
        };

        assert_eq!(
            fake.get_pending_nonce(Address::zero()).await.unwrap(),
            U256::from(9)
        );
        assert!(fake.get_gas_price().await.is_err());
        assert_eq!(fake.gas_price_requests(), 1);
        assert_eq!(fake.nonce_queries(), vec![Address::zero()]);
        assert!(fake.sent_transactions().is_empty());
    }
}

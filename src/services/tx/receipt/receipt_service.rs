// services/tx/receipt/receipt_service.rs

use crate::errors::error::AppError;
use crate::infrastructure::provider::ProviderTrait;
use crate::log_debug;
use crate::utils::h256_to_string;
use ethers_core::types::{H256, TransactionReceipt};
use std::time::Duration;
use tokio::time::{sleep, timeout};

/// 轮询回执直到打包或超时。
/// 调用方可以直接 drop 返回的 future（例如放进 tokio::select!）来取消等待
#[derive(Clone, Copy, Debug)]
pub struct ReceiptService {
    poll_interval: Duration,
}

impl ReceiptService {
    pub fn new(poll_interval: Duration) -> Self {
        Self { poll_interval }
    }

    pub async fn wait_for_receipt(
        &self,
        provider: &dyn ProviderTrait,
        tx_hash: H256,
        wait: Duration,
    ) -> Result<TransactionReceipt, AppError> {
        timeout(wait, self.poll(provider, tx_hash))
            .await
            .map_err(|_| AppError::ReceiptTimeout {
                tx_hash: h256_to_string(tx_hash),
                timeout_secs: wait.as_secs(),
            })
    }

    async fn poll(&self, provider: &dyn ProviderTrait, tx_hash: H256) -> TransactionReceipt {
        loop {
            match provider.get_transaction_receipt(tx_hash).await {
                // 没有区块号说明还在 pending
                Ok(Some(receipt)) if receipt.block_number.is_some() => return receipt,
                Ok(_) => {}
                // 单次查询失败不算结束，继续轮询直到超时
                Err(e) => log_debug!("Receipt retrieval failed: {:#x} {}", tx_hash, e),
            }
            sleep(self.poll_interval).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::FakeProvider;
    use ethers_core::types::U64;

    #[tokio::test(start_paused = true)]
    async fn returns_mined_receipt() {
        let fake = FakeProvider {
            receipt_after_polls: Some(3),
            ..Default::default()
        };
        let hash = H256::repeat_byte(0xaa);
        let receipt = ReceiptService::new(Duration::from_secs(1))
            .wait_for_receipt(&fake, hash, Duration::from_secs(30))
            .await
            .unwrap();

        assert_eq!(receipt.transaction_hash, hash);
        assert_eq!(receipt.block_number, Some(U64::from(100)));
        assert_eq!(fake.receipt_polls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn times_out_when_never_mined() {
        let fake = FakeProvider {
            receipt_after_polls: None,
            ..Default::default()
        };
        let err = ReceiptService::new(Duration::from_secs(1))
            .wait_for_receipt(&fake, H256::zero(), Duration::from_secs(30))
            .await
            .unwrap_err();

        match err {
            AppError::ReceiptTimeout {
                tx_hash,
                timeout_secs,
            } => {
                assert_eq!(timeout_secs, 30);
                assert_eq!(tx_hash, format!("0x{}", "0".repeat(64)));
            }
            other => panic!("unexpected error {:?}", other),
        }
    }
}

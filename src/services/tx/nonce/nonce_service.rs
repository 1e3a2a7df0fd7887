// services/tx/nonce/nonce_service.rs

use crate::errors::error::AppError;
use crate::infrastructure::provider::ProviderTrait;
use dashmap::DashMap;
use ethers_core::types::{H160, U256};
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

// 所有 TxService 共享同一个 Arc，锁按发送地址区分
// let nonce_service = Arc::new(NonceService::new());
// let tx_service1 = TxService::new(..., signer_a, nonce_service.clone(), ...);
// let tx_service2 = TxService::new(..., signer_b, nonce_service.clone(), ...);
#[derive(Default)]
pub struct NonceService {
    /// 串行化 取 nonce -> 广播 这一段
    /// 同一地址的并发调用不会拿到同一个 pending nonce
    sequencers: DashMap<H160, Arc<Mutex<()>>>,
}

impl NonceService {
    pub fn new() -> Self {
        Self {
            sequencers: DashMap::new(),
        }
    }

    /// 持有期间同一地址的其他提交会在这里排队；广播完成后释放
    pub async fn sequence(&self, address: H160) -> OwnedMutexGuard<()> {
        // 先把 Arc 取出来，不在 await 期间持有 DashMap 的分片锁
        let sequencer = self
            .sequencers
            .entry(address)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        sequencer.lock_owned().await
    }

    /// 每次都从节点取 pending nonce，不在本地缓存
    pub async fn pending_nonce(
        &self,
        provider: &dyn ProviderTrait,
        address: H160,
    ) -> Result<u64, AppError> {
        let nonce = provider
            .get_pending_nonce(address)
            .await
            .map_err(|e| AppError::Nonce(e.to_string()))?;

        if nonce > U256::from(u64::MAX) {
            return Err(AppError::Nonce(format!("nonce {} overflows u64", nonce)));
        }
        Ok(nonce.as_u64())
    }
}

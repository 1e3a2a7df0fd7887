// services/tx_service.rs
use crate::errors::error::{AppError, SubmissionError};
use crate::infrastructure::provider::Connection;
use crate::log_warn;
use crate::services::tx::builder::{UnsignedTransaction, build_transaction};
use crate::services::tx::gas::GasService;
use crate::services::tx::nonce::NonceService;
use crate::services::tx::receipt::ReceiptService;
use crate::services::tx::signer::TxSigner;
use crate::services::tx::types::{
    GasPriceSource, PipelineStage, ReceiptStatus, SubmissionOutcome, TxOptions, TxRequest,
};
use crate::utils::{LineSink, format_gas_price};
use ethers_core::types::{Address, Bytes, H256, U256};
use std::sync::Arc;

/// 交易提交流水线：
/// FetchNonce -> EstimateGas -> PriceGas -> Build -> Sign -> Broadcast -> AwaitReceipt
pub struct TxService {
    connection: Arc<Connection>,
    signer: Arc<dyn TxSigner>,
    nonce_svc: Arc<NonceService>,
    gas_svc: GasService,
    sink: Arc<dyn LineSink>,
}

impl TxService {
    pub fn new(
        connection: Arc<Connection>,
        signer: Arc<dyn TxSigner>,
        nonce_svc: Arc<NonceService>,
        sink: Arc<dyn LineSink>,
    ) -> Self {
        Self {
            connection,
            signer,
            nonce_svc,
            gas_svc: GasService::new(),
            sink,
        }
    }

    pub fn from_address(&self) -> Address {
        self.signer.address()
    }

    /// ETH 原生转账，data 为空
    pub async fn transfer_eth(
        &self,
        to: Address,
        amount: U256,
        options: &TxOptions,
    ) -> Result<SubmissionOutcome, SubmissionError> {
        self.submit(TxRequest::new(to, amount, Bytes::default()), options)
            .await
    }

    /// 合约调用，value 为 0
    pub async fn send_transaction_to(
        &self,
        to: Address,
        call_data: Bytes,
        options: &TxOptions,
    ) -> Result<SubmissionOutcome, SubmissionError> {
        self.submit(TxRequest::new(to, U256::zero(), call_data), options)
            .await
    }

    pub async fn submit(
        &self,
        request: TxRequest,
        options: &TxOptions,
    ) -> Result<SubmissionOutcome, SubmissionError> {
        let provider = self.connection.provider();
        let from = self.signer.address();
        let mut outcome = SubmissionOutcome::new(from, request.to, request.value);
        self.sink
            .record(&format!("contract address: {:#x}", request.to));

        // 1~6 步持锁，同一身份的并发提交不会拿到同一个 pending nonce
        let sequence = self.nonce_svc.sequence(from).await;

        // 1. nonce
        let nonce = match self.nonce_svc.pending_nonce(provider, from).await {
            Ok(nonce) => nonce,
            Err(e) => return Err(self.abort(outcome, e)),
        };
        outcome.nonce = Some(nonce);

        // 2. gas limit（失败即中止）
        outcome.stage = PipelineStage::EstimateGas;
        let gas_limit = match self
            .gas_svc
            .estimate_gas_limit(
                provider,
                from,
                request.to,
                request.value,
                &request.data,
                options.gas_limit_buffer,
            )
            .await
        {
            Ok(limit) => limit,
            Err(e) => return Err(self.abort(outcome, e)),
        };
        outcome.gas_limit = Some(gas_limit);

        // 3. gas price（有 fallback 时失败只记 warning）
        outcome.stage = PipelineStage::PriceGas;
        let resolved = match self.gas_svc.resolve_price(provider, options).await {
            Ok(resolved) => resolved,
            Err(e) => return Err(self.abort(outcome, e)),
        };
        if let Some(warning) = resolved.warning {
            self.sink.record(&format!("warning: {}", warning));
            outcome.warnings.push(warning);
        }
        outcome.gas_price = Some(resolved.price);
        outcome.gas_price_source = Some(resolved.source);

        // 4. 构建
        outcome.stage = PipelineStage::Build;
        let tx = build_transaction(
            nonce,
            request.to,
            request.value,
            gas_limit,
            resolved.price,
            request.data,
        );

        // 5~6. 签名 + 广播
        let tx_hash = match self.sign_and_broadcast(&mut outcome, &tx).await {
            Ok(hash) => hash,
            Err(e) => return Err(self.abort(outcome, e)),
        };
        drop(sequence);

        // 7. 等待回执，多笔在途交易可以并发等待
        self.await_receipt(&mut outcome, tx_hash, options).await;
        Ok(outcome)
    }

    /// 发送调用方已经构建好的交易（只走签名、广播、等待回执）
    pub async fn send_prepared(
        &self,
        tx: UnsignedTransaction,
        options: &TxOptions,
    ) -> Result<SubmissionOutcome, SubmissionError> {
        let from = self.signer.address();
        let mut outcome = SubmissionOutcome::new(from, tx.to(), tx.value());
        outcome.nonce = Some(tx.nonce());
        outcome.gas_limit = Some(tx.gas_limit());
        outcome.gas_price = Some(tx.gas_price());
        outcome.gas_price_source = Some(GasPriceSource::Override);
        self.sink.record(&format!("contract address: {:#x}", tx.to()));

        let sequence = self.nonce_svc.sequence(from).await;
        let tx_hash = match self.sign_and_broadcast(&mut outcome, &tx).await {
            Ok(hash) => hash,
            Err(e) => return Err(self.abort(outcome, e)),
        };
        drop(sequence);

        self.await_receipt(&mut outcome, tx_hash, options).await;
        Ok(outcome)
    }

    async fn sign_and_broadcast(
        &self,
        outcome: &mut SubmissionOutcome,
        tx: &UnsignedTransaction,
    ) -> Result<H256, AppError> {
        outcome.stage = PipelineStage::Sign;
        let signed = self
            .signer
            .sign_tx(self.connection.chain_id(), tx)
            .await
            .map_err(|e| match e {
                AppError::Signing(_) => e,
                other => AppError::Signing(other.to_string()),
            })?;
        outcome.signature = Some(signed.signature);
        self.sink.record(&format!(
            "nonce:{} gasPrice:{} gasLimit:{}",
            tx.nonce(),
            format_gas_price(&tx.gas_price()),
            tx.gas_limit()
        ));

        outcome.stage = PipelineStage::Broadcast;
        let tx_hash = self
            .connection
            .provider()
            .send_raw_transaction(signed.raw.clone())
            .await
            .map_err(|e| AppError::Broadcast(e.to_string()))?;
        // 广播成功后立即记录哈希，后续确认失败也不丢
        outcome.tx_hash = Some(tx_hash);
        self.sink.record(&format!("tx broadcast: {:#x}", tx_hash));

        if tx_hash != signed.hash {
            log_warn!(
                "节点返回的哈希 {:#x} 与本地计算的 {:#x} 不一致",
                tx_hash,
                signed.hash
            );
        }
        Ok(tx_hash)
    }

    /// 超时或查询失败只记为 unknown，不算流水线失败
    async fn await_receipt(
        &self,
        outcome: &mut SubmissionOutcome,
        tx_hash: H256,
        options: &TxOptions,
    ) {
        outcome.stage = PipelineStage::AwaitReceipt;
        let receipts = ReceiptService::new(options.poll_interval);

        match receipts
            .wait_for_receipt(self.connection.provider(), tx_hash, options.receipt_timeout)
            .await
        {
            Ok(receipt) => {
                outcome.status = ReceiptStatus::from_receipt_status(receipt.status);
                outcome.block_number = receipt.block_number;
                self.sink.record(&format!(
                    "receipted - status:{} blockNumber:{}",
                    receipt.status.map(|s| s.as_u64().to_string()).unwrap_or_default(),
                    receipt
                        .block_number
                        .map(|b| b.to_string())
                        .unwrap_or_default()
                ));
            }
            Err(e) => {
                outcome.status = ReceiptStatus::Unknown;
                self.sink.record(&format!("wait mined error. {}", e));
                outcome.warnings.push(e.to_string());
            }
        }
        outcome.stage = PipelineStage::Done;
    }

    fn abort(&self, mut outcome: SubmissionOutcome, err: AppError) -> SubmissionError {
        outcome.error = Some(err.to_string());
        self.sink
            .record(&format!("{:?} failed: {}", outcome.stage, err));
        log_warn!("交易提交中止于 {:?}: {}", outcome.stage, err);
        SubmissionError::new(err, outcome)
    }
}

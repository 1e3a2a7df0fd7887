// services/tx/types.rs

use crate::config::TxConfig;
use crate::services::tx::gas::gas_strategy::{FeeModel, GasPrice};
use ethers_core::types::{Address, Bytes, H256, Signature, U64, U256};
use serde::Serialize;
use std::time::Duration;

/// 一次提交的调用参数
#[derive(Debug, Clone)]
pub struct TxRequest {
    pub to: Address,
    pub value: U256,
    pub data: Bytes,
}

impl TxRequest {
    pub fn new(to: Address, value: U256, data: Bytes) -> Self {
        Self { to, value, data }
    }
}

#[derive(Debug, Clone)]
pub struct TxOptions {
    pub fee_model: FeeModel,
    /// 调用方指定的价格，设置后不再向节点询价
    pub gas_price_override: Option<GasPrice>,
    /// 询价失败时的替代价格；None 表示询价失败即中止
    pub fallback_gas_price: Option<GasPrice>,
    pub gas_limit_buffer: u64, // 百分比，例如 120 表示 +20%
    pub receipt_timeout: Duration,
    pub poll_interval: Duration,
}

impl Default for TxOptions {
    fn default() -> Self {
        Self {
            fee_model: FeeModel::Legacy,
            gas_price_override: None,
            fallback_gas_price: None,
            gas_limit_buffer: 100,
            receipt_timeout: Duration::from_secs(30),
            poll_interval: Duration::from_secs(1),
        }
    }
}

impl From<&TxConfig> for TxOptions {
    fn from(config: &TxConfig) -> Self {
        let fee_model = config.fee_model();
        let fallback_gas_price = config
            .fallback_gas_price_gwei
            .map(|gwei| fee_model.flat_price(U256::from(gwei) * U256::exp10(9)));

        Self {
            fee_model,
            gas_price_override: None,
            fallback_gas_price,
            gas_limit_buffer: config.gas_limit_buffer_percent,
            receipt_timeout: Duration::from_secs(config.receipt_timeout_secs),
            poll_interval: Duration::from_millis(config.poll_interval_ms),
        }
    }
}

/// 流水线阶段，严格按顺序推进
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    FetchNonce,
    EstimateGas,
    PriceGas,
    Build,
    Sign,
    Broadcast,
    AwaitReceipt,
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReceiptStatus {
    Success,
    Reverted,
    /// 未拿到回执（超时、节点错误或尚未广播）
    Unknown,
}

impl ReceiptStatus {
    pub fn from_receipt_status(status: Option<U64>) -> Self {
        match status.map(|s| s.as_u64()) {
            Some(1) => ReceiptStatus::Success,
            Some(0) => ReceiptStatus::Reverted,
            _ => ReceiptStatus::Unknown,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GasPriceSource {
    Override,
    Node,
    Fallback,
}

/// 提交结果：每个阶段都往里写，失败时也能看到进行到哪一步
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionOutcome {
    pub from: Address,
    pub to: Address,
    pub value: U256,
    pub nonce: Option<u64>,
    pub gas_limit: Option<u64>,
    pub gas_price: Option<GasPrice>,
    pub gas_price_source: Option<GasPriceSource>,
    pub signature: Option<Signature>,
    pub tx_hash: Option<H256>,
    pub status: ReceiptStatus,
    pub block_number: Option<U64>,
    pub stage: PipelineStage,
    pub warnings: Vec<String>,
    pub error: Option<String>,
}

impl SubmissionOutcome {
    pub fn new(from: Address, to: Address, value: U256) -> Self {
        Self {
            from,
            to,
            value,
            nonce: None,
            gas_limit: None,
            gas_price: None,
            gas_price_source: None,
            signature: None,
            tx_hash: None,
            status: ReceiptStatus::Unknown,
            block_number: None,
            stage: PipelineStage::FetchNonce,
            warnings: Vec::new(),
            error: None,
        }
    }
}

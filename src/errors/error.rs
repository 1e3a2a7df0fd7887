use crate::services::tx::types::SubmissionOutcome;
use config::ConfigError;
use ethers_providers::ProviderError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    /// 连接 RPC 节点或获取 chain id 失败（启动期致命错误）
    #[error("Connection error: {0}")]
    Connection(String),

    /// 私钥格式错误（启动期致命错误）
    #[error("Invalid private key: {0}")]
    KeyFormat(String),

    #[error("get nonce error: {0}")]
    Nonce(String),

    #[error("get gas limit error: {0}")]
    GasEstimation(String),

    /// 仅在调用方未提供 fallback 价格时才会出现
    #[error("get gas price error: {0}")]
    GasPrice(String),

    #[error("sign tx error: {0}")]
    Signing(String),

    #[error("send transaction error: {0}")]
    Broadcast(String),

    /// 等待回执超时：交易已广播，结果未知
    #[error("交易 {tx_hash} 在 {timeout_secs}s 内未确认")]
    ReceiptTimeout { tx_hash: String, timeout_secs: u64 },

    #[error("Contract call failed: {0}")]
    Call(String),

    #[error("ABI codec error: {0}")]
    Abi(String),

    #[error("区块链RPC错误: {0}")]
    Rpc(String),

    #[error("无效的地址: {0}")]
    InvalidAddress(String),

    #[error("无效的数据: {0}")]
    InvalidData(String),

    #[error("类型转换错误: {0}")]
    Conversion(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl From<ProviderError> for AppError {
    fn from(err: ProviderError) -> Self {
        AppError::Rpc(err.to_string())
    }
}

/// 提交流水线的失败：携带出错阶段之前已经累计的结果
#[derive(Error, Debug)]
#[error("{source}")]
pub struct SubmissionError {
    pub source: AppError,
    pub outcome: Box<SubmissionOutcome>,
}

impl SubmissionError {
    pub fn new(source: AppError, outcome: SubmissionOutcome) -> Self {
        Self {
            source,
            outcome: Box::new(outcome),
        }
    }
}

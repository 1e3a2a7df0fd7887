use crate::errors::error::AppError;
use crate::infrastructure::provider::ethereum_provider::{EthereumProvider, ProviderTrait};
use crate::log_info;
use ethers_core::types::U256;
use std::fmt;
use std::sync::Arc;
use url::Url;

/// 节点连接：RPC 句柄 + 启动时获取一次的 chain id
#[derive(Clone)]
pub struct Connection {
    provider: Arc<dyn ProviderTrait>,
    chain_id: u64,
}

impl Connection {
    /// 按 URL scheme 选择 HTTP 或 WebSocket，并立即获取 chain id
    pub async fn connect(endpoint: &str) -> Result<Self, AppError> {
        let url = Url::parse(endpoint)
            .map_err(|e| AppError::Connection(format!("无效的 RPC URL {}: {}", endpoint, e)))?;

        let provider: Arc<dyn ProviderTrait> = match url.scheme() {
            "http" | "https" => Arc::new(EthereumProvider::http(endpoint)?),
            "ws" | "wss" => Arc::new(EthereumProvider::ws(endpoint).await?),
            other => {
                return Err(AppError::Connection(format!(
                    "unsupported RPC scheme: {}",
                    other
                )));
            }
        };

        let connection = Self::from_provider(provider).await?;
        log_info!(
            "已连接 RPC: {} (chain id {})",
            url.host_str().unwrap_or("unknown"),
            connection.chain_id
        );
        Ok(connection)
    }

    /// 用已有的 provider 建立连接；获取 chain id 失败即初始化失败，不重试
    pub async fn from_provider(provider: Arc<dyn ProviderTrait>) -> Result<Self, AppError> {
        let chain_id = provider
            .get_chain_id()
            .await
            .map_err(|e| AppError::Connection(format!("get chain id error. {}", e)))?;

        if chain_id > U256::from(u64::MAX) {
            return Err(AppError::Connection(format!(
                "chain id {} does not fit in u64",
                chain_id
            )));
        }

        Ok(Self {
            provider,
            chain_id: chain_id.as_u64(),
        })
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    pub fn provider(&self) -> &dyn ProviderTrait {
        self.provider.as_ref()
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("chain_id", &self.chain_id)
            .finish()
    }
}

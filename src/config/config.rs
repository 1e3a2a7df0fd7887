use crate::services::tx::gas::gas_strategy::{FeeModel, TxPriority};
use config::{ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub ethereum: EthereumConfig,
    #[serde(default)]
    pub tx: TxConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EthereumConfig {
    /// http(s):// 或 ws(s)://
    pub rpc_url: String,
    /// 存放私钥的环境变量名（私钥本身不进配置文件）
    #[serde(default = "default_private_key_env")]
    pub private_key_env: String,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum FeeModelKind {
    #[default]
    Legacy,
    Eip1559,
}

/// 交易参数（单位：gwei / 秒 / 毫秒）
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct TxConfig {
    pub fee_model: FeeModelKind,
    pub priority: TxPriority,
    /// 节点询价失败时使用的价格；不配置则询价失败直接中止
    pub fallback_gas_price_gwei: Option<u64>,
    pub gas_limit_buffer_percent: u64,
    pub receipt_timeout_secs: u64,
    pub poll_interval_ms: u64,
}

impl Default for TxConfig {
    fn default() -> Self {
        Self {
            fee_model: FeeModelKind::Legacy,
            priority: TxPriority::Normal,
            fallback_gas_price_gwei: None,
            gas_limit_buffer_percent: 100,
            receipt_timeout_secs: 30,
            poll_interval_ms: 1000,
        }
    }
}

impl TxConfig {
    pub fn fee_model(&self) -> FeeModel {
        match self.fee_model {
            FeeModelKind::Legacy => FeeModel::Legacy,
            FeeModelKind::Eip1559 => FeeModel::Eip1559 {
                priority: self.priority,
            },
        }
    }

    /// 拒绝会让每笔交易 out of gas 或让回执轮询空转的取值
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.gas_limit_buffer_percent < 100 {
            return Err(ConfigError::Message(format!(
                "tx.gas_limit_buffer_percent 必须 >= 100，当前 {}",
                self.gas_limit_buffer_percent
            )));
        }
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::Message("tx.poll_interval_ms 必须大于 0".to_string()));
        }
        if self.receipt_timeout_secs == 0 {
            return Err(ConfigError::Message("tx.receipt_timeout_secs 必须大于 0".to_string()));
        }
        Ok(())
    }
}

fn default_private_key_env() -> String {
    "ETH_PRIVATE_KEY".to_string()
}

impl Config {
    /// {path}.toml -> config/{APP_ENVIRONMENT}.toml -> APP_* 环境变量
    pub fn load_from(path: &str) -> Result<Self, ConfigError> {
        let environment = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config: Config = config::Config::builder()
            .add_source(File::with_name(path))
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            .add_source(Environment::with_prefix("APP").separator("__"))
            .build()?
            .try_deserialize()?;
        config.tx.validate()?;
        Ok(config)
    }
}

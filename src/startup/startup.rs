use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use ethers_core::types::{Bytes, U256};

use crate::cli::Command;
use crate::config::Config;
use crate::errors::error::AppError;
use crate::infrastructure::provider::Connection;
use crate::services::TxService;
use crate::services::tx::nonce::NonceService;
use crate::services::tx::signer::{LocalSigner, TxSigner};
use crate::services::tx::simulation::{SimulationService, parse_abi, tokenize_args};
use crate::services::tx::types::{TxOptions, TxRequest};
use crate::utils::{LogSink, parse_address, parse_hex_data, parse_wei};
use crate::{log_error, log_info};

pub type Result<T> = std::result::Result<T, AppError>;

/// 私钥优先取命令行，其次取配置里指定的环境变量
pub fn load_signer(config: &Config, private_key: Option<&str>) -> Result<LocalSigner> {
    match private_key {
        Some(key) => LocalSigner::from_hex(key),
        None => LocalSigner::from_env(&config.ethereum.private_key_env),
    }
}

/// 应用实例：连接、签名身份和各服务在这里装配
pub struct Application {
    connection: Arc<Connection>,
    tx_service: TxService,
    simulation: SimulationService,
    tx_options: TxOptions,
}

impl Application {
    /// 连接节点并装配服务。连接失败、chain id 获取失败都在这里返回
    pub async fn build(config: Config, signer: LocalSigner) -> Result<Self> {
        let connection = Arc::new(Connection::connect(&config.ethereum.rpc_url).await?);
        let signer: Arc<dyn TxSigner> = Arc::new(signer);
        log_info!(
            "signer {:#x} on chain {}",
            signer.address(),
            connection.chain_id()
        );

        let tx_service = TxService::new(
            connection.clone(),
            signer.clone(),
            Arc::new(NonceService::new()),
            Arc::new(LogSink),
        );
        let simulation = SimulationService::new(connection.clone(), signer);

        Ok(Self {
            connection,
            tx_service,
            simulation,
            tx_options: TxOptions::from(&config.tx),
        })
    }

    pub async fn run(self, command: Command) -> anyhow::Result<()> {
        match command {
            Command::Send {
                to,
                data,
                value,
                gas_price,
                timeout,
            } => {
                let to = parse_address(&to)?;
                let data = match data {
                    Some(data) => parse_hex_data(&data)?,
                    None => Bytes::default(),
                };
                let value = match value {
                    Some(value) => parse_wei(&value)?,
                    None => U256::zero(),
                };

                let mut options = self.tx_options.clone();
                if let Some(gwei) = gas_price {
                    let wei = U256::from(gwei) * U256::exp10(9);
                    options.gas_price_override = Some(options.fee_model.flat_price(wei));
                }
                if let Some(secs) = timeout {
                    options.receipt_timeout = Duration::from_secs(secs);
                }

                let result = self
                    .tx_service
                    .submit(TxRequest::new(to, value, data), &options)
                    .await;
                match result {
                    Ok(outcome) => {
                        println!("{}", serde_json::to_string_pretty(&outcome)?);
                        Ok(())
                    }
                    Err(e) => {
                        log_error!("submission failed at {:?}: {}", e.outcome.stage, e.source);
                        eprintln!("{}", serde_json::to_string_pretty(&e.outcome)?);
                        Err(e.into())
                    }
                }
            }
            Command::Call {
                to,
                data,
                abi,
                function,
                args,
            } => {
                let to = parse_address(&to)?;
                match (abi, function) {
                    (Some(path), Some(function)) => {
                        let json = std::fs::read_to_string(&path)
                            .with_context(|| format!("读取 ABI 文件失败: {}", path.display()))?;
                        let abi = parse_abi(&json)?;
                        let tokens = tokenize_args(&abi, &function, &args)?;
                        let values = self
                            .simulation
                            .call_function(to, &abi, &function, &tokens)
                            .await?;
                        let rendered: Vec<String> =
                            values.iter().map(|t| t.to_string()).collect();
                        println!("{}", serde_json::to_string_pretty(&rendered)?);
                    }
                    _ => {
                        let input = parse_hex_data(data.as_deref().unwrap_or_default())?;
                        let output = self.simulation.call(to, input).await?;
                        println!("{}", output);
                    }
                }
                Ok(())
            }
            Command::Address => {
                println!("{:#x}", self.tx_service.from_address());
                Ok(())
            }
            Command::ChainId => {
                println!("{}", self.connection.chain_id());
                Ok(())
            }
        }
    }
}

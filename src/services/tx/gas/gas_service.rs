// services/tx/gas/gas_service.rs

use crate::errors::error::AppError;
use crate::infrastructure::provider::ProviderTrait;
use crate::services::tx::gas::gas_strategy::{FeeModel, GasPrice, TxPriority};
use crate::services::tx::types::{GasPriceSource, TxOptions};
use ethers_core::types::transaction::eip2718::TypedTransaction;
use ethers_core::types::{Address, Bytes, TransactionRequest, U256};

/// 询价结果。warning 只在使用 fallback 时出现
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPrice {
    pub price: GasPrice,
    pub source: GasPriceSource,
    pub warning: Option<String>,
}

/// Gas 估算与定价（纯整数运算）
#[derive(Clone, Copy, Debug, Default)]
pub struct GasService;

impl GasService {
    pub fn new() -> Self {
        Self
    }

    /// 向节点询价。legacy 模式用 eth_gasPrice，EIP-1559 模式按优先级调整 tip
    pub async fn suggest_price(
        &self,
        provider: &dyn ProviderTrait,
        fee_model: FeeModel,
    ) -> Result<GasPrice, AppError> {
        match fee_model {
            FeeModel::Legacy => {
                let price = provider
                    .get_gas_price()
                    .await
                    .map_err(|e| AppError::GasPrice(e.to_string()))?;
                Ok(GasPrice::Legacy { gas_price: price })
            }
            FeeModel::Eip1559 { priority } => {
                let (max_fee_per_gas, base_priority_fee) = provider
                    .estimate_eip1559_fees()
                    .await
                    .map_err(|e| AppError::GasPrice(e.to_string()))?;
                adjust_eip1559_fees(max_fee_per_gas, base_priority_fee, priority)
            }
        }
    }

    /// eth_estimateGas 并按百分比加 buffer。失败即中止提交
    pub async fn estimate_gas_limit(
        &self,
        provider: &dyn ProviderTrait,
        from: Address,
        to: Address,
        value: U256,
        data: &Bytes,
        buffer_percent: u64,
    ) -> Result<u64, AppError> {
        if buffer_percent < 100 {
            return Err(AppError::GasEstimation(format!(
                "gas limit buffer {}% would undercut the estimate",
                buffer_percent
            )));
        }

        let call: TypedTransaction = TransactionRequest::new()
            .from(from)
            .to(to)
            .value(value)
            .data(data.clone())
            .into();

        let estimated = provider
            .estimate_gas(&call)
            .await
            .map_err(|e| AppError::GasEstimation(e.to_string()))?;

        let buffered = estimated
            .checked_mul(U256::from(buffer_percent))
            .ok_or_else(|| AppError::GasEstimation("gas limit buffer overflow".to_string()))?
            / U256::from(100);

        if buffered > U256::from(u64::MAX) {
            return Err(AppError::GasEstimation(format!(
                "gas limit {} overflows u64",
                buffered
            )));
        }
        Ok(buffered.as_u64())
    }

    /// 定价策略：覆盖价 > 节点建议价 > fallback。
    /// 询价失败是流水线中唯一可吸收的错误，前提是调用方给了 fallback
    pub async fn resolve_price(
        &self,
        provider: &dyn ProviderTrait,
        options: &TxOptions,
    ) -> Result<ResolvedPrice, AppError> {
        if let Some(price) = options.gas_price_override {
            return Ok(ResolvedPrice {
                price,
                source: GasPriceSource::Override,
                warning: None,
            });
        }

        match self.suggest_price(provider, options.fee_model).await {
            Ok(price) => Ok(ResolvedPrice {
                price,
                source: GasPriceSource::Node,
                warning: None,
            }),
            Err(e) => match options.fallback_gas_price {
                Some(price) => Ok(ResolvedPrice {
                    price,
                    source: GasPriceSource::Fallback,
                    warning: Some(format!("{}; using fallback price", e)),
                }),
                None => Err(e),
            },
        }
    }
}

fn adjust_eip1559_fees(
    max_fee_per_gas: U256,
    base_priority_fee: U256,
    priority: TxPriority,
) -> Result<GasPrice, AppError> {
    let tip = base_priority_fee
        .checked_mul(U256::from(priority.tip_multiplier_percent()))
        .ok_or_else(|| AppError::GasPrice("Adjusted priority fee overflow".to_string()))?
        / U256::from(100);

    let max_fee = max_fee_per_gas
        .checked_mul(U256::from(priority.max_fee_headroom_percent()))
        .ok_or_else(|| AppError::GasPrice("Max fee calculation overflow".to_string()))?
        / U256::from(100);

    // fee cap 不能低于 tip，否则节点会拒绝
    Ok(GasPrice::Eip1559 {
        max_fee_per_gas: max_fee.max(tip),
        max_priority_fee_per_gas: tip,
    })
}

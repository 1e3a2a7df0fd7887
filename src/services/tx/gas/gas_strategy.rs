// services/tx/gas/gas_strategy.rs

use ethers_core::types::U256;
use serde::{Deserialize, Serialize};

/// 交易优先级策略（仅 EIP-1559 模式使用）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TxPriority {
    Low,
    #[default]
    Normal,
    High,
    Urgent,
}

impl TxPriority {
    /// tip 调整百分比（100 = 无调整）
    pub fn tip_multiplier_percent(&self) -> u64 {
        match self {
            TxPriority::Low => 80,
            TxPriority::Normal => 100,
            TxPriority::High => 150,
            TxPriority::Urgent => 300,
        }
    }

    /// max_fee_per_gas 相对节点建议值的放大百分比，给 base fee 上涨留余量
    pub fn max_fee_headroom_percent(&self) -> u64 {
        match self {
            TxPriority::Low => 100,
            TxPriority::Normal => 110,
            TxPriority::High => 125,
            TxPriority::Urgent => 150,
        }
    }
}

/// 费用模型：legacy 单一 gasPrice，或 EIP-1559 的 fee cap / tip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeeModel {
    Legacy,
    Eip1559 { priority: TxPriority },
}

impl FeeModel {
    /// 用一个单价构造该模型下的价格（fallback / 命令行覆盖使用）
    pub fn flat_price(&self, price: U256) -> GasPrice {
        match self {
            FeeModel::Legacy => GasPrice::Legacy { gas_price: price },
            FeeModel::Eip1559 { .. } => GasPrice::Eip1559 {
                max_fee_per_gas: price,
                max_priority_fee_per_gas: price,
            },
        }
    }
}

/// 输出 JSON 形如 {"type":"legacy","gas_price":"0x14"}
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GasPrice {
    Legacy {
        gas_price: U256,
    },
    Eip1559 {
        max_fee_per_gas: U256,
        max_priority_fee_per_gas: U256,
    },
}

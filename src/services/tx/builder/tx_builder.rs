// services/tx/builder/tx_builder.rs

use crate::services::tx::gas::gas_strategy::GasPrice;
use ethers_core::types::transaction::eip2718::TypedTransaction;
use ethers_core::types::{Address, Bytes, Eip1559TransactionRequest, TransactionRequest, U256};

/// 未签名交易。构造后不再修改，换 nonce 需要重新 build
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsignedTransaction {
    nonce: u64,
    to: Address,
    value: U256,
    gas_limit: u64,
    gas_price: GasPrice,
    data: Bytes,
}

/// 组装未签名交易。余额、合约是否存在等语义校验交给节点
pub fn build_transaction(
    nonce: u64,
    to: Address,
    value: U256,
    gas_limit: u64,
    gas_price: GasPrice,
    data: Bytes,
) -> UnsignedTransaction {
    UnsignedTransaction {
        nonce,
        to,
        value,
        gas_limit,
        gas_price,
        data,
    }
}

impl UnsignedTransaction {
    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    pub fn to(&self) -> Address {
        self.to
    }

    pub fn value(&self) -> U256 {
        self.value
    }

    pub fn gas_limit(&self) -> u64 {
        self.gas_limit
    }

    pub fn gas_price(&self) -> GasPrice {
        self.gas_price
    }

    /// 转成 ethers 的 TypedTransaction，chain id 写进交易本身（EIP-155 / typed tx）
    pub fn to_typed(&self, chain_id: u64) -> TypedTransaction {
        match self.gas_price {
            GasPrice::Legacy { gas_price: price } => TransactionRequest::new()
                .to(self.to)
                .value(self.value)
                .data(self.data.clone())
                .nonce(self.nonce)
                .gas(self.gas_limit)
                .gas_price(price)
                .chain_id(chain_id)
                .into(),
            GasPrice::Eip1559 {
                max_fee_per_gas,
                max_priority_fee_per_gas,
            } => Eip1559TransactionRequest::new()
                .to(self.to)
                .value(self.value)
                .data(self.data.clone())
                .nonce(self.nonce)
                .gas(self.gas_limit)
                .max_fee_per_gas(max_fee_per_gas)
                .max_priority_fee_per_gas(max_priority_fee_per_gas)
                .chain_id(chain_id)
                .into(),
        }
    }
}

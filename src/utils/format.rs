use crate::services::tx::gas::gas_strategy::GasPrice;

/// 进度行里的价格（单位 wei）
pub fn format_gas_price(price: &GasPrice) -> String {
    match price {
        GasPrice::Legacy { gas_price: p } => p.to_string(),
        GasPrice::Eip1559 {
            max_fee_per_gas,
            max_priority_fee_per_gas,
        } => format!(
            "maxFee:{} tip:{}",
            max_fee_per_gas, max_priority_fee_per_gas
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ethers_core::types::U256;

    #[test]
    fn formats_prices() {
        assert_eq!(format_gas_price(&GasPrice::Legacy { gas_price: U256::from(20) }), "20");
        assert_eq!(
            format_gas_price(&GasPrice::Eip1559 {
                max_fee_per_gas: U256::from(30),
                max_priority_fee_per_gas: U256::from(2),
            }),
            "maxFee:30 tip:2"
        );
    }
}

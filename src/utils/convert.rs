use crate::errors::error::AppError;
use ethers_core::types::{Address, Bytes, H256, U256};

/// 解析 0x 开头（或不带前缀）的 20 字节地址
pub fn parse_address(input: &str) -> Result<Address, AppError> {
    input
        .trim()
        .parse::<Address>()
        .map_err(|_| AppError::InvalidAddress(input.to_string()))
}

/// 解析十六进制 call data，空字符串和 "0x" 都视为空
pub fn parse_hex_data(input: &str) -> Result<Bytes, AppError> {
    let trimmed = input.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    hex::decode(digits)
        .map(Bytes::from)
        .map_err(|e| AppError::InvalidData(format!("{}: {}", input, e)))
}

/// 十进制或 0x 十六进制的 wei 数值
pub fn parse_wei(input: &str) -> Result<U256, AppError> {
    let trimmed = input.trim();
    let parsed = match trimmed.strip_prefix("0x") {
        Some(hex_digits) => U256::from_str_radix(hex_digits, 16).map_err(|e| e.to_string()),
        None => U256::from_dec_str(trimmed).map_err(|e| e.to_string()),
    };
    parsed.map_err(|e| AppError::Conversion(format!("{}: {}", input, e)))
}

pub fn h256_to_string(data: H256) -> String {
    format!("{:#x}", data)
}

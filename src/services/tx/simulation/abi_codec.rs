// services/tx/simulation/abi_codec.rs

use crate::errors::error::AppError;
use ethers_core::abi::token::{LenientTokenizer, Tokenizer};
use ethers_core::abi::{Abi, Token};
use ethers_core::types::Bytes;

/// ABI 编解码协作方：按函数名打包入参、解包返回值
pub trait AbiCodec: Send + Sync {
    fn pack(&self, function: &str, args: &[Token]) -> Result<Bytes, AppError>;
    fn unpack(&self, function: &str, data: &[u8]) -> Result<Vec<Token>, AppError>;
}

impl AbiCodec for Abi {
    fn pack(&self, function: &str, args: &[Token]) -> Result<Bytes, AppError> {
        let f = self
            .function(function)
            .map_err(|e| AppError::Abi(format!("{}: {}", function, e)))?;
        f.encode_input(args)
            .map(Bytes::from)
            .map_err(|e| AppError::Abi(format!("pack {} failed: {}", function, e)))
    }

    fn unpack(&self, function: &str, data: &[u8]) -> Result<Vec<Token>, AppError> {
        let f = self
            .function(function)
            .map_err(|e| AppError::Abi(format!("{}: {}", function, e)))?;
        f.decode_output(data)
            .map_err(|e| AppError::Abi(format!("unpack {} failed: {}", function, e)))
    }
}

/// 解析 JSON 格式的合约 ABI
pub fn parse_abi(json: &str) -> Result<Abi, AppError> {
    serde_json::from_str(json).map_err(|e| AppError::Abi(format!("invalid ABI json: {}", e)))
}

/// 命令行传入的字符串参数按函数入参类型转成 Token
pub fn tokenize_args(abi: &Abi, function: &str, args: &[String]) -> Result<Vec<Token>, AppError> {
    let f = abi
        .function(function)
        .map_err(|e| AppError::Abi(format!("{}: {}", function, e)))?;
    if f.inputs.len() != args.len() {
        return Err(AppError::Abi(format!(
            "{} 需要 {} 个参数，实际 {} 个",
            function,
            f.inputs.len(),
            args.len()
        )));
    }

    f.inputs
        .iter()
        .zip(args)
        .map(|(param, value)| {
            LenientTokenizer::tokenize(&param.kind, value)
                .map_err(|e| AppError::Abi(format!("参数 {} 解析失败: {}", param.name, e)))
        })
        .collect()
}

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "以太坊交易提交客户端", long_about = None)]
pub struct Cli {
    /// 配置文件（不带扩展名）
    #[arg(short, long, default_value = "config/default")]
    pub config: String,
    /// 十六进制私钥；不传则读取配置中 private_key_env 指定的环境变量
    #[arg(long)]
    pub private_key: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// 签名并广播一笔交易，等待回执后输出 JSON 结果
    Send {
        #[arg(long)]
        to: String,
        /// 十六进制 calldata
        #[arg(long)]
        data: Option<String>,
        /// 转账金额（wei，十进制或 0x 十六进制）
        #[arg(long)]
        value: Option<String>,
        /// 指定 gas price（gwei），不再向节点询价
        #[arg(long)]
        gas_price: Option<u64>,
        /// 等待回执的超时（秒）
        #[arg(long)]
        timeout: Option<u64>,
    },
    /// 只读调用 eth_call
    Call {
        #[arg(long)]
        to: String,
        /// 原始 calldata；与 --function 二选一
        #[arg(long, required_unless_present = "function")]
        data: Option<String>,
        /// 合约 ABI JSON 文件
        #[arg(long, requires = "function")]
        abi: Option<PathBuf>,
        #[arg(long, requires = "abi", conflicts_with = "data")]
        function: Option<String>,
        /// 函数参数，按 ABI 入参顺序
        #[arg(long = "arg")]
        args: Vec<String>,
    },
    /// 打印签名身份的地址
    Address,
    /// 打印节点的 chain id
    ChainId,
}

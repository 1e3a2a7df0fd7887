use anyhow::Context;
use clap::Parser;
use eth_tx_client::cli::{Cli, Command};
use eth_tx_client::config::Config;
use eth_tx_client::log_info;
use eth_tx_client::services::tx::signer::TxSigner;
use eth_tx_client::startup::{Application, load_signer};
use eth_tx_client::utils::logger::init_logger;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env 可选
    dotenvy::dotenv().ok();
    init_logger();

    let cli = Cli::parse();

    // 1. 加载配置
    let config =
        Config::load_from(&cli.config).context("Failed to load application configuration")?;

    // 2. 签名身份（私钥格式错误在这里直接退出）
    let signer =
        load_signer(&config, cli.private_key.as_deref()).context("Failed to load signer")?;

    // 查地址不需要连接节点
    if let Command::Address = cli.command {
        println!("{:#x}", signer.address());
        return Ok(());
    }

    // 3. 连接节点并装配服务
    let application = Application::build(config, signer)
        .await
        .context("Application building failed (RPC connection)")?;
    log_info!("Application build complete.");

    // 4. 执行子命令
    application.run(cli.command).await
}

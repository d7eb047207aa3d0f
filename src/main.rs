//! bico-registrar 命令行入口
//!
//! 用法：`bico-registrar <name> [description]`
//! 环境变量：
//! - REGISTRAR_PRIVATE_KEY（必填，本地签名私钥）
//! - CONFIG_PATH（可选，TOML 配置文件）
//! - GATEWAY_URL / PARENT_DOMAIN / LOG_LEVEL 等见 config 模块

use std::sync::Arc;

use anyhow::{Context, Result};
use bico_registrar::{
    config::Config,
    domain::ProfileFields,
    infrastructure::{log_redact::redact_address, logging},
    service::{HttpGateway, LocalWalletSigner, Registrar},
};

#[tokio::main]
async fn main() -> Result<()> {
    // 1. 加载环境变量和配置
    dotenvy::dotenv().ok();

    let config_path = std::env::var("CONFIG_PATH").ok();
    let config = Config::from_env_and_file(config_path.as_deref())?;
    config.validate()?;

    // 2. 初始化日志
    logging::init_logging(&config.logging)?;

    let mut args = std::env::args().skip(1);
    let name = args
        .next()
        .context("usage: bico-registrar <name> [description]")?;
    let description = args.next();

    // 3. 钱包与网关
    let private_key =
        std::env::var("REGISTRAR_PRIVATE_KEY").context("REGISTRAR_PRIVATE_KEY must be set")?;
    let signer = LocalWalletSigner::from_private_key(&private_key)?;
    let address = signer.address();
    let gateway = HttpGateway::new(&config.gateway)?;

    tracing::info!(
        gateway = %gateway.register_url(),
        address = %redact_address(&address),
        "starting offchain registration"
    );

    let registrar = Registrar::new(
        config.registration.clone(),
        Arc::new(signer),
        Arc::new(gateway),
    );

    // 4. 输入名称并等待防抖
    registrar.connect_wallet(Some(address)).await;
    registrar
        .set_profile(ProfileFields { description })
        .await;
    registrar.input_name(&name).await;
    registrar.wait_until_settled().await;

    let controls = registrar.controls().await;
    if !controls.submit_enabled {
        let state = registrar.display_state().await;
        println!(
            "{}",
            state.helper_text().unwrap_or("Registration is not available")
        );
        std::process::exit(1);
    }

    // 5. 签名并提交
    let state = registrar.register().await?;
    match state.helper_text() {
        Some(text) => println!("{}", text),
        None => println!("{}", state.as_str()),
    }
    if let Some(link) = registrar.follow_up_link().await {
        println!("{}", link);
    }

    if state.is_error() {
        std::process::exit(1);
    }
    Ok(())
}

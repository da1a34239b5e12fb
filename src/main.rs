use anyhow::Context;
use clap::Parser;
use time_registration::core::ConfigProvider;
use time_registration::utils::{logger, validation::Validate};
use time_registration::{CliConfig, Console, ExcelReader, LocalStorage, SessionController};

fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting time-registration");
    tracing::debug!("CLI config: {:?}", config);

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let mut session =
        SessionController::from_config(LocalStorage::default(), ExcelReader::new(), &config);
    let mut console = Console::stdio();

    // Input failures end the session; report and fall through to a normal exit
    let outcome = session
        .run(&mut console, config.initial_spreadsheet())
        .context("interactive session ended unexpectedly");
    if let Err(e) = outcome {
        tracing::error!("❌ Application error: {:#}", e);
        eprintln!("Application error: {:#}", e);
    }

    // 釋放終端輸入
    drop(console);
    tracing::info!(records = session.records().len(), "session closed");

    Ok(())
}

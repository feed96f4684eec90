use clap::Parser;
use deal_check::utils::{logger, validation::Validate};
use deal_check::{CliConfig, DealChecker, Place};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting deal-check CLI");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    let checker = DealChecker::from_config(&config)?;
    let place = Place::new(config.name.as_str(), config.city.as_str());

    tracing::info!(
        "🔍 Checking {:?} ({}) on {} platforms",
        place.name,
        place.city,
        checker.platforms().len()
    );
    let result = checker.verify_all(&place).await;

    let output = if config.pretty {
        serde_json::to_string_pretty(&result)?
    } else {
        serde_json::to_string(&result)?
    };
    println!("{}", output);

    tracing::info!("✅ {} of {} platforms sure", result.sure_count(), result.platforms.len());
    Ok(())
}

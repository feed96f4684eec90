use clap::Parser;
use deal_check::app::batch::{read_places, write_results, BatchRunner, OutputFormat};
use deal_check::core::ConfigProvider;
use deal_check::utils::validation::{validate_file_extension, validate_path, Validate};
use deal_check::utils::logger;
use deal_check::{DealChecker, Place, TomlConfig};
use std::fs::File;
use std::io::{BufWriter, Write};

#[derive(Parser)]
#[command(name = "batch-check")]
#[command(about = "Check a CSV list of places against food deal platforms")]
struct Args {
    /// CSV file with a name,city header
    #[arg(short, long)]
    input: String,

    /// Path to TOML configuration file (built-in defaults when omitted)
    #[arg(short, long)]
    config: Option<String>,

    /// Where to write results (stdout when omitted)
    #[arg(short, long)]
    output: Option<String>,

    /// Override the output format from config (csv or json)
    #[arg(long)]
    format: Option<OutputFormat>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Dry run - show what would be checked without any network calls
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // 初始化日誌
    logger::init_cli_logger(args.verbose);

    tracing::info!("🚀 Starting batch deal check");

    // 載入 TOML 配置
    let config = match &args.config {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path);
            match TomlConfig::from_file(path) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("❌ Failed to load config file '{}': {}", path, e);
                    eprintln!("💡 Make sure the file exists and is valid TOML format");
                    std::process::exit(1);
                }
            }
        }
        None => TomlConfig::default(),
    };

    // 驗證配置
    let validated = config
        .validate()
        .and_then(|_| validate_path("input", &args.input))
        .and_then(|_| validate_file_extension("input", &args.input, &["csv"]));
    if let Err(e) = validated {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    let mut settings = config.batch_settings()?;
    if let Some(format) = args.format {
        settings.output_format = format;
        tracing::info!("🔧 Output format overridden to: {}", format);
    }

    let places = read_places(File::open(&args.input)?, &settings.default_city)?;
    tracing::info!("✅ Loaded {} places from {}", places.len(), args.input);

    display_config_summary(&config, &places, &args);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No searches will be made");
        perform_dry_run(&places, settings.max_places);
        return Ok(());
    }

    let checker = DealChecker::from_config(&config)?;
    let platforms = checker.platforms().to_vec();
    let format = settings.output_format;
    let checked = BatchRunner::new(&checker, settings).run(&places).await;

    match &args.output {
        Some(path) => {
            let mut writer = BufWriter::new(File::create(path)?);
            write_results(&mut writer, format, &checked, &platforms)?;
            writer.flush()?;
            tracing::info!("📁 Output saved to: {}", path);
        }
        None => {
            let stdout = std::io::stdout();
            let mut writer = stdout.lock();
            write_results(&mut writer, format, &checked, &platforms)?;
            writer.flush()?;
        }
    }

    let sure: usize = checked.iter().map(|c| c.result.sure_count()).sum();
    tracing::info!("✅ Checked {} places, {} sure listings", checked.len(), sure);
    Ok(())
}

fn display_config_summary(config: &TomlConfig, places: &[Place], args: &Args) {
    let search = config.search_settings();
    let retry = config.retry_policy();

    eprintln!("📋 Configuration Summary:");
    eprintln!("  Search: {}", search.endpoint);
    eprintln!(
        "  Retry: {} attempts, {:?} backoff",
        retry.max_attempts, retry.backoff
    );
    eprintln!(
        "  Platforms: {}",
        config
            .platforms()
            .iter()
            .map(|p| p.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    );
    eprintln!("  Places: {}", places.len());
    eprintln!("  Output: {}", args.output.as_deref().unwrap_or("stdout"));

    if args.dry_run {
        eprintln!("  🔍 DRY RUN MODE ENABLED");
    }

    eprintln!();
}

fn perform_dry_run(places: &[Place], max_places: usize) {
    eprintln!("🔍 Dry Run Analysis:");
    for place in places.iter().take(max_places) {
        eprintln!("  • {} ({})", place.name, place.city);
    }
    if places.len() > max_places {
        eprintln!("  … {} more skipped (batch.max_places = {})", places.len() - max_places, max_places);
    }
    eprintln!();
    eprintln!("✅ Dry run analysis complete.");
}

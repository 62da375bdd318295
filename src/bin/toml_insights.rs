use clap::Parser;
use pos_insights::core::ledger::{delimiter_for_path, read_ledger};
use pos_insights::core::ConfigProvider;
use pos_insights::utils::{logger, validation::Validate};
use pos_insights::{AuditPipeline, InsightEngine, InsightError, LocalStorage, Summarizer, TomlConfig};

#[derive(Parser)]
#[command(name = "toml-insights")]
#[command(about = "Sales audit driven by a TOML configuration file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "insights-config.toml")]
    config: String,

    /// Override source.ledger_path from the config
    #[arg(short, long)]
    ledger: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override monitoring setting from config
    #[arg(long)]
    monitor: Option<bool>,

    #[arg(long, help = "Emit logs as JSON lines")]
    log_json: bool,

    /// Parse and summarize the ledger without writing any output
    #[arg(long)]
    dry_run: bool,
}

fn report_failure(context: &str, e: &InsightError) -> ! {
    tracing::error!(
        "❌ {}: {} (Category: {:?}, Severity: {:?})",
        context,
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
    std::process::exit(e.severity().exit_code());
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    let verbose = args.verbose || config.log_level() == Some("debug");
    logger::init_logger(verbose, args.log_json);

    tracing::info!("🚀 Starting TOML-based sales audit");
    tracing::info!("📁 Loaded configuration from: {}", args.config);

    if let Some(ledger) = &args.ledger {
        config.set_ledger_path(ledger.clone());
        tracing::info!("🔧 Ledger path overridden to: {}", ledger);
    }

    if let Err(e) = config.validate() {
        report_failure("Configuration validation failed", &e);
    }

    tracing::info!("✅ Configuration loaded and validated successfully");
    display_config_summary(&config, &args);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No output will be written");
        if let Err(e) = perform_dry_run(&config).await {
            report_failure("Dry run failed", &e);
        }
        return Ok(());
    }

    let monitor_enabled = args.monitor.unwrap_or_else(|| config.monitoring_enabled());
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let pipeline = AuditPipeline::new(LocalStorage::default(), config);
    let engine = InsightEngine::new_with_monitoring(pipeline, monitor_enabled);

    match engine.run().await {
        Ok(summary) => {
            tracing::info!("✅ Sales audit completed successfully!");
            println!("✅ Sales audit completed successfully!");
            println!("📁 Output saved to: {}", summary.output_path);
        }
        Err(e) => report_failure("Sales audit failed", &e),
    }

    Ok(())
}

fn display_config_summary(config: &TomlConfig, args: &Args) {
    let formats: Vec<&str> = config
        .output_formats()
        .iter()
        .map(|f| f.file_name())
        .collect();

    println!("📋 Configuration Summary:");
    println!(
        "  Pipeline: {} v{}",
        config.pipeline.name, config.pipeline.version
    );
    println!("  Ledger: {}", config.ledger_path());
    println!("  Output: {}", config.output_path());
    println!("  Files: {}", formats.join(", "));
    match config.bundle_name() {
        Some(bundle) => println!("  Bundle: {}", bundle),
        None => println!("  Bundle: disabled"),
    }
    if !config.profile.name.is_empty() {
        println!("  Restaurant: {}", config.profile.name);
    }

    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}

async fn perform_dry_run(config: &TomlConfig) -> pos_insights::Result<()> {
    let path = config.ledger_path();
    let data = tokio::fs::read(path).await?;
    let delimiter = config.delimiter().unwrap_or_else(|| delimiter_for_path(path));
    let ledger = read_ledger(&data, delimiter)?;

    println!("🔍 Dry Run Analysis:");
    println!("  Rows: {}", ledger.len());
    println!("  Columns: {}", ledger.headers().join(", "));

    let columns = config.columns();
    println!();
    println!("🔄 Column Mapping:");
    println!("  item_name     -> {}", columns.item_name);
    println!("  quantity_sold -> {}", columns.quantity_sold);
    println!(
        "  time_slot     -> {}",
        columns.time_slot.as_deref().unwrap_or("-")
    );
    println!(
        "  timestamp     -> {}",
        columns.timestamp.as_deref().unwrap_or("-")
    );

    let digest = Summarizer::new(columns).summarize(&ledger)?;
    println!();
    println!("📊 Digest preview:");
    println!("{}", pos_insights::core::prompt::digest_context(&digest));

    println!();
    println!("✅ Dry run analysis complete.");
    Ok(())
}

use clap::Parser;
use pos_insights::utils::{logger, validation::Validate};
use pos_insights::{AuditPipeline, CliConfig, InsightEngine, InsightError, LocalStorage};

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
    let mut config = CliConfig::parse();

    logger::init_logger(config.verbose, config.log_json);

    tracing::info!("Starting pos-insights CLI");
    tracing::debug!("CLI config: {:?}", config);

    if let Err(e) = config.validate() {
        report_failure("Configuration validation failed", &e);
    }
    if let Err(e) = config.load_profile() {
        report_failure("Could not load restaurant profile", &e);
    }

    let monitor_enabled = config.monitor;
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }
    let print_digest = config.print_digest;

    let storage = LocalStorage::default();
    let pipeline = AuditPipeline::new(storage, config);
    let engine = InsightEngine::new_with_monitoring(pipeline, monitor_enabled);

    match engine.run().await {
        Ok(summary) => {
            tracing::info!("✅ Sales audit completed successfully!");
            println!("✅ Sales audit completed successfully!");
            println!("📁 Output saved to: {}", summary.output_path);

            if print_digest {
                println!("{}", serde_json::to_string_pretty(&summary.digest)?);
            }
        }
        Err(e) => report_failure("Sales audit failed", &e),
    }

    Ok(())
}

use clap::Parser;
use contribution_time::utils::error::ErrorSeverity;
use contribution_time::utils::logger::{self, LogFormat};
use contribution_time::utils::validation::Validate;
use contribution_time::{CalculationEngine, CalculationPipeline, CliConfig, LocalStorage};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::parse();

    // 初始化日誌
    let log_format = if config.json_logs {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };
    logger::init_logger(config.verbose, log_format);

    tracing::info!("Starting contribution-time CLI");
    tracing::debug!("CLI config: {:?}", config);

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let pipeline = CalculationPipeline::new(LocalStorage::default(), config);
    let engine = CalculationEngine::new(pipeline);

    match engine.run().await {
        Ok(summary) => {
            println!("✅ Tempo de contribuição: {}", summary.total);
            println!("   {} dias não concomitantes", summary.non_overlapping_days);
            if summary.overlap_count > 0 {
                println!("⚠️ {} pares de períodos concomitantes", summary.overlap_count);
            }
            if summary.skipped_periods > 0 {
                println!("⚠️ {} períodos com data ilegível foram ignorados", summary.skipped_periods);
            }
            println!("📁 Output saved to: {}", summary.output_path);
        }
        Err(e) => {
            tracing::error!(
                "❌ Calculation failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };

            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

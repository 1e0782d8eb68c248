use clap::Parser;
use contribution_time::core::ConfigProvider;
use contribution_time::utils::error::ErrorSeverity;
use contribution_time::utils::{logger, validation::Validate};
use contribution_time::{
    CalculationEngine, CalculationPipeline, LocalStorage, OverlapStrategy, ParseMode, TomlConfig,
};

#[derive(Parser)]
#[command(name = "toml-calc")]
#[command(about = "Contribution time calculation driven by a TOML configuration file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "contribution-time.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override the input file from config
    #[arg(long)]
    input: Option<String>,

    /// Override strict mode from config
    #[arg(long)]
    strict: Option<bool>,

    /// Override the overlap strategy from config (pairwise or union)
    #[arg(long)]
    overlap_strategy: Option<String>,

    /// Dry run - show what would be processed without executing
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // 載入 TOML 配置
    let mut config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    // 初始化日誌
    logger::init_logger(args.verbose || config.verbose(), config.log_format());

    tracing::info!("🚀 Starting TOML-based contribution time calculation");
    tracing::info!("📁 Loaded configuration from: {}", args.config);

    // 應用命令列覆蓋設定
    if let Some(input) = args.input.clone() {
        tracing::info!("🔧 Input overridden to: {}", input);
        config.input.path = input;
    }
    if let Some(strict) = args.strict {
        config.calculation.mode = if strict {
            ParseMode::Strict
        } else {
            ParseMode::Lenient
        };
        tracing::info!("🔧 Parse mode overridden to: {:?}", config.calculation.mode);
    }
    if let Some(strategy) = args.overlap_strategy.as_deref() {
        config.calculation.overlap_strategy = match strategy {
            "pairwise" => OverlapStrategy::Pairwise,
            "union" => OverlapStrategy::Union,
            other => {
                eprintln!("❌ Unknown overlap strategy '{}' (expected pairwise or union)", other);
                std::process::exit(1);
            }
        };
        tracing::info!("🔧 Overlap strategy overridden to: {:?}", config.calculation.overlap_strategy);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    tracing::info!("✅ Configuration loaded and validated successfully");

    display_config_summary(&config, &args);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No files will be read or written");
        return Ok(());
    }

    let pipeline = CalculationPipeline::new(LocalStorage::default(), config);
    let engine = CalculationEngine::new(pipeline);

    match engine.run().await {
        Ok(summary) => {
            tracing::info!("✅ Calculation completed successfully!");
            println!("✅ Tempo de contribuição: {}", summary.total);
            println!("   {} dias não concomitantes", summary.non_overlapping_days);
            println!("📁 Output saved to: {}", summary.output_path);
        }
        Err(e) => {
            tracing::error!(
                "❌ Calculation failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
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

fn display_config_summary(config: &TomlConfig, args: &Args) {
    let options = config.calculator_options();

    println!("📋 Configuration Summary:");
    println!("  Calculation: {}", config.name());
    println!("  Input: {}", config.input_path());
    println!("  Output: {}", config.output_path());
    println!("  Formats: {}", config.output_formats().join(", "));
    println!("  Parse mode: {:?}", options.mode);
    println!("  Overlap strategy: {:?}", options.overlap_strategy);
    if options.mode == ParseMode::Strict {
        println!("  Max year: {}", options.max_year);
    }

    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}

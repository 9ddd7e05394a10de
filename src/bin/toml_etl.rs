use clap::Parser;
use padron_etl::config::toml_config::TomlConfig;
use padron_etl::core::report::render_summary;
use padron_etl::core::ConfigProvider;
use padron_etl::utils::error::ErrorSeverity;
use padron_etl::utils::{logger, validation::Validate};
use padron_etl::{CsvPipeline, EtlEngine, LocalStorage};

#[derive(Parser)]
#[command(name = "toml-etl")]
#[command(about = "Run the user-export validation from a TOML configuration file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "padron.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override monitoring setting from config
    #[arg(long)]
    monitor: Option<bool>,

    /// Override the input file from config
    #[arg(long)]
    input: Option<String>,

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
    if config.json_logs() {
        logger::init_json_logger(args.verbose);
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("🚀 Starting TOML-based validation job '{}'", config.job.name);
    tracing::info!("📁 Loaded configuration from: {}", args.config);

    // 應用命令列覆蓋設定
    if let Some(input) = args.input {
        tracing::info!("🔧 Input overridden to: {}", input);
        config.input.path = input;
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    display_config_summary(&config);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No actual processing will occur");
        return Ok(());
    }

    let monitor_enabled = args.monitor.unwrap_or_else(|| config.monitoring_enabled());
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let storage = LocalStorage::new(config.output_path().to_string());
    let pipeline = CsvPipeline::new(storage, config);
    let engine = EtlEngine::new_with_monitoring(pipeline, monitor_enabled);

    match engine.run().await {
        Ok(summary) => {
            tracing::info!("✅ Validation job completed successfully!");
            println!("✅ Validation job completed successfully!");
            print!("{}", render_summary(&summary));
        }
        Err(e) => {
            tracing::error!(
                "❌ Validation job failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());

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

fn display_config_summary(config: &TomlConfig) {
    tracing::info!("📋 Job: {}", config.job.name);
    if let Some(description) = &config.job.description {
        tracing::info!("   {}", description);
    }
    tracing::info!("📥 Input: {}", config.input_path());
    tracing::info!("📤 Output: {}", config.output_path());
    if let Some(run_id) = config.run_id() {
        tracing::info!("🏷️ Run id: {}", run_id);
    }
    if let Some(bundle) = config.bundle_filename() {
        tracing::info!("📦 Bundle: {}", bundle);
    }
}

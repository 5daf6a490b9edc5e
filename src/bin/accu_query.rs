use accu_lookup::server::handlers::MIN_QUERY_LENGTH;
use accu_lookup::utils::error::{ErrorSeverity, LookupError};
use accu_lookup::utils::validation::{validate_min_length, Validate};
use accu_lookup::utils::logger;
use accu_lookup::config::ServiceConfig;
use accu_lookup::{connect_store, ConfigArgs, LookupService, MatchResult};
use clap::Parser;

#[derive(Parser)]
#[command(name = "accu-query")]
#[command(about = "Run one reference lookup against the configured store")]
struct Args {
    /// Organ, pattern or symptom to look up
    query: String,

    #[command(flatten)]
    config: ConfigArgs,

    /// Only check whether anything matches (same as HEAD /search)
    #[arg(long)]
    exists: bool,
}

async fn run(args: &Args, config: ServiceConfig) -> Result<Option<MatchResult>, LookupError> {
    validate_min_length("query", &args.query, MIN_QUERY_LENGTH)?;
    config.validate()?;

    let store = connect_store(&config.store).await?;
    let service = LookupService::new(store);

    if args.exists {
        let availability = service.check_availability(&args.query).await?;
        println!("✅ {}", availability.detail);
        return Ok(None);
    }

    service.lookup(&args.query).await.map(Some)
}

// 根據錯誤嚴重程度決定退出碼
fn exit_code(error: &LookupError) -> i32 {
    match error.severity() {
        ErrorSeverity::Low => 4,      // 查無資料或輸入錯誤
        ErrorSeverity::Medium => 2,   // store 錯誤，可重試
        ErrorSeverity::High => 1,     // 配置錯誤
        ErrorSeverity::Critical => 3, // 系統錯誤
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // 日誌格式與等級來自配置，因此先載入配置
    let config = match args.config.load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load configuration: {}", e);
            eprintln!("💡 建議: {}", e.recovery_suggestion());
            std::process::exit(exit_code(&e));
        }
    };

    logger::init_logger(&config.logging, args.config.verbose);

    match run(&args, config).await {
        Ok(Some(result)) => {
            tracing::info!(
                "🔍 '{}' matched {} entries (exact: {})",
                args.query,
                result.len(),
                result.is_exact()
            );
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Ok(None) => {}
        Err(e) => {
            tracing::error!(
                "❌ Lookup failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 建議: {}", e.recovery_suggestion());
            std::process::exit(exit_code(&e));
        }
    }

    Ok(())
}

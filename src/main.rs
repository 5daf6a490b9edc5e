use accu_lookup::utils::error::ErrorSeverity;
use accu_lookup::utils::{logger, validation::Validate};
use accu_lookup::{connect_store, server, ConfigArgs, LookupService};
use clap::Parser;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "accu-lookup")]
#[command(about = "Acupuncture reference lookup service")]
struct Args {
    #[command(flatten)]
    config: ConfigArgs,

    /// Override the bind address (host:port)
    #[arg(long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match args.config.load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load configuration: {}", e);
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    if let Some(bind) = args.bind {
        config.server.bind_address = bind;
    }

    // 初始化日誌
    logger::init_logger(&config.logging, args.config.verbose);

    tracing::info!("Starting accu-lookup service");
    if args.config.verbose {
        tracing::debug!("Service config: {:?}", config);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    // 建立共用的 store 連線 (整個程序只建立一次)
    let store = match connect_store(&config.store).await {
        Ok(store) => store,
        Err(e) => {
            tracing::error!(
                "❌ Failed to initialize store: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 建議: {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::Critical => 3,
                _ => 1,
            };
            std::process::exit(exit_code);
        }
    };

    let service = Arc::new(LookupService::new(store));
    let app = server::router(service, config.response.exact_match_shape);

    server::serve(app, &config.server.bind_address).await?;

    Ok(())
}

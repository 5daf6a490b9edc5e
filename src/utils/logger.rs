use crate::config::{LogFormat, LoggingSettings};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// 依配置選擇日誌格式，`RUST_LOG` 優先於 `logging.level`
pub fn init_logger(settings: &LoggingSettings, verbose: bool) {
    match settings.format {
        LogFormat::Json => init_json_logger(&settings.level),
        LogFormat::Compact => init_cli_logger(&settings.level, verbose),
    }
}

pub fn init_cli_logger(level: &str, verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(compact_directive(level, verbose)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();
}

pub fn init_json_logger(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(json_directive(level)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .json(), // 託管平台用 JSON 格式方便收集日誌
        )
        .init();
}

// --verbose 強制 debug 並打開 HTTP trace
fn compact_directive(level: &str, verbose: bool) -> String {
    if verbose {
        "accu_lookup=debug,tower_http=debug,info".to_string()
    } else {
        format!("accu_lookup={}", level.to_ascii_lowercase())
    }
}

fn json_directive(level: &str) -> String {
    format!("accu_lookup={},tower_http=info", level.to_ascii_lowercase())
}

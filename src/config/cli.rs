use crate::config::ServiceConfig;
use crate::utils::error::Result;
use clap::Args;

/// Configuration flags shared by the server and the one-shot query tool.
#[derive(Debug, Clone, Default, Args)]
pub struct ConfigArgs {
    /// Path to TOML configuration file (environment variables are used when omitted)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Serve from a JSON export of the collection instead of the Data API
    #[arg(long)]
    pub fixture: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub json_logs: bool,
}

impl ConfigArgs {
    /// 決定配置來源並套用命令列覆蓋設定
    pub fn load_config(&self) -> Result<ServiceConfig> {
        let mut config = match &self.config {
            Some(path) => ServiceConfig::from_file(path)?,
            None => ServiceConfig::from_env()?,
        };

        if let Some(fixture) = &self.fixture {
            config.use_fixture(fixture.clone());
        }
        if self.json_logs {
            config.logging.format = crate::config::LogFormat::Json;
        }

        Ok(config)
    }
}

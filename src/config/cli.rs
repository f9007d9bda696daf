use crate::config::toml_config::AppConfig;
use crate::utils::error::Result;
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "reach-funnel")]
#[command(about = "HTTP service that turns a business description into leads and WhatsApp campaigns")]
pub struct CliArgs {
    /// Path to a TOML configuration file (environment variables are used when omitted)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Override the bind address, e.g. 127.0.0.1:8787
    #[arg(long)]
    pub bind: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,

    #[arg(long, help = "Validate the configuration and exit")]
    pub check_config: bool,
}

impl CliArgs {
    /// 載入設定檔（或環境變數），再套用命令列覆寫
    pub fn load_config(&self) -> Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => {
                tracing::info!("📁 Loading configuration from: {}", path);
                AppConfig::from_file(path)?
            }
            None => {
                tracing::info!("📁 No config file given, reading environment variables");
                AppConfig::from_env()
            }
        };

        if let Some(bind) = &self.bind {
            config.server.bind_addr = bind.clone();
        }

        Ok(config)
    }
}

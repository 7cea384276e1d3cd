pub mod toml_config;

pub use toml_config::FloodRiskConfig;

#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "flood-risk")]
#[command(about = "Estimate a flood risk score for a street address")]
pub struct CliConfig {
    /// Path to a TOML configuration file (built-in defaults when omitted)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory that relative dataset paths are resolved against
    #[arg(long, default_value = ".")]
    pub data_dir: PathBuf,

    /// Assess this address once instead of prompting for one
    #[arg(long)]
    pub address: Option<String>,

    /// Print the full assessment as JSON
    #[arg(long)]
    pub json: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,

    #[arg(long, help = "Log CPU and memory usage per phase")]
    pub monitor: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    pub fn load_config(&self) -> crate::Result<FloodRiskConfig> {
        match &self.config {
            Some(path) => {
                tracing::info!("📁 Loading configuration from: {}", path.display());
                FloodRiskConfig::from_file(path)
            }
            None => {
                tracing::info!("📁 No configuration file given, using built-in defaults");
                Ok(FloodRiskConfig::default())
            }
        }
    }
}

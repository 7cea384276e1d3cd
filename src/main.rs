use clap::Parser;
use flood_risk::utils::error::{ErrorSeverity, FloodRiskError};
use flood_risk::utils::logger;
use flood_risk::utils::validation::Validate;
use flood_risk::{
    CliConfig, FloodRiskContext, FloodRiskEngine, InteractiveSession, NominatimGeocoder,
};
use tokio::io::BufReader;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting flood-risk CLI");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    if let Err(e) = run(&cli).await {
        // 記錄詳細錯誤信息
        tracing::error!(
            "❌ Flood risk assessment failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

        // 根據錯誤嚴重程度決定退出碼
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

    Ok(())
}

async fn run(cli: &CliConfig) -> Result<(), FloodRiskError> {
    // 載入並驗證配置
    let config = cli.load_config()?;
    config.validate()?;

    if cli.monitor {
        tracing::info!("🔍 System monitoring enabled");
    }

    let context = FloodRiskContext::load(&config.data, &config.regions, &cli.data_dir)?;
    let geocoder = NominatimGeocoder::new(&config.geocoder)?;
    let engine =
        FloodRiskEngine::new_with_monitoring(geocoder, context, config.scoring_profile(), cli.monitor);

    let session = InteractiveSession::new(&engine, config.country_name.as_str(), cli.json);
    let mut stdout = std::io::stdout();

    match &cli.address {
        Some(address) => {
            session.assess_once(address, &mut stdout).await?;
        }
        None => {
            let stdin = BufReader::new(tokio::io::stdin());
            session.run(stdin, &mut stdout).await?;
        }
    }

    Ok(())
}

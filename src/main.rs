use clap::Parser;
use lambda_forwarder::utils::{error::ForwarderError, logger, validation::Validate};
use lambda_forwarder::{invoke_event, CliConfig, Forwarder, Registry};
use std::fs::File;
use std::io::BufReader;

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(cli.verbose);

    if let Err(e) = run(cli).await {
        tracing::error!("❌ {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }
}

async fn run(cli: CliConfig) -> Result<(), ForwarderError> {
    let registry = Registry::builtin();

    if cli.list {
        for name in registry.names() {
            println!("{}", name);
        }
        return Ok(());
    }

    let config = cli.forwarder_config()?;
    config.validate()?;
    tracing::debug!("CLI config: {:?}", config);

    let forwarder = Forwarder::new(registry, config.application);

    if cli.check {
        forwarder.ensure_loaded().await?;
        println!("✅ Application `{}` loaded", forwarder.application_name());
        return Ok(());
    }

    let Some(event_path) = cli.event else {
        return Err(ForwarderError::ConfigError {
            message: "--event is required".to_string(),
        });
    };

    let reader = BufReader::new(File::open(&event_path)?);
    let output = invoke_event(&forwarder, reader).await?;

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

use crate::config::ForwarderConfig;
use crate::utils::error::Result;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "lambda-forwarder")]
#[command(about = "Run a Lambda HTTP event through the request forwarder locally")]
pub struct CliConfig {
    #[arg(
        long,
        required_unless_present_any = ["list", "check"],
        help = "API Gateway / ALB event JSON file"
    )]
    pub event: Option<PathBuf>,

    #[arg(long, help = "TOML config file (defaults to the FORWARDER_* environment)")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Override the application name")]
    pub application: Option<String>,

    #[arg(long, help = "List registered applications and exit")]
    pub list: bool,

    #[arg(long, help = "Resolve the application and report whether it loads")]
    pub check: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    pub fn forwarder_config(&self) -> Result<ForwarderConfig> {
        let mut config = match &self.config {
            Some(path) => ForwarderConfig::from_file(path)?,
            None => ForwarderConfig::from_env()?,
        };

        if let Some(application) = &self.application {
            config.application = application.clone();
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_required_unless_listing() {
        assert!(CliConfig::try_parse_from(["lambda-forwarder"]).is_err());
        assert!(CliConfig::try_parse_from(["lambda-forwarder", "--list"]).is_ok());
        assert!(CliConfig::try_parse_from(["lambda-forwarder", "--check"]).is_ok());
    }

    #[test]
    fn test_application_flag_overrides_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("forwarder.toml");
        std::fs::write(&path, "[forwarder]\napplication = \"phonebook\"\n").unwrap();

        let cli = CliConfig::try_parse_from([
            "lambda-forwarder",
            "--check",
            "--config",
            path.to_str().unwrap(),
        ])
        .unwrap();
        assert_eq!(cli.forwarder_config().unwrap().application, "phonebook");

        let cli = CliConfig::try_parse_from([
            "lambda-forwarder",
            "--check",
            "--config",
            path.to_str().unwrap(),
            "--application",
            "echo",
        ])
        .unwrap();
        assert_eq!(cli.forwarder_config().unwrap().application, "echo");
    }
}

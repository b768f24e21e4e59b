use crate::config::SyncConfig;
use crate::domain::model::JobKind;
use crate::utils::error::Result;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "market-sync")]
#[command(about = "Mirrors Shopify orders, tracking and stock into BackMarket on a schedule")]
pub struct Cli {
    /// TOML config file; the environment is used when omitted
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Overrides the listener port
    #[arg(long)]
    pub port: Option<u16>,

    /// Run the given jobs once and exit (all four when no job is named)
    #[arg(long, value_enum, num_args = 0.., value_delimiter = ',')]
    pub once: Option<Vec<JobKind>>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,
}

impl Cli {
    pub fn load_config(&self) -> Result<SyncConfig> {
        let mut config = match &self.config {
            Some(path) => SyncConfig::from_file(path)?,
            None => SyncConfig::from_env()?,
        };
        if let Some(port) = self.port {
            config.server.port = port;
        }
        Ok(config)
    }

    /// Jobs selected with `--once`, or `None` to run the scheduler.
    pub fn once_jobs(&self) -> Option<Vec<JobKind>> {
        self.once.as_ref().map(|jobs| {
            if jobs.is_empty() {
                JobKind::ALL.to_vec()
            } else {
                jobs.clone()
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_daemon_mode_by_default() {
        let cli = Cli::try_parse_from(["market-sync"]).unwrap();
        assert!(cli.once_jobs().is_none());
        assert!(!cli.verbose);
    }

    #[test]
    fn test_once_without_jobs_means_all() {
        let cli = Cli::try_parse_from(["market-sync", "--once"]).unwrap();
        assert_eq!(cli.once_jobs(), Some(JobKind::ALL.to_vec()));
    }

    #[test]
    fn test_once_with_named_jobs() {
        let cli =
            Cli::try_parse_from(["market-sync", "--once", "sync-stock,cancel-orders"]).unwrap();
        assert_eq!(
            cli.once_jobs(),
            Some(vec![JobKind::SyncStock, JobKind::CancelOrders])
        );
    }

    #[test]
    fn test_port_override() {
        let cli = Cli::try_parse_from(["market-sync", "--port", "9000", "--json-logs"]).unwrap();
        assert_eq!(cli.port, Some(9000));
        assert!(cli.json_logs);
    }
}

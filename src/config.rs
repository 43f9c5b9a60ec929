//! Node configuration: the two CLI flags of spec §6 plus the broadcast
//! timeouts of spec §5. Difficulty-retargeting constants are *not* here
//! — they live as `pub const`s on [`crate::consensus::difficulty`]
//! because every node must retarget by the same fixed rule for hashes to
//! agree, not because an operator should be able to tune them.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

pub const TRANSACTION_BROADCAST_TIMEOUT: Duration = Duration::from_secs(1);
pub const BLOCK_BROADCAST_TIMEOUT: Duration = Duration::from_secs(2);
pub const CHAIN_PULL_TIMEOUT: Duration = Duration::from_secs(3);

#[derive(Debug, Parser)]
#[command(name = "flatchain", about = "A peer-to-peer replicated ledger node")]
pub struct Cli {
    /// Port to bind the HTTP server on.
    #[arg(long, default_value_t = 5000)]
    pub port: u16,

    /// Optional node identifier, used only to disambiguate wallet key files
    /// when running several nodes against the same data directory.
    #[arg(long)]
    pub id: Option<String>,

    /// Directory for the demonstration keystore. Defaults to a
    /// platform-appropriate data directory.
    #[arg(long)]
    pub data_dir: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct NodeConfig {
    pub port: u16,
    pub node_id: Option<String>,
    pub data_dir: PathBuf,
}

impl NodeConfig {
    pub fn from_cli(cli: Cli) -> Self {
        let data_dir = cli.data_dir.unwrap_or_else(default_data_dir);
        NodeConfig { port: cli.port, node_id: cli.id, data_dir }
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("flatchain")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_defaults_produce_a_sensible_config() {
        let cli = Cli { port: 5000, id: None, data_dir: Some(PathBuf::from("/tmp/flatchain-test")) };
        let config = NodeConfig::from_cli(cli);
        assert_eq!(config.port, 5000);
        assert_eq!(config.data_dir, PathBuf::from("/tmp/flatchain-test"));
    }
}

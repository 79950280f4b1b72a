use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use solana_sdk::commitment_config::CommitmentLevel;

/// The top-level configuration for the `metagraph-solana-ingester` library.
///
/// Aggregates the Solana network endpoints and the backlog-pipeline tuning.
/// It is typically deserialized from a configuration file and passed to the
/// [`Loader`](crate::loader::Loader) at construction.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct IngesterConfig {
    #[serde(default)]
    pub solana: SolanaConfig,
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

/// Connection settings for the Solana cluster.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SolanaConfig {
    pub rpc_url: String,
    pub ws_url: String,
    #[serde(with = "serde_commitment")]
    pub commitment: CommitmentLevel,
}

/// Tuning for the backlog pass of each watched program.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PipelineConfig {
    /// Maximum number of accounts decoded and persisted in parallel.
    pub jobs: usize,
    /// Number of completed accounts between writer flushes.
    pub batch_size: usize,
}

impl IngesterConfig {
    /// Loads the configuration from a TOML file, overlaid with
    /// `METAGRAPH`-prefixed environment variables.
    pub fn load(path: &str) -> Result<Self> {
        let builder = config::Config::builder()
            .add_source(config::File::with_name(path))
            .add_source(config::Environment::with_prefix("METAGRAPH").separator("__"));

        builder
            .build()
            .context(format!("Failed to build configuration from '{}'", path))?
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }
}

impl Default for SolanaConfig {
    fn default() -> Self {
        Self {
            rpc_url: "http://127.0.0.1:8899".to_string(),
            ws_url: "ws://127.0.0.1:8900".to_string(),
            commitment: CommitmentLevel::Confirmed,
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            jobs: 2,
            batch_size: 1000,
        }
    }
}

mod serde_commitment {
    use super::*;
    use serde::{Deserializer, Serializer};

    pub fn serialize<S>(c: &CommitmentLevel, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let s = match c {
            CommitmentLevel::Processed => "Processed",
            CommitmentLevel::Confirmed => "Confirmed",
            CommitmentLevel::Finalized => "Finalized",
        };
        serializer.serialize_str(s)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<CommitmentLevel, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s: String = Deserialize::deserialize(deserializer)?;
        let level = match s.to_lowercase().as_str() {
            "processed" => CommitmentLevel::Processed,
            "confirmed" => CommitmentLevel::Confirmed,
            "finalized" => CommitmentLevel::Finalized,
            _ => CommitmentLevel::Confirmed,
        };
        Ok(level)
    }
}

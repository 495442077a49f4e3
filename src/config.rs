use crate::consensus::ValidationMode;
use crate::core::ledger::{DEFAULT_DIFFICULTY, DEFAULT_MINING_REWARD};
use crate::mining::Miner;
use crate::{LedgerError, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub ledger: LedgerConfig,
    pub mining: MiningConfig,
    pub simulation: SimulationConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    pub difficulty: u32,
    pub mining_reward: f64,
    pub mode: ValidationMode,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MiningConfig {
    /// Nonce search workers per block; 0 uses every logical CPU.
    pub threads: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub node_ids: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ledger: LedgerConfig::default(),
            mining: MiningConfig::default(),
            simulation: SimulationConfig::default(),
        }
    }
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            difficulty: DEFAULT_DIFFICULTY,
            mining_reward: DEFAULT_MINING_REWARD,
            mode: ValidationMode::Replicated,
        }
    }
}

impl Default for MiningConfig {
    fn default() -> Self {
        Self { threads: 1 }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            node_ids: vec![
                "Node-A".to_string(),
                "Node-B".to_string(),
                "Node-C".to_string(),
            ],
        }
    }
}

impl MiningConfig {
    pub fn miner(&self) -> Miner {
        Miner::new(self.threads)
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads `path` (or the default location) when it exists, defaults otherwise.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        let path = path.map(Path::to_path_buf).unwrap_or_else(Self::default_path);

        if path.exists() {
            Self::load(&path)
        } else {
            log::debug!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.simulation.node_ids.len() < 2 {
            return Err(LedgerError::InvalidInput(
                "simulation.node_ids must name at least two nodes".to_string(),
            ));
        }

        let mut seen = std::collections::HashSet::new();
        for id in &self.simulation.node_ids {
            if !seen.insert(id) {
                return Err(LedgerError::InvalidInput(format!(
                    "duplicate node id in simulation.node_ids: {}",
                    id
                )));
            }
        }

        Ok(())
    }

    pub fn default_path() -> PathBuf {
        let home_dir = env::var("HOME").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home_dir).join(".powledger").join("config.json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_match_ledger_defaults() {
        let config = Config::default();

        assert_eq!(config.ledger.difficulty, 4);
        assert_eq!(config.ledger.mining_reward, 50.0);
        assert_eq!(config.ledger.mode, ValidationMode::Replicated);
        assert_eq!(config.mining.miner().threads(), 1);
        assert_eq!(config.simulation.node_ids.len(), 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("config.json");

        let mut config = Config::default();
        config.ledger.difficulty = 2;
        config.mining.threads = 3;
        config.save(&path).unwrap();

        assert_eq!(Config::load(&path).unwrap(), config);
        assert_eq!(Config::load_or_default(Some(&path)).unwrap(), config);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("absent.json");

        assert_eq!(Config::load_or_default(Some(&path)).unwrap(), Config::default());
        assert!(matches!(Config::load(&path), Err(LedgerError::Io(_))));
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        std::fs::write(&path, r#"{ "ledger": { "difficulty": 1, "mode": "Authority" } }"#).unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.ledger.difficulty, 1);
        assert_eq!(config.ledger.mode, ValidationMode::Authority);
        assert_eq!(config.ledger.mining_reward, 50.0);
        assert_eq!(config.simulation, SimulationConfig::default());
    }

    #[test]
    fn test_rejects_duplicate_nodes() {
        let mut config = Config::default();
        config.simulation.node_ids = vec!["Node-A".to_string(), "Node-A".to_string()];
        assert!(matches!(config.validate(), Err(LedgerError::InvalidInput(_))));

        config.simulation.node_ids.truncate(1);
        assert!(matches!(config.validate(), Err(LedgerError::InvalidInput(_))));
    }

    #[test]
    fn test_malformed_file_is_a_serialization_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert!(matches!(Config::load(&path), Err(LedgerError::Serialization(_))));
    }
}

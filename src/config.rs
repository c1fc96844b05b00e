//! Tool configuration: `~/.singularis/config.toml` unless overridden.
//!
//! ```toml
//! [ai]
//! provider = "openai"
//! model = "gpt-4o"
//!
//! [simulation]
//! shots = 1024
//! seed = 7
//! max_qubits = 12
//! max_sites = 400
//!
//! [compiler]
//! header = true
//! ```

use std::path::{Path, PathBuf};

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::core::error::{Result, SingularisError};
use crate::core::quantum::circuit::DEFAULT_MAX_QUBITS;

pub const CONFIG_DIR_ENV: &str = "SINGULARIS_CONFIG_DIR";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    pub provider: Option<String>,
    pub model: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub shots: usize,
    pub seed: Option<u64>,
    pub max_qubits: usize,
    pub max_sites: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self { shots: 1024, seed: None, max_qubits: DEFAULT_MAX_QUBITS, max_sites: 400 }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    pub header: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SingularisConfig {
    pub ai: AiConfig,
    pub simulation: SimulationConfig,
    pub compiler: CompilerConfig,
}

impl SingularisConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| SingularisError::Config(e.to_string()))
    }

    /// A missing file yields defaults; an unreadable or malformed one is an error.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            crate::debug_log!("config: {} not found, using defaults", path.display());
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)
            .map_err(|e| SingularisError::Config(format!("reading {}: {}", path.display(), e)))?;
        toml::from_str(&text).map_err(|e| SingularisError::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn load_resolved(cli_path: &Option<PathBuf>) -> Result<Self> {
        match resolve_config_path(cli_path) {
            Some(p) => Self::load(&p),
            None => Ok(Self::default()),
        }
    }

    /// Seeded when a seed is given (argument first, then config), otherwise
    /// seeded from the thread rng.
    pub fn rng(&self, seed_override: Option<u64>) -> StdRng {
        match seed_override.or(self.simulation.seed) {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::seed_from_u64(rand::thread_rng().next_u64()),
        }
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV) {
        return Some(PathBuf::from(dir).join("config.toml"));
    }
    dirs_next::home_dir().map(|h| h.join(".singularis").join("config.toml"))
}

pub fn resolve_config_path(cli_path: &Option<PathBuf>) -> Option<PathBuf> {
    if let Some(p) = cli_path {
        return Some(p.clone());
    }
    default_config_path()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn partial_file_keeps_defaults() {
        let cfg = SingularisConfig::from_toml_str("[simulation]\nshots = 10\n").unwrap();
        assert_eq!(cfg.simulation.shots, 10);
        assert_eq!(cfg.simulation.max_qubits, DEFAULT_MAX_QUBITS);
        assert_eq!(cfg.simulation.max_sites, 400);
        assert!(cfg.ai.provider.is_none());
        assert!(!cfg.compiler.header);
    }

    #[test]
    fn malformed_file_is_config_error() {
        let err = SingularisConfig::from_toml_str("[simulation\nshots=").unwrap_err();
        assert!(matches!(err, SingularisError::Config(_)));
    }

    #[test]
    fn missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = SingularisConfig::load(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(cfg, SingularisConfig::default());
    }

    #[test]
    fn seeded_rng_is_reproducible() {
        let cfg = SingularisConfig::from_toml_str("[simulation]\nseed = 3\n").unwrap();
        let a: u64 = cfg.rng(None).gen();
        let b: u64 = cfg.rng(None).gen();
        assert_eq!(a, b);
        let c: u64 = cfg.rng(Some(4)).gen();
        assert_ne!(a, c);
    }
}

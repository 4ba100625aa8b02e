/// Run configuration.
///
/// Defaults suit interactive use. A JSON file can override any subset of
/// fields; CLI flags override the file.
use crate::error::{QuantumError, QuantumResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default cutoff below which basis states are left out of reports.
pub const DEFAULT_REPORTING_THRESHOLD: f64 = 1e-3;

/// Default register-size ceiling enforced at the CLI boundary.
pub const DEFAULT_MAX_QUBITS: usize = 20;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    /// States with probability strictly below this are omitted from reports.
    pub reporting_threshold: f64,
    /// Fixed RNG seed for reproducible measurement. `None` seeds from entropy.
    pub seed: Option<u64>,
    pub max_qubits: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            reporting_threshold: DEFAULT_REPORTING_THRESHOLD,
            seed: None,
            max_qubits: DEFAULT_MAX_QUBITS,
        }
    }
}

impl RunConfig {
    pub fn from_json_str(json: &str) -> QuantumResult<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| QuantumError::Config(format!("invalid config JSON: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> QuantumResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| QuantumError::Config(format!("cannot read '{}': {e}", path.display())))?;
        Self::from_json_str(&json)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.reporting_threshold = threshold;
        self
    }

    pub fn validate(&self) -> QuantumResult<()> {
        if !self.reporting_threshold.is_finite() || self.reporting_threshold < 0.0 {
            return Err(QuantumError::Config(format!(
                "reporting_threshold must be a finite non-negative number, got {}",
                self.reporting_threshold
            )));
        }
        if self.max_qubits == 0 {
            return Err(QuantumError::Config("max_qubits must be at least 1".into()));
        }
        Ok(())
    }

    /// Reject registers wider than `max_qubits`.
    pub fn check_qubits(&self, num_qubits: usize) -> QuantumResult<()> {
        if num_qubits > self.max_qubits {
            return Err(QuantumError::Config(format!(
                "{num_qubits} qubits exceeds the configured limit of {}",
                self.max_qubits
            )));
        }
        Ok(())
    }
}

/// Error types shared by every stage of the engine.
///
/// Parse failures, gate-lookup failures and numerical failures all surface
/// through `QuantumError` so a caller can abort a run with a single `?`.
use thiserror::Error;

/// Result alias used throughout the crate.
pub type QuantumResult<T> = Result<T, QuantumError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum QuantumError {
    /// Gate name not present in the gate library.
    #[error("unsupported gate '{0}'")]
    UnsupportedGate(String),

    /// Operand combination the engine cannot apply (control == target,
    /// qubit index out of range, arity mismatch).
    #[error("invalid operands: {0}")]
    InvalidOperands(String),

    /// Basis-state index outside `0..2^n`.
    #[error("basis index {index} out of range for state of dimension {dim}")]
    IndexOutOfRange { index: usize, dim: usize },

    /// Complex division by a divisor with zero squared magnitude.
    #[error("complex division by zero")]
    DivisionByZero,

    /// Renormalisation against a branch with no probability mass.
    #[error("degenerate state: {0}")]
    DegenerateState(String),

    /// The `N:initialStates:operations` string could not be parsed.
    #[error("malformed circuit description at byte {position}: {msg}")]
    MalformedCircuitDescription { position: usize, msg: String },

    /// Invalid run configuration.
    #[error("configuration error: {0}")]
    Config(String),
}

impl QuantumError {
    pub fn invalid_operands(msg: impl Into<String>) -> Self {
        Self::InvalidOperands(msg.into())
    }

    pub fn malformed(position: usize, msg: impl Into<String>) -> Self {
        Self::MalformedCircuitDescription { position, msg: msg.into() }
    }
}

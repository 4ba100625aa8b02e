/// Circuit representation.
///
/// A circuit is a flat, ordered sequence of `CircuitOperation`s. Gate names
/// stay as strings here; they are resolved against the gate library only
/// when the circuit runs, so an unknown name surfaces as `UnsupportedGate`
/// from the runner rather than as a parse failure.
///
/// `Display` produces the op token of the circuit description format
/// (`H0`, `X1_0`), so operations round-trip through `description`.
pub mod description;

pub use description::CircuitDescription;

use serde::{Deserialize, Serialize};
use std::fmt;

/// An ordered list of operations.
pub type Circuit = Vec<CircuitOperation>;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CircuitOperation {
    /// One gate on one qubit, e.g. `H0`.
    Single { gate: String, qubit: usize },
    /// A gate on `target` conditioned on `control`, e.g. `X1_0` (CNOT 0 → 1).
    Controlled {
        gate: String,
        control: usize,
        target: usize,
    },
}

impl CircuitOperation {
    pub fn single(gate: impl Into<String>, qubit: usize) -> Self {
        Self::Single { gate: gate.into(), qubit }
    }

    pub fn controlled(gate: impl Into<String>, control: usize, target: usize) -> Self {
        Self::Controlled {
            gate: gate.into(),
            control,
            target,
        }
    }

    pub fn gate_name(&self) -> &str {
        match self {
            Self::Single { gate, .. } | Self::Controlled { gate, .. } => gate,
        }
    }

    /// Qubit indices referenced by this operation, control first.
    pub fn qubits(&self) -> Vec<usize> {
        match self {
            Self::Single { qubit, .. } => vec![*qubit],
            Self::Controlled { control, target, .. } => vec![*control, *target],
        }
    }

    pub fn is_controlled(&self) -> bool {
        matches!(self, Self::Controlled { .. })
    }
}

impl fmt::Display for CircuitOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single { gate, qubit } => write!(f, "{gate}{qubit}"),
            Self::Controlled { gate, control, target } => write!(f, "{gate}{target}_{control}"),
        }
    }
}

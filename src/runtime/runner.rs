/// Circuit runner.
///
/// Builds a fresh `CompositeState` from the initial basis bits, applies each
/// operation in the order given and returns the resulting probability
/// distribution. Any failing operation aborts the run; the partially evolved
/// state is dropped with it.
///
/// Gate names are resolved here, not at parse time:
///   - `Single`     → must name a one-qubit gate
///   - `Controlled` → one-qubit gates become diag(I, U); two-qubit gates
///                    are applied over (control, target) as-is
use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::circuit::{CircuitDescription, CircuitOperation};
use crate::config::RunConfig;
use crate::core::{CompositeState, Gate, GateMatrix, Qubit};
use crate::error::{QuantumError, QuantumResult};

// ── Result types ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunResult {
    pub num_qubits: usize,
    /// Dense distribution indexed by basis-state integer.
    pub probabilities: Vec<f64>,
    /// Operations applied.
    pub gate_count: usize,
    /// Threshold used by `report`.
    pub reporting_threshold: f64,
}

impl RunResult {
    /// Basis states with probability at or above `threshold`, keyed by
    /// their zero-padded binary label (qubit 0 rightmost).
    pub fn significant_states(&self, threshold: f64) -> BTreeMap<String, f64> {
        let n = self.num_qubits;
        self.probabilities
            .iter()
            .enumerate()
            .filter(|(_, &p)| p >= threshold)
            .map(|(i, &p)| (format!("{i:0>n$b}"), p))
            .collect()
    }

    /// `significant_states` at the configured reporting threshold.
    pub fn report(&self) -> BTreeMap<String, f64> {
        self.significant_states(self.reporting_threshold)
    }

    pub fn total_probability(&self) -> f64 {
        self.probabilities.iter().sum()
    }

    /// Index of the most likely basis state; the lowest index wins ties.
    pub fn most_likely(&self) -> usize {
        self.probabilities
            .iter()
            .enumerate()
            .fold((0, f64::NEG_INFINITY), |best, (i, &p)| if p > best.1 { (i, p) } else { best })
            .0
    }
}

// ── Execution ─────────────────────────────────────────────────────────────

pub struct CircuitRunner {
    config: RunConfig,
    rng: StdRng,
}

impl CircuitRunner {
    pub fn new(config: RunConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { config, rng }
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Run `ops` on `num_qubits` qubits starting from |0...0⟩.
    pub fn run(&self, num_qubits: usize, ops: &[CircuitOperation]) -> QuantumResult<RunResult> {
        self.run_with_initial_states(&vec![0; num_qubits], ops)
    }

    /// Run `ops` with qubit k prepared in basis state `initial_states[k]`.
    pub fn run_with_initial_states(
        &self,
        initial_states: &[u8],
        ops: &[CircuitOperation],
    ) -> QuantumResult<RunResult> {
        let state = evolve(initial_states, ops).inspect_err(|e| {
            warn!(error = %e, num_qubits = initial_states.len(), "circuit run failed");
        })?;

        info!(
            num_qubits = state.num_qubits(),
            gate_count = ops.len(),
            "circuit run complete"
        );

        Ok(RunResult {
            num_qubits: state.num_qubits(),
            probabilities: state.probabilities(),
            gate_count: ops.len(),
            reporting_threshold: self.config.reporting_threshold,
        })
    }

    pub fn run_description(&self, description: &CircuitDescription) -> QuantumResult<RunResult> {
        self.run_with_initial_states(&description.initial_states, &description.to_circuit())
    }

    /// Evolve the circuit once, then measure `shots` independent copies of
    /// the final state. Returns outcome counts keyed by basis label.
    pub fn sample(
        &mut self,
        description: &CircuitDescription,
        shots: usize,
    ) -> QuantumResult<BTreeMap<String, usize>> {
        let state = evolve(&description.initial_states, &description.to_circuit())
            .inspect_err(|e| warn!(error = %e, "sampling run failed"))?;

        let mut counts = BTreeMap::new();
        for _ in 0..shots {
            let mut shot = state.clone();
            let index = shot.measure(&mut self.rng);
            *counts.entry(state.basis_label(index)).or_insert(0) += 1;
        }
        info!(shots, distinct = counts.len(), "sampling complete");
        Ok(counts)
    }
}

impl Default for CircuitRunner {
    fn default() -> Self {
        Self::new(RunConfig::default())
    }
}

fn evolve(initial_states: &[u8], ops: &[CircuitOperation]) -> QuantumResult<CompositeState> {
    let qubits = initial_states
        .iter()
        .map(|&bit| Qubit::from_bit(bit))
        .collect::<QuantumResult<Vec<_>>>()?;
    let mut state = CompositeState::from_qubits(&qubits)?;

    for (step, op) in ops.iter().enumerate() {
        debug!(step, op = %op, controlled = op.is_controlled(), "applying operation");
        apply_operation(&mut state, op)?;
    }
    Ok(state)
}

/// Resolve `op` against the gate library and apply it to `state`.
pub fn apply_operation(state: &mut CompositeState, op: &CircuitOperation) -> QuantumResult<()> {
    match op {
        CircuitOperation::Single { gate, qubit } => {
            let resolved = Gate::lookup(gate)?;
            match resolved.matrix() {
                GateMatrix::Single(m) => state.apply_single_qubit_gate(m, *qubit),
                GateMatrix::Two(_) => Err(QuantumError::invalid_operands(format!(
                    "{resolved} acts on {} qubits but '{op}' names only one",
                    resolved.arity()
                ))),
            }
        }
        CircuitOperation::Controlled { gate, control, target } => {
            let resolved = Gate::lookup(gate)?;
            state.apply_controlled_gate(&resolved.controlled_matrix(), *control, *target)
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────

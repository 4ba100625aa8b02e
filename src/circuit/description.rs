/// Circuit description format: the string form exchanged with editors and
/// transport layers.
///
/// Grammar:
///   description := INT ':' states ':' steps
///   states      := BIT ('-' BIT)*
///   steps       := ε | step ('-' step)* '-'*
///   step        := '[' (op ('-' op)*)? ']'
///   op          := GATE INT              single-qubit,  e.g. `H0`
///                | GATE INT '_' INT      target_control, e.g. `X1_0`
///   GATE        := [A-Za-z]+
///
/// Validation:
///   - N ≥ 1 and exactly N initial states, each `0` or `1`
///   - every qubit index in [0, N)
///   - integers carry no leading zeros, so encoding reproduces the input
///
/// Trailing `-` after the last step is stripped. Gate names are kept as
/// written and only resolved when the circuit runs.
use super::{Circuit, CircuitOperation};
use crate::error::{QuantumError, QuantumResult};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CircuitDescription {
    pub num_qubits: usize,
    /// One basis bit per qubit, qubit 0 first.
    pub initial_states: Vec<u8>,
    /// Operations grouped by grid column, in execution order.
    pub steps: Vec<Vec<CircuitOperation>>,
}

impl CircuitDescription {
    /// `num_qubits` qubits in |0⟩, no operations.
    pub fn new(num_qubits: usize) -> Self {
        Self {
            num_qubits,
            initial_states: vec![0; num_qubits],
            steps: Vec::new(),
        }
    }

    pub fn push_step(&mut self, ops: Vec<CircuitOperation>) -> &mut Self {
        self.steps.push(ops);
        self
    }

    /// All operations in execution order, step by step.
    pub fn operations(&self) -> impl Iterator<Item = &CircuitOperation> {
        self.steps.iter().flatten()
    }

    pub fn to_circuit(&self) -> Circuit {
        self.operations().cloned().collect()
    }

    pub fn gate_count(&self) -> usize {
        self.steps.iter().map(Vec::len).sum()
    }
}

impl FromStr for CircuitDescription {
    type Err = QuantumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}

impl fmt::Display for CircuitDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.num_qubits)?;
        for (i, bit) in self.initial_states.iter().enumerate() {
            if i > 0 {
                f.write_str("-")?;
            }
            write!(f, "{bit}")?;
        }
        f.write_str(":")?;
        for (i, step) in self.steps.iter().enumerate() {
            if i > 0 {
                f.write_str("-")?;
            }
            f.write_str("[")?;
            for (j, op) in step.iter().enumerate() {
                if j > 0 {
                    f.write_str("-")?;
                }
                write!(f, "{op}")?;
            }
            f.write_str("]")?;
        }
        Ok(())
    }
}

// ── Parser ────────────────────────────────────────────────────────────────

/// Parse an `N:initialStates:operations` string.
pub fn parse(source: &str) -> QuantumResult<CircuitDescription> {
    let (n_str, rest) = source.split_once(':').ok_or_else(|| {
        QuantumError::malformed(source.len(), "expected 'N:initialStates:operations'")
    })?;
    let (states_str, ops_str) = rest.split_once(':').ok_or_else(|| {
        QuantumError::malformed(source.len(), "missing ':' before operations")
    })?;
    let states_at = n_str.len() + 1;
    let ops_at = states_at + states_str.len() + 1;

    let num_qubits = parse_index(n_str, 0)?;
    if num_qubits == 0 {
        return Err(QuantumError::malformed(0, "qubit count must be at least 1"));
    }

    let initial_states = parse_states(states_str, states_at)?;
    if initial_states.len() != num_qubits {
        return Err(QuantumError::malformed(
            states_at,
            format!(
                "expected {num_qubits} initial state(s), got {}",
                initial_states.len()
            ),
        ));
    }

    let steps = parse_steps(ops_str, ops_at)?;

    let description = CircuitDescription {
        num_qubits,
        initial_states,
        steps,
    };
    validate_bounds(&description, ops_at)?;
    Ok(description)
}

fn parse_states(s: &str, at: usize) -> QuantumResult<Vec<u8>> {
    let mut states = Vec::new();
    let mut offset = at;
    for tok in s.split('-') {
        match tok {
            "0" => states.push(0),
            "1" => states.push(1),
            _ => {
                return Err(QuantumError::malformed(
                    offset,
                    format!("initial state must be '0' or '1', got '{tok}'"),
                ))
            }
        }
        offset += tok.len() + 1;
    }
    Ok(states)
}

fn parse_steps(s: &str, at: usize) -> QuantumResult<Vec<Vec<CircuitOperation>>> {
    let trimmed = s.trim_end_matches('-');
    let bytes = trimmed.as_bytes();
    let mut steps = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        if !steps.is_empty() {
            if bytes[pos] != b'-' {
                return Err(QuantumError::malformed(at + pos, "expected '-' between steps"));
            }
            pos += 1;
        }
        if bytes.get(pos) != Some(&b'[') {
            return Err(QuantumError::malformed(at + pos, "expected '[' to open a step"));
        }
        let open = pos;
        pos += 1;
        let close = trimmed[pos..]
            .find(']')
            .map(|i| i + pos)
            .ok_or_else(|| QuantumError::malformed(at + open, "unclosed '['"))?;
        steps.push(parse_step(&trimmed[pos..close], at + pos)?);
        pos = close + 1;
    }

    Ok(steps)
}

fn parse_step(body: &str, at: usize) -> QuantumResult<Vec<CircuitOperation>> {
    if body.is_empty() {
        return Ok(Vec::new());
    }
    let mut ops = Vec::new();
    let mut offset = at;
    for tok in body.split('-') {
        ops.push(parse_op(tok, offset)?);
        offset += tok.len() + 1;
    }
    Ok(ops)
}

fn parse_op(tok: &str, at: usize) -> QuantumResult<CircuitOperation> {
    if tok.is_empty() {
        return Err(QuantumError::malformed(at, "empty operation"));
    }
    let gate_len = tok.bytes().take_while(u8::is_ascii_alphabetic).count();
    if gate_len == 0 {
        return Err(QuantumError::malformed(
            at,
            format!("operation '{tok}' must start with a gate name"),
        ));
    }
    let (gate, operands) = tok.split_at(gate_len);
    let operands_at = at + gate_len;

    Ok(match operands.split_once('_') {
        Some((target, control)) => CircuitOperation::Controlled {
            gate: gate.to_string(),
            target: parse_index(target, operands_at)?,
            control: parse_index(control, operands_at + target.len() + 1)?,
        },
        None => CircuitOperation::Single {
            gate: gate.to_string(),
            qubit: parse_index(operands, operands_at)?,
        },
    })
}

/// Decimal integer without sign or leading zeros.
fn parse_index(s: &str, at: usize) -> QuantumResult<usize> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(QuantumError::malformed(at, format!("expected an integer, got '{s}'")));
    }
    if s.len() > 1 && s.starts_with('0') {
        return Err(QuantumError::malformed(at, format!("leading zero in '{s}'")));
    }
    s.parse()
        .map_err(|_| QuantumError::malformed(at, format!("integer '{s}' is too large")))
}

fn validate_bounds(description: &CircuitDescription, ops_at: usize) -> QuantumResult<()> {
    let n = description.num_qubits;
    for op in description.operations() {
        if let Some(q) = op.qubits().into_iter().find(|&q| q >= n) {
            return Err(QuantumError::malformed(
                ops_at,
                format!("operation '{op}' references qubit {q}, circuit has {n}"),
            ));
        }
    }
    Ok(())
}

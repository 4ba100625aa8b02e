/// Gate library: the closed set of canonical unitary matrices.
///
/// Single-qubit gates are 2×2 complex matrices. Two-qubit gates are 4×4
/// matrices over the ordered pair (control, target) with basis order
/// |control,target⟩ ∈ {00, 01, 10, 11}, i.e. local index `(c << 1) | t`.
///
/// Every canonical matrix is a `static`; looking a gate up never allocates
/// and the same matrix is shared by every application.
use super::complex::Complex;
use crate::error::{QuantumError, QuantumResult};
use std::f64::consts::FRAC_1_SQRT_2;
use std::fmt;

/// A 2×2 complex unitary matrix. Row-major: matrix[row][col]
pub type Matrix2x2 = [[Complex; 2]; 2];

/// A 4×4 complex unitary matrix over |control,target⟩. Row-major.
pub type Matrix4x4 = [[Complex; 4]; 4];

const O: Complex = Complex::zero();
const L: Complex = Complex::one();
const NEG_L: Complex = Complex::new(-1.0, 0.0);
const I_UNIT: Complex = Complex::i();
const NEG_I: Complex = Complex::new(0.0, -1.0);
const H_POS: Complex = Complex::new(FRAC_1_SQRT_2, 0.0);
const H_NEG: Complex = Complex::new(-FRAC_1_SQRT_2, 0.0);
/// e^(iπ/4)
const T_PHASE: Complex = Complex::new(FRAC_1_SQRT_2, FRAC_1_SQRT_2);

// ── Standard Gate Matrices ─────────────────────────────────────────────────

/// Identity: no-op, used for padding grid columns.
pub static IDENTITY: Matrix2x2 = [[L, O], [O, L]];

/// Pauli-X: quantum NOT, flips |0⟩ ↔ |1⟩.
pub static PAULI_X: Matrix2x2 = [[O, L], [L, O]];

/// Pauli-Y: bit + phase flip. Y = [[0, -i], [i, 0]]
pub static PAULI_Y: Matrix2x2 = [[O, NEG_I], [I_UNIT, O]];

/// Pauli-Z: phase flip, |1⟩ → -|1⟩.
pub static PAULI_Z: Matrix2x2 = [[L, O], [O, NEG_L]];

/// Hadamard: H = (1/√2) * [[1, 1], [1, -1]]
pub static HADAMARD: Matrix2x2 = [[H_POS, H_POS], [H_POS, H_NEG]];

/// S: π/2 phase gate.
pub static S_GATE: Matrix2x2 = [[L, O], [O, I_UNIT]];

/// T: π/4 phase gate.
pub static T_GATE: Matrix2x2 = [[L, O], [O, T_PHASE]];

/// Controlled-NOT.
pub static CNOT: Matrix4x4 = [
    [L, O, O, O],
    [O, L, O, O],
    [O, O, O, L],
    [O, O, L, O],
];

/// Controlled-Z: phase flip on |11⟩.
pub static CZ: Matrix4x4 = [
    [L, O, O, O],
    [O, L, O, O],
    [O, O, L, O],
    [O, O, O, NEG_L],
];

/// Controlled-Y.
pub static CY: Matrix4x4 = [
    [L, O, O, O],
    [O, L, O, O],
    [O, O, O, NEG_I],
    [O, O, I_UNIT, O],
];

/// SWAP: exchanges the two qubits. Symmetric in its operands.
pub static SWAP: Matrix4x4 = [
    [L, O, O, O],
    [O, O, L, O],
    [O, L, O, O],
    [O, O, O, L],
];

// ── Gate kinds ──────────────────────────────────────────────────────────────

/// Every gate the engine knows, selected by [`Gate::lookup`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gate {
    I,
    X,
    Y,
    Z,
    H,
    S,
    T,
    Cnot,
    Cz,
    Cy,
    Swap,
}

/// Borrowed view of a gate's canonical matrix.
#[derive(Debug, Clone, Copy)]
pub enum GateMatrix {
    Single(&'static Matrix2x2),
    Two(&'static Matrix4x4),
}

impl Gate {
    /// Resolve a gate by name (case-insensitive).
    pub fn lookup(name: &str) -> QuantumResult<Self> {
        let gate = match name.to_ascii_uppercase().as_str() {
            "I" => Self::I,
            "X" => Self::X,
            "Y" => Self::Y,
            "Z" => Self::Z,
            "H" => Self::H,
            "S" => Self::S,
            "T" => Self::T,
            "CNOT" | "CX" => Self::Cnot,
            "CZ" => Self::Cz,
            "CY" => Self::Cy,
            "SWAP" => Self::Swap,
            _ => return Err(QuantumError::UnsupportedGate(name.to_string())),
        };
        Ok(gate)
    }

    /// Exhaustive list, single-qubit gates first.
    pub fn all() -> &'static [Gate] {
        &[
            Self::I,
            Self::X,
            Self::Y,
            Self::Z,
            Self::H,
            Self::S,
            Self::T,
            Self::Cnot,
            Self::Cz,
            Self::Cy,
            Self::Swap,
        ]
    }

    /// Canonical name used in circuit descriptions and diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            Self::I => "I",
            Self::X => "X",
            Self::Y => "Y",
            Self::Z => "Z",
            Self::H => "H",
            Self::S => "S",
            Self::T => "T",
            Self::Cnot => "CNOT",
            Self::Cz => "CZ",
            Self::Cy => "CY",
            Self::Swap => "SWAP",
        }
    }

    /// Number of qubits the gate acts on.
    pub fn arity(&self) -> usize {
        match self.matrix() {
            GateMatrix::Single(_) => 1,
            GateMatrix::Two(_) => 2,
        }
    }

    pub fn matrix(&self) -> GateMatrix {
        match self {
            Self::I => GateMatrix::Single(&IDENTITY),
            Self::X => GateMatrix::Single(&PAULI_X),
            Self::Y => GateMatrix::Single(&PAULI_Y),
            Self::Z => GateMatrix::Single(&PAULI_Z),
            Self::H => GateMatrix::Single(&HADAMARD),
            Self::S => GateMatrix::Single(&S_GATE),
            Self::T => GateMatrix::Single(&T_GATE),
            Self::Cnot => GateMatrix::Two(&CNOT),
            Self::Cz => GateMatrix::Two(&CZ),
            Self::Cy => GateMatrix::Two(&CY),
            Self::Swap => GateMatrix::Two(&SWAP),
        }
    }

    /// The 4×4 matrix applied when this gate is used with a control qubit.
    ///
    /// A single-qubit gate U becomes diag(I, U), so `X` yields CNOT and `Z`
    /// yields CZ. Two-qubit gates are already over (control, target).
    pub fn controlled_matrix(&self) -> Matrix4x4 {
        match self.matrix() {
            GateMatrix::Two(m) => *m,
            GateMatrix::Single(u) => controlled(u),
        }
    }
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// diag(I, U) over |control,target⟩.
pub fn controlled(u: &Matrix2x2) -> Matrix4x4 {
    [
        [L, O, O, O],
        [O, L, O, O],
        [O, O, u[0][0], u[0][1]],
        [O, O, u[1][0], u[1][1]],
    ]
}

/// True if U†U = I within 1e-10.
pub fn is_unitary<const N: usize>(m: &[[Complex; N]; N]) -> bool {
    for r in 0..N {
        for c in 0..N {
            let mut acc = Complex::zero();
            for k in 0..N {
                acc = acc + m[k][r].conj() * m[k][c];
            }
            let expected = if r == c { Complex::one() } else { Complex::zero() };
            if acc != expected {
                return false;
            }
        }
    }
    true
}

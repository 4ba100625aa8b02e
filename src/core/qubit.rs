/// A single qubit α|0⟩ + β|1⟩.
///
/// Only used to seed `CompositeState` construction: each qubit is prepared
/// on its own and the register is formed by tensor product.
use super::complex::Complex;
use super::gates::Matrix2x2;
use crate::error::{QuantumError, QuantumResult};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Qubit {
    alpha: Complex,
    beta: Complex,
}

impl Qubit {
    /// |0⟩
    pub const fn new() -> Self {
        Self {
            alpha: Complex::one(),
            beta: Complex::zero(),
        }
    }

    /// Computational basis state |bit⟩.
    pub fn from_bit(bit: u8) -> QuantumResult<Self> {
        match bit {
            0 => Ok(Self::new()),
            1 => Ok(Self {
                alpha: Complex::zero(),
                beta: Complex::one(),
            }),
            _ => Err(QuantumError::invalid_operands(format!(
                "initial qubit state must be 0 or 1, got {bit}"
            ))),
        }
    }

    /// Arbitrary amplitudes, normalized on construction.
    pub fn from_amplitudes(alpha: Complex, beta: Complex) -> QuantumResult<Self> {
        let mut q = Self { alpha, beta };
        q.normalize()?;
        Ok(q)
    }

    #[inline(always)]
    pub fn alpha(&self) -> Complex {
        self.alpha
    }

    #[inline(always)]
    pub fn beta(&self) -> Complex {
        self.beta
    }

    /// [α, β]
    pub fn amplitudes(&self) -> [Complex; 2] {
        [self.alpha, self.beta]
    }

    /// P(|1⟩) = |β|²
    pub fn probability_one(&self) -> f64 {
        self.beta.norm_sq()
    }

    /// Matrix-vector product, then renormalize.
    pub fn apply_gate(&mut self, gate: &Matrix2x2) -> QuantumResult<()> {
        let (a, b) = (self.alpha, self.beta);
        self.alpha = gate[0][0] * a + gate[0][1] * b;
        self.beta = gate[1][0] * a + gate[1][1] * b;
        self.normalize()
    }

    fn normalize(&mut self) -> QuantumResult<()> {
        let total = self.alpha.norm_sq() + self.beta.norm_sq();
        if total < 1e-12 {
            return Err(QuantumError::DegenerateState(
                "qubit has zero amplitude in both basis states".into(),
            ));
        }
        let inv_norm = 1.0 / total.sqrt();
        self.alpha = self.alpha.scale(inv_norm);
        self.beta = self.beta.scale(inv_norm);
        Ok(())
    }
}

impl Default for Qubit {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Qubit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({})|0⟩ + ({})|1⟩", self.alpha, self.beta)
    }
}

/// Composite n-qubit state vector.
///
/// An n-qubit register has 2^n basis states and one complex amplitude per
/// basis state. Bit k of a basis index is the value of qubit k (qubit 0 is
/// the least-significant bit). The same mapping is used by tensor-product
/// construction, gate embedding and basis labels.
///
/// Normalization constraint: Σ|αᵢ|² = 1, restored after every collapse.
///
/// Memory is 16 bytes × 2^n; past roughly a dozen qubits the dense vector
/// becomes too large for interactive use. No ceiling is enforced here.
use super::complex::Complex;
use super::gates::{Matrix2x2, Matrix4x4};
use super::qubit::Qubit;
use crate::error::{QuantumError, QuantumResult};
use rand::Rng;
use std::fmt;

/// Probability mass below which a branch counts as empty.
const DEGENERATE_EPS: f64 = 1e-12;

#[derive(Debug, Clone)]
pub struct CompositeState {
    num_qubits: usize,
    amplitudes: Vec<Complex>,
}

impl CompositeState {
    /// Register of `num_qubits` fresh qubits, i.e. |0...0⟩.
    pub fn new(num_qubits: usize) -> QuantumResult<Self> {
        let qubits = vec![Qubit::new(); num_qubits];
        Self::from_qubits(&qubits)
    }

    /// Iterative Kronecker product of independent qubits.
    ///
    /// `qubits[k]` becomes qubit k, i.e. bit k of every basis index.
    pub fn from_qubits(qubits: &[Qubit]) -> QuantumResult<Self> {
        if qubits.is_empty() {
            return Err(QuantumError::invalid_operands(
                "at least one qubit required",
            ));
        }
        if qubits.len() >= usize::BITS as usize {
            return Err(QuantumError::invalid_operands(format!(
                "{} qubits cannot be indexed by a dense state vector",
                qubits.len()
            )));
        }
        let mut state = Self {
            num_qubits: 0,
            amplitudes: vec![Complex::one()],
        };
        for qubit in qubits {
            state.tensor_push(qubit);
        }
        Ok(state)
    }

    /// Extend the register with `qubit` as the new highest-index qubit.
    pub fn add_qubit(&mut self, qubit: &Qubit) -> QuantumResult<()> {
        if self.num_qubits + 1 >= usize::BITS as usize {
            return Err(QuantumError::invalid_operands(
                "register too large to extend",
            ));
        }
        self.tensor_push(qubit);
        Ok(())
    }

    // |ψ'⟩ = |q⟩ ⊗ |ψ⟩ with q on the new top bit.
    fn tensor_push(&mut self, qubit: &Qubit) {
        let (alpha, beta) = (qubit.alpha(), qubit.beta());
        let mut next = Vec::with_capacity(self.amplitudes.len() * 2);
        next.extend(self.amplitudes.iter().map(|&a| a * alpha));
        next.extend(self.amplitudes.iter().map(|&a| a * beta));
        self.amplitudes = next;
        self.num_qubits += 1;
    }

    #[inline(always)]
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Dimension of the state space: 2^n
    #[inline(always)]
    pub fn dim(&self) -> usize {
        self.amplitudes.len()
    }

    pub fn amplitudes(&self) -> &[Complex] {
        &self.amplitudes
    }

    pub fn amplitude(&self, index: usize) -> QuantumResult<Complex> {
        self.amplitudes
            .get(index)
            .copied()
            .ok_or(QuantumError::IndexOutOfRange { index, dim: self.dim() })
    }

    /// Probability of basis state `index`: |αᵢ|²
    pub fn probability(&self, index: usize) -> QuantumResult<f64> {
        self.amplitude(index).map(|a| a.norm_sq())
    }

    /// Probabilities of all 2^n basis states, indexed by basis integer.
    pub fn probabilities(&self) -> Vec<f64> {
        self.amplitudes.iter().map(|a| a.norm_sq()).collect()
    }

    pub fn total_probability(&self) -> f64 {
        self.amplitudes.iter().map(|a| a.norm_sq()).sum()
    }

    /// Consistency check: total probability is 1 within 1e-10.
    pub fn is_valid(&self) -> bool {
        (self.total_probability() - 1.0).abs() < 1e-10
    }

    /// Check if this qubit's bit is set in basis state index `basis_idx`.
    #[inline(always)]
    pub fn qubit_bit(basis_idx: usize, qubit: usize) -> bool {
        (basis_idx >> qubit) & 1 == 1
    }

    /// Zero-padded binary label of basis state `index`; qubit 0 is rightmost.
    pub fn basis_label(&self, index: usize) -> String {
        let n = self.num_qubits;
        format!("{index:0>n$b}")
    }

    /// P(qubit = 1), marginalized over all other qubits.
    pub fn marginal_probability_one(&self, qubit: usize) -> QuantumResult<f64> {
        self.check_qubit(qubit, "qubit")?;
        Ok(self
            .amplitudes
            .iter()
            .enumerate()
            .filter(|(i, _)| Self::qubit_bit(*i, qubit))
            .map(|(_, a)| a.norm_sq())
            .sum())
    }

    fn check_qubit(&self, qubit: usize, role: &str) -> QuantumResult<()> {
        if qubit >= self.num_qubits {
            return Err(QuantumError::invalid_operands(format!(
                "{role} qubit {qubit} out of range for {}-qubit register",
                self.num_qubits
            )));
        }
        Ok(())
    }

    // ── Gate application ───────────────────────────────────────────────────

    /// Apply a 2×2 gate to `target` by pairing basis states that differ only
    /// in the target bit. O(2^n); the full 2^n × 2^n operator is never built.
    pub fn apply_single_qubit_gate(&mut self, gate: &Matrix2x2, target: usize) -> QuantumResult<()> {
        self.check_qubit(target, "target")?;
        let target_mask = 1 << target;
        for i0 in 0..self.dim() {
            if i0 & target_mask != 0 {
                continue;
            }
            let i1 = i0 | target_mask;
            let a0 = self.amplitudes[i0];
            let a1 = self.amplitudes[i1];
            self.amplitudes[i0] = gate[0][0] * a0 + gate[0][1] * a1;
            self.amplitudes[i1] = gate[1][0] * a0 + gate[1][1] * a1;
        }
        Ok(())
    }

    /// Apply a 4×4 gate over |control,target⟩.
    ///
    /// Each group of four basis states sharing all other bits is transformed
    /// by the matrix, using local index `(c << 1) | t`. For controlled gates
    /// the upper-left block is the identity, so amplitudes with the control
    /// bit clear pass through unchanged.
    pub fn apply_controlled_gate(
        &mut self,
        gate: &Matrix4x4,
        control: usize,
        target: usize,
    ) -> QuantumResult<()> {
        self.check_qubit(control, "control")?;
        self.check_qubit(target, "target")?;
        if control == target {
            return Err(QuantumError::invalid_operands(format!(
                "control and target must be different qubits, both are {control}"
            )));
        }

        let control_mask = 1 << control;
        let target_mask = 1 << target;

        for base in 0..self.dim() {
            if base & (control_mask | target_mask) != 0 {
                continue;
            }
            let idx = [
                base,
                base | target_mask,
                base | control_mask,
                base | control_mask | target_mask,
            ];
            let old = idx.map(|i| self.amplitudes[i]);
            for (row, &i) in idx.iter().enumerate() {
                self.amplitudes[i] = gate[row]
                    .iter()
                    .zip(old.iter())
                    .fold(Complex::zero(), |acc, (&g, &a)| acc + g * a);
            }
        }
        Ok(())
    }

    // ── Measurement ────────────────────────────────────────────────────────

    /// Sample a basis state and collapse the whole register onto it.
    ///
    /// One uniform draw in [0, 1) walks the cumulative distribution in
    /// basis order; the first populated index whose cumulative probability
    /// reaches the draw is chosen. Returns that index.
    pub fn measure<R: Rng + ?Sized>(&mut self, rng: &mut R) -> usize {
        let draw: f64 = rng.gen();
        let mut cumulative = 0.0;
        let mut chosen = None;
        let mut last_populated = 0;

        for (i, amp) in self.amplitudes.iter().enumerate() {
            let p = amp.norm_sq();
            if p <= 0.0 {
                continue;
            }
            cumulative += p;
            last_populated = i;
            if cumulative >= draw {
                chosen = Some(i);
                break;
            }
        }

        // Rounding can leave the total a hair under the draw.
        let index = chosen.unwrap_or(last_populated);
        let kept = self.amplitudes[index];
        let norm = kept.norm();
        for amp in self.amplitudes.iter_mut() {
            *amp = Complex::zero();
        }
        // Keep the global phase of the surviving amplitude.
        self.amplitudes[index] = if norm > 0.0 { kept.scale(1.0 / norm) } else { Complex::one() };
        index
    }

    /// Projective measurement of a single qubit.
    ///
    /// Returns the outcome (0 or 1). Amplitudes inconsistent with the outcome
    /// are zeroed and the survivors renormalized in place. On
    /// `DegenerateState` the register is left untouched.
    pub fn measure_qubit<R: Rng + ?Sized>(&mut self, qubit: usize, rng: &mut R) -> QuantumResult<u8> {
        self.check_qubit(qubit, "qubit")?;
        let (prob_zero, prob_one) = self.amplitudes.iter().enumerate().fold(
            (0.0, 0.0),
            |(p0, p1), (i, amp)| {
                if Self::qubit_bit(i, qubit) {
                    (p0, p1 + amp.norm_sq())
                } else {
                    (p0 + amp.norm_sq(), p1)
                }
            },
        );
        let draw: f64 = rng.gen();
        let outcome = u8::from(draw >= prob_zero);

        let surviving = if outcome == 1 { prob_one } else { prob_zero };
        if surviving < DEGENERATE_EPS {
            return Err(QuantumError::DegenerateState(format!(
                "no probability mass left after measuring qubit {qubit} as {outcome}"
            )));
        }

        let inv_norm = 1.0 / surviving.sqrt();
        for (i, amp) in self.amplitudes.iter_mut().enumerate() {
            *amp = if u8::from(Self::qubit_bit(i, qubit)) == outcome {
                amp.scale(inv_norm)
            } else {
                Complex::zero()
            };
        }
        Ok(outcome)
    }
}

impl fmt::Display for CompositeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "CompositeState ({} qubits, dim={}):", self.num_qubits, self.dim())?;
        for (i, amp) in self.amplitudes.iter().enumerate() {
            if !amp.is_zero(1e-6) {
                let prob = amp.norm_sq();
                writeln!(
                    f,
                    "  |{}⟩  amplitude: {}  probability: {:.4}",
                    self.basis_label(i),
                    amp,
                    prob
                )?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::gates::{self, CNOT, CZ, HADAMARD, PAULI_X, PAULI_Z, SWAP};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn nearly_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-10
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn test_initial_state() {
        let sv = CompositeState::new(2).unwrap();
        assert_eq!(sv.dim(), 4);
        assert_eq!(sv.amplitudes()[0], Complex::one());
        for i in 1..4 {
            assert_eq!(sv.amplitudes()[i], Complex::zero());
        }
        assert!(sv.is_valid());
    }

    #[test]
    fn test_zero_qubits_rejected() {
        assert!(matches!(
            CompositeState::new(0),
            Err(QuantumError::InvalidOperands(_))
        ));
    }

    #[test]
    fn test_tensor_product_little_endian() {
        // q0 = |1⟩, q1 = |0⟩, q2 = |1⟩  →  index 0b101 = 5
        let qubits = [
            Qubit::from_bit(1).unwrap(),
            Qubit::from_bit(0).unwrap(),
            Qubit::from_bit(1).unwrap(),
        ];
        let sv = CompositeState::from_qubits(&qubits).unwrap();
        assert_eq!(sv.num_qubits(), 3);
        assert!(nearly_eq(sv.probability(5).unwrap(), 1.0));
        assert!(nearly_eq(sv.total_probability(), 1.0));
    }

    #[test]
    fn test_tensor_product_of_superpositions() {
        let mut plus = Qubit::new();
        plus.apply_gate(&HADAMARD).unwrap();
        let sv = CompositeState::from_qubits(&[plus, Qubit::new()]).unwrap();
        // q0 in |+⟩, q1 in |0⟩ → indices 0 and 1 share the mass
        assert!(nearly_eq(sv.probability(0).unwrap(), 0.5));
        assert!(nearly_eq(sv.probability(1).unwrap(), 0.5));
        assert!(nearly_eq(sv.probability(2).unwrap(), 0.0));
    }

    #[test]
    fn test_add_qubit_goes_on_top_bit() {
        let mut sv = CompositeState::new(1).unwrap();
        sv.add_qubit(&Qubit::from_bit(1).unwrap()).unwrap();
        assert_eq!(sv.num_qubits(), 2);
        assert!(nearly_eq(sv.probability(0b10).unwrap(), 1.0));
    }

    #[test]
    fn test_x_gate_flips_qubit() {
        let mut sv = CompositeState::new(1).unwrap();
        sv.apply_single_qubit_gate(&PAULI_X, 0).unwrap();
        assert_eq!(sv.probabilities(), vec![0.0, 1.0]);
    }

    #[test]
    fn test_hadamard_creates_superposition() {
        let mut sv = CompositeState::new(1).unwrap();
        sv.apply_single_qubit_gate(&HADAMARD, 0).unwrap();
        let p = sv.probabilities();
        assert!(nearly_eq(p[0], 0.5));
        assert!(nearly_eq(p[1], 0.5));
    }

    #[test]
    fn test_gate_on_higher_qubit() {
        let mut sv = CompositeState::new(3).unwrap();
        sv.apply_single_qubit_gate(&PAULI_X, 2).unwrap();
        assert!(nearly_eq(sv.probability(0b100).unwrap(), 1.0));
    }

    #[test]
    fn test_target_out_of_range() {
        let mut sv = CompositeState::new(2).unwrap();
        assert!(matches!(
            sv.apply_single_qubit_gate(&PAULI_X, 2),
            Err(QuantumError::InvalidOperands(_))
        ));
    }

    #[test]
    fn test_bell_state_creation() {
        let mut sv = CompositeState::new(2).unwrap();
        sv.apply_single_qubit_gate(&HADAMARD, 0).unwrap();
        sv.apply_controlled_gate(&CNOT, 0, 1).unwrap();
        let p = sv.probabilities();
        assert!(nearly_eq(p[0], 0.5));
        assert!(nearly_eq(p[1], 0.0));
        assert!(nearly_eq(p[2], 0.0));
        assert!(nearly_eq(p[3], 0.5));
    }

    #[test]
    fn test_cnot_control_zero_passes_through() {
        // q1 = |1⟩ as control would flip q0; here control is q0 = |0⟩.
        let mut sv = CompositeState::new(2).unwrap();
        sv.apply_single_qubit_gate(&PAULI_X, 1).unwrap();
        sv.apply_controlled_gate(&CNOT, 0, 1).unwrap();
        assert!(nearly_eq(sv.probability(0b10).unwrap(), 1.0));
    }

    #[test]
    fn test_cnot_reversed_operands() {
        // control q1 = 1, target q0 → |11⟩
        let mut sv = CompositeState::new(2).unwrap();
        sv.apply_single_qubit_gate(&PAULI_X, 1).unwrap();
        sv.apply_controlled_gate(&CNOT, 1, 0).unwrap();
        assert!(nearly_eq(sv.probability(0b11).unwrap(), 1.0));
    }

    #[test]
    fn test_cz_phase_on_11() {
        let mut sv = CompositeState::new(2).unwrap();
        sv.apply_single_qubit_gate(&PAULI_X, 0).unwrap();
        sv.apply_single_qubit_gate(&PAULI_X, 1).unwrap();
        sv.apply_controlled_gate(&CZ, 0, 1).unwrap();
        assert!(nearly_eq(sv.amplitudes()[3].re, -1.0));
    }

    #[test]
    fn test_cz_matches_hxh_sandwich() {
        // H(t)·CNOT·H(t) == CZ
        let mut a = CompositeState::new(2).unwrap();
        let mut b = CompositeState::new(2).unwrap();
        for sv in [&mut a, &mut b] {
            sv.apply_single_qubit_gate(&HADAMARD, 0).unwrap();
            sv.apply_single_qubit_gate(&HADAMARD, 1).unwrap();
        }
        a.apply_controlled_gate(&CZ, 0, 1).unwrap();
        b.apply_single_qubit_gate(&HADAMARD, 1).unwrap();
        b.apply_controlled_gate(&CNOT, 0, 1).unwrap();
        b.apply_single_qubit_gate(&HADAMARD, 1).unwrap();
        for (x, y) in a.amplitudes().iter().zip(b.amplitudes()) {
            assert_eq!(x, y);
        }
    }

    #[test]
    fn test_swap_gate() {
        let mut sv = CompositeState::new(2).unwrap();
        sv.apply_single_qubit_gate(&PAULI_X, 0).unwrap();
        sv.apply_controlled_gate(&SWAP, 0, 1).unwrap();
        assert!(nearly_eq(sv.probability(0b10).unwrap(), 1.0));
    }

    #[test]
    fn test_controlled_same_qubit_rejected() {
        let mut sv = CompositeState::new(2).unwrap();
        assert!(matches!(
            sv.apply_controlled_gate(&CNOT, 1, 1),
            Err(QuantumError::InvalidOperands(_))
        ));
    }

    #[test]
    fn test_controlled_on_non_adjacent_qubits() {
        // GHZ across q0 and q3 with a spectator in between.
        let mut sv = CompositeState::new(4).unwrap();
        sv.apply_single_qubit_gate(&HADAMARD, 0).unwrap();
        sv.apply_controlled_gate(&CNOT, 0, 3).unwrap();
        assert!(nearly_eq(sv.probability(0b0000).unwrap(), 0.5));
        assert!(nearly_eq(sv.probability(0b1001).unwrap(), 0.5));
    }

    #[test]
    fn test_controlled_z_from_library_equals_diag() {
        let mut sv = CompositeState::new(2).unwrap();
        sv.apply_single_qubit_gate(&HADAMARD, 0).unwrap();
        sv.apply_single_qubit_gate(&HADAMARD, 1).unwrap();
        sv.apply_controlled_gate(&gates::controlled(&PAULI_Z), 0, 1).unwrap();
        assert!(sv.amplitudes()[3].re < 0.0);
        assert!(sv.is_valid());
    }

    #[test]
    fn test_probability_out_of_range() {
        let sv = CompositeState::new(2).unwrap();
        assert_eq!(
            sv.probability(4),
            Err(QuantumError::IndexOutOfRange { index: 4, dim: 4 })
        );
    }

    #[test]
    fn test_measure_collapses_to_populated_state() {
        let mut sv = CompositeState::new(2).unwrap();
        sv.apply_single_qubit_gate(&HADAMARD, 0).unwrap();
        sv.apply_controlled_gate(&CNOT, 0, 1).unwrap();
        let idx = sv.measure(&mut rng());
        assert!(idx == 0 || idx == 3);
        assert!(nearly_eq(sv.probability(idx).unwrap(), 1.0));
        assert!(sv.is_valid());
    }

    #[test]
    fn test_measure_is_idempotent() {
        let mut r = rng();
        for _ in 0..20 {
            let mut sv = CompositeState::new(3).unwrap();
            for q in 0..3 {
                sv.apply_single_qubit_gate(&HADAMARD, q).unwrap();
            }
            let first = sv.measure(&mut r);
            let second = sv.measure(&mut r);
            assert_eq!(first, second);
        }
    }

    #[test]
    fn test_measure_deterministic_with_seed() {
        let prepare = || {
            let mut sv = CompositeState::new(3).unwrap();
            for q in 0..3 {
                sv.apply_single_qubit_gate(&HADAMARD, q).unwrap();
            }
            sv
        };
        let a = prepare().measure(&mut StdRng::seed_from_u64(99));
        let b = prepare().measure(&mut StdRng::seed_from_u64(99));
        assert_eq!(a, b);
    }

    #[test]
    fn test_measure_basis_state_is_certain() {
        let mut sv = CompositeState::new(2).unwrap();
        sv.apply_single_qubit_gate(&PAULI_X, 1).unwrap();
        assert_eq!(sv.measure(&mut rng()), 2);
    }

    #[test]
    fn test_measure_qubit_bell_correlation() {
        let mut r = rng();
        for _ in 0..20 {
            let mut sv = CompositeState::new(2).unwrap();
            sv.apply_single_qubit_gate(&HADAMARD, 0).unwrap();
            sv.apply_controlled_gate(&CNOT, 0, 1).unwrap();
            let m0 = sv.measure_qubit(0, &mut r).unwrap();
            let m1 = sv.measure_qubit(1, &mut r).unwrap();
            assert_eq!(m0, m1);
            assert!(sv.is_valid());
        }
    }

    #[test]
    fn test_measure_qubit_renormalizes() {
        let mut sv = CompositeState::new(2).unwrap();
        sv.apply_single_qubit_gate(&HADAMARD, 0).unwrap();
        sv.apply_single_qubit_gate(&HADAMARD, 1).unwrap();
        let outcome = sv.measure_qubit(1, &mut rng()).unwrap();
        assert!(sv.is_valid());
        assert!(nearly_eq(sv.marginal_probability_one(1).unwrap(), f64::from(outcome)));
        // q0 is untouched: still an even split
        assert!(nearly_eq(sv.marginal_probability_one(0).unwrap(), 0.5));
    }

    #[test]
    fn test_measure_qubit_certain_outcome() {
        let mut sv = CompositeState::new(1).unwrap();
        sv.apply_single_qubit_gate(&PAULI_X, 0).unwrap();
        assert_eq!(sv.measure_qubit(0, &mut rng()).unwrap(), 1);
    }

    #[test]
    fn test_measure_qubit_out_of_range() {
        let mut sv = CompositeState::new(1).unwrap();
        assert!(matches!(
            sv.measure_qubit(1, &mut rng()),
            Err(QuantumError::InvalidOperands(_))
        ));
    }

    #[test]
    fn test_qubit_bit() {
        // basis index 5 = 0b101: qubit 0 = 1, qubit 1 = 0, qubit 2 = 1
        assert!(CompositeState::qubit_bit(5, 0));
        assert!(!CompositeState::qubit_bit(5, 1));
        assert!(CompositeState::qubit_bit(5, 2));
    }

    #[test]
    fn test_basis_label() {
        let sv = CompositeState::new(3).unwrap();
        assert_eq!(sv.basis_label(0), "000");
        assert_eq!(sv.basis_label(1), "001");
        assert_eq!(sv.basis_label(5), "101");
        assert_eq!(sv.basis_label(7), "111");
    }

    #[test]
    fn test_display_lists_populated_states() {
        let mut sv = CompositeState::new(2).unwrap();
        sv.apply_single_qubit_gate(&PAULI_X, 0).unwrap();
        let s = sv.to_string();
        assert!(s.contains("|01⟩"));
        assert!(!s.contains("|00⟩"));
    }

    #[test]
    fn test_measure_qubit_degenerate_leaves_state_untouched() {
        use rand::rngs::mock::StepRng;

        // P(1) ≈ 1e-14, below the degenerate cutoff.
        let q = Qubit::from_amplitudes(Complex::one(), Complex::new(1e-7, 0.0)).unwrap();
        let mut sv = CompositeState::from_qubits(&[q]).unwrap();
        let before = sv.clone();

        // Draw just under 1.0 forces outcome 1.
        let mut rng = StepRng::new(u64::MAX, 0);
        assert!(matches!(
            sv.measure_qubit(0, &mut rng),
            Err(QuantumError::DegenerateState(_))
        ));
        assert!(sv.is_valid());
        assert_eq!(sv.amplitudes(), before.amplitudes());
        assert_eq!(sv.amplitudes()[1].re, before.amplitudes()[1].re);
    }

    #[test]
    fn test_measure_qubit_low_draw_picks_zero() {
        use rand::rngs::mock::StepRng;

        let mut sv = CompositeState::new(1).unwrap();
        sv.apply_single_qubit_gate(&HADAMARD, 0).unwrap();
        let mut rng = StepRng::new(0, 0);
        assert_eq!(sv.measure_qubit(0, &mut rng).unwrap(), 0);
        assert!(nearly_eq(sv.probability(0).unwrap(), 1.0));
        assert!(sv.is_valid());
    }
}

pub mod complex;
pub mod gates;
pub mod qubit;
pub mod state;

// Convenience re-exports for library users
pub use complex::Complex;
pub use gates::{Gate, GateMatrix, Matrix2x2, Matrix4x4};
pub use qubit::Qubit;
pub use state::CompositeState;

//! # qcircuit
//!
//! Dense state-vector simulator for small quantum circuits.
//!
//! ## Quick Start
//!
//! ```rust
//! use qcircuit::{CircuitDescription, CircuitRunner, RunConfig};
//!
//! // Bell pair: H on qubit 0, then CNOT 0 → 1
//! let description: CircuitDescription = "2:0-0:[H0]-[X1_0]".parse().unwrap();
//!
//! let runner = CircuitRunner::new(RunConfig::default().with_seed(1));
//! let result = runner.run_description(&description).unwrap();
//!
//! // Dense distribution indexed by basis state
//! assert!((result.probabilities[0] - 0.5).abs() < 1e-9);
//! assert!((result.probabilities[3] - 0.5).abs() < 1e-9);
//!
//! // Label view, qubit 0 rightmost
//! for (label, p) in result.report() {
//!     println!("|{label}⟩  {p:.4}");
//! }
//! ```

pub mod circuit;
pub mod config;
pub mod core;
pub mod error;
pub mod runtime;

pub use circuit::{Circuit, CircuitDescription, CircuitOperation};
pub use config::RunConfig;
pub use error::{QuantumError, QuantumResult};
pub use runtime::{CircuitRunner, RunResult};

/// Runtime layer: executes circuits against a fresh state vector.
///
/// Architecture:
///   description string → CircuitDescription → CircuitRunner → RunResult
///
/// The runner owns the RNG used for sampling; probability runs are fully
/// deterministic.
pub mod runner;

pub use runner::{apply_operation, CircuitRunner, RunResult};

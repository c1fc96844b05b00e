//! Mock numeric simulations: qudits, lattice magnetism, small circuits.

pub mod circuit;
pub mod magnetism;
pub mod math;
pub mod qudit;

pub use circuit::{simulate, Circuit, CircuitResult, Gate, GateKind};
pub use qudit::{generate_initial_state, Qudit, QuditTransform};

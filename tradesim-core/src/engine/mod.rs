//! Trade simulator — a single forward fold over aligned (signal, price) steps.
//!
//! The fold state (position, capital, trajectory, ledger) lives in one
//! [`SimState`] record that is advanced by [`SimState::step`]. The
//! [`Simulator`] validates inputs up front, drives the fold, and logs entries
//! and exits.

pub mod simulator;
pub mod state;

pub use simulator::{simulate, RedundantSignalPolicy, SimulationOutput, Simulator};
pub use state::{SimState, StepOutcome};

//! # Pulsim Backend
//!
//! The three execution backends of the simulator and the shared sampling
//! stage. A compiled program is dispatched to exactly one backend:
//!
//! - **pulse level** integrates the Lindblad master equation over the actual
//!   pulse envelopes,
//! - **gate level** collapses each instruction to a closed-form unitary on a
//!   statevector,
//! - **clifford level** runs a stabilizer tableau per shot for
//!   Clifford-compatible programs.
//!
//! The pulse and gate backends end in the shared measurement sampler, which
//! draws shots from a basis-state distribution and synthesizes mock IQ
//! readout values.

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Dense complex linear algebra
pub mod linalg;

/// Backend execution interface
pub mod execution;

/// Backend dispatch
pub mod dispatch;

/// Measurement and readout sampling
pub mod sampler;

/// Pulse-level master-equation backend
pub mod pulse;

/// Gate-level statevector backend
pub mod gate;

/// Stabilizer tableau
pub mod tableau;

/// Clifford-level backend
pub mod clifford;

pub use clifford::CliffordLevelBackend;
pub use dispatch::BackendKind;
pub use execution::{Backend, ShotRecord, SimulationResult};
pub use gate::GateLevelBackend;
pub use pulse::PulseLevelBackend;

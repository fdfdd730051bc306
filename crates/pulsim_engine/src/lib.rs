//! # Pulsim Engine
//!
//! End-to-end run pipeline: a device configuration plus an instruction
//! stream in, the two-block output record text out. The engine owns the
//! shot-count header, backend resolution, and output rendering; everything
//! in between lives in the compiler and backend crates.
//!
//! ## Quick Start
//!
//! ```rust
//! use pulsim_config::{DeviceConfig, Topology};
//! use pulsim_engine::{RunConfig, Simulator};
//!
//! let device = DeviceConfig::standard(Topology::linear(1)).unwrap();
//! let sim = Simulator::new(device, RunConfig::new("qutip_qip").with_seed(1));
//! let out = sim.execute("3\n0 0 0 0 0 1\n100 0 128\n").unwrap();
//! assert_eq!(out.lines().count(), 6);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Run pipeline
pub mod run;

pub use run::{render, RunConfig, Simulator};

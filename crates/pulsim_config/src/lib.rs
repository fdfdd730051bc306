//! # Pulsim Config
//!
//! Device configuration model for pulsim: per-qubit noise and readout
//! description, channel maps with indexed waveform tables, qubit topology,
//! default-configuration synthesis, and run-time waveform patching.
//!
//! ## Quick Start
//!
//! ```rust
//! use pulsim_config::{DeviceConfig, Topology};
//!
//! let config = DeviceConfig::standard(Topology::linear(3)).unwrap();
//! assert_eq!(config.num_qubits(), 3);
//! let drive = config.channel("0").unwrap();
//! assert!(drive.waveform("0", 128).is_ok());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Device configuration model
pub mod device;

/// Qubit topology
pub mod topology;

/// Default configuration synthesis
pub mod builder;

/// Waveform patching
pub mod patch;

pub use builder::{DeviceConfigBuilder, DEFAULT_T1, DEFAULT_T2};
pub use device::{ChannelConfig, ChannelKind, DeviceConfig, NoiseParams, QubitConfig, ReadoutCenter};
pub use patch::EnvelopePatch;
pub use topology::Topology;

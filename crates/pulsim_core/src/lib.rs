//! # Pulsim Core
//!
//! Foundation crate for pulsim: shared types, device constants, error
//! taxonomy, waveform descriptors, and the compiled-instruction
//! representation consumed by every execution backend.
//!
//! ## Quick Start
//!
//! ```rust
//! use pulsim_core::prelude::*;
//!
//! let measure = CompiledInstruction::measure(Targets::Single(0), 128, 150.0);
//! assert_eq!(measure.kind, InstructionKind::Measure);
//! assert_eq!(measure.end_time(), 150.0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Core type aliases and value types
pub mod types;

/// Device constants (drive scaling, reserved waveform indices)
pub mod constants;

/// Error types
pub mod error;

/// Waveform descriptors
pub mod waveform;

/// Compiled pulse instructions
pub mod instruction;

pub use error::{PulsimError, PulsimResult};
pub use instruction::{CompiledInstruction, Envelope, GateParams, InstructionKind};
pub use types::{ChannelId, IqPoint, QubitId, Shots, Targets, WaveformIndex};
pub use waveform::WaveformDescriptor;

pub mod prelude {
    //! Convenient imports for common use cases
    //!
    //! ```rust
    //! use pulsim_core::prelude::*;
    //! ```

    pub use crate::constants::{channel, drive, waveform};
    pub use crate::error::{PulsimError, PulsimResult};
    pub use crate::instruction::{CompiledInstruction, Envelope, GateParams, InstructionKind};
    pub use crate::types::{ChannelId, IqPoint, QubitId, Shots, Targets, WaveformIndex};
    pub use crate::waveform::WaveformDescriptor;
}

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

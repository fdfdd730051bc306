//! # Pulsim Compiler
//!
//! Compiles the line-oriented control-stack instruction stream into the
//! shared compiled-instruction representation. Each line is resolved against
//! the device configuration's channel and waveform tables; square pulses,
//! which arrive as separate raising and falling edges, are paired across the
//! stream and synthesized into full envelopes.
//!
//! ## Quick Start
//!
//! ```rust
//! use pulsim_compiler::compile_program;
//! use pulsim_config::{DeviceConfig, Topology};
//!
//! let config = DeviceConfig::standard(Topology::linear(1)).unwrap();
//! let program = compile_program(&config, ["0 0 127", "10 0 128"]).unwrap();
//! assert_eq!(program.instructions.len(), 2);
//! assert_eq!(program.measured_qubits, vec![0]);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod edges;

/// Instruction compiler
pub mod compiler;

pub use compiler::{compile_program, CompiledProgram, InstructionCompiler};

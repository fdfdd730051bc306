//! Error types for pulsim
//!
//! Every failure in the stack maps to one of the variants below; nothing is
//! silently coerced to a default and nothing is retried.

// Error variant fields are self-documenting via error messages
#![allow(missing_docs)]

use thiserror::Error;

/// Main error type for pulsim
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PulsimError {
    // ========================================================================
    // Instruction Stream Errors
    // ========================================================================
    /// Instruction line could not be parsed
    #[error("Malformed instruction at line {line}: {reason}")]
    MalformedInstruction { line: usize, reason: String },

    /// Shot count header missing or unparsable
    #[error("Invalid shot count header: '{0}'")]
    InvalidShotCount(String),

    /// Square pulse raising edge while one is already pending on the target
    #[error("Raising edge applied on already raised qubit {qubit}")]
    DuplicateRaisingEdge { qubit: usize },

    /// Square pulse falling edge with no matching raising edge
    #[error("Square pulse falling edge before raising edge on qubit {qubit}")]
    UnmatchedFallingEdge { qubit: usize },

    /// Raising edge never closed before end of stream
    #[error("Square pulse left open on qubit {qubit} at end of stream")]
    UnterminatedSquarePulse { qubit: usize },

    /// Square pulse shorter than the minimum synthesizable length
    #[error("Square pulse of {samples} samples on qubit {qubit} is too short to synthesize")]
    SquarePulseTooShort { qubit: usize, samples: usize },

    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Instruction references a channel absent from the device configuration
    #[error("Unknown channel '{0}'")]
    UnknownChannel(String),

    /// Instruction references a waveform index absent from the channel table
    #[error("Unknown waveform index {index} on channel '{channel}'")]
    UnknownWaveform { channel: String, index: u32 },

    /// Qubit referenced by a channel or instruction is not configured
    #[error("Qubit {0} missing from device configuration")]
    UnknownQubit(usize),

    /// Waveform descriptor does not parse
    #[error("Invalid waveform descriptor: {0}")]
    InvalidWaveform(String),

    /// Channel declaration is internally inconsistent
    #[error("Invalid channel '{channel}': {reason}")]
    InvalidChannel { channel: String, reason: String },

    /// Waveform patch targets a reserved index
    #[error("Pulse index {0} is reserved and cannot be modified")]
    ReservedWaveformIndex(u32),

    /// Waveform patch targets a channel kind that cannot take one
    #[error("Envelope transmission to channel '{0}' not supported")]
    UnsupportedPatchTarget(String),

    /// Coupling pair is degenerate
    #[error("Invalid coupling ({0}, {1}): qubits must be different")]
    InvalidCoupling(usize, usize),

    // ========================================================================
    // Backend Errors
    // ========================================================================
    /// Dispatcher received an identifier outside the known set
    #[error("Unsupported backend: {0}")]
    UnsupportedBackend(String),

    /// Clifford backend received rotation parameters outside its lookup table
    #[error("Non-Clifford operation not supported: {0}")]
    NonCliffordOperation(String),

    /// Backend received an instruction kind it cannot execute
    #[error("Backend '{backend}' cannot execute instruction kind {kind}")]
    UnsupportedInstruction { backend: String, kind: String },

    /// Probability vector handed to the sampler is unusable
    #[error("Invalid probability distribution: {0}")]
    InvalidDistribution(String),

    // ========================================================================
    // I/O Errors
    // ========================================================================
    /// JSON serialization error
    #[error("JSON error: {0}")]
    JsonError(String),
}

/// Result type alias for pulsim operations
pub type PulsimResult<T> = Result<T, PulsimError>;

impl From<serde_json::Error> for PulsimError {
    fn from(err: serde_json::Error) -> Self {
        PulsimError::JsonError(err.to_string())
    }
}

impl PulsimError {
    /// Check if the error was raised while compiling the instruction stream
    pub fn is_compile_error(&self) -> bool {
        matches!(
            self,
            PulsimError::MalformedInstruction { .. }
                | PulsimError::DuplicateRaisingEdge { .. }
                | PulsimError::UnmatchedFallingEdge { .. }
                | PulsimError::UnterminatedSquarePulse { .. }
                | PulsimError::SquarePulseTooShort { .. }
        )
    }

    /// Check if the error indicates a program/configuration mismatch
    pub fn is_config_mismatch(&self) -> bool {
        matches!(
            self,
            PulsimError::UnknownChannel(_)
                | PulsimError::UnknownWaveform { .. }
                | PulsimError::UnknownQubit(_)
                | PulsimError::InvalidWaveform(_)
        )
    }
}

// ============================================================================
// Tests
// ============================================================================

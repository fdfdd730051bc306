//! Core types for pulsim
//!
//! Fundamental aliases and small value types shared by the compiler,
//! backends, and engine.

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Type Aliases
// ============================================================================

/// Qubit identifier (0-indexed)
pub type QubitId = usize;

/// Channel identifier, as keyed in the device configuration document
pub type ChannelId = String;

/// Waveform index into a channel's template table
pub type WaveformIndex = u32;

/// Number of sampling shots in a run
pub type Shots = u64;

// ============================================================================
// Targets
// ============================================================================

/// Target qubit(s) of a channel or compiled instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Targets {
    /// Single-qubit channel target
    Single(QubitId),
    /// Two-qubit (coupler) channel target
    Pair(QubitId, QubitId),
}

impl Targets {
    /// Get the single target qubit, if this is a 1Q target
    pub fn single(&self) -> Option<QubitId> {
        match self {
            Targets::Single(q) => Some(*q),
            Targets::Pair(_, _) => None,
        }
    }

    /// Get the target pair, if this is a 2Q target
    pub fn pair(&self) -> Option<(QubitId, QubitId)> {
        match self {
            Targets::Single(_) => None,
            Targets::Pair(a, b) => Some((*a, *b)),
        }
    }

    /// All target qubits, in declaration order
    pub fn qubits(&self) -> Vec<QubitId> {
        match self {
            Targets::Single(q) => vec![*q],
            Targets::Pair(a, b) => vec![*a, *b],
        }
    }

    /// Largest qubit id referenced
    pub fn max_qubit(&self) -> QubitId {
        match self {
            Targets::Single(q) => *q,
            Targets::Pair(a, b) => (*a).max(*b),
        }
    }
}

impl fmt::Display for Targets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Targets::Single(q) => write!(f, "q{}", q),
            Targets::Pair(a, b) => write!(f, "q{}-q{}", a, b),
        }
    }
}

// ============================================================================
// IQ Point
// ============================================================================

/// A synthesized in-phase/quadrature readout value
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct IqPoint {
    /// In-phase component
    pub i: f64,
    /// Quadrature component
    pub q: f64,
}

impl IqPoint {
    /// Create a new IQ point
    pub fn new(i: f64, q: f64) -> Self {
        Self { i, q }
    }

    /// The degenerate zero-valued point used where no analog readout model
    /// applies
    pub const ZERO: Self = Self { i: 0.0, q: 0.0 };
}

impl fmt::Display for IqPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.i, self.q)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_targets_accessors() {
        let single = Targets::Single(3);
        assert_eq!(single.single(), Some(3));
        assert_eq!(single.pair(), None);
        assert_eq!(single.qubits(), vec![3]);
        assert_eq!(single.max_qubit(), 3);

        let pair = Targets::Pair(1, 4);
        assert_eq!(pair.single(), None);
        assert_eq!(pair.pair(), Some((1, 4)));
        assert_eq!(pair.qubits(), vec![1, 4]);
        assert_eq!(pair.max_qubit(), 4);
    }

    #[test]
    fn test_targets_json() {
        let single: Targets = serde_json::from_str("2").unwrap();
        assert_eq!(single, Targets::Single(2));

        let pair: Targets = serde_json::from_str("[0, 1]").unwrap();
        assert_eq!(pair, Targets::Pair(0, 1));
    }

    #[test]
    fn test_iq_display() {
        let p = IqPoint::new(0.5, -1.25);
        assert_eq!(p.to_string(), "0.5 -1.25");
        assert_eq!(IqPoint::ZERO.to_string(), "0 0");
    }
}

//! Compiled pulse instructions
//!
//! The shared instruction representation consumed by all three execution
//! backends. Instances are created once by the compiler and immutable
//! afterwards; each backend pattern-matches exhaustively on the kind tag.

use crate::types::{Targets, WaveformIndex};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Instruction Kind
// ============================================================================

/// Kind tag of a compiled instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InstructionKind {
    /// Single-qubit XY drive pulse
    Gate1q,
    /// Single-qubit Z (flux) pulse
    Gate1qZ,
    /// Two-qubit coupler pulse
    Gate2q,
    /// Computational-basis measurement
    Measure,
    /// Reset to |0>
    Reset,
}

impl fmt::Display for InstructionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            InstructionKind::Gate1q => "gate_1q",
            InstructionKind::Gate1qZ => "gate_1q_z",
            InstructionKind::Gate2q => "gate_2q",
            InstructionKind::Measure => "measure",
            InstructionKind::Reset => "reset",
        };
        write!(f, "{name}")
    }
}

// ============================================================================
// Envelope
// ============================================================================

/// Time-domain coefficient payload of a compiled instruction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Envelope {
    /// No payload (measure, reset)
    None,
    /// In-phase/quadrature envelope pair for XY drive pulses
    Iq {
        /// In-phase samples, in physical drive units
        i: Vec<f64>,
        /// Quadrature samples, in physical drive units
        q: Vec<f64>,
    },
    /// Single real envelope for Z and two-qubit pulses
    Real(Vec<f64>),
}

impl Envelope {
    /// Number of samples, zero for `None`
    pub fn len(&self) -> usize {
        match self {
            Envelope::None => 0,
            Envelope::Iq { i, .. } => i.len(),
            Envelope::Real(coefs) => coefs.len(),
        }
    }

    /// True if no payload is present
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ============================================================================
// Gate Parameters
// ============================================================================

/// Analog parameters carried on a gate instruction line
///
/// A 1Q gate line carries a relative phase, an intermediate frequency, and an
/// amplitude multiplier. For square pulses the compiler records the matched
/// edge separation as `duration`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GateParams {
    /// Relative phase of the drive carrier (rad)
    pub phase: f64,
    /// Intermediate frequency of the drive carrier (rad/sample)
    pub freq: f64,
    /// Amplitude multiplier
    pub amp: f64,
    /// Pulse duration in samples, when known
    pub duration: Option<f64>,
}

impl GateParams {
    /// Create gate parameters without a recorded duration
    pub fn new(phase: f64, freq: f64, amp: f64) -> Self {
        Self {
            phase,
            freq,
            amp,
            duration: None,
        }
    }

    /// Set the recorded duration
    pub fn with_duration(mut self, duration: f64) -> Self {
        self.duration = Some(duration);
        self
    }
}

// ============================================================================
// Compiled Instruction
// ============================================================================

/// One fully resolved pulse instruction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompiledInstruction {
    /// Kind tag, matched exhaustively by every backend
    pub kind: InstructionKind,
    /// Target qubit or qubit pair
    pub targets: Targets,
    /// Waveform index the instruction was resolved from
    pub index: WaveformIndex,
    /// Sample-time offsets 0..len-1, absent for measure/reset
    pub tlist: Option<Vec<f64>>,
    /// Synthesized or expanded coefficient payload
    pub envelope: Envelope,
    /// Analog parameters from the raw instruction line
    pub params: Option<GateParams>,
    /// Absolute start time of the instruction, in samples
    pub delay: f64,
}

impl CompiledInstruction {
    /// Create a gate instruction with a time grid and envelope
    pub fn gate(
        kind: InstructionKind,
        targets: Targets,
        index: WaveformIndex,
        tlist: Vec<f64>,
        envelope: Envelope,
        params: Option<GateParams>,
        delay: f64,
    ) -> Self {
        Self {
            kind,
            targets,
            index,
            tlist: Some(tlist),
            envelope,
            params,
            delay,
        }
    }

    /// Create a reset instruction
    pub fn reset(targets: Targets, index: WaveformIndex) -> Self {
        Self {
            kind: InstructionKind::Reset,
            targets,
            index,
            tlist: None,
            envelope: Envelope::None,
            params: None,
            delay: 0.0,
        }
    }

    /// Create a measure instruction
    pub fn measure(targets: Targets, index: WaveformIndex, delay: f64) -> Self {
        Self {
            kind: InstructionKind::Measure,
            targets,
            index,
            tlist: None,
            envelope: Envelope::None,
            params: None,
            delay,
        }
    }

    /// Absolute end time of the instruction: delay plus the last time-grid
    /// offset, or the bare delay for instructions without a grid
    pub fn end_time(&self) -> f64 {
        match &self.tlist {
            Some(tlist) => self.delay + tlist.last().copied().unwrap_or(0.0),
            None => self.delay,
        }
    }
}

impl fmt::Display for CompiledInstruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}[{}] @{} ({} samples)",
            self.kind,
            self.targets,
            self.delay,
            self.envelope.len()
        )
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_display() {
        assert_eq!(InstructionKind::Gate1q.to_string(), "gate_1q");
        assert_eq!(InstructionKind::Gate1qZ.to_string(), "gate_1q_z");
        assert_eq!(InstructionKind::Measure.to_string(), "measure");
    }

    #[test]
    fn test_envelope_len() {
        assert_eq!(Envelope::None.len(), 0);
        assert!(Envelope::None.is_empty());
        let iq = Envelope::Iq {
            i: vec![0.0; 5],
            q: vec![0.0; 5],
        };
        assert_eq!(iq.len(), 5);
        assert_eq!(Envelope::Real(vec![1.0, 2.0]).len(), 2);
    }

    #[test]
    fn test_end_time() {
        let gate = CompiledInstruction::gate(
            InstructionKind::Gate1q,
            Targets::Single(0),
            0,
            vec![0.0, 1.0, 2.0],
            Envelope::Real(vec![0.0, 1.0, 0.0]),
            None,
            10.0,
        );
        assert_eq!(gate.end_time(), 12.0);

        let measure = CompiledInstruction::measure(Targets::Single(0), 128, 150.0);
        assert_eq!(measure.end_time(), 150.0);
    }

    #[test]
    fn test_gate_params_builder() {
        let p = GateParams::new(0.1, 0.2, 0.3).with_duration(100.0);
        assert_eq!(p.duration, Some(100.0));
        assert_eq!(p.phase, 0.1);
    }
}

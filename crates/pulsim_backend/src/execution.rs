//! Backend execution interface
//!
//! The shared contract between the engine and the three execution backends:
//! a compiled program plus a shot count in, one record per shot out.

use pulsim_compiler::CompiledProgram;
use pulsim_config::DeviceConfig;
use pulsim_core::{IqPoint, PulsimResult, QubitId, Shots};
use rand::RngCore;

// ============================================================================
// Results
// ============================================================================

/// Measurement outcome of one shot
#[derive(Debug, Clone, PartialEq)]
pub struct ShotRecord {
    /// One bit per measured qubit, in measurement order
    pub bits: Vec<u8>,
    /// One IQ point per measured qubit, in measurement order
    pub iq: Vec<IqPoint>,
}

/// Full result of a simulation run
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationResult {
    /// Measured qubits, in measurement order
    pub measured_qubits: Vec<QubitId>,
    /// One record per shot
    pub records: Vec<ShotRecord>,
}

impl SimulationResult {
    /// Number of shots in the result
    pub fn num_shots(&self) -> usize {
        self.records.len()
    }

    /// Fraction of shots whose bits equal the given pattern
    pub fn outcome_fraction(&self, bits: &[u8]) -> f64 {
        if self.records.is_empty() {
            return 0.0;
        }
        let hits = self.records.iter().filter(|r| r.bits == bits).count();
        hits as f64 / self.records.len() as f64
    }
}

// ============================================================================
// Backend Trait
// ============================================================================

/// A simulation backend
///
/// Implementations are stateless; all run state lives on the stack of
/// `execute`. Randomness is injected so runs are reproducible under a seeded
/// generator.
pub trait Backend {
    /// Stable backend name, used in diagnostics
    fn name(&self) -> &'static str;

    /// Execute a compiled program for the given number of shots
    fn execute(
        &self,
        config: &DeviceConfig,
        program: &CompiledProgram,
        shots: Shots,
        rng: &mut dyn RngCore,
    ) -> PulsimResult<SimulationResult>;
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_fraction() {
        let result = SimulationResult {
            measured_qubits: vec![0],
            records: vec![
                ShotRecord { bits: vec![0], iq: vec![IqPoint::ZERO] },
                ShotRecord { bits: vec![1], iq: vec![IqPoint::ZERO] },
                ShotRecord { bits: vec![1], iq: vec![IqPoint::ZERO] },
                ShotRecord { bits: vec![1], iq: vec![IqPoint::ZERO] },
            ],
        };
        assert_eq!(result.num_shots(), 4);
        assert_eq!(result.outcome_fraction(&[1]), 0.75);
        assert_eq!(result.outcome_fraction(&[0]), 0.25);
    }
}

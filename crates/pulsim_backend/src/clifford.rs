//! Clifford-level backend
//!
//! Polynomial-time stabilizer simulation for large registers. Each compiled
//! instruction is first translated into a Clifford operation; pulses whose
//! parameters fall outside the Clifford lookup table are rejected before any
//! shot runs. One fresh tableau is evolved per shot.
//!
//! This backend has no analog readout model: every IQ value is the zero
//! point.

use crate::execution::{Backend, ShotRecord, SimulationResult};
use crate::tableau::Tableau;
use pulsim_compiler::CompiledProgram;
use pulsim_config::DeviceConfig;
use pulsim_core::{
    CompiledInstruction, InstructionKind, IqPoint, PulsimError, PulsimResult, QubitId, Shots,
};
use rand::RngCore;
use std::f64::consts::FRAC_PI_2;

// ============================================================================
// Clifford Operations
// ============================================================================

/// Translated Clifford circuit operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CliffordOp {
    X(QubitId),
    Y(QubitId),
    SqrtX(QubitId),
    SqrtXDag(QubitId),
    SqrtY(QubitId),
    SqrtYDag(QubitId),
    Cz(QubitId, QubitId),
    Iswap(QubitId, QubitId),
    Measure(QubitId),
}

impl CliffordOp {
    fn apply(&self, tableau: &mut Tableau, rng: &mut dyn RngCore) -> Option<(QubitId, bool)> {
        match *self {
            CliffordOp::X(q) => tableau.x_gate(q),
            CliffordOp::Y(q) => tableau.y_gate(q),
            CliffordOp::SqrtX(q) => tableau.sqrt_x(q),
            CliffordOp::SqrtXDag(q) => tableau.sqrt_x_dag(q),
            CliffordOp::SqrtY(q) => tableau.sqrt_y(q),
            CliffordOp::SqrtYDag(q) => tableau.sqrt_y_dag(q),
            CliffordOp::Cz(a, b) => tableau.cz(a, b),
            CliffordOp::Iswap(a, b) => tableau.iswap(a, b),
            CliffordOp::Measure(q) => return Some((q, tableau.measure(q, rng))),
        }
        None
    }
}

/// Phase quadrant of a drive pulse: which multiple of pi/2 the phase
/// parameter truncates to
fn phase_quadrant(phase: f64) -> i64 {
    ((phase / FRAC_PI_2).trunc() as i64).rem_euclid(4)
}

fn translate(instr: &CompiledInstruction) -> PulsimResult<Option<CliffordOp>> {
    match instr.kind {
        InstructionKind::Gate1q => {
            let params = instr
                .params
                .ok_or_else(|| PulsimError::NonCliffordOperation("drive pulse without parameters".into()))?;
            let qubit = instr
                .targets
                .single()
                .ok_or_else(|| PulsimError::NonCliffordOperation("gate_1q on a qubit pair".into()))?;
            // a full-amplitude template at half amplitude is a half pulse
            let index = if instr.index == 0 && params.amp == 0.5 {
                1
            } else {
                instr.index
            };
            let quadrant = phase_quadrant(params.phase);
            let op = match (index, quadrant) {
                (0, 0) | (0, 2) => CliffordOp::X(qubit),
                (0, 1) | (0, 3) => CliffordOp::Y(qubit),
                (1, 0) => CliffordOp::SqrtX(qubit),
                (1, 1) => CliffordOp::SqrtY(qubit),
                (1, 2) => CliffordOp::SqrtXDag(qubit),
                (1, 3) => CliffordOp::SqrtYDag(qubit),
                _ => {
                    return Err(PulsimError::NonCliffordOperation(format!(
                        "drive pulse index {} at phase quadrant {quadrant}",
                        instr.index
                    )))
                }
            };
            Ok(Some(op))
        }
        InstructionKind::Gate2q => {
            let (a, b) = instr
                .targets
                .pair()
                .ok_or_else(|| PulsimError::NonCliffordOperation("gate_2q on a single qubit".into()))?;
            Ok(Some(if instr.index == 0 {
                CliffordOp::Cz(a, b)
            } else {
                CliffordOp::Iswap(a, b)
            }))
        }
        InstructionKind::Measure => {
            let qubit = instr
                .targets
                .single()
                .ok_or_else(|| PulsimError::NonCliffordOperation("measure on a qubit pair".into()))?;
            Ok(Some(CliffordOp::Measure(qubit)))
        }
        // the tableau starts in |0...0>
        InstructionKind::Reset => Ok(None),
        InstructionKind::Gate1qZ => Err(PulsimError::NonCliffordOperation(
            "flux pulse".into(),
        )),
    }
}

// ============================================================================
// Backend
// ============================================================================

/// Clifford-level tableau backend
pub struct CliffordLevelBackend;

impl Backend for CliffordLevelBackend {
    fn name(&self) -> &'static str {
        "clifford_level"
    }

    fn execute(
        &self,
        config: &DeviceConfig,
        program: &CompiledProgram,
        shots: Shots,
        rng: &mut dyn RngCore,
    ) -> PulsimResult<SimulationResult> {
        let num_qubits = config.num_qubits();

        // translate once, fail before any shot runs
        let ops: Vec<CliffordOp> = program
            .instructions
            .iter()
            .filter_map(|instr| translate(instr).transpose())
            .collect::<PulsimResult<_>>()?;

        let mut records = Vec::with_capacity(shots as usize);
        for _ in 0..shots {
            let mut tableau = Tableau::new(num_qubits);
            let mut latest: Vec<Option<bool>> = vec![None; num_qubits];
            for op in &ops {
                if let Some((qubit, outcome)) = op.apply(&mut tableau, rng) {
                    latest[qubit] = Some(outcome);
                }
            }
            let bits: Vec<u8> = program
                .measured_qubits
                .iter()
                .map(|&q| u8::from(latest[q].unwrap_or(false)))
                .collect();
            let iq = vec![IqPoint::ZERO; bits.len()];
            records.push(ShotRecord { bits, iq });
        }

        Ok(SimulationResult {
            measured_qubits: program.measured_qubits.clone(),
            records,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

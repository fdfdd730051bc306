//! Gate-level backend
//!
//! Closed-form unitary simulation: each drive instruction collapses to a 2x2
//! or 4x4 unitary applied to a statevector, ignoring pulse shapes and noise.
//! Fast and exact for calibrated pulses, wrong for anything that depends on
//! the actual envelope.

use crate::execution::{Backend, SimulationResult};
use crate::linalg::{C64, CMatrix, StateVector};
use crate::sampler;
use pulsim_compiler::CompiledProgram;
use pulsim_config::DeviceConfig;
use pulsim_core::constants::drive::PULSE_LEN;
use pulsim_core::{
    CompiledInstruction, GateParams, InstructionKind, PulsimError, PulsimResult, Shots,
    WaveformIndex,
};
use rand::RngCore;
use std::f64::consts::FRAC_PI_2;

// ============================================================================
// Closed-Form Unitaries
// ============================================================================

/// Single-qubit unitary from pulse parameters
///
/// Axis-angle form over {I, iZ, iX, iY}: the amplitude sets the X rotation
/// (halved for the half-amplitude template), the intermediate frequency sets
/// the Z rotation over the reference pulse length, and the drive phase plus
/// the accumulated carrier phase sets the azimuth. A zero total rotation
/// rate yields the identity.
pub fn single_qubit_unitary(index: WaveformIndex, params: &GateParams) -> CMatrix {
    let mut xangle = FRAC_PI_2 * params.amp;
    if index == 1 {
        xangle /= 2.0;
    }
    let zangle = PULSE_LEN / 2.0 * params.freq;
    let rate = (xangle * xangle + zangle * zangle).sqrt();
    if rate == 0.0 {
        return CMatrix::identity(2);
    }
    let mut angle = rate;
    if index == 2 {
        angle *= params.duration.unwrap_or(PULSE_LEN) / PULSE_LEN;
    }
    let azimuth = params.phase + PULSE_LEN * params.freq;

    let cos = angle.cos();
    let cz = -angle.sin() * zangle / rate;
    let cx = angle.sin() * xangle / rate * azimuth.cos();
    let cy = angle.sin() * xangle / rate * azimuth.sin();

    // cos*I + i*(cz*Z + cx*X + cy*Y)
    CMatrix::from_rows(&[
        vec![C64::new(cos, cz), C64::new(cy, cx)],
        vec![C64::new(-cy, cx), C64::new(cos, -cz)],
    ])
}

/// Two-qubit unitary from pulse parameters: conditional phase for index 0,
/// the iSWAP family otherwise
pub fn two_qubit_unitary(index: WaveformIndex, theta: f64) -> CMatrix {
    let zero = C64::new(0.0, 0.0);
    let one = C64::new(1.0, 0.0);
    if index == 0 {
        let mut m = CMatrix::identity(4);
        m.set(3, 3, C64::new(theta.cos(), theta.sin()));
        m
    } else {
        let cos = C64::new((theta / 2.0).cos(), 0.0);
        let isin = C64::new(0.0, (theta / 2.0).sin());
        CMatrix::from_rows(&[
            vec![one, zero, zero, zero],
            vec![zero, cos, isin, zero],
            vec![zero, isin, cos, zero],
            vec![zero, zero, zero, one],
        ])
    }
}

// ============================================================================
// Backend
// ============================================================================

/// Gate-level statevector backend
pub struct GateLevelBackend;

impl GateLevelBackend {
    fn params_of<'i>(&self, instr: &'i CompiledInstruction) -> PulsimResult<&'i GateParams> {
        instr
            .params
            .as_ref()
            .ok_or_else(|| PulsimError::UnsupportedInstruction {
                backend: self.name().into(),
                kind: format!("{} without analog parameters", instr.kind),
            })
    }
}

impl Backend for GateLevelBackend {
    fn name(&self) -> &'static str {
        "gate_level"
    }

    fn execute(
        &self,
        config: &DeviceConfig,
        program: &CompiledProgram,
        shots: Shots,
        rng: &mut dyn RngCore,
    ) -> PulsimResult<SimulationResult> {
        let num_qubits = config.num_qubits();
        let mut state = StateVector::zero_state(num_qubits);

        for instr in &program.instructions {
            match instr.kind {
                InstructionKind::Gate1q => {
                    let params = self.params_of(instr)?;
                    let qubit = instr.targets.single().ok_or_else(|| {
                        PulsimError::UnsupportedInstruction {
                            backend: self.name().into(),
                            kind: "gate_1q on a qubit pair".into(),
                        }
                    })?;
                    state.apply_single(&single_qubit_unitary(instr.index, params), qubit);
                }
                InstructionKind::Gate2q => {
                    let params = self.params_of(instr)?;
                    let (a, b) = instr.targets.pair().ok_or_else(|| {
                        PulsimError::UnsupportedInstruction {
                            backend: self.name().into(),
                            kind: "gate_2q on a single qubit".into(),
                        }
                    })?;
                    state.apply_pair(&two_qubit_unitary(instr.index, params.amp), a, b);
                }
                // no Z-line or reset model at the gate level
                InstructionKind::Gate1qZ | InstructionKind::Reset | InstructionKind::Measure => {}
            }
        }

        sampler::sample_from_probabilities(
            &state.probabilities(),
            num_qubits,
            &program.measured_qubits,
            config,
            shots,
            rng,
        )
    }
}

// ============================================================================
// Tests
// ============================================================================

//! Instruction compiler
//!
//! Converts the raw line-oriented instruction stream into compiled pulse
//! instructions: resolves each line against the device configuration, pairs
//! square-pulse edges across the stream, and expands waveform templates into
//! concrete time/amplitude arrays in physical drive units.

use crate::edges::{EdgeClass, OpenEdge, PendingEdges};
use pulsim_config::{ChannelConfig, ChannelKind, DeviceConfig};
use pulsim_core::constants::drive;
use pulsim_core::{
    CompiledInstruction, Envelope, GateParams, InstructionKind, PulsimError, PulsimResult, QubitId,
    Targets, WaveformDescriptor, WaveformIndex,
};

// ============================================================================
// Compiled Program
// ============================================================================

/// Output of a compilation pass
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledProgram {
    /// Compiled instructions, in stream order
    pub instructions: Vec<CompiledInstruction>,
    /// Measured qubits, in first-measured order
    pub measured_qubits: Vec<QubitId>,
}

impl CompiledProgram {
    /// Latest end time over all instructions, the simulation time horizon
    pub fn time_horizon(&self) -> f64 {
        self.instructions
            .iter()
            .map(CompiledInstruction::end_time)
            .fold(0.0, f64::max)
    }
}

// ============================================================================
// Parsed Line
// ============================================================================

/// One parsed instruction line: `<delay> <channel> <index> [params...]`
#[derive(Debug, Clone, PartialEq)]
struct RawInstruction {
    delay: f64,
    channel: String,
    index: WaveformIndex,
    extras: Vec<f64>,
}

impl RawInstruction {
    fn parse(line: &str, line_no: usize) -> PulsimResult<Self> {
        let malformed = |reason: String| PulsimError::MalformedInstruction {
            line: line_no,
            reason,
        };
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 3 {
            return Err(malformed(format!(
                "expected '<delay> <channel> <index> [params...]', got '{line}'"
            )));
        }
        let delay: i64 = fields[0]
            .parse()
            .map_err(|_| malformed(format!("bad delay '{}'", fields[0])))?;
        if delay < 0 {
            return Err(malformed(format!("negative delay {delay}")));
        }
        let index: WaveformIndex = fields[2]
            .parse()
            .map_err(|_| malformed(format!("bad waveform index '{}'", fields[2])))?;
        let extras: Vec<f64> = fields[3..]
            .iter()
            .map(|f| {
                f.parse::<f64>()
                    .map_err(|_| malformed(format!("bad parameter '{f}'")))
            })
            .collect::<PulsimResult<_>>()?;
        Ok(Self {
            delay: delay as f64,
            channel: fields[1].to_string(),
            index,
            extras,
        })
    }

    /// Analog gate parameters, when the line carries them
    fn gate_params(&self) -> Option<GateParams> {
        if self.extras.len() < 3 {
            return None;
        }
        let mut params = GateParams::new(self.extras[0], self.extras[1], self.extras[2]);
        params.duration = self.extras.get(3).copied();
        Some(params)
    }

    fn require_gate_params(&self, line_no: usize) -> PulsimResult<GateParams> {
        self.gate_params()
            .ok_or_else(|| PulsimError::MalformedInstruction {
                line: line_no,
                reason: "gate instruction missing phase/frequency/amplitude parameters".into(),
            })
    }
}

// ============================================================================
// Compiler
// ============================================================================

/// Stateful compiler over one instruction stream
pub struct InstructionCompiler<'a> {
    config: &'a DeviceConfig,
    pending: PendingEdges,
    instructions: Vec<CompiledInstruction>,
    measured_qubits: Vec<QubitId>,
}

impl<'a> InstructionCompiler<'a> {
    /// Create a compiler bound to one device configuration
    pub fn new(config: &'a DeviceConfig) -> Self {
        Self {
            config,
            pending: PendingEdges::new(),
            instructions: Vec::new(),
            measured_qubits: Vec::new(),
        }
    }

    /// Compile an instruction stream body (shot-count header already removed)
    pub fn compile<'s>(
        mut self,
        lines: impl IntoIterator<Item = &'s str>,
    ) -> PulsimResult<CompiledProgram> {
        for (idx, line) in lines.into_iter().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let raw = RawInstruction::parse(line, idx + 1)?;
            self.compile_one(&raw, idx + 1)?;
        }
        self.pending.finish()?;
        Ok(CompiledProgram {
            instructions: self.instructions,
            measured_qubits: self.measured_qubits,
        })
    }

    fn compile_one(&mut self, raw: &RawInstruction, line_no: usize) -> PulsimResult<()> {
        let channel = self.config.channel(&raw.channel)?;
        match channel.kind {
            ChannelKind::OneQubit => self.compile_single_qubit(raw, channel, line_no),
            ChannelKind::TwoQubit => self.compile_two_qubit(raw, channel, line_no),
        }
    }

    fn compile_single_qubit(
        &mut self,
        raw: &RawInstruction,
        channel: &ChannelConfig,
        line_no: usize,
    ) -> PulsimResult<()> {
        let qubit = channel
            .target
            .single()
            .ok_or_else(|| PulsimError::InvalidChannel {
                channel: raw.channel.clone(),
                reason: "1Q channel with a pair target".into(),
            })?;
        let descriptor = channel.waveform(&raw.channel, raw.index)?;
        match descriptor {
            WaveformDescriptor::XyWaveform { i, q } => {
                let params = raw.require_gate_params(line_no)?;
                let scale = |codes: &[f64]| -> Vec<f64> {
                    codes.iter().map(|&c| c * drive::CODE_TO_AMP).collect()
                };
                self.instructions.push(CompiledInstruction::gate(
                    InstructionKind::Gate1q,
                    channel.target,
                    raw.index,
                    sample_grid(i.len()),
                    Envelope::Iq {
                        i: scale(i),
                        q: scale(q),
                    },
                    Some(params),
                    raw.delay,
                ));
            }
            WaveformDescriptor::XySquareUp => {
                let params = raw.require_gate_params(line_no)?;
                self.pending.raise(
                    EdgeClass::Xy,
                    qubit,
                    OpenEdge {
                        index: raw.index,
                        params: Some(params),
                        delay: raw.delay,
                    },
                )?;
            }
            WaveformDescriptor::XySquareDown => {
                let edge = self.pending.fall(EdgeClass::Xy, qubit)?;
                self.instructions
                    .push(synthesize_xy_square(qubit, &edge, raw.delay)?);
            }
            WaveformDescriptor::ZSquareUp => {
                self.pending.raise(
                    EdgeClass::Z,
                    qubit,
                    OpenEdge {
                        index: raw.index,
                        params: raw.gate_params(),
                        delay: raw.delay,
                    },
                )?;
            }
            WaveformDescriptor::ZSquareDown => {
                let edge = self.pending.fall(EdgeClass::Z, qubit)?;
                self.instructions
                    .push(synthesize_z_square(qubit, &edge, raw.delay)?);
            }
            WaveformDescriptor::ZWaveform(coefs) => {
                self.instructions.push(CompiledInstruction::gate(
                    InstructionKind::Gate1qZ,
                    channel.target,
                    raw.index,
                    sample_grid(coefs.len()),
                    Envelope::Real(coefs.clone()),
                    raw.gate_params(),
                    raw.delay,
                ));
            }
            WaveformDescriptor::Reset => {
                self.instructions
                    .push(CompiledInstruction::reset(channel.target, raw.index));
            }
            WaveformDescriptor::Measure => {
                self.instructions.push(CompiledInstruction::measure(
                    channel.target,
                    raw.index,
                    raw.delay,
                ));
                if !self.measured_qubits.contains(&qubit) {
                    self.measured_qubits.push(qubit);
                }
            }
            WaveformDescriptor::Raw(_) => {
                return Err(PulsimError::InvalidChannel {
                    channel: raw.channel.clone(),
                    reason: "raw coefficient template on a 1Q channel".into(),
                });
            }
        }
        Ok(())
    }

    fn compile_two_qubit(
        &mut self,
        raw: &RawInstruction,
        channel: &ChannelConfig,
        line_no: usize,
    ) -> PulsimResult<()> {
        let descriptor = channel.waveform(&raw.channel, raw.index)?;
        let coefs = match descriptor {
            WaveformDescriptor::Raw(coefs) => coefs.clone(),
            other => {
                return Err(PulsimError::InvalidChannel {
                    channel: raw.channel.clone(),
                    reason: format!("2Q channel holds non-raw descriptor {other:?}"),
                });
            }
        };
        let params = raw.require_gate_params(line_no)?;
        self.instructions.push(CompiledInstruction::gate(
            InstructionKind::Gate2q,
            channel.target,
            raw.index,
            sample_grid(coefs.len()),
            Envelope::Real(coefs),
            Some(params),
            raw.delay,
        ));
        Ok(())
    }
}

/// Compile a stream body against a configuration in one call
pub fn compile_program<'s>(
    config: &DeviceConfig,
    lines: impl IntoIterator<Item = &'s str>,
) -> PulsimResult<CompiledProgram> {
    InstructionCompiler::new(config).compile(lines)
}

// ============================================================================
// Envelope Synthesis
// ============================================================================

fn sample_grid(len: usize) -> Vec<f64> {
    (0..len).map(|k| k as f64).collect()
}

/// Trapezoidal XY square pulse from a matched edge pair.
///
/// Envelope length is (fall - rise) + 1. The plateau amplitude carries the
/// (n-1)/(n-2) rescaling that keeps the integrated drive independent of
/// pulse length; it is undefined below 3 samples, which is rejected.
fn synthesize_xy_square(
    qubit: QubitId,
    edge: &OpenEdge,
    fall_delay: f64,
) -> PulsimResult<CompiledInstruction> {
    let samples = square_sample_count(qubit, edge.delay, fall_delay)?;
    if samples < 3 {
        return Err(PulsimError::SquarePulseTooShort { qubit, samples });
    }
    let plateau = drive::DRIVE_AMP * (samples - 1) as f64 / (samples - 2) as f64;
    let mut i = vec![plateau; samples];
    i[0] = 0.0;
    i[samples - 1] = 0.0;
    let q = vec![0.0; samples];

    Ok(CompiledInstruction::gate(
        InstructionKind::Gate1q,
        Targets::Single(qubit),
        edge.index,
        sample_grid(samples),
        Envelope::Iq { i, q },
        edge.params
            .map(|p| p.with_duration(fall_delay - edge.delay)),
        edge.delay,
    ))
}

/// Flat Z square pulse from a matched edge pair: unit plateau, zero at both
/// boundaries. Two samples (a bare up/down) is the shortest well-formed case.
fn synthesize_z_square(
    qubit: QubitId,
    edge: &OpenEdge,
    fall_delay: f64,
) -> PulsimResult<CompiledInstruction> {
    let samples = square_sample_count(qubit, edge.delay, fall_delay)?;
    let mut coefs = vec![1.0; samples];
    coefs[0] = 0.0;
    coefs[samples - 1] = 0.0;

    Ok(CompiledInstruction::gate(
        InstructionKind::Gate1qZ,
        Targets::Single(qubit),
        edge.index,
        sample_grid(samples),
        Envelope::Real(coefs),
        edge.params
            .map(|p| p.with_duration(fall_delay - edge.delay)),
        edge.delay,
    ))
}

fn square_sample_count(qubit: QubitId, rise: f64, fall: f64) -> PulsimResult<usize> {
    let duration = fall - rise;
    if duration < 1.0 {
        return Err(PulsimError::SquarePulseTooShort {
            qubit,
            samples: duration.max(0.0) as usize + 1,
        });
    }
    Ok(duration as usize + 1)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use pulsim_config::Topology;

    fn config() -> DeviceConfig {
        DeviceConfig::standard(Topology::linear(2)).unwrap()
    }

    #[test]
    fn test_reset_square_measure_scenario() {
        // reset, square up, square down, measure
        let cfg = config();
        let program = compile_program(
            &cfg,
            ["0 0 127", "0 0 2 0 0 1", "100 0 3 0 0 1", "150 0 128"],
        )
        .unwrap();

        assert_eq!(program.instructions.len(), 3);
        assert_eq!(program.instructions[0].kind, InstructionKind::Reset);
        assert_eq!(program.instructions[1].kind, InstructionKind::Gate1q);
        assert_eq!(program.instructions[2].kind, InstructionKind::Measure);
        assert_eq!(program.measured_qubits, vec![0]);

        let gate = &program.instructions[1];
        assert_eq!(gate.envelope.len(), 101);
        assert_eq!(gate.delay, 0.0);
        assert_eq!(gate.index, 2);
        assert_eq!(gate.params.unwrap().duration, Some(100.0));
        assert_eq!(program.time_horizon(), 150.0);
    }

    #[test]
    fn test_square_envelope_boundaries_are_zero() {
        let cfg = config();
        for d in [2u32, 3, 10, 100] {
            let up = "0 0 2 0 0 1".to_string();
            let down = format!("{d} 0 3 0 0 1");
            let program = compile_program(&cfg, [up.as_str(), down.as_str()]).unwrap();
            match &program.instructions[0].envelope {
                Envelope::Iq { i, q } => {
                    assert_eq!(i.len(), d as usize + 1);
                    assert_eq!(i[0], 0.0);
                    assert_eq!(*i.last().unwrap(), 0.0);
                    assert!(q.iter().all(|&v| v == 0.0));
                }
                other => panic!("unexpected envelope {other:?}"),
            }
        }
    }

    #[test]
    fn test_square_plateau_rescaling() {
        let cfg = config();
        let program = compile_program(&cfg, ["0 0 2 0 0 1", "4 0 3 0 0 1"]).unwrap();
        match &program.instructions[0].envelope {
            Envelope::Iq { i, .. } => {
                // 5 samples: plateau = AMP * 4 / 3
                assert_relative_eq!(i[1], drive::DRIVE_AMP * 4.0 / 3.0);
                assert_relative_eq!(i[2], i[1]);
                assert_relative_eq!(i[3], i[1]);
            }
            other => panic!("unexpected envelope {other:?}"),
        }
    }

    #[test]
    fn test_two_sample_xy_square_is_rejected() {
        // (n-1)/(n-2) is undefined at n = 2
        let cfg = config();
        let err = compile_program(&cfg, ["0 0 2 0 0 1", "1 0 3 0 0 1"]).unwrap_err();
        assert_eq!(
            err,
            PulsimError::SquarePulseTooShort {
                qubit: 0,
                samples: 2
            }
        );
    }

    #[test]
    fn test_two_sample_z_square_is_flat_zero() {
        let cfg = config();
        let program = compile_program(&cfg, ["0 0 64 0 0 1", "1 0 65 0 0 1"]).unwrap();
        assert_eq!(
            program.instructions[0].envelope,
            Envelope::Real(vec![0.0, 0.0])
        );
    }

    #[test]
    fn test_z_square_unit_plateau() {
        let cfg = config();
        let program = compile_program(&cfg, ["10 0 64 0 0 0.5", "14 0 65 0 0 0.5"]).unwrap();
        let gate = &program.instructions[0];
        assert_eq!(gate.kind, InstructionKind::Gate1qZ);
        assert_eq!(gate.delay, 10.0);
        assert_eq!(
            gate.envelope,
            Envelope::Real(vec![0.0, 1.0, 1.0, 1.0, 0.0])
        );
    }

    #[test]
    fn test_duplicate_raising_edge() {
        let cfg = config();
        let err = compile_program(&cfg, ["0 0 2 0 0 1", "5 0 2 0 0 1"]).unwrap_err();
        assert_eq!(err, PulsimError::DuplicateRaisingEdge { qubit: 0 });
    }

    #[test]
    fn test_falling_edge_before_raising_edge() {
        let cfg = config();
        let err = compile_program(&cfg, ["5 0 3 0 0 1"]).unwrap_err();
        assert_eq!(err, PulsimError::UnmatchedFallingEdge { qubit: 0 });
    }

    #[test]
    fn test_unterminated_square_pulse() {
        let cfg = config();
        let err = compile_program(&cfg, ["0 0 2 0 0 1"]).unwrap_err();
        assert_eq!(err, PulsimError::UnterminatedSquarePulse { qubit: 0 });
    }

    #[test]
    fn test_xy_and_z_edges_are_independent() {
        let cfg = config();
        let program = compile_program(
            &cfg,
            ["0 0 2 0 0 1", "0 0 64 0 0 1", "10 0 3 0 0 1", "12 0 65 0 0 1"],
        )
        .unwrap();
        assert_eq!(program.instructions.len(), 2);
        assert_eq!(program.instructions[0].kind, InstructionKind::Gate1q);
        assert_eq!(program.instructions[1].kind, InstructionKind::Gate1qZ);
    }

    #[test]
    fn test_xy_waveform_code_scaling() {
        let cfg = config();
        let program = compile_program(&cfg, ["0 0 0 0.1 0.2 1.0"]).unwrap();
        let gate = &program.instructions[0];
        assert_eq!(gate.kind, InstructionKind::Gate1q);
        match &gate.envelope {
            Envelope::Iq { i, .. } => {
                // full-scale raised cosine peak: 2 * FULL_SCALE codes
                assert_relative_eq!(i[50], 2.0 * drive::FULL_SCALE * drive::CODE_TO_AMP);
                assert_eq!(i[0], 0.0);
            }
            other => panic!("unexpected envelope {other:?}"),
        }
        let params = gate.params.unwrap();
        assert_eq!(params.phase, 0.1);
        assert_eq!(params.freq, 0.2);
        assert_eq!(params.amp, 1.0);
    }

    #[test]
    fn test_two_qubit_envelope_verbatim() {
        let cfg = config();
        let program = compile_program(&cfg, ["0 1024 0 0 0 1.5708"]).unwrap();
        let gate = &program.instructions[0];
        assert_eq!(gate.kind, InstructionKind::Gate2q);
        assert_eq!(gate.targets, Targets::Pair(0, 1));
        match &gate.envelope {
            Envelope::Real(coefs) => {
                assert_eq!(coefs.len(), 101);
                assert_relative_eq!(coefs[0], std::f64::consts::PI / 100.0);
            }
            other => panic!("unexpected envelope {other:?}"),
        }
    }

    #[test]
    fn test_unknown_channel_and_waveform() {
        let cfg = config();
        assert_eq!(
            compile_program(&cfg, ["0 99 127"]).unwrap_err(),
            PulsimError::UnknownChannel("99".into())
        );
        assert_eq!(
            compile_program(&cfg, ["0 0 42 0 0 1"]).unwrap_err(),
            PulsimError::UnknownWaveform {
                channel: "0".into(),
                index: 42
            }
        );
    }

    #[test]
    fn test_malformed_lines() {
        let cfg = config();
        assert!(matches!(
            compile_program(&cfg, ["0 0"]).unwrap_err(),
            PulsimError::MalformedInstruction { line: 1, .. }
        ));
        assert!(matches!(
            compile_program(&cfg, ["-5 0 127"]).unwrap_err(),
            PulsimError::MalformedInstruction { line: 1, .. }
        ));
        // gate line without analog parameters
        assert!(matches!(
            compile_program(&cfg, ["0 0 0"]).unwrap_err(),
            PulsimError::MalformedInstruction { line: 1, .. }
        ));
    }

    #[test]
    fn test_measured_qubits_first_seen_order() {
        let cfg = config();
        let program =
            compile_program(&cfg, ["0 1 128", "0 0 128", "10 1 128"]).unwrap();
        assert_eq!(program.measured_qubits, vec![1, 0]);
        assert_eq!(program.instructions.len(), 3);
    }

    #[test]
    fn test_blank_lines_skipped() {
        let cfg = config();
        let program = compile_program(&cfg, ["", "0 0 127", "   ", "5 0 128"]).unwrap();
        assert_eq!(program.instructions.len(), 2);
    }

    #[test]
    fn test_patched_z_waveform_compiles() {
        let mut cfg = config();
        let patch = pulsim_config::EnvelopePatch {
            channel: "0".into(),
            index: 70,
            samples: vec![0.0, 1.0, 1.0, 0.0],
        };
        patch.apply(&mut cfg).unwrap();
        let program = compile_program(&cfg, ["3 0 70 0 0 0.8"]).unwrap();
        let gate = &program.instructions[0];
        assert_eq!(gate.kind, InstructionKind::Gate1qZ);
        assert_eq!(gate.envelope, Envelope::Real(vec![0.0, 1.0, 1.0, 0.0]));
        assert_eq!(gate.delay, 3.0);
    }
}

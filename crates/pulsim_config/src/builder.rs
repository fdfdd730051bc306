//! Default device configuration synthesis
//!
//! Builds a complete device configuration from a topology description,
//! populating every qubit with a mock noise/readout model and every channel
//! with the standard waveform table: sinusoidal pi and pi/2 drive envelopes,
//! square-edge markers, reset/measure indices, and square CZ/iSWAP coupler
//! templates.

use crate::device::{ChannelConfig, ChannelKind, DeviceConfig, NoiseParams, QubitConfig, ReadoutCenter};
use crate::topology::Topology;
use pulsim_core::constants::{channel, drive, waveform};
use pulsim_core::{PulsimResult, Targets, WaveformDescriptor};
use std::collections::BTreeMap;
use std::f64::consts::PI;

/// Default relaxation times assigned to every qubit, in samples
pub const DEFAULT_T1: f64 = 4000.0;
/// Default dephasing time assigned to every qubit, in samples
pub const DEFAULT_T2: f64 = 4000.0;

/// Builder for a standard device configuration
#[derive(Debug, Clone)]
pub struct DeviceConfigBuilder {
    topology: Topology,
    t1: Option<f64>,
    t2: Option<f64>,
}

impl DeviceConfigBuilder {
    /// Start from a topology with the default noise model
    pub fn new(topology: Topology) -> Self {
        Self {
            topology,
            t1: Some(DEFAULT_T1),
            t2: Some(DEFAULT_T2),
        }
    }

    /// Override the per-qubit T1 (None disables energy relaxation)
    pub fn with_t1(mut self, t1: Option<f64>) -> Self {
        self.t1 = t1;
        self
    }

    /// Override the per-qubit T2 (None disables dephasing)
    pub fn with_t2(mut self, t2: Option<f64>) -> Self {
        self.t2 = t2;
        self
    }

    /// Synthesize the full configuration
    pub fn build(self) -> PulsimResult<DeviceConfig> {
        let mut qubits = BTreeMap::new();
        for &q in &self.topology.qubit_list {
            qubits.insert(
                q,
                QubitConfig {
                    noise: Some(NoiseParams {
                        t1: self.t1,
                        t2: self.t2,
                    }),
                    readout_center: ReadoutCenter {
                        zero: [0.0, 1.0],
                        one: [1.0, 0.0],
                    },
                },
            );
        }

        let sq_table = single_qubit_waveforms();
        let tq_table = two_qubit_waveforms();

        let mut channels = BTreeMap::new();
        for (index, &q) in self.topology.qubit_list.iter().enumerate() {
            channels.insert(
                index.to_string(),
                ChannelConfig {
                    kind: ChannelKind::OneQubit,
                    target: Targets::Single(q),
                    waveforms: sq_table.clone(),
                },
            );
        }
        for (k, &(a, b)) in self.topology.qubit_topology.iter().enumerate() {
            let id = channel::TWO_QUBIT_BASE as usize + k;
            channels.insert(
                id.to_string(),
                ChannelConfig {
                    kind: ChannelKind::TwoQubit,
                    target: Targets::Pair(a, b),
                    waveforms: tq_table.clone(),
                },
            );
        }

        let config = DeviceConfig { qubits, channels };
        config.validate()?;
        Ok(config)
    }
}

impl DeviceConfig {
    /// Standard configuration for a topology, with default noise and readout
    pub fn standard(topology: Topology) -> PulsimResult<Self> {
        DeviceConfigBuilder::new(topology).build()
    }
}

/// Standard single-qubit waveform table
fn single_qubit_waveforms() -> BTreeMap<u32, WaveformDescriptor> {
    let n = drive::PULSE_LEN as usize + 1;
    let pulse_null = vec![0.0; n];
    // Raised-cosine envelopes, truncated to integer DAC codes
    let pulse_full: Vec<f64> = (0..n)
        .map(|k| (drive::FULL_SCALE * (1.0 - (k as f64 / 50.0 * PI).cos())).trunc())
        .collect();
    let pulse_half: Vec<f64> = (0..n)
        .map(|k| (drive::FULL_SCALE / 2.0 * (1.0 - (k as f64 / 50.0 * PI).cos())).trunc())
        .collect();

    let mut table = BTreeMap::new();
    table.insert(
        waveform::PI_PULSE,
        WaveformDescriptor::XyWaveform {
            i: pulse_full,
            q: pulse_null.clone(),
        },
    );
    table.insert(
        waveform::PI_HALF_PULSE,
        WaveformDescriptor::XyWaveform {
            i: pulse_half,
            q: pulse_null,
        },
    );
    table.insert(waveform::XY_SQUARE_UP, WaveformDescriptor::XySquareUp);
    table.insert(waveform::XY_SQUARE_DOWN, WaveformDescriptor::XySquareDown);
    table.insert(waveform::Z_SQUARE_UP, WaveformDescriptor::ZSquareUp);
    table.insert(waveform::Z_SQUARE_DOWN, WaveformDescriptor::ZSquareDown);
    table.insert(waveform::RESET, WaveformDescriptor::Reset);
    table.insert(waveform::MEASURE, WaveformDescriptor::Measure);
    table
}

/// Standard two-qubit waveform table: square CZ and iSWAP templates
fn two_qubit_waveforms() -> BTreeMap<u32, WaveformDescriptor> {
    let mut envelope = vec![PI / 100.0; 50];
    envelope.extend(vec![0.0; 51]);

    let mut table = BTreeMap::new();
    table.insert(waveform::CZ, WaveformDescriptor::Raw(envelope.clone()));
    table.insert(waveform::ISWAP, WaveformDescriptor::Raw(envelope));
    table
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_config_shape() {
        let config = DeviceConfig::standard(Topology::linear(3)).unwrap();
        assert_eq!(config.num_qubits(), 3);
        // one drive channel per qubit, one coupler channel per pair
        assert_eq!(config.channels.len(), 5);
        assert!(config.channels.contains_key("0"));
        assert!(config.channels.contains_key("1024"));
        assert!(config.channels.contains_key("1025"));
    }

    #[test]
    fn test_standard_waveform_table() {
        let config = DeviceConfig::standard(Topology::linear(2)).unwrap();
        let ch = config.channel("0").unwrap();
        assert_eq!(ch.waveform("0", 127).unwrap(), &WaveformDescriptor::Reset);
        assert_eq!(ch.waveform("0", 128).unwrap(), &WaveformDescriptor::Measure);
        assert_eq!(ch.waveform("0", 2).unwrap(), &WaveformDescriptor::XySquareUp);
        assert_eq!(ch.waveform("0", 64).unwrap(), &WaveformDescriptor::ZSquareUp);

        match ch.waveform("0", 0).unwrap() {
            WaveformDescriptor::XyWaveform { i, q } => {
                assert_eq!(i.len(), 101);
                // raised cosine: zero at the ends, 2x full scale at center
                assert_eq!(i[0], 0.0);
                assert_eq!(i[50], 2.0 * drive::FULL_SCALE);
                assert!(q.iter().all(|&v| v == 0.0));
            }
            other => panic!("unexpected descriptor {other:?}"),
        }
    }

    #[test]
    fn test_half_pulse_is_half_amplitude() {
        let config = DeviceConfig::standard(Topology::linear(1)).unwrap();
        let ch = config.channel("0").unwrap();
        let (full, half) = match (ch.waveform("0", 0).unwrap(), ch.waveform("0", 1).unwrap()) {
            (
                WaveformDescriptor::XyWaveform { i: full, .. },
                WaveformDescriptor::XyWaveform { i: half, .. },
            ) => (full.clone(), half.clone()),
            other => panic!("unexpected descriptors {other:?}"),
        };
        assert_eq!(half[50] * 2.0, full[50]);
    }

    #[test]
    fn test_coupler_templates() {
        let config = DeviceConfig::standard(Topology::linear(2)).unwrap();
        let coupler = config.channel("1024").unwrap();
        assert_eq!(coupler.target, Targets::Pair(0, 1));
        match coupler.waveform("1024", 0).unwrap() {
            WaveformDescriptor::Raw(coefs) => {
                assert_eq!(coefs.len(), 101);
                assert_eq!(coefs[0], PI / 100.0);
                assert_eq!(coefs[49], PI / 100.0);
                assert_eq!(coefs[50], 0.0);
            }
            other => panic!("unexpected descriptor {other:?}"),
        }
    }

    #[test]
    fn test_noise_override() {
        let config = DeviceConfigBuilder::new(Topology::linear(1))
            .with_t1(None)
            .with_t2(Some(2000.0))
            .build()
            .unwrap();
        assert_eq!(config.t1_list(), vec![None]);
        assert_eq!(config.t2_list(), vec![Some(2000.0)]);
    }
}

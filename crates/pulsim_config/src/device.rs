//! Device configuration model
//!
//! Static description of the simulated device: per-qubit noise parameters and
//! readout centers, plus the channel map with its indexed waveform tables.
//! Loaded once per run from the control-stack JSON document and read-only
//! afterwards.

use pulsim_core::{ChannelId, PulsimError, PulsimResult, QubitId, Targets, WaveformDescriptor};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// ============================================================================
// Qubit Configuration
// ============================================================================

/// Relaxation parameters of a single qubit, in samples
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct NoiseParams {
    /// Energy relaxation time T1
    #[serde(default)]
    pub t1: Option<f64>,
    /// Dephasing time T2
    #[serde(default)]
    pub t2: Option<f64>,
}

/// Per-outcome readout centers in the IQ plane
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReadoutCenter {
    /// Center of the |0> blob
    #[serde(rename = "0")]
    pub zero: [f64; 2],
    /// Center of the |1> blob
    #[serde(rename = "1")]
    pub one: [f64; 2],
}

impl ReadoutCenter {
    /// Center for a measured bit value
    pub fn for_bit(&self, bit: u8) -> [f64; 2] {
        if bit == 0 {
            self.zero
        } else {
            self.one
        }
    }
}

/// Static description of one qubit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QubitConfig {
    /// Noise parameters; absent means the qubit is noiseless
    #[serde(default)]
    pub noise: Option<NoiseParams>,
    /// Readout centers for IQ synthesis
    pub readout_center: ReadoutCenter,
}

impl QubitConfig {
    /// T1 relaxation time, if configured
    pub fn t1(&self) -> Option<f64> {
        self.noise.and_then(|n| n.t1)
    }

    /// T2 dephasing time, if configured
    pub fn t2(&self) -> Option<f64> {
        self.noise.and_then(|n| n.t2)
    }
}

// ============================================================================
// Channel Configuration
// ============================================================================

/// Channel kind: drive/flux line on one qubit, or coupler on a pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChannelKind {
    /// Single-qubit channel
    #[serde(rename = "1Q")]
    OneQubit,
    /// Two-qubit (coupler) channel
    #[serde(rename = "2Q")]
    TwoQubit,
}

impl fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChannelKind::OneQubit => write!(f, "1Q"),
            ChannelKind::TwoQubit => write!(f, "2Q"),
        }
    }
}

/// Static description of one control channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelConfig {
    /// Channel kind
    #[serde(rename = "type")]
    pub kind: ChannelKind,
    /// Target qubit or qubit pair
    pub target: Targets,
    /// Indexed waveform template table
    pub waveforms: BTreeMap<u32, WaveformDescriptor>,
}

impl ChannelConfig {
    /// Look up a waveform template by index
    pub fn waveform(&self, channel: &str, index: u32) -> PulsimResult<&WaveformDescriptor> {
        self.waveforms
            .get(&index)
            .ok_or_else(|| PulsimError::UnknownWaveform {
                channel: channel.to_string(),
                index,
            })
    }
}

// ============================================================================
// Device Configuration
// ============================================================================

/// Full device configuration: qubits and channels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceConfig {
    /// Qubit map, keyed by qubit id
    pub qubits: BTreeMap<QubitId, QubitConfig>,
    /// Channel map, keyed by channel id
    pub channels: BTreeMap<ChannelId, ChannelConfig>,
}

impl DeviceConfig {
    /// Parse a configuration document from JSON and validate it
    pub fn from_json(text: &str) -> PulsimResult<Self> {
        let config: DeviceConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize back to the JSON document form
    pub fn to_json(&self) -> PulsimResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Number of qubits on the device
    pub fn num_qubits(&self) -> usize {
        self.qubits.len()
    }

    /// Look up a channel by id
    pub fn channel(&self, id: &str) -> PulsimResult<&ChannelConfig> {
        self.channels
            .get(id)
            .ok_or_else(|| PulsimError::UnknownChannel(id.to_string()))
    }

    /// T1 list in qubit-id order, `None` entries for noiseless qubits
    pub fn t1_list(&self) -> Vec<Option<f64>> {
        self.qubits.values().map(QubitConfig::t1).collect()
    }

    /// T2 list in qubit-id order
    pub fn t2_list(&self) -> Vec<Option<f64>> {
        self.qubits.values().map(QubitConfig::t2).collect()
    }

    /// Readout center for one qubit
    pub fn readout_center(&self, qubit: QubitId) -> PulsimResult<&ReadoutCenter> {
        self.qubits
            .get(&qubit)
            .map(|q| &q.readout_center)
            .ok_or(PulsimError::UnknownQubit(qubit))
    }

    /// Validate internal consistency: qubit ids are contiguous from zero and
    /// every channel targets configured qubits with the right arity
    pub fn validate(&self) -> PulsimResult<()> {
        for (expected, &id) in self.qubits.keys().enumerate() {
            if id != expected {
                return Err(PulsimError::UnknownQubit(expected));
            }
        }
        for (id, channel) in &self.channels {
            match (channel.kind, channel.target) {
                (ChannelKind::OneQubit, Targets::Single(q)) => {
                    if !self.qubits.contains_key(&q) {
                        return Err(PulsimError::UnknownQubit(q));
                    }
                }
                (ChannelKind::TwoQubit, Targets::Pair(a, b)) => {
                    for q in [a, b] {
                        if !self.qubits.contains_key(&q) {
                            return Err(PulsimError::UnknownQubit(q));
                        }
                    }
                }
                (kind, target) => {
                    return Err(PulsimError::InvalidChannel {
                        channel: id.clone(),
                        reason: format!("{kind} channel with target {target}"),
                    });
                }
            }
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_json() -> &'static str {
        r#"{
            "qubits": {
                "0": {"noise": {"t1": 4000, "t2": 4000},
                      "readout_center": {"0": [0, 1], "1": [1, 0]}},
                "1": {"readout_center": {"0": [0, 1], "1": [1, 0]}}
            },
            "channels": {
                "0": {"type": "1Q", "target": 0,
                      "waveforms": {"127": ["reset"], "128": ["measure"]}},
                "1024": {"type": "2Q", "target": [0, 1],
                         "waveforms": {"0": [[0.5, 0.5]]}}
            }
        }"#
    }

    #[test]
    fn test_parse_device_config() {
        let config = DeviceConfig::from_json(sample_json()).unwrap();
        assert_eq!(config.num_qubits(), 2);
        assert_eq!(config.t1_list(), vec![Some(4000.0), None]);
        assert_eq!(config.t2_list(), vec![Some(4000.0), None]);

        let ch = config.channel("0").unwrap();
        assert_eq!(ch.kind, ChannelKind::OneQubit);
        assert_eq!(ch.target, Targets::Single(0));
        assert_eq!(ch.waveform("0", 127).unwrap(), &WaveformDescriptor::Reset);

        let coupler = config.channel("1024").unwrap();
        assert_eq!(coupler.target, Targets::Pair(0, 1));
        assert_eq!(
            coupler.waveform("1024", 0).unwrap(),
            &WaveformDescriptor::Raw(vec![0.5, 0.5])
        );
    }

    #[test]
    fn test_unknown_channel_and_waveform() {
        let config = DeviceConfig::from_json(sample_json()).unwrap();
        assert_eq!(
            config.channel("7").unwrap_err(),
            PulsimError::UnknownChannel("7".into())
        );
        let ch = config.channel("0").unwrap();
        assert_eq!(
            ch.waveform("0", 42).unwrap_err(),
            PulsimError::UnknownWaveform {
                channel: "0".into(),
                index: 42
            }
        );
    }

    #[test]
    fn test_readout_center_lookup() {
        let config = DeviceConfig::from_json(sample_json()).unwrap();
        let center = config.readout_center(0).unwrap();
        assert_eq!(center.for_bit(0), [0.0, 1.0]);
        assert_eq!(center.for_bit(1), [1.0, 0.0]);
        assert!(config.readout_center(5).is_err());
    }

    #[test]
    fn test_validate_rejects_gapped_qubit_ids() {
        let text = r#"{
            "qubits": {"0": {"readout_center": {"0": [0,1], "1": [1,0]}},
                       "2": {"readout_center": {"0": [0,1], "1": [1,0]}}},
            "channels": {}
        }"#;
        assert!(DeviceConfig::from_json(text).is_err());
    }

    #[test]
    fn test_validate_rejects_arity_mismatch() {
        let text = r#"{
            "qubits": {"0": {"readout_center": {"0": [0,1], "1": [1,0]}}},
            "channels": {"0": {"type": "2Q", "target": 0, "waveforms": {}}}
        }"#;
        let err = DeviceConfig::from_json(text).unwrap_err();
        assert!(matches!(err, PulsimError::InvalidChannel { .. }));
    }

    #[test]
    fn test_json_roundtrip() {
        let config = DeviceConfig::from_json(sample_json()).unwrap();
        let text = config.to_json().unwrap();
        let back = DeviceConfig::from_json(&text).unwrap();
        assert_eq!(config, back);
    }
}

//! Waveform patching
//!
//! Run-time transmission of a new pulse envelope into a channel's waveform
//! table. Used in calibration flows where pulse shapes are refined between
//! runs. Reserved indices hold structural operations and are closed to
//! patching; any non-reserved index may be overwritten.
//!
//! The transmission text format carries `channel index length` on the first
//! line followed by one integer sample per line. XY-destined envelopes
//! (index below the Z base) are complex: the first half of the samples is the
//! in-phase component, the second half the quadrature component.

use crate::device::{ChannelKind, DeviceConfig};
use pulsim_core::constants::waveform;
use pulsim_core::{ChannelId, PulsimError, PulsimResult, WaveformDescriptor, WaveformIndex};

/// A parsed envelope transmission
#[derive(Debug, Clone, PartialEq)]
pub struct EnvelopePatch {
    /// Destination channel
    pub channel: ChannelId,
    /// Destination waveform index
    pub index: WaveformIndex,
    /// Raw envelope samples
    pub samples: Vec<f64>,
}

impl EnvelopePatch {
    /// Parse the transmission text format
    pub fn parse(text: &str) -> PulsimResult<Self> {
        let mut lines = text.lines().filter(|l| !l.trim().is_empty());
        let header = lines
            .next()
            .ok_or_else(|| PulsimError::InvalidWaveform("empty transmission".into()))?;
        let fields: Vec<&str> = header.split_whitespace().collect();
        if fields.len() != 3 {
            return Err(PulsimError::InvalidWaveform(format!(
                "transmission header '{header}' must be '<channel> <index> <length>'"
            )));
        }
        let channel = fields[0].to_string();
        let index: WaveformIndex = fields[1]
            .parse()
            .map_err(|_| PulsimError::InvalidWaveform(format!("bad index '{}'", fields[1])))?;
        let length: usize = fields[2]
            .parse()
            .map_err(|_| PulsimError::InvalidWaveform(format!("bad length '{}'", fields[2])))?;

        let samples: Vec<f64> = lines
            .map(|l| {
                l.trim()
                    .parse::<i64>()
                    .map(|v| v as f64)
                    .map_err(|_| PulsimError::InvalidWaveform(format!("bad sample '{l}'")))
            })
            .collect::<PulsimResult<_>>()?;
        if samples.len() != length {
            return Err(PulsimError::InvalidWaveform(format!(
                "declared length {length} but got {} samples",
                samples.len()
            )));
        }

        Ok(Self {
            channel,
            index,
            samples,
        })
    }

    /// Apply the patch, overwriting the destination table entry
    ///
    /// Fails on unknown channels, multi-qubit channels, and reserved indices;
    /// the configuration is left untouched on failure.
    pub fn apply(&self, config: &mut DeviceConfig) -> PulsimResult<()> {
        let channel = config
            .channels
            .get_mut(&self.channel)
            .ok_or_else(|| PulsimError::UnknownChannel(self.channel.clone()))?;
        if channel.kind != ChannelKind::OneQubit {
            return Err(PulsimError::UnsupportedPatchTarget(self.channel.clone()));
        }
        if waveform::is_reserved(self.index) {
            return Err(PulsimError::ReservedWaveformIndex(self.index));
        }

        let descriptor = if self.index < waveform::Z_INDEX_BASE {
            let half = self.samples.len() / 2;
            WaveformDescriptor::XyWaveform {
                i: self.samples[..half].to_vec(),
                q: self.samples[half..].to_vec(),
            }
        } else {
            WaveformDescriptor::ZWaveform(self.samples.clone())
        };
        channel.waveforms.insert(self.index, descriptor);
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::Topology;

    fn config() -> DeviceConfig {
        DeviceConfig::standard(Topology::linear(2)).unwrap()
    }

    #[test]
    fn test_parse_transmission() {
        let patch = EnvelopePatch::parse("0 5 4\n1\n2\n3\n4\n").unwrap();
        assert_eq!(patch.channel, "0");
        assert_eq!(patch.index, 5);
        assert_eq!(patch.samples, vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_parse_length_mismatch() {
        assert!(EnvelopePatch::parse("0 5 3\n1\n2\n").is_err());
    }

    #[test]
    fn test_apply_xy_patch_splits_quadratures() {
        let mut cfg = config();
        let patch = EnvelopePatch {
            channel: "0".into(),
            index: 5,
            samples: vec![1.0, 2.0, 3.0, 4.0],
        };
        patch.apply(&mut cfg).unwrap();
        let wf = cfg.channel("0").unwrap().waveform("0", 5).unwrap();
        assert_eq!(
            wf,
            &WaveformDescriptor::XyWaveform {
                i: vec![1.0, 2.0],
                q: vec![3.0, 4.0],
            }
        );
    }

    #[test]
    fn test_apply_z_patch_verbatim() {
        let mut cfg = config();
        let patch = EnvelopePatch {
            channel: "1".into(),
            index: 70,
            samples: vec![1.0, 1.0, 0.0],
        };
        patch.apply(&mut cfg).unwrap();
        let wf = cfg.channel("1").unwrap().waveform("1", 70).unwrap();
        assert_eq!(wf, &WaveformDescriptor::ZWaveform(vec![1.0, 1.0, 0.0]));
    }

    #[test]
    fn test_reserved_index_rejected() {
        let mut cfg = config();
        for index in [0, 3, 64, 127, 128, 255] {
            let patch = EnvelopePatch {
                channel: "0".into(),
                index,
                samples: vec![1.0],
            };
            assert_eq!(
                patch.apply(&mut cfg).unwrap_err(),
                PulsimError::ReservedWaveformIndex(index)
            );
        }
    }

    #[test]
    fn test_two_qubit_channel_rejected() {
        let mut cfg = config();
        let patch = EnvelopePatch {
            channel: "1024".into(),
            index: 5,
            samples: vec![1.0],
        };
        assert_eq!(
            patch.apply(&mut cfg).unwrap_err(),
            PulsimError::UnsupportedPatchTarget("1024".into())
        );
    }

    #[test]
    fn test_unknown_channel_rejected() {
        let mut cfg = config();
        let patch = EnvelopePatch {
            channel: "99".into(),
            index: 5,
            samples: vec![1.0],
        };
        assert_eq!(
            patch.apply(&mut cfg).unwrap_err(),
            PulsimError::UnknownChannel("99".into())
        );
    }
}

//! Waveform descriptors
//!
//! A channel's waveform table maps indices to descriptors. Structural
//! descriptors (edges, reset, measure) carry no payload: square-pulse payload
//! is synthesized at compile time from the delay between matched edges.
//!
//! On-disk form is the original control-stack JSON: a tagged array such as
//! `["xy_waveform", [[..], [..]]]` or `["reset"]`, while two-qubit templates
//! are a bare coefficient array `[[..]]`.

use crate::error::{PulsimError, PulsimResult};
use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{json, Value};

/// A waveform template stored in a channel table
#[derive(Debug, Clone, PartialEq)]
pub enum WaveformDescriptor {
    /// Discrete XY drive envelope pair (in-phase, quadrature), in DAC codes
    XyWaveform {
        /// In-phase envelope
        i: Vec<f64>,
        /// Quadrature envelope
        q: Vec<f64>,
    },
    /// XY square pulse raising edge marker
    XySquareUp,
    /// XY square pulse falling edge marker
    XySquareDown,
    /// Z square pulse raising edge marker
    ZSquareUp,
    /// Z square pulse falling edge marker
    ZSquareDown,
    /// Reset the target qubit to |0>
    Reset,
    /// Measure the target qubit
    Measure,
    /// Discrete Z-line envelope, installed by waveform patching
    ZWaveform(Vec<f64>),
    /// Raw coefficient sequence for a two-qubit template
    Raw(Vec<f64>),
}

impl WaveformDescriptor {
    /// Parse from the JSON array form used by the configuration document
    pub fn from_value(value: &Value) -> PulsimResult<Self> {
        let arr = value
            .as_array()
            .ok_or_else(|| PulsimError::InvalidWaveform(value.to_string()))?;
        if arr.is_empty() {
            return Err(PulsimError::InvalidWaveform("empty descriptor".into()));
        }
        match &arr[0] {
            Value::String(tag) => Self::from_tagged(tag, arr),
            // 2Q templates are a bare nested coefficient array
            Value::Array(_) => Ok(WaveformDescriptor::Raw(real_seq(&arr[0])?)),
            other => Err(PulsimError::InvalidWaveform(other.to_string())),
        }
    }

    fn from_tagged(tag: &str, arr: &[Value]) -> PulsimResult<Self> {
        match tag {
            "xy_waveform" => {
                let payload = arr
                    .get(1)
                    .and_then(Value::as_array)
                    .ok_or_else(|| PulsimError::InvalidWaveform("xy_waveform payload".into()))?;
                if payload.len() != 2 {
                    return Err(PulsimError::InvalidWaveform(
                        "xy_waveform expects two quadrature envelopes".into(),
                    ));
                }
                Ok(WaveformDescriptor::XyWaveform {
                    i: real_seq(&payload[0])?,
                    q: real_seq(&payload[1])?,
                })
            }
            "xy_square_up" => Ok(WaveformDescriptor::XySquareUp),
            "xy_square_down" => Ok(WaveformDescriptor::XySquareDown),
            "z_square_up" => Ok(WaveformDescriptor::ZSquareUp),
            "z_square_down" => Ok(WaveformDescriptor::ZSquareDown),
            "reset" => Ok(WaveformDescriptor::Reset),
            "measure" => Ok(WaveformDescriptor::Measure),
            "z_waveform" => {
                let payload = arr
                    .get(1)
                    .ok_or_else(|| PulsimError::InvalidWaveform("z_waveform payload".into()))?;
                Ok(WaveformDescriptor::ZWaveform(real_seq(payload)?))
            }
            other => Err(PulsimError::InvalidWaveform(format!(
                "unknown descriptor tag '{other}'"
            ))),
        }
    }

    /// Serialize back to the JSON array form
    pub fn to_value(&self) -> Value {
        match self {
            WaveformDescriptor::XyWaveform { i, q } => json!(["xy_waveform", [i, q]]),
            WaveformDescriptor::XySquareUp => json!(["xy_square_up"]),
            WaveformDescriptor::XySquareDown => json!(["xy_square_down"]),
            WaveformDescriptor::ZSquareUp => json!(["z_square_up"]),
            WaveformDescriptor::ZSquareDown => json!(["z_square_down"]),
            WaveformDescriptor::Reset => json!(["reset"]),
            WaveformDescriptor::Measure => json!(["measure"]),
            WaveformDescriptor::ZWaveform(coefs) => json!(["z_waveform", coefs]),
            WaveformDescriptor::Raw(coefs) => json!([coefs]),
        }
    }

    /// True for edge-marker kinds, which never carry payload directly
    pub fn is_edge(&self) -> bool {
        matches!(
            self,
            WaveformDescriptor::XySquareUp
                | WaveformDescriptor::XySquareDown
                | WaveformDescriptor::ZSquareUp
                | WaveformDescriptor::ZSquareDown
        )
    }
}

fn real_seq(value: &Value) -> PulsimResult<Vec<f64>> {
    value
        .as_array()
        .ok_or_else(|| PulsimError::InvalidWaveform("expected coefficient array".into()))?
        .iter()
        .map(|v| {
            v.as_f64()
                .ok_or_else(|| PulsimError::InvalidWaveform(format!("non-numeric sample {v}")))
        })
        .collect()
}

impl Serialize for WaveformDescriptor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for WaveformDescriptor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        WaveformDescriptor::from_value(&value).map_err(D::Error::custom)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_xy_waveform() {
        let v = json!(["xy_waveform", [[0.0, 1.0, 0.0], [0.0, 0.0, 0.0]]]);
        let wf = WaveformDescriptor::from_value(&v).unwrap();
        assert_eq!(
            wf,
            WaveformDescriptor::XyWaveform {
                i: vec![0.0, 1.0, 0.0],
                q: vec![0.0, 0.0, 0.0],
            }
        );
        assert!(!wf.is_edge());
    }

    #[test]
    fn test_parse_markers() {
        for (tag, expected) in [
            ("xy_square_up", WaveformDescriptor::XySquareUp),
            ("xy_square_down", WaveformDescriptor::XySquareDown),
            ("z_square_up", WaveformDescriptor::ZSquareUp),
            ("z_square_down", WaveformDescriptor::ZSquareDown),
            ("reset", WaveformDescriptor::Reset),
            ("measure", WaveformDescriptor::Measure),
        ] {
            let wf = WaveformDescriptor::from_value(&json!([tag])).unwrap();
            assert_eq!(wf, expected);
        }
        assert!(WaveformDescriptor::XySquareUp.is_edge());
        assert!(!WaveformDescriptor::Reset.is_edge());
    }

    #[test]
    fn test_parse_raw_2q() {
        let v = json!([[0.5, 0.5, 0.0]]);
        let wf = WaveformDescriptor::from_value(&v).unwrap();
        assert_eq!(wf, WaveformDescriptor::Raw(vec![0.5, 0.5, 0.0]));
    }

    #[test]
    fn test_parse_integer_samples() {
        // DAC codes come in as JSON integers
        let v = json!(["xy_waveform", [[0, 16384, 0], [0, 0, 0]]]);
        let wf = WaveformDescriptor::from_value(&v).unwrap();
        match wf {
            WaveformDescriptor::XyWaveform { i, .. } => assert_eq!(i[1], 16384.0),
            other => panic!("unexpected descriptor {other:?}"),
        }
    }

    #[test]
    fn test_roundtrip_serde() {
        let original = WaveformDescriptor::ZWaveform(vec![1.0, 2.0, 3.0]);
        let text = serde_json::to_string(&original).unwrap();
        let back: WaveformDescriptor = serde_json::from_str(&text).unwrap();
        assert_eq!(original, back);
    }

    #[test]
    fn test_reject_unknown_tag() {
        let err = WaveformDescriptor::from_value(&json!(["warble"])).unwrap_err();
        assert!(err.to_string().contains("warble"));
    }
}

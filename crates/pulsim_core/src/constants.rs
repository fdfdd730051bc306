//! Device constants shared across the pulsim stack
//!
//! These mirror the constants baked into the control electronics: digital
//! full-scale range, the analog drive amplitude a full-scale code maps to,
//! and the reserved waveform indices on every channel.

/// Physical drive constants
pub mod drive {
    use std::f64::consts::PI;

    /// Analog drive amplitude of a full-scale square sample (rad/sample)
    pub const DRIVE_AMP: f64 = PI / 200.0;

    /// Digital full-scale range of the waveform DACs
    pub const FULL_SCALE: f64 = 0x4000 as f64;

    /// Reference pulse length in samples, baked into the gate-level
    /// frequency-to-angle scaling
    pub const PULSE_LEN: f64 = 100.0;

    /// Digital-code to physical-amplitude conversion factor
    pub const CODE_TO_AMP: f64 = DRIVE_AMP / FULL_SCALE;
}

/// Reserved waveform indices on 1Q and 2Q channels
pub mod waveform {
    /// Full-amplitude pi pulse
    pub const PI_PULSE: u32 = 0;
    /// Half-amplitude pi/2 pulse
    pub const PI_HALF_PULSE: u32 = 1;
    /// XY-line square pulse raising edge
    pub const XY_SQUARE_UP: u32 = 2;
    /// XY-line square pulse falling edge
    pub const XY_SQUARE_DOWN: u32 = 3;
    /// Z-line square pulse raising edge
    pub const Z_SQUARE_UP: u32 = 64;
    /// Z-line square pulse falling edge
    pub const Z_SQUARE_DOWN: u32 = 65;
    /// Reset to |0>
    pub const RESET: u32 = 127;
    /// Measurement
    pub const MEASURE: u32 = 128;

    /// Conditional-phase gate on 2Q channels
    pub const CZ: u32 = 0;
    /// iSWAP gate on 2Q channels
    pub const ISWAP: u32 = 1;

    /// First waveform index interpreted as a Z-line template when patched
    pub const Z_INDEX_BASE: u32 = 64;

    /// Check whether a 1Q waveform index is reserved for structural
    /// operations and closed to patching
    pub fn is_reserved(index: u32) -> bool {
        matches!(index, 0..=3 | 64 | 65 | 127..=255)
    }
}

/// Channel numbering conventions
pub mod channel {
    /// Offset of two-qubit (coupler) channel ids
    pub const TWO_QUBIT_BASE: u32 = 0x400;
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_to_amp() {
        let expected = std::f64::consts::PI / 200.0 / 16384.0;
        assert!((drive::CODE_TO_AMP - expected).abs() < 1e-18);
    }

    #[test]
    fn test_reserved_indices() {
        for idx in [0, 1, 2, 3, 64, 65, 127, 128, 200, 255] {
            assert!(waveform::is_reserved(idx), "index {idx} should be reserved");
        }
        for idx in [4, 63, 66, 100, 126, 256, 1000] {
            assert!(!waveform::is_reserved(idx), "index {idx} should be free");
        }
    }
}

//! Pending square-pulse edges
//!
//! Compiler-owned state machine pairing "raise" and "fall" instructions into
//! square pulses. XY-line and Z-line edges live in separate maps, so square
//! pulses on both lines of the same qubit do not collide. At most one edge
//! per target per class may be open at any time, and the maps must drain to
//! empty by end of stream.

use pulsim_core::{GateParams, PulsimError, PulsimResult, QubitId, WaveformIndex};
use std::collections::HashMap;

/// Edge class: which line the square pulse is played on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EdgeClass {
    /// XY drive line
    Xy,
    /// Z flux line
    Z,
}

/// A raised edge waiting for its falling counterpart
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct OpenEdge {
    /// Waveform index of the raising instruction
    pub index: WaveformIndex,
    /// Analog parameters of the raising instruction
    pub params: Option<GateParams>,
    /// Absolute time of the raising edge
    pub delay: f64,
}

/// The two pending-edge maps
#[derive(Debug, Default)]
pub(crate) struct PendingEdges {
    xy: HashMap<QubitId, OpenEdge>,
    z: HashMap<QubitId, OpenEdge>,
}

impl PendingEdges {
    pub fn new() -> Self {
        Self::default()
    }

    fn map_mut(&mut self, class: EdgeClass) -> &mut HashMap<QubitId, OpenEdge> {
        match class {
            EdgeClass::Xy => &mut self.xy,
            EdgeClass::Z => &mut self.z,
        }
    }

    /// Register a raising edge; a second raise on the same target is an error
    pub fn raise(&mut self, class: EdgeClass, qubit: QubitId, edge: OpenEdge) -> PulsimResult<()> {
        let map = self.map_mut(class);
        if map.contains_key(&qubit) {
            return Err(PulsimError::DuplicateRaisingEdge { qubit });
        }
        map.insert(qubit, edge);
        Ok(())
    }

    /// Close a raised edge; a fall with no matching raise is an error
    pub fn fall(&mut self, class: EdgeClass, qubit: QubitId) -> PulsimResult<OpenEdge> {
        self.map_mut(class)
            .remove(&qubit)
            .ok_or(PulsimError::UnmatchedFallingEdge { qubit })
    }

    /// Check that no edge is left open at end of stream
    pub fn finish(&self) -> PulsimResult<()> {
        if let Some(&qubit) = self.xy.keys().chain(self.z.keys()).min() {
            return Err(PulsimError::UnterminatedSquarePulse { qubit });
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

    fn edge(delay: f64) -> OpenEdge {
        OpenEdge {
            index: 2,
            params: None,
            delay,
        }
    }

    #[test]
    fn test_raise_then_fall() {
        let mut pending = PendingEdges::new();
        pending.raise(EdgeClass::Xy, 0, edge(10.0)).unwrap();
        let closed = pending.fall(EdgeClass::Xy, 0).unwrap();
        assert_eq!(closed.delay, 10.0);
        assert!(pending.finish().is_ok());
    }

    #[test]
    fn test_duplicate_raise_is_error() {
        let mut pending = PendingEdges::new();
        pending.raise(EdgeClass::Xy, 1, edge(0.0)).unwrap();
        assert_eq!(
            pending.raise(EdgeClass::Xy, 1, edge(5.0)).unwrap_err(),
            PulsimError::DuplicateRaisingEdge { qubit: 1 }
        );
    }

    #[test]
    fn test_fall_without_raise_is_error() {
        let mut pending = PendingEdges::new();
        assert_eq!(
            pending.fall(EdgeClass::Z, 3).unwrap_err(),
            PulsimError::UnmatchedFallingEdge { qubit: 3 }
        );
    }

    #[test]
    fn test_xy_and_z_do_not_collide() {
        let mut pending = PendingEdges::new();
        pending.raise(EdgeClass::Xy, 0, edge(0.0)).unwrap();
        pending.raise(EdgeClass::Z, 0, edge(2.0)).unwrap();
        assert_eq!(pending.fall(EdgeClass::Xy, 0).unwrap().delay, 0.0);
        assert_eq!(pending.fall(EdgeClass::Z, 0).unwrap().delay, 2.0);
    }

    #[test]
    fn test_leftover_edge_fails_finish() {
        let mut pending = PendingEdges::new();
        pending.raise(EdgeClass::Z, 2, edge(0.0)).unwrap();
        assert_eq!(
            pending.finish().unwrap_err(),
            PulsimError::UnterminatedSquarePulse { qubit: 2 }
        );
    }
}

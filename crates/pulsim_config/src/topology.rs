//! Qubit topology
//!
//! Connectivity description consumed when synthesizing a default device
//! configuration: the qubit id list plus the tunable-coupler pairs. Produced
//! offline by a separate tool; this crate only reads it.

use pulsim_core::{PulsimError, PulsimResult, QubitId};
use serde::{Deserialize, Serialize};

/// Qubit connectivity description
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topology {
    /// Qubit ids present on the device
    pub qubit_list: Vec<QubitId>,
    /// Coupler pairs
    pub qubit_topology: Vec<(QubitId, QubitId)>,
}

impl Topology {
    /// Create a topology from explicit lists, validating coupler pairs
    pub fn new(
        qubit_list: Vec<QubitId>,
        qubit_topology: Vec<(QubitId, QubitId)>,
    ) -> PulsimResult<Self> {
        let topology = Self {
            qubit_list,
            qubit_topology,
        };
        topology.validate()?;
        Ok(topology)
    }

    /// Linear chain: 0-1-2-...-(n-1)
    pub fn linear(n: usize) -> Self {
        Self {
            qubit_list: (0..n).collect(),
            qubit_topology: (0..n.saturating_sub(1)).map(|i| (i, i + 1)).collect(),
        }
    }

    /// Ring: 0-1-...-(n-1)-0
    pub fn ring(n: usize) -> Self {
        let mut qubit_topology: Vec<(QubitId, QubitId)> =
            (0..n.saturating_sub(1)).map(|i| (i, i + 1)).collect();
        if n > 2 {
            qubit_topology.push((n - 1, 0));
        }
        Self {
            qubit_list: (0..n).collect(),
            qubit_topology,
        }
    }

    /// Parse from the topology JSON document
    pub fn from_json(text: &str) -> PulsimResult<Self> {
        let topology: Topology = serde_json::from_str(text)?;
        topology.validate()?;
        Ok(topology)
    }

    /// Number of qubits
    pub fn num_qubits(&self) -> usize {
        self.qubit_list.len()
    }

    /// Check that coupler pairs are non-degenerate and reference listed qubits
    pub fn validate(&self) -> PulsimResult<()> {
        for &(a, b) in &self.qubit_topology {
            if a == b {
                return Err(PulsimError::InvalidCoupling(a, b));
            }
            for q in [a, b] {
                if !self.qubit_list.contains(&q) {
                    return Err(PulsimError::UnknownQubit(q));
                }
            }
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

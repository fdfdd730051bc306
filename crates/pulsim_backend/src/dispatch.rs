//! Backend dispatch
//!
//! Maps the backend identifiers carried by run requests onto the closed set
//! of execution backends. Unknown identifiers are rejected here, before any
//! compilation or simulation work.

use crate::clifford::CliffordLevelBackend;
use crate::execution::Backend;
use crate::gate::GateLevelBackend;
use crate::pulse::PulseLevelBackend;
use pulsim_core::{PulsimError, PulsimResult};
use std::fmt;

/// The closed set of execution backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendKind {
    /// Open-system master-equation simulation of the actual envelopes
    PulseLevel,
    /// Closed-form unitary simulation, one gate per instruction
    GateLevel,
    /// Stabilizer-tableau simulation of Clifford-compatible programs
    CliffordLevel,
}

impl BackendKind {
    /// Resolve a request identifier to a backend
    ///
    /// The identifiers are the historical solver names of the control stack;
    /// the gate-level aliases are matched case-insensitively.
    pub fn from_name(name: &str) -> PulsimResult<Self> {
        match name {
            "qutip" => Ok(BackendKind::PulseLevel),
            "stim" => Ok(BackendKind::CliffordLevel),
            _ if name.eq_ignore_ascii_case("qutip_qip") || name.eq_ignore_ascii_case("qutip-qip") => {
                Ok(BackendKind::GateLevel)
            }
            _ => Err(PulsimError::UnsupportedBackend(name.to_string())),
        }
    }

    /// The backend implementation
    pub fn backend(&self) -> &'static dyn Backend {
        match self {
            BackendKind::PulseLevel => &PulseLevelBackend,
            BackendKind::GateLevel => &GateLevelBackend,
            BackendKind::CliffordLevel => &CliffordLevelBackend,
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.backend().name())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_backends() {
        assert_eq!(BackendKind::from_name("qutip").unwrap(), BackendKind::PulseLevel);
        assert_eq!(BackendKind::from_name("stim").unwrap(), BackendKind::CliffordLevel);
        assert_eq!(
            BackendKind::from_name("qutip_qip").unwrap(),
            BackendKind::GateLevel
        );
    }

    #[test]
    fn test_gate_level_aliases() {
        for name in ["qutip-qip", "QUTIP_QIP", "Qutip-Qip"] {
            assert_eq!(BackendKind::from_name(name).unwrap(), BackendKind::GateLevel);
        }
    }

    #[test]
    fn test_unknown_backend_rejected() {
        for name in ["cirq", "QUTIP", "", "stim2"] {
            assert_eq!(
                BackendKind::from_name(name).unwrap_err(),
                PulsimError::UnsupportedBackend(name.to_string())
            );
        }
    }

    #[test]
    fn test_display_names() {
        assert_eq!(BackendKind::PulseLevel.to_string(), "pulse_level");
        assert_eq!(BackendKind::GateLevel.to_string(), "gate_level");
        assert_eq!(BackendKind::CliffordLevel.to_string(), "clifford_level");
    }
}

//! Pulse-level backend
//!
//! Open-system density-matrix simulation. Each compiled instruction becomes
//! one or more time-dependent Hamiltonian terms with sample-and-hold
//! coefficients; per-qubit relaxation and dephasing enter as Lindblad
//! collapse operators. The master equation is integrated with fixed-step RK4
//! on a unit time grid and the diagonal of the final density matrix feeds
//! the measurement sampler.

use crate::execution::{Backend, SimulationResult};
use crate::linalg::{pauli, C64, CMatrix};
use crate::sampler;
use pulsim_compiler::CompiledProgram;
use pulsim_config::DeviceConfig;
use pulsim_core::{
    CompiledInstruction, Envelope, InstructionKind, PulsimError, PulsimResult, Shots,
};
use rand::RngCore;

/// Upper bound on one RK4 step
const MAX_STEP: f64 = 1.0;

// ============================================================================
// Drive Terms
// ============================================================================

/// One time-dependent Hamiltonian term: a fixed operator with a
/// sample-and-hold coefficient train
#[derive(Debug, Clone)]
struct DriveTerm {
    op: CMatrix,
    start: f64,
    samples: Vec<f64>,
}

impl DriveTerm {
    /// Coefficient at absolute time `t`: the enclosing sample inside the
    /// train, zero before it starts and after it ends
    fn coeff(&self, t: f64) -> f64 {
        if self.samples.is_empty() || t < self.start {
            return 0.0;
        }
        let end = self.start + (self.samples.len() - 1) as f64;
        if t > end {
            return 0.0;
        }
        self.samples[(t - self.start).floor() as usize]
    }
}

/// One Lindblad collapse channel, with the composite operators precomputed
#[derive(Debug, Clone)]
struct CollapseTerm {
    l: CMatrix,
    l_dag: CMatrix,
    l_dag_l: CMatrix,
}

impl CollapseTerm {
    fn new(l: CMatrix) -> Self {
        let l_dag = l.adjoint();
        let l_dag_l = l_dag.mul(&l);
        Self { l, l_dag, l_dag_l }
    }
}

/// Z-line offset to rotating-frame sigma-z strength: the qubit sits at its
/// sweet spot at zero offset, so the detuning grows quadratically
fn z_to_frequency(z: f64) -> f64 {
    z * z
}

/// Exchange Hamiltonian (XX + YY)/2 of the iSWAP family
fn iswap_hamiltonian() -> CMatrix {
    let xx = pauli::sigma_x().embed(&[0], 2).mul(&pauli::sigma_x().embed(&[1], 2));
    let yy = pauli::sigma_y().embed(&[0], 2).mul(&pauli::sigma_y().embed(&[1], 2));
    let mut ham = CMatrix::zeros(4);
    ham.add_assign_scaled(&xx, C64::new(0.5, 0.0));
    ham.add_assign_scaled(&yy, C64::new(0.5, 0.0));
    ham
}

/// Conditional-phase Hamiltonian diag(0, 0, 0, 1)
fn cphase_hamiltonian() -> CMatrix {
    let mut ham = CMatrix::zeros(4);
    ham.set(3, 3, C64::new(1.0, 0.0));
    ham
}

// ============================================================================
// Backend
// ============================================================================

/// Pulse-level master-equation backend
pub struct PulseLevelBackend;

impl PulseLevelBackend {
    fn drive_terms(
        &self,
        instr: &CompiledInstruction,
        num_qubits: usize,
    ) -> PulsimResult<Vec<DriveTerm>> {
        let unsupported = |detail: &str| PulsimError::UnsupportedInstruction {
            backend: self.name().into(),
            kind: format!("{} {detail}", instr.kind),
        };
        match instr.kind {
            InstructionKind::Gate1q => {
                let params = instr.params.ok_or_else(|| unsupported("without parameters"))?;
                let qubit = instr
                    .targets
                    .single()
                    .ok_or_else(|| unsupported("on a qubit pair"))?;
                let (env_i, env_q) = match &instr.envelope {
                    Envelope::Iq { i, q } => (i, q),
                    _ => return Err(unsupported("without an IQ envelope")),
                };
                let tlist = instr.tlist.as_deref().unwrap_or(&[]);
                // carrier evaluated at the sample times, then held
                let mut samples_x = Vec::with_capacity(tlist.len());
                let mut samples_y = Vec::with_capacity(tlist.len());
                for (k, &offset) in tlist.iter().enumerate() {
                    let t = instr.delay + offset;
                    let carrier = C64::new(0.0, params.phase + params.freq * t).exp();
                    let value =
                        params.amp * carrier * C64::new(env_i[k], env_q[k]);
                    samples_x.push(value.re);
                    samples_y.push(value.im);
                }
                Ok(vec![
                    DriveTerm {
                        op: pauli::sigma_x().embed(&[qubit], num_qubits),
                        start: instr.delay,
                        samples: samples_x,
                    },
                    DriveTerm {
                        op: pauli::sigma_y().embed(&[qubit], num_qubits),
                        start: instr.delay,
                        samples: samples_y,
                    },
                ])
            }
            InstructionKind::Gate1qZ => {
                let params = instr.params.ok_or_else(|| unsupported("without parameters"))?;
                let qubit = instr
                    .targets
                    .single()
                    .ok_or_else(|| unsupported("on a qubit pair"))?;
                let env = match &instr.envelope {
                    Envelope::Real(coefs) => coefs,
                    _ => return Err(unsupported("without a real envelope")),
                };
                let strength = z_to_frequency(params.amp);
                Ok(vec![DriveTerm {
                    op: pauli::sigma_z().embed(&[qubit], num_qubits),
                    start: instr.delay,
                    samples: env.iter().map(|&c| c * strength).collect(),
                }])
            }
            InstructionKind::Gate2q => {
                let (a, b) = instr
                    .targets
                    .pair()
                    .ok_or_else(|| unsupported("on a single qubit"))?;
                let env = match &instr.envelope {
                    Envelope::Real(coefs) => coefs,
                    _ => return Err(unsupported("without a real envelope")),
                };
                let ham = if instr.index == 0 {
                    cphase_hamiltonian()
                } else {
                    iswap_hamiltonian()
                };
                Ok(vec![DriveTerm {
                    op: ham.embed(&[a, b], num_qubits),
                    start: instr.delay,
                    samples: env.clone(),
                }])
            }
            // the register starts in the ground state; measurement only
            // contributes its delay to the evolution horizon
            InstructionKind::Reset | InstructionKind::Measure => Ok(Vec::new()),
        }
    }

    fn collapse_terms(&self, config: &DeviceConfig) -> Vec<CollapseTerm> {
        let num_qubits = config.num_qubits();
        let mut terms = Vec::new();
        for (qubit, (t1, t2)) in config
            .t1_list()
            .into_iter()
            .zip(config.t2_list())
            .enumerate()
        {
            if let Some(t1) = t1 {
                let rate = (1.0 / t1).sqrt();
                terms.push(CollapseTerm::new(
                    pauli::sigma_minus()
                        .embed(&[qubit], num_qubits)
                        .scaled(C64::new(rate, 0.0)),
                ));
            }
            if let Some(t2) = t2 {
                let gamma_phi = 1.0 / t2 - t1.map_or(0.0, |t1| 0.5 / t1);
                if gamma_phi > 0.0 {
                    let rate = (gamma_phi / 2.0).sqrt();
                    terms.push(CollapseTerm::new(
                        pauli::sigma_z()
                            .embed(&[qubit], num_qubits)
                            .scaled(C64::new(rate, 0.0)),
                    ));
                }
            }
        }
        terms
    }
}

/// Right-hand side of the master equation at time `t`
fn lindblad_rhs(
    rho: &CMatrix,
    t: f64,
    drives: &[DriveTerm],
    collapses: &[CollapseTerm],
    dim: usize,
) -> CMatrix {
    let mut ham = CMatrix::zeros(dim);
    for term in drives {
        let c = term.coeff(t);
        if c != 0.0 {
            ham.add_assign_scaled(&term.op, C64::new(c, 0.0));
        }
    }

    // -i [H, rho]
    let mut drho = CMatrix::zeros(dim);
    drho.add_assign_scaled(&ham.mul(rho), C64::new(0.0, -1.0));
    drho.add_assign_scaled(&rho.mul(&ham), C64::new(0.0, 1.0));

    // dissipators: L rho L+ - (L+L rho + rho L+L) / 2
    for c in collapses {
        drho.add_assign_scaled(&c.l.mul(rho).mul(&c.l_dag), C64::new(1.0, 0.0));
        drho.add_assign_scaled(&c.l_dag_l.mul(rho), C64::new(-0.5, 0.0));
        drho.add_assign_scaled(&rho.mul(&c.l_dag_l), C64::new(-0.5, 0.0));
    }
    drho
}

/// Fixed-step RK4 from 0 to `horizon` on a unit grid
fn integrate(
    mut rho: CMatrix,
    horizon: f64,
    drives: &[DriveTerm],
    collapses: &[CollapseTerm],
) -> CMatrix {
    let dim = rho.dim();
    let intervals = horizon.trunc() as usize;
    if intervals == 0 {
        return rho;
    }
    let dt = horizon / intervals as f64;
    let substeps = (dt / MAX_STEP).ceil().max(1.0) as usize;
    let h = dt / substeps as f64;

    let mut t = 0.0;
    for _ in 0..intervals * substeps {
        let k1 = lindblad_rhs(&rho, t, drives, collapses, dim);
        let mut mid = rho.clone();
        mid.add_assign_scaled(&k1, C64::new(h / 2.0, 0.0));
        let k2 = lindblad_rhs(&mid, t + h / 2.0, drives, collapses, dim);
        let mut mid = rho.clone();
        mid.add_assign_scaled(&k2, C64::new(h / 2.0, 0.0));
        let k3 = lindblad_rhs(&mid, t + h / 2.0, drives, collapses, dim);
        let mut end = rho.clone();
        end.add_assign_scaled(&k3, C64::new(h, 0.0));
        let k4 = lindblad_rhs(&end, t + h, drives, collapses, dim);

        rho.add_assign_scaled(&k1, C64::new(h / 6.0, 0.0));
        rho.add_assign_scaled(&k2, C64::new(h / 3.0, 0.0));
        rho.add_assign_scaled(&k3, C64::new(h / 3.0, 0.0));
        rho.add_assign_scaled(&k4, C64::new(h / 6.0, 0.0));
        t += h;
    }
    rho
}

impl Backend for PulseLevelBackend {
    fn name(&self) -> &'static str {
        "pulse_level"
    }

    fn execute(
        &self,
        config: &DeviceConfig,
        program: &CompiledProgram,
        shots: Shots,
        rng: &mut dyn RngCore,
    ) -> PulsimResult<SimulationResult> {
        let num_qubits = config.num_qubits();
        let dim = 1 << num_qubits;

        let mut drives = Vec::new();
        for instr in &program.instructions {
            drives.extend(self.drive_terms(instr, num_qubits)?);
        }
        let collapses = self.collapse_terms(config);

        let mut rho = CMatrix::zeros(dim);
        rho.set(0, 0, C64::new(1.0, 0.0));
        let rho = integrate(rho, program.time_horizon(), &drives, &collapses);

        // numerical drift can leave tiny negative diagonal entries
        let probabilities: Vec<f64> =
            rho.diagonal_real().iter().map(|&p| p.max(0.0)).collect();
        let total: f64 = probabilities.iter().sum();
        let probabilities: Vec<f64> = probabilities.iter().map(|&p| p / total).collect();

        sampler::sample_from_probabilities(
            &probabilities,
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

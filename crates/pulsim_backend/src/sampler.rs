//! Measurement and readout sampling
//!
//! Turns a probability distribution over full basis states into per-shot
//! measurement records: each shot draws one basis state, projects it onto the
//! measured qubits, and synthesizes an analog IQ point per measured bit from
//! the per-qubit readout centers.

use crate::execution::{ShotRecord, SimulationResult};
use crate::linalg::qubit_mask;
use pulsim_config::DeviceConfig;
use pulsim_core::{IqPoint, PulsimError, PulsimResult, QubitId, Shots};
use rand::{Rng, RngCore};
use rand_distr::{Distribution, Normal};

/// Tolerance on the probability-vector normalization
const NORM_TOLERANCE: f64 = 1e-6;

/// Standard deviation of the mock readout blobs
const IQ_SIGMA: f64 = 1.0;

/// Sample shot records from a basis-state probability vector
///
/// The vector must have length 2^n for an n-qubit register and sum to one
/// within tolerance; small numerical drift from the solvers is renormalized
/// away. Basis states are enumerated in increasing integer order with qubit 0
/// as the most significant bit.
pub fn sample_from_probabilities(
    probabilities: &[f64],
    num_qubits: usize,
    measured_qubits: &[QubitId],
    config: &DeviceConfig,
    shots: Shots,
    rng: &mut dyn RngCore,
) -> PulsimResult<SimulationResult> {
    if probabilities.len() != 1 << num_qubits {
        return Err(PulsimError::InvalidDistribution(format!(
            "expected {} entries for {num_qubits} qubits, got {}",
            1 << num_qubits,
            probabilities.len()
        )));
    }
    if probabilities.iter().any(|&p| p < -NORM_TOLERANCE || !p.is_finite()) {
        return Err(PulsimError::InvalidDistribution(
            "negative or non-finite probability".into(),
        ));
    }
    let total: f64 = probabilities.iter().sum();
    if (total - 1.0).abs() > NORM_TOLERANCE {
        return Err(PulsimError::InvalidDistribution(format!(
            "probabilities sum to {total}"
        )));
    }

    let cumulative: Vec<f64> = probabilities
        .iter()
        .scan(0.0, |acc, &p| {
            *acc += p.max(0.0);
            Some(*acc)
        })
        .collect();

    let mut records = Vec::with_capacity(shots as usize);
    for _ in 0..shots {
        let draw: f64 = rng.gen::<f64>() * total;
        let state = cumulative.partition_point(|&c| c <= draw).min(probabilities.len() - 1);
        let bits = project_bits(state, num_qubits, measured_qubits);
        let iq = synthesize_iq(&bits, measured_qubits, config, rng)?;
        records.push(ShotRecord { bits, iq });
    }

    Ok(SimulationResult {
        measured_qubits: measured_qubits.to_vec(),
        records,
    })
}

/// Project a basis-state index onto the measured qubits
pub fn project_bits(state: usize, num_qubits: usize, measured_qubits: &[QubitId]) -> Vec<u8> {
    measured_qubits
        .iter()
        .map(|&q| u8::from(state & qubit_mask(q, num_qubits) != 0))
        .collect()
}

/// Draw one IQ point per measured bit from the configured readout centers
pub fn synthesize_iq(
    bits: &[u8],
    measured_qubits: &[QubitId],
    config: &DeviceConfig,
    rng: &mut dyn RngCore,
) -> PulsimResult<Vec<IqPoint>> {
    bits.iter()
        .zip(measured_qubits.iter())
        .map(|(&bit, &qubit)| {
            let center = config.readout_center(qubit)?.for_bit(bit);
            let i = Normal::new(center[0], IQ_SIGMA)
                .map_err(|e| PulsimError::InvalidDistribution(e.to_string()))?
                .sample(rng);
            let q = Normal::new(center[1], IQ_SIGMA)
                .map_err(|e| PulsimError::InvalidDistribution(e.to_string()))?
                .sample(rng);
            Ok(IqPoint::new(i, q))
        })
        .collect()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pulsim_config::Topology;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn config() -> DeviceConfig {
        DeviceConfig::standard(Topology::linear(2)).unwrap()
    }

    #[test]
    fn test_project_bits_msb_convention() {
        // state 2 of 2 qubits is |10>: qubit 0 reads 1, qubit 1 reads 0
        assert_eq!(project_bits(2, 2, &[0, 1]), vec![1, 0]);
        assert_eq!(project_bits(2, 2, &[1]), vec![0]);
        assert_eq!(project_bits(3, 2, &[0, 1]), vec![1, 1]);
    }

    #[test]
    fn test_deterministic_distribution() {
        let cfg = config();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let result =
            sample_from_probabilities(&[0.0, 0.0, 1.0, 0.0], 2, &[0, 1], &cfg, 50, &mut rng)
                .unwrap();
        assert_eq!(result.num_shots(), 50);
        assert_eq!(result.outcome_fraction(&[1, 0]), 1.0);
    }

    #[test]
    fn test_uniform_distribution_statistics() {
        let cfg = config();
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let result = sample_from_probabilities(
            &[0.25, 0.25, 0.25, 0.25],
            2,
            &[0, 1],
            &cfg,
            1000,
            &mut rng,
        )
        .unwrap();
        for bits in [[0, 0], [0, 1], [1, 0], [1, 1]] {
            let frac = result.outcome_fraction(&bits);
            assert!(
                (frac - 0.25).abs() < 0.06,
                "outcome {bits:?} frequency {frac} too far from 0.25"
            );
        }
    }

    #[test]
    fn test_seeded_runs_are_identical() {
        let cfg = config();
        let probs = [0.5, 0.0, 0.0, 0.5];
        let mut rng_a = ChaCha8Rng::seed_from_u64(123);
        let mut rng_b = ChaCha8Rng::seed_from_u64(123);
        let a = sample_from_probabilities(&probs, 2, &[0, 1], &cfg, 20, &mut rng_a).unwrap();
        let b = sample_from_probabilities(&probs, 2, &[0, 1], &cfg, 20, &mut rng_b).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_iq_clusters_near_centers() {
        // default centers: bit 0 -> (0, 1), bit 1 -> (1, 0)
        let cfg = config();
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let result =
            sample_from_probabilities(&[0.0, 0.0, 0.0, 1.0], 2, &[0], &cfg, 500, &mut rng)
                .unwrap();
        let mean_i: f64 =
            result.records.iter().map(|r| r.iq[0].i).sum::<f64>() / result.num_shots() as f64;
        let mean_q: f64 =
            result.records.iter().map(|r| r.iq[0].q).sum::<f64>() / result.num_shots() as f64;
        assert!((mean_i - 1.0).abs() < 0.2, "mean I {mean_i} off center");
        assert!(mean_q.abs() < 0.2, "mean Q {mean_q} off center");
    }

    #[test]
    fn test_bad_distributions_rejected() {
        let cfg = config();
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        // wrong length
        assert!(matches!(
            sample_from_probabilities(&[1.0, 0.0], 2, &[0], &cfg, 1, &mut rng),
            Err(PulsimError::InvalidDistribution(_))
        ));
        // not normalized
        assert!(matches!(
            sample_from_probabilities(&[0.5, 0.0, 0.0, 0.0], 2, &[0], &cfg, 1, &mut rng),
            Err(PulsimError::InvalidDistribution(_))
        ));
        // negative entry
        assert!(matches!(
            sample_from_probabilities(&[1.2, -0.2, 0.0, 0.0], 2, &[0], &cfg, 1, &mut rng),
            Err(PulsimError::InvalidDistribution(_))
        ));
    }
}

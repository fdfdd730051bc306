//! Stabilizer tableau
//!
//! Aaronson-Gottesman tableau over n qubits: n destabilizer rows followed by
//! n stabilizer rows, with H, S and CNOT as the primitive updates and the
//! standard random/deterministic measurement rule. The remaining Clifford
//! gates are built by composition.

use pulsim_core::QubitId;
use rand::{Rng, RngCore};

/// CHP-style stabilizer tableau
#[derive(Debug, Clone, PartialEq)]
pub struct Tableau {
    n: usize,
    // 2n rows: destabilizers then stabilizers
    x: Vec<Vec<bool>>,
    z: Vec<Vec<bool>>,
    r: Vec<bool>,
}

impl Tableau {
    /// Tableau stabilizing |0...0>
    pub fn new(num_qubits: usize) -> Self {
        let rows = 2 * num_qubits;
        let mut t = Self {
            n: num_qubits,
            x: vec![vec![false; num_qubits]; rows],
            z: vec![vec![false; num_qubits]; rows],
            r: vec![false; rows],
        };
        for q in 0..num_qubits {
            t.x[q][q] = true;
            t.z[num_qubits + q][q] = true;
        }
        t
    }

    /// Number of qubits
    pub fn num_qubits(&self) -> usize {
        self.n
    }

    // ------------------------------------------------------------------------
    // Primitive gates
    // ------------------------------------------------------------------------

    /// Hadamard
    pub fn h(&mut self, q: QubitId) {
        for i in 0..2 * self.n {
            self.r[i] ^= self.x[i][q] & self.z[i][q];
            std::mem::swap(&mut self.x[i][q], &mut self.z[i][q]);
        }
    }

    /// Phase gate S = diag(1, i)
    pub fn s(&mut self, q: QubitId) {
        for i in 0..2 * self.n {
            self.r[i] ^= self.x[i][q] & self.z[i][q];
            self.z[i][q] ^= self.x[i][q];
        }
    }

    /// Controlled-NOT
    pub fn cnot(&mut self, control: QubitId, target: QubitId) {
        for i in 0..2 * self.n {
            self.r[i] ^=
                self.x[i][control] & self.z[i][target] & (self.x[i][target] ^ self.z[i][control] ^ true);
            self.x[i][target] ^= self.x[i][control];
            self.z[i][control] ^= self.z[i][target];
        }
    }

    // ------------------------------------------------------------------------
    // Composed gates
    // ------------------------------------------------------------------------

    /// Pauli X
    pub fn x_gate(&mut self, q: QubitId) {
        self.h(q);
        self.s(q);
        self.s(q);
        self.h(q);
    }

    /// Pauli Z
    pub fn z_gate(&mut self, q: QubitId) {
        self.s(q);
        self.s(q);
    }

    /// Pauli Y
    pub fn y_gate(&mut self, q: QubitId) {
        self.z_gate(q);
        self.x_gate(q);
    }

    /// Square root of X
    pub fn sqrt_x(&mut self, q: QubitId) {
        self.h(q);
        self.s(q);
        self.h(q);
    }

    /// Inverse square root of X
    pub fn sqrt_x_dag(&mut self, q: QubitId) {
        self.h(q);
        self.s(q);
        self.s(q);
        self.s(q);
        self.h(q);
    }

    /// Square root of Y (= H.Z up to phase)
    pub fn sqrt_y(&mut self, q: QubitId) {
        self.z_gate(q);
        self.h(q);
    }

    /// Inverse square root of Y
    pub fn sqrt_y_dag(&mut self, q: QubitId) {
        self.h(q);
        self.z_gate(q);
    }

    /// Controlled-Z
    pub fn cz(&mut self, a: QubitId, b: QubitId) {
        self.h(b);
        self.cnot(a, b);
        self.h(b);
    }

    /// iSWAP (= SWAP.CZ.(S x S))
    pub fn iswap(&mut self, a: QubitId, b: QubitId) {
        self.s(a);
        self.s(b);
        self.cz(a, b);
        self.cnot(a, b);
        self.cnot(b, a);
        self.cnot(a, b);
    }

    // ------------------------------------------------------------------------
    // Measurement
    // ------------------------------------------------------------------------

    /// Measure qubit `q` in the computational basis, collapsing the state
    pub fn measure(&mut self, q: QubitId, rng: &mut dyn RngCore) -> bool {
        if let Some(p) = (self.n..2 * self.n).find(|&i| self.x[i][q]) {
            // outcome is random: pivot on stabilizer row p
            for i in 0..2 * self.n {
                if i != p && self.x[i][q] {
                    self.rowsum(i, p);
                }
            }
            self.x[p - self.n] = self.x[p].clone();
            self.z[p - self.n] = self.z[p].clone();
            self.r[p - self.n] = self.r[p];

            self.x[p] = vec![false; self.n];
            self.z[p] = vec![false; self.n];
            self.z[p][q] = true;
            self.r[p] = rng.gen::<bool>();
            self.r[p]
        } else {
            // outcome is determined by the stabilizer group
            let mut sx = vec![false; self.n];
            let mut sz = vec![false; self.n];
            let mut sr = false;
            for i in 0..self.n {
                if self.x[i][q] {
                    self.accumulate(&mut sx, &mut sz, &mut sr, i + self.n);
                }
            }
            sr
        }
    }

    /// Row h += row i with the mod-4 phase bookkeeping
    fn rowsum(&mut self, h: usize, i: usize) {
        let (xi, zi, ri) = (self.x[i].clone(), self.z[i].clone(), self.r[i]);
        let mut hx = std::mem::take(&mut self.x[h]);
        let mut hz = std::mem::take(&mut self.z[h]);
        let mut hr = self.r[h];
        Self::rowsum_into(&mut hx, &mut hz, &mut hr, &xi, &zi, ri);
        self.x[h] = hx;
        self.z[h] = hz;
        self.r[h] = hr;
    }

    /// Accumulate row i into a scratch row
    fn accumulate(&self, sx: &mut [bool], sz: &mut [bool], sr: &mut bool, i: usize) {
        Self::rowsum_into(sx, sz, sr, &self.x[i], &self.z[i], self.r[i]);
    }

    fn rowsum_into(
        hx: &mut [bool],
        hz: &mut [bool],
        hr: &mut bool,
        ix: &[bool],
        iz: &[bool],
        ir: bool,
    ) {
        let mut phase: i32 = 2 * (*hr as i32) + 2 * (ir as i32);
        for j in 0..hx.len() {
            phase += Self::phase_exponent(ix[j], iz[j], hx[j], hz[j]);
            hx[j] ^= ix[j];
            hz[j] ^= iz[j];
        }
        *hr = phase.rem_euclid(4) == 2;
    }

    /// Exponent of i when multiplying single-qubit Paulis (x1,z1)*(x2,z2)
    fn phase_exponent(x1: bool, z1: bool, x2: bool, z2: bool) -> i32 {
        match (x1, z1) {
            (false, false) => 0,
            (true, true) => z2 as i32 - x2 as i32,
            (true, false) => (z2 as i32) * (2 * (x2 as i32) - 1),
            (false, true) => (x2 as i32) * (1 - 2 * (z2 as i32)),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

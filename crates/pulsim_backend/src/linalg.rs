//! Dense complex linear algebra
//!
//! Small row-major complex matrices and statevectors sized for few-qubit
//! simulation. Qubit 0 is the most significant bit of a basis-state index
//! throughout, so qubit `q` of an `n`-qubit register selects bit
//! `1 << (n - 1 - q)`.

use num_complex::Complex64;
use pulsim_core::QubitId;

/// Complex scalar used across the backends
pub type C64 = Complex64;

/// Bit mask of one qubit in a basis-state index
#[inline]
pub fn qubit_mask(qubit: QubitId, num_qubits: usize) -> usize {
    1 << (num_qubits - 1 - qubit)
}

// ============================================================================
// Complex Matrix
// ============================================================================

/// Square complex matrix, row-major
#[derive(Debug, Clone, PartialEq)]
pub struct CMatrix {
    dim: usize,
    data: Vec<C64>,
}

impl CMatrix {
    /// Zero matrix of the given dimension
    pub fn zeros(dim: usize) -> Self {
        Self {
            dim,
            data: vec![C64::new(0.0, 0.0); dim * dim],
        }
    }

    /// Identity matrix of the given dimension
    pub fn identity(dim: usize) -> Self {
        let mut m = Self::zeros(dim);
        for k in 0..dim {
            m.set(k, k, C64::new(1.0, 0.0));
        }
        m
    }

    /// Build from explicit rows; all rows must have the same length
    pub fn from_rows(rows: &[Vec<C64>]) -> Self {
        let dim = rows.len();
        let mut m = Self::zeros(dim);
        for (r, row) in rows.iter().enumerate() {
            assert_eq!(row.len(), dim, "matrix rows must be square");
            for (c, &v) in row.iter().enumerate() {
                m.set(r, c, v);
            }
        }
        m
    }

    /// Matrix dimension
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Element accessor
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> C64 {
        self.data[row * self.dim + col]
    }

    /// Element mutator
    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: C64) {
        self.data[row * self.dim + col] = value;
    }

    /// Matrix product `self * other`
    pub fn mul(&self, other: &CMatrix) -> CMatrix {
        assert_eq!(self.dim, other.dim);
        let mut out = CMatrix::zeros(self.dim);
        for r in 0..self.dim {
            for k in 0..self.dim {
                let a = self.get(r, k);
                if a == C64::new(0.0, 0.0) {
                    continue;
                }
                for c in 0..self.dim {
                    let v = out.get(r, c) + a * other.get(k, c);
                    out.set(r, c, v);
                }
            }
        }
        out
    }

    /// Conjugate transpose
    pub fn adjoint(&self) -> CMatrix {
        let mut out = CMatrix::zeros(self.dim);
        for r in 0..self.dim {
            for c in 0..self.dim {
                out.set(c, r, self.get(r, c).conj());
            }
        }
        out
    }

    /// Scaled copy
    pub fn scaled(&self, factor: C64) -> CMatrix {
        let mut out = self.clone();
        for v in &mut out.data {
            *v *= factor;
        }
        out
    }

    /// In-place `self += factor * other`
    pub fn add_assign_scaled(&mut self, other: &CMatrix, factor: C64) {
        assert_eq!(self.dim, other.dim);
        for (a, &b) in self.data.iter_mut().zip(other.data.iter()) {
            *a += factor * b;
        }
    }

    /// Real parts of the diagonal
    pub fn diagonal_real(&self) -> Vec<f64> {
        (0..self.dim).map(|k| self.get(k, k).re).collect()
    }

    /// Embed a local operator acting on the listed qubits into the full
    /// register space. The operator's sub-index orders the listed qubits
    /// most-significant first.
    pub fn embed(&self, qubits: &[QubitId], num_qubits: usize) -> CMatrix {
        let k = qubits.len();
        assert_eq!(self.dim, 1 << k, "operator dimension must match qubit count");
        let full = 1 << num_qubits;
        let masks: Vec<usize> = qubits.iter().map(|&q| qubit_mask(q, num_qubits)).collect();

        let mut out = CMatrix::zeros(full);
        for row in 0..full {
            let mut sub_row = 0;
            for (pos, &mask) in masks.iter().enumerate() {
                if row & mask != 0 {
                    sub_row |= 1 << (k - 1 - pos);
                }
            }
            for sub_col in 0..(1 << k) {
                let v = self.get(sub_row, sub_col);
                if v == C64::new(0.0, 0.0) {
                    continue;
                }
                let mut col = row;
                for (pos, &mask) in masks.iter().enumerate() {
                    if sub_col & (1 << (k - 1 - pos)) != 0 {
                        col |= mask;
                    } else {
                        col &= !mask;
                    }
                }
                out.set(row, col, v);
            }
        }
        out
    }
}

// ============================================================================
// Pauli Operators
// ============================================================================

/// 2x2 operator constructors
pub mod pauli {
    use super::{C64, CMatrix};

    fn c(re: f64, im: f64) -> C64 {
        C64::new(re, im)
    }

    /// Pauli X
    pub fn sigma_x() -> CMatrix {
        CMatrix::from_rows(&[vec![c(0.0, 0.0), c(1.0, 0.0)], vec![c(1.0, 0.0), c(0.0, 0.0)]])
    }

    /// Pauli Y
    pub fn sigma_y() -> CMatrix {
        CMatrix::from_rows(&[vec![c(0.0, 0.0), c(0.0, -1.0)], vec![c(0.0, 1.0), c(0.0, 0.0)]])
    }

    /// Pauli Z
    pub fn sigma_z() -> CMatrix {
        CMatrix::from_rows(&[vec![c(1.0, 0.0), c(0.0, 0.0)], vec![c(0.0, 0.0), c(-1.0, 0.0)]])
    }

    /// Lowering operator |1> -> |0>
    pub fn sigma_minus() -> CMatrix {
        CMatrix::from_rows(&[vec![c(0.0, 0.0), c(1.0, 0.0)], vec![c(0.0, 0.0), c(0.0, 0.0)]])
    }
}

// ============================================================================
// State Vector
// ============================================================================

/// Pure state over an n-qubit register
#[derive(Debug, Clone, PartialEq)]
pub struct StateVector {
    num_qubits: usize,
    amps: Vec<C64>,
}

impl StateVector {
    /// All-zeros computational basis state |0...0>
    pub fn zero_state(num_qubits: usize) -> Self {
        let mut amps = vec![C64::new(0.0, 0.0); 1 << num_qubits];
        amps[0] = C64::new(1.0, 0.0);
        Self { num_qubits, amps }
    }

    /// Number of qubits
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Amplitude of one basis state
    pub fn amplitude(&self, index: usize) -> C64 {
        self.amps[index]
    }

    /// Apply a 2x2 unitary on one qubit
    pub fn apply_single(&mut self, op: &CMatrix, qubit: QubitId) {
        assert_eq!(op.dim(), 2);
        let mask = qubit_mask(qubit, self.num_qubits);
        for index in 0..self.amps.len() {
            if index & mask != 0 {
                continue;
            }
            let a0 = self.amps[index];
            let a1 = self.amps[index | mask];
            self.amps[index] = op.get(0, 0) * a0 + op.get(0, 1) * a1;
            self.amps[index | mask] = op.get(1, 0) * a0 + op.get(1, 1) * a1;
        }
    }

    /// Apply a 4x4 unitary on a qubit pair; the first qubit is the more
    /// significant bit of the operator's sub-index
    pub fn apply_pair(&mut self, op: &CMatrix, a: QubitId, b: QubitId) {
        assert_eq!(op.dim(), 4);
        let mask_a = qubit_mask(a, self.num_qubits);
        let mask_b = qubit_mask(b, self.num_qubits);
        for index in 0..self.amps.len() {
            if index & (mask_a | mask_b) != 0 {
                continue;
            }
            let basis = [
                index,
                index | mask_b,
                index | mask_a,
                index | mask_a | mask_b,
            ];
            let old = [
                self.amps[basis[0]],
                self.amps[basis[1]],
                self.amps[basis[2]],
                self.amps[basis[3]],
            ];
            for (r, &target) in basis.iter().enumerate() {
                let mut v = C64::new(0.0, 0.0);
                for (c, &o) in old.iter().enumerate() {
                    v += op.get(r, c) * o;
                }
                self.amps[target] = v;
            }
        }
    }

    /// |amplitude|^2 per basis state
    pub fn probabilities(&self) -> Vec<f64> {
        self.amps.iter().map(|a| a.norm_sqr()).collect()
    }
}

// ============================================================================
// Tests
// ============================================================================

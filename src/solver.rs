//! Gauss-Seidel relaxation for the reduced stiffness system `K·u = f`.
//!
//! Each sweep visits the unknowns in ascending order and immediately reuses the
//! values already updated in the same sweep. This is a sequential Gauss-Seidel
//! iteration, not a Jacobi iteration: a Jacobi update would need a second buffer
//! so every entry reads only the previous sweep.
//!
//! The iteration converges for symmetric positive definite systems, which a
//! properly supported truss produces. Singular systems (mechanisms, missing
//! supports) are not detected; they show up as [`Convergence::Exhausted`] or as
//! non-finite values.

use log::{info, trace, warn};
use nalgebra::{DMatrix, DVector};
use serde::Deserialize;

use crate::errors::AnalysisError;

/// Largest per-entry change accepted as converged.
pub const DEFAULT_TOLERANCE: f64 = 1.0e-6;

/// Hard cap on the number of sweeps.
pub const DEFAULT_MAX_SWEEPS: usize = 10_000;

/// Solver configuration.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// A sweep converges when every entry changes by less than this amount.
    pub tolerance: f64,
    /// Maximum number of sweeps before giving up.
    pub max_sweeps: usize,
    /// Treat exhaustion of the sweep limit as an error instead of a status.
    pub strict: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            max_sweeps: DEFAULT_MAX_SWEEPS,
            strict: false,
        }
    }
}

/// How a relaxation run ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Convergence {
    /// Every entry changed by less than the tolerance in the final sweep.
    Converged,
    /// The sweep limit was reached first; the last iterate is returned as is.
    Exhausted,
}

/// Outcome of a relaxation run.
#[derive(Clone, Debug, PartialEq)]
pub struct Solution {
    /// Final iterate.
    pub values: DVector<f64>,
    /// Whether the tolerance was met.
    pub status: Convergence,
    /// Number of sweeps performed.
    pub sweeps: usize,
    /// Largest entry change in the final sweep.
    pub max_change: f64,
}

impl Solution {
    /// Return `true` when the run met its tolerance.
    #[must_use]
    pub fn is_converged(&self) -> bool {
        self.status == Convergence::Converged
    }

    /// Turn an exhausted run into an error.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::NotConverged`] when the sweep limit was reached.
    pub fn require_converged(self) -> Result<Self, AnalysisError> {
        match self.status {
            Convergence::Converged => Ok(self),
            Convergence::Exhausted => Err(AnalysisError::NotConverged {
                sweeps: self.sweeps,
                max_change: self.max_change,
            }),
        }
    }
}

/// Sequential relaxation solver.
#[derive(Clone, Copy, Debug, Default)]
pub struct GaussSeidel {
    config: SolverConfig,
}

impl GaussSeidel {
    /// Create a solver with the given configuration.
    #[must_use]
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    /// The configuration in use.
    #[must_use]
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Solve `a·x = b` starting from `x = 0`.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::DimensionMismatch`] for inconsistent shapes and
    /// [`AnalysisError::ZeroDiagonal`] when a diagonal entry is zero.
    ///
    /// # Examples
    /// ```
    /// use nalgebra::{DMatrix, DVector};
    /// use truss2d::{GaussSeidel, SolverConfig};
    ///
    /// let a = DMatrix::from_row_slice(2, 2, &[4.0, 1.0, 1.0, 3.0]);
    /// let b = DVector::from_vec(vec![1.0, 2.0]);
    /// let solution = GaussSeidel::new(SolverConfig::default()).solve(&a, &b)?;
    /// assert!(solution.is_converged());
    /// assert!((solution.values[0] - 1.0 / 11.0).abs() < 1.0e-5);
    /// # Ok::<(), truss2d::AnalysisError>(())
    /// ```
    pub fn solve(&self, a: &DMatrix<f64>, b: &DVector<f64>) -> Result<Solution, AnalysisError> {
        let initial = DVector::zeros(b.len());
        self.relax(a, b, initial, None)
    }

    /// Solve `a·x = b` from a caller supplied initial guess.
    ///
    /// Entries of `initial` that are exactly zero are treated as held supports:
    /// they are never updated and stay at zero in the result.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::DimensionMismatch`] for inconsistent shapes and
    /// [`AnalysisError::ZeroDiagonal`] when an updated row has a zero diagonal.
    pub fn solve_from(
        &self,
        a: &DMatrix<f64>,
        b: &DVector<f64>,
        initial: &DVector<f64>,
    ) -> Result<Solution, AnalysisError> {
        let held: Vec<bool> = initial.iter().map(|&value| value == 0.0).collect();
        self.relax(a, b, initial.clone(), Some(&held))
    }

    fn relax(
        &self,
        a: &DMatrix<f64>,
        b: &DVector<f64>,
        mut x: DVector<f64>,
        held: Option<&[bool]>,
    ) -> Result<Solution, AnalysisError> {
        let n = b.len();
        for found in [a.nrows(), a.ncols(), x.len()] {
            if found != n {
                return Err(AnalysisError::DimensionMismatch { expected: n, found });
            }
        }
        let is_held = |row: usize| held.is_some_and(|held| held[row]);
        if let Some(row) = (0..n).find(|&row| !is_held(row) && a[(row, row)] == 0.0) {
            return Err(AnalysisError::ZeroDiagonal { row });
        }
        if n == 0 {
            return Ok(Solution {
                values: x,
                status: Convergence::Converged,
                sweeps: 0,
                max_change: 0.0,
            });
        }

        let mut previous = x.clone();
        let mut max_change = f64::INFINITY;
        for sweep in 1..=self.config.max_sweeps {
            for row in 0..n {
                if is_held(row) {
                    continue;
                }
                let lower: f64 = (0..row).map(|column| a[(row, column)] * x[column]).sum();
                let upper: f64 = ((row + 1)..n)
                    .map(|column| a[(row, column)] * x[column])
                    .sum();
                x[row] = (b[row] - lower - upper) / a[(row, row)];
            }

            let converged = x
                .iter()
                .zip(previous.iter())
                .all(|(current, last)| (current - last).abs() < self.config.tolerance);
            max_change = x
                .iter()
                .zip(previous.iter())
                .map(|(current, last)| (current - last).abs())
                .fold(0.0, f64::max);
            previous.copy_from(&x);
            trace!("sweep {sweep}: max change {max_change:e}");

            if converged {
                info!("relaxation converged after {sweep} sweeps over {n} unknowns");
                return Ok(Solution {
                    values: x,
                    status: Convergence::Converged,
                    sweeps: sweep,
                    max_change,
                });
            }
        }

        warn!(
            "relaxation stopped after {} sweeps without converging (last change {max_change:e})",
            self.config.max_sweeps
        );
        Ok(Solution {
            values: x,
            status: Convergence::Exhausted,
            sweeps: self.config.max_sweeps,
            max_change,
        })
    }
}

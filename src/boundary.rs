//! Elimination and re-insertion of supported degrees of freedom.

use log::debug;
use nalgebra::{DMatrix, DVector};

use crate::errors::AnalysisError;
use crate::geometry::Dof;

/// Per-DOF record of which degrees of freedom are held at zero displacement.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoundaryMask {
    /// `true` for every fixed degree of freedom.
    fixed: Vec<bool>,
}

impl BoundaryMask {
    /// Build a mask from explicit per-DOF constraints.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::NonZeroPrescribedDisplacement`] for a support
    /// prescribing anything other than zero, which elimination cannot represent.
    pub fn from_constraints(constraints: &[Dof]) -> Result<Self, AnalysisError> {
        let fixed = constraints
            .iter()
            .enumerate()
            .map(|(dof, constraint)| match *constraint {
                Dof::Free => Ok(false),
                Dof::Fixed(value) if value == 0.0 => Ok(true),
                Dof::Fixed(value) => Err(AnalysisError::NonZeroPrescribedDisplacement { dof, value }),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { fixed })
    }

    /// Build a mask from a sentinel-encoded displacement vector where an entry of
    /// exactly zero marks a fixed degree of freedom and any other value is free.
    ///
    /// # Examples
    /// ```
    /// use truss2d::BoundaryMask;
    ///
    /// let mask = BoundaryMask::from_sentinel(&[0.0, 0.0, 1.0, 0.0]);
    /// assert_eq!(mask.free_indices(), vec![2]);
    /// ```
    #[must_use]
    pub fn from_sentinel(values: &[f64]) -> Self {
        Self {
            fixed: values.iter().map(|&value| value == 0.0).collect(),
        }
    }

    /// Number of degrees of freedom covered by the mask.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fixed.len()
    }

    /// Return `true` when the mask covers no degrees of freedom.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fixed.is_empty()
    }

    /// Return `true` when `dof` is fixed.
    #[must_use]
    pub fn is_fixed(&self, dof: usize) -> bool {
        self.fixed.get(dof).copied().unwrap_or(false)
    }

    /// Indices of the fixed degrees of freedom in ascending order.
    #[must_use]
    pub fn fixed_indices(&self) -> Vec<usize> {
        self.indices(true)
    }

    /// Indices of the free degrees of freedom in ascending order.
    #[must_use]
    pub fn free_indices(&self) -> Vec<usize> {
        self.indices(false)
    }

    /// Number of free degrees of freedom.
    #[must_use]
    pub fn free_count(&self) -> usize {
        self.fixed.iter().filter(|&&fixed| !fixed).count()
    }

    fn indices(&self, fixed: bool) -> Vec<usize> {
        self.fixed
            .iter()
            .enumerate()
            .filter(|(_, &flag)| flag == fixed)
            .map(|(dof, _)| dof)
            .collect()
    }

    fn check_len(&self, found: usize) -> Result<(), AnalysisError> {
        if found == self.len() {
            Ok(())
        } else {
            Err(AnalysisError::DimensionMismatch {
                expected: self.len(),
                found,
            })
        }
    }

    /// Remove the rows and columns of every fixed degree of freedom.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::DimensionMismatch`] unless `matrix` is square with
    /// one row per degree of freedom.
    pub fn reduce_matrix(&self, matrix: &DMatrix<f64>) -> Result<DMatrix<f64>, AnalysisError> {
        self.check_len(matrix.nrows())?;
        self.check_len(matrix.ncols())?;
        let free = self.free_indices();
        let reduced = matrix.select_rows(free.iter()).select_columns(free.iter());
        debug!(
            "reduced {}x{} system to {}x{}",
            matrix.nrows(),
            matrix.ncols(),
            reduced.nrows(),
            reduced.ncols()
        );
        Ok(reduced)
    }

    /// Remove the entries of every fixed degree of freedom.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::DimensionMismatch`] when `vector` does not have one
    /// entry per degree of freedom.
    pub fn reduce_vector(&self, vector: &DVector<f64>) -> Result<DVector<f64>, AnalysisError> {
        self.check_len(vector.len())?;
        Ok(vector.select_rows(self.free_indices().iter()))
    }

    /// Keep only the rows of fixed degrees of freedom, leaving every column.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::DimensionMismatch`] when `matrix` does not have one
    /// row per degree of freedom.
    pub fn fixed_rows(&self, matrix: &DMatrix<f64>) -> Result<DMatrix<f64>, AnalysisError> {
        self.check_len(matrix.nrows())?;
        Ok(matrix.select_rows(self.fixed_indices().iter()))
    }

    /// Re-insert a zero at each fixed degree of freedom.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::DimensionMismatch`] when `reduced` does not have one
    /// entry per free degree of freedom.
    pub fn expand(&self, reduced: &DVector<f64>) -> Result<DVector<f64>, AnalysisError> {
        self.scatter(reduced, true)
    }

    /// Place `values`, one per fixed degree of freedom, into a full-length vector
    /// that is zero at every free degree of freedom.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::DimensionMismatch`] when `values` does not have one
    /// entry per fixed degree of freedom.
    pub fn expand_fixed(&self, values: &DVector<f64>) -> Result<DVector<f64>, AnalysisError> {
        self.scatter(values, false)
    }

    fn scatter(&self, values: &DVector<f64>, onto_free: bool) -> Result<DVector<f64>, AnalysisError> {
        let targets = if onto_free {
            self.free_indices()
        } else {
            self.fixed_indices()
        };
        if values.len() != targets.len() {
            return Err(AnalysisError::DimensionMismatch {
                expected: targets.len(),
                found: values.len(),
            });
        }
        let mut full = DVector::zeros(self.len());
        for (value, dof) in values.iter().zip(targets) {
            full[dof] = *value;
        }
        Ok(full)
    }
}

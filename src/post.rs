//! Recovery of member stresses and support reactions from solved displacements.

use nalgebra::{DMatrix, DVector, Vector4};

use crate::boundary::BoundaryMask;
use crate::element::Element;
use crate::errors::AnalysisError;

/// Gather the four displacements `[u1, v1, u2, v2]` of an element.
fn element_displacements(element: &Element, displacements: &DVector<f64>) -> Result<Vector4<f64>, AnalysisError> {
    let dofs = element.dofs();
    let needed = dofs[0].max(dofs[2]) + 2;
    if displacements.len() < needed {
        return Err(AnalysisError::DimensionMismatch {
            expected: needed,
            found: displacements.len(),
        });
    }
    Ok(Vector4::new(
        displacements[dofs[0]],
        displacements[dofs[1]],
        displacements[dofs[2]],
        displacements[dofs[3]],
    ))
}

/// Axial stress in every element, in element order. Tension is positive.
///
/// # Errors
///
/// Returns [`AnalysisError::DimensionMismatch`] when `displacements` is too short
/// to contain an element's nodes.
pub fn stresses(elements: &[Element], displacements: &DVector<f64>) -> Result<Vec<f64>, AnalysisError> {
    elements
        .iter()
        .map(|element| Ok(element.stress(&element_displacements(element, displacements)?)))
        .collect()
}

/// Reaction forces using the supports of `mask`.
///
/// Rows of free degrees of freedom are dropped from `stiffness`, the remaining
/// rows are multiplied by the full displacement vector, and the products are
/// placed back at the fixed positions. Free positions carry zero.
///
/// # Errors
///
/// Returns [`AnalysisError::DimensionMismatch`] for inconsistent shapes.
pub fn reactions_at(
    stiffness: &DMatrix<f64>,
    displacements: &DVector<f64>,
    mask: &BoundaryMask,
) -> Result<DVector<f64>, AnalysisError> {
    if stiffness.ncols() != displacements.len() {
        return Err(AnalysisError::DimensionMismatch {
            expected: stiffness.ncols(),
            found: displacements.len(),
        });
    }
    let fixed_rows = mask.fixed_rows(stiffness)?;
    mask.expand_fixed(&(fixed_rows * displacements))
}

/// Reaction forces inferring supports from the displacements themselves: every
/// degree of freedom with exactly zero displacement is taken as fixed.
///
/// # Errors
///
/// Returns [`AnalysisError::DimensionMismatch`] for inconsistent shapes.
pub fn reactions(stiffness: &DMatrix<f64>, displacements: &DVector<f64>) -> Result<DVector<f64>, AnalysisError> {
    let mask = BoundaryMask::from_sentinel(displacements.as_slice());
    reactions_at(stiffness, displacements, &mask)
}

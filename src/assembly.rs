//! Assembly of element stiffness into the global system.
//!
//! Every node owns a 2×2 block of the global matrix starting at `2 * node`. An
//! element's 4×4 stiffness splits into four such quadrants (start-start,
//! end-start, start-end, end-end) which are summed into the blocks of the node
//! pairs they couple.

use log::debug;
use nalgebra::{DMatrix, DVector, Matrix2, Matrix4};

use crate::element::Element;
use crate::errors::AnalysisError;
use crate::geometry::Force;

/// Quadrant of an element stiffness matrix together with the node pair it couples.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Quadrant {
    /// Node whose block row receives the quadrant.
    pub row_node: usize,
    /// Node whose block column receives the quadrant.
    pub column_node: usize,
    /// The 2×2 sub-matrix.
    pub block: Matrix2<f64>,
}

/// Split an element stiffness into its four quadrants in the order
/// start-start, end-start, start-end, end-end.
#[must_use]
pub fn quadrants(start: usize, end: usize, stiffness: &Matrix4<f64>) -> [Quadrant; 4] {
    let block = |row: usize, column: usize| -> Matrix2<f64> {
        stiffness.fixed_view::<2, 2>(row, column).into_owned()
    };
    [
        Quadrant {
            row_node: start,
            column_node: start,
            block: block(0, 0),
        },
        Quadrant {
            row_node: end,
            column_node: start,
            block: block(2, 0),
        },
        Quadrant {
            row_node: start,
            column_node: end,
            block: block(0, 2),
        },
        Quadrant {
            row_node: end,
            column_node: end,
            block: block(2, 2),
        },
    ]
}

/// Add a 2×2 block into `matrix` at the block offset of the given node pair.
///
/// # Panics
///
/// Panics when either node lies outside the matrix.
pub fn add_block(matrix: &mut DMatrix<f64>, row_node: usize, column_node: usize, block: &Matrix2<f64>) {
    let mut target = matrix.fixed_view_mut::<2, 2>(2 * row_node, 2 * column_node);
    target += block;
}

fn check_nodes(element: &Element, node_count: usize) -> Result<(), AnalysisError> {
    for node in [element.start(), element.end()] {
        if node >= node_count {
            return Err(AnalysisError::UnknownNode { node, node_count });
        }
    }
    Ok(())
}

/// Scatter a single element into a zeroed `2N × 2N` matrix.
///
/// # Errors
///
/// Returns [`AnalysisError::UnknownNode`] when the element refers to a node
/// outside `0..node_count`.
pub fn scatter_element(element: &Element, node_count: usize) -> Result<DMatrix<f64>, AnalysisError> {
    check_nodes(element, node_count)?;
    let dof = 2 * node_count;
    let mut contribution = DMatrix::zeros(dof, dof);
    for quadrant in quadrants(element.start(), element.end(), element.stiffness()) {
        add_block(
            &mut contribution,
            quadrant.row_node,
            quadrant.column_node,
            &quadrant.block,
        );
    }
    Ok(contribution)
}

/// Assemble the global stiffness matrix by summing every element contribution.
///
/// Elements are visited in slice order, so the floating-point summation order is
/// fixed for a given input.
///
/// # Errors
///
/// Returns [`AnalysisError::UnknownNode`] when an element refers to a node
/// outside `0..node_count`.
pub fn assemble_global(elements: &[Element], node_count: usize) -> Result<DMatrix<f64>, AnalysisError> {
    let dof = 2 * node_count;
    let mut global = DMatrix::zeros(dof, dof);
    for element in elements {
        check_nodes(element, node_count)?;
        for quadrant in quadrants(element.start(), element.end(), element.stiffness()) {
            add_block(
                &mut global,
                quadrant.row_node,
                quadrant.column_node,
                &quadrant.block,
            );
        }
    }
    debug!(
        "assembled {dof}x{dof} global stiffness from {} elements",
        elements.len()
    );
    Ok(global)
}

/// Flatten nodal loads into the global force vector `[fx0, fy0, fx1, fy1, ...]`.
#[must_use]
pub fn assemble_load_vector(loads: &[Force]) -> DVector<f64> {
    DVector::from_iterator(
        2 * loads.len(),
        loads.iter().flat_map(|load| [load.x, load.y]),
    )
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::geometry::{force, point, Point};

    fn fan(positions: &[Point], connections: &[(usize, usize)]) -> Vec<Element> {
        connections
            .iter()
            .map(|&(a, b)| {
                Element::new((a, positions[a]), (b, positions[b]), 70.0e9, 4.0e-4)
                    .expect("valid element")
            })
            .collect()
    }

    #[test]
    fn quadrants_cover_the_element_matrix() {
        let element = Element::new((0, point(0.0, 0.0)), (1, point(3.0, 4.0)), 1.0, 1.0)
            .expect("valid element");
        let parts = quadrants(0, 1, element.stiffness());
        assert_eq!(parts[1].row_node, 1);
        assert_eq!(parts[1].column_node, 0);
        assert_eq!(parts[1].block[(0, 1)], element.stiffness()[(2, 1)]);
        assert_eq!(parts[2].block[(1, 0)], element.stiffness()[(1, 2)]);
        assert_eq!(parts[3].block[(1, 1)], element.stiffness()[(3, 3)]);
    }

    #[test]
    fn scatter_places_blocks_at_node_offsets() {
        let element = Element::new((2, point(0.0, 0.0)), (0, point(1.0, 1.0)), 1.0, 1.0)
            .expect("valid element");
        let scattered = scatter_element(&element, 3).expect("nodes in range");
        let local = element.stiffness();
        assert_eq!(scattered.shape(), (6, 6));
        // Local DOFs (0..4) map onto global DOFs (4, 5, 0, 1).
        let map = [4, 5, 0, 1];
        for (i, &row) in map.iter().enumerate() {
            for (j, &column) in map.iter().enumerate() {
                assert_eq!(scattered[(row, column)], local[(i, j)]);
            }
        }
        assert!(scattered.row(2).iter().all(|&entry| entry == 0.0));
        assert!(scattered.column(3).iter().all(|&entry| entry == 0.0));
    }

    #[test]
    fn shared_nodes_are_summed() {
        let positions = [point(0.0, 0.0), point(1.0, 0.0), point(2.0, 0.0)];
        let elements = fan(&positions, &[(0, 1), (1, 2)]);
        let global = assemble_global(&elements, 3).expect("assembly succeeds");
        let k = 70.0e9 * 4.0e-4;
        assert_relative_eq!(global[(2, 2)], 2.0 * k);
        assert_relative_eq!(global[(0, 2)], -k);
        assert_relative_eq!(global[(4, 4)], k);
        assert_eq!(global[(0, 4)], 0.0);
    }

    #[test]
    fn assembly_equals_sum_of_scattered_contributions() {
        let positions = [point(0.0, 0.0), point(4.0, 0.0), point(0.0, 3.0)];
        let elements = fan(&positions, &[(0, 1), (1, 2), (0, 2)]);
        let global = assemble_global(&elements, 3).expect("assembly succeeds");
        let summed = elements
            .iter()
            .map(|element| scatter_element(element, 3).expect("nodes in range"))
            .fold(DMatrix::zeros(6, 6), |total, contribution| total + contribution);
        assert_eq!(global, summed);
    }

    #[test]
    fn global_stiffness_is_symmetric() {
        let positions: Vec<Point> = (0..7_i32)
            .map(|i| {
                let angle = f64::from(i) * 0.9;
                point(f64::from(i) * 1.5 + angle.cos(), 2.0 * angle.sin())
            })
            .collect();
        let mut connections = Vec::new();
        for a in 0..positions.len() {
            for b in (a + 1)..positions.len() {
                if (a + b) % 3 != 0 {
                    connections.push((a, b));
                }
            }
        }
        let elements = fan(&positions, &connections);
        let global = assemble_global(&elements, positions.len()).expect("assembly succeeds");
        let scale = global.amax();
        assert_relative_eq!(
            global,
            global.transpose(),
            epsilon = scale * 1.0e-14
        );
    }

    #[test]
    fn out_of_range_node_is_rejected() {
        let element = Element::new((0, point(0.0, 0.0)), (5, point(1.0, 0.0)), 1.0, 1.0)
            .expect("valid element");
        let error = assemble_global(&[element], 2).expect_err("node 5 missing");
        assert_eq!(
            error,
            AnalysisError::UnknownNode {
                node: 5,
                node_count: 2
            }
        );
    }

    #[test]
    fn load_vector_interleaves_components() {
        let loads = [force(1.0, 2.0), force(-3.0, 4.0)];
        assert_eq!(
            assemble_load_vector(&loads),
            DVector::from_vec(vec![1.0, 2.0, -3.0, 4.0])
        );
    }
}

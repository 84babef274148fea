//! The linear static analysis pipeline and its results.

use log::debug;
use nalgebra::{DMatrix, DVector};
use petgraph::graph::{EdgeIndex, NodeIndex};

use crate::assembly::assemble_global;
use crate::boundary::BoundaryMask;
use crate::element::Element;
use crate::errors::AnalysisError;
use crate::geometry::{Displacement, Force};
use crate::post;
use crate::solver::{Convergence, GaussSeidel, Solution, SolverConfig};

/// Summary of the relaxation run behind an [`Analysis`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SolverReport {
    /// Whether the tolerance was met.
    pub status: Convergence,
    /// Sweeps performed.
    pub sweeps: usize,
    /// Largest entry change in the final sweep.
    pub max_change: f64,
}

impl From<&Solution> for SolverReport {
    fn from(solution: &Solution) -> Self {
        Self {
            status: solution.status,
            sweeps: solution.sweeps,
            max_change: solution.max_change,
        }
    }
}

/// Results of a static analysis.
///
/// Displacements and reactions are ordered `u0, v0, u1, v1, ...`; stresses follow
/// element order.
#[derive(Clone, Debug)]
pub struct Analysis {
    elements: Vec<Element>,
    stiffness: DMatrix<f64>,
    displacements: DVector<f64>,
    stresses: Vec<f64>,
    reactions: DVector<f64>,
    solver: SolverReport,
}

impl Analysis {
    /// Full displacement vector in metres.
    #[must_use]
    pub fn displacements(&self) -> &DVector<f64> {
        &self.displacements
    }

    /// Axial stress per element in pascals.
    #[must_use]
    pub fn stresses(&self) -> &[f64] {
        &self.stresses
    }

    /// Full reaction vector in newtons, zero at free degrees of freedom.
    #[must_use]
    pub fn reactions(&self) -> &DVector<f64> {
        &self.reactions
    }

    /// The unreduced global stiffness matrix.
    #[must_use]
    pub fn stiffness(&self) -> &DMatrix<f64> {
        &self.stiffness
    }

    /// The elements the analysis was run on.
    #[must_use]
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Outcome of the relaxation solve.
    #[must_use]
    pub fn solver(&self) -> SolverReport {
        self.solver
    }

    /// Return `true` when the relaxation met its tolerance.
    #[must_use]
    pub fn is_converged(&self) -> bool {
        self.solver.status == Convergence::Converged
    }

    /// Number of nodes covered by the results.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.displacements.len() / 2
    }

    fn pair(vector: &DVector<f64>, node: usize) -> Option<(f64, f64)> {
        Some((*vector.get(2 * node)?, *vector.get(2 * node + 1)?))
    }

    /// Displacement of a node.
    #[must_use]
    pub fn node_displacement(&self, node: NodeIndex) -> Option<Displacement> {
        Self::pair(&self.displacements, node.index()).map(|(x, y)| Displacement::new(x, y))
    }

    /// Support reaction at a node.
    #[must_use]
    pub fn node_reaction(&self, node: NodeIndex) -> Option<Force> {
        Self::pair(&self.reactions, node.index()).map(|(x, y)| Force::new(x, y))
    }

    /// Axial stress in a member.
    #[must_use]
    pub fn member_stress(&self, member: EdgeIndex) -> Option<f64> {
        self.stresses.get(member.index()).copied()
    }

    /// Axial force in a member (stress times area); tension is positive.
    #[must_use]
    pub fn member_axial_force(&self, member: EdgeIndex) -> Option<f64> {
        let element = self.elements.get(member.index())?;
        Some(self.member_stress(member)? * element.area())
    }

    /// Axial strain in a member.
    #[must_use]
    pub fn member_strain(&self, member: EdgeIndex) -> Option<f64> {
        let element = self.elements.get(member.index())?;
        Some(self.member_stress(member)? / element.elastic_modulus())
    }
}

/// Run the full pipeline: assemble, reduce, relax, expand and post-process.
///
/// When `initial` is supplied it is the starting guess for the reduced system,
/// one entry per free degree of freedom.
///
/// # Errors
///
/// Returns [`AnalysisError`] for inconsistent input, a zero diagonal in the
/// reduced system, or an unconverged solve when `config.strict` is set.
pub fn run(
    elements: Vec<Element>,
    node_count: usize,
    mask: &BoundaryMask,
    loads: &DVector<f64>,
    initial: Option<&DVector<f64>>,
    config: &SolverConfig,
) -> Result<Analysis, AnalysisError> {
    let stiffness = assemble_global(&elements, node_count)?;
    let reduced_stiffness = mask.reduce_matrix(&stiffness)?;
    let reduced_loads = mask.reduce_vector(loads)?;
    debug!(
        "solving for {} free of {} degrees of freedom",
        mask.free_count(),
        mask.len()
    );

    let solver = GaussSeidel::new(*config);
    let solution = match initial {
        Some(initial) => solver.solve_from(&reduced_stiffness, &reduced_loads, initial)?,
        None => solver.solve(&reduced_stiffness, &reduced_loads)?,
    };
    let solution = if config.strict {
        solution.require_converged()?
    } else {
        solution
    };

    let displacements = mask.expand(&solution.values)?;
    let stresses = post::stresses(&elements, &displacements)?;
    let reactions = post::reactions_at(&stiffness, &displacements, mask)?;
    Ok(Analysis {
        elements,
        stiffness,
        displacements,
        stresses,
        reactions,
        solver: SolverReport::from(&solution),
    })
}

/// Run the pipeline on a sentinel-encoded prescribed displacement vector.
///
/// Entries of `prescribed` equal to zero are supports; every other entry is free
/// and its value seeds the relaxation.
///
/// # Errors
///
/// See [`run`].
///
/// # Examples
/// ```
/// use nalgebra::DVector;
/// use truss2d::{analysis, point, Element, SolverConfig};
///
/// let bar = Element::new((0, point(0.0, 0.0)), (1, point(1.0, 0.0)), 200.0e9, 0.01)?;
/// let prescribed = [0.0, 0.0, 1.0, 0.0];
/// let loads = DVector::from_vec(vec![0.0, 0.0, 2_000.0, 0.0]);
/// let result = analysis::run_with_sentinel(vec![bar], 2, &prescribed, &loads, &SolverConfig::default())?;
/// assert!((result.displacements()[2] - 1.0e-6).abs() < 1.0e-12);
/// # Ok::<(), truss2d::AnalysisError>(())
/// ```
pub fn run_with_sentinel(
    elements: Vec<Element>,
    node_count: usize,
    prescribed: &[f64],
    loads: &DVector<f64>,
    config: &SolverConfig,
) -> Result<Analysis, AnalysisError> {
    let mask = BoundaryMask::from_sentinel(prescribed);
    let initial = mask.reduce_vector(&DVector::from_column_slice(prescribed))?;
    run(elements, node_count, &mask, loads, Some(&initial), config)
}

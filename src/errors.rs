//! Error types produced while editing, loading or analysing trusses.

use petgraph::graph::{EdgeIndex, NodeIndex};
use thiserror::Error;

/// Error returned when a truss analysis fails.
#[derive(Debug, Error, PartialEq)]
pub enum AnalysisError {
    /// Returned when a member is missing required material properties.
    #[error("member {0:?} is missing material properties")]
    MissingProperties(EdgeIndex),
    /// Returned when the properties of an element are not physically meaningful.
    #[error("element between nodes {start} and {end} has invalid properties: {source}")]
    InvalidElementProperties {
        /// Index of the start node.
        start: usize,
        /// Index of the end node.
        end: usize,
        /// Description of the invalid property.
        #[source]
        source: MemberPropertyError,
    },
    /// Returned when the two endpoints of an element coincide.
    #[error("element between nodes {start} and {end} has zero length")]
    DegenerateElement {
        /// Index of the start node.
        start: usize,
        /// Index of the end node.
        end: usize,
    },
    /// Returned when an element refers to a node outside the model.
    #[error("node {node} is out of range for a model with {node_count} nodes")]
    UnknownNode {
        /// Offending node index.
        node: usize,
        /// Number of nodes in the model.
        node_count: usize,
    },
    /// Returned when a support prescribes a displacement other than zero.
    #[error("degree of freedom {dof} is fixed at {value}; only zero displacement supports are supported")]
    NonZeroPrescribedDisplacement {
        /// Global degree-of-freedom index.
        dof: usize,
        /// Rejected prescribed value.
        value: f64,
    },
    /// Returned when a vector or matrix does not match the number of degrees of freedom.
    #[error("expected dimension {expected}, found {found}")]
    DimensionMismatch {
        /// Required length.
        expected: usize,
        /// Supplied length.
        found: usize,
    },
    /// Returned when the reduced system has a zero on its diagonal.
    #[error("reduced stiffness has a zero diagonal at row {row}; check supports and connectivity")]
    ZeroDiagonal {
        /// Row of the reduced system.
        row: usize,
    },
    /// Returned by a strict solve when the sweep limit is reached first.
    #[error("relaxation did not converge after {sweeps} sweeps (last change {max_change:e})")]
    NotConverged {
        /// Number of sweeps performed.
        sweeps: usize,
        /// Largest entry change in the final sweep.
        max_change: f64,
    },
}

/// Error returned when updating material properties for a truss member.
#[derive(Clone, Copy, Debug, Error, PartialEq)]
pub enum MemberPropertyError {
    /// Returned when the cross-sectional area is zero or negative.
    #[error("area must be positive (received {area})")]
    NonPositiveArea {
        /// Rejected cross-sectional area in square metres.
        area: f64,
    },
    /// Returned when the elastic modulus is zero or negative.
    #[error("elastic modulus must be positive (received {elastic_modulus})")]
    NonPositiveElasticModulus {
        /// Rejected elastic modulus in pascals.
        elastic_modulus: f64,
    },
}

impl MemberPropertyError {
    /// Check that an area and modulus pair is physically meaningful.
    ///
    /// # Errors
    ///
    /// Returns the first property that is not strictly positive.
    pub fn check(area: f64, elastic_modulus: f64) -> Result<(), MemberPropertyError> {
        if !(area > 0.0) {
            return Err(MemberPropertyError::NonPositiveArea { area });
        }
        if !(elastic_modulus > 0.0) {
            return Err(MemberPropertyError::NonPositiveElasticModulus { elastic_modulus });
        }
        Ok(())
    }
}

/// Error returned when editing a [`Truss`](crate::Truss) with invalid indices.
///
/// # Examples
///
/// ```
/// use petgraph::graph::EdgeIndex;
/// use truss2d::{Truss, TrussEditError};
///
/// let mut truss = Truss::new();
/// let invalid_member = EdgeIndex::new(42);
/// let error = truss
///     .set_member_properties(invalid_member, 0.01, 200.0e9)
///     .expect_err("unknown member is rejected");
/// assert_eq!(error, TrussEditError::UnknownMember(invalid_member));
/// ```
#[derive(Debug, Error, PartialEq)]
pub enum TrussEditError {
    /// Returned when a joint cannot be found in the truss.
    #[error("joint {0:?} does not exist in this truss")]
    UnknownJoint(NodeIndex),
    /// Returned when a member cannot be found in the truss.
    #[error("member {0:?} does not exist in this truss")]
    UnknownMember(EdgeIndex),
    /// Returned when the supplied member properties are invalid.
    #[error("{0}")]
    InvalidMemberProperties(MemberPropertyError),
}

/// Error returned when a truss definition file cannot be turned into a model.
#[derive(Debug, Error)]
pub enum DefinitionError {
    /// The definition could not be read.
    #[error("failed to read definition: {0}")]
    Io(#[from] std::io::Error),
    /// The definition is not valid JSON for the expected schema.
    #[error("failed to parse definition: {0}")]
    Json(#[from] serde_json::Error),
    /// An element refers to a node that is not defined.
    #[error("element {element} refers to node {node}, but only {node_count} nodes are defined")]
    UnknownNode {
        /// Position of the element in the definition.
        element: usize,
        /// Offending node index.
        node: usize,
        /// Number of nodes defined.
        node_count: usize,
    },
    /// A per-node table does not have one entry per node.
    #[error("{table} has {found} entries but {expected} nodes are defined")]
    ShapeMismatch {
        /// Name of the offending table.
        table: &'static str,
        /// Number of nodes.
        expected: usize,
        /// Number of entries supplied.
        found: usize,
    },
    /// An element does not define exactly one of area or diameter.
    #[error("element {element} must define exactly one of area or diameter")]
    Section {
        /// Position of the element in the definition.
        element: usize,
    },
    /// The definition describes an invalid edit.
    #[error(transparent)]
    Edit(#[from] TrussEditError),
}

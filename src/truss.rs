//! Planar truss model built on a graph of joints and members.

use nalgebra::DVector;
use petgraph::graph::{EdgeIndex, Graph, NodeIndex};

use crate::analysis::{self, Analysis};
use crate::assembly::assemble_load_vector;
use crate::boundary::BoundaryMask;
use crate::element::Element;
use crate::errors::{AnalysisError, MemberPropertyError, TrussEditError};
use crate::geometry::{Dof, Force, Point};
use crate::solver::SolverConfig;

/// Internal representation of a truss joint.
#[derive(Clone, Debug)]
struct Joint {
    /// Position of the joint in metres.
    position: Point,
    /// Constraint on the X and Y degrees of freedom.
    support: [Dof; 2],
    /// External load applied to the joint in newtons.
    load: Force,
}

impl Joint {
    /// Create an unsupported, unloaded joint.
    fn new(position: Point) -> Self {
        Self {
            position,
            support: [Dof::Free, Dof::Free],
            load: Force::default(),
        }
    }
}

/// Internal representation of a truss member.
#[derive(Clone, Debug, Default)]
struct Member {
    /// Cross-sectional area in square metres.
    area: Option<f64>,
    /// Elastic modulus in pascals.
    elastic_modulus: Option<f64>,
}

impl Member {
    /// Return the area and elastic modulus when both are present.
    fn properties(&self) -> Option<(f64, f64)> {
        Some((self.area?, self.elastic_modulus?))
    }
}

/// Container for a planar pin-jointed truss model.
///
/// Joints are numbered in insertion order; joint `i` owns global degrees of
/// freedom `2i` (X) and `2i + 1` (Y). Members are numbered in insertion order
/// and that order is kept in every per-member result.
#[derive(Clone, Debug, Default)]
pub struct Truss {
    /// Underlying graph storage for joints and members.
    graph: Graph<Joint, Member>,
}

impl Truss {
    /// Create an empty truss.
    ///
    /// # Examples
    /// ```
    /// use truss2d::Truss;
    ///
    /// let truss = Truss::new();
    /// assert_eq!(truss.joint_count(), 0);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self {
            graph: Graph::new(),
        }
    }

    /// Return the number of joints in the truss.
    #[must_use]
    pub fn joint_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Return the number of members in the truss.
    #[must_use]
    pub fn member_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Add a new joint to the truss.
    ///
    /// # Examples
    /// ```
    /// use truss2d::{point, Truss};
    ///
    /// let mut truss = Truss::new();
    /// let joint = truss.add_joint(point(0.0, 0.0));
    /// assert_eq!(truss.joint_count(), 1);
    /// assert_eq!(joint.index(), 0);
    /// ```
    pub fn add_joint(&mut self, position: Point) -> NodeIndex {
        self.graph.add_node(Joint::new(position))
    }

    /// Connect two joints with a new member.
    ///
    /// # Errors
    ///
    /// Returns [`TrussEditError::UnknownJoint`] when either joint is not part of this truss.
    pub fn add_member(&mut self, start: NodeIndex, end: NodeIndex) -> Result<EdgeIndex, TrussEditError> {
        for joint in [start, end] {
            if self.graph.node_weight(joint).is_none() {
                return Err(TrussEditError::UnknownJoint(joint));
            }
        }
        Ok(self.graph.add_edge(start, end, Member::default()))
    }

    fn joint_mut(&mut self, joint: NodeIndex) -> Result<&mut Joint, TrussEditError> {
        self.graph
            .node_weight_mut(joint)
            .ok_or(TrussEditError::UnknownJoint(joint))
    }

    fn member_mut(&mut self, member: EdgeIndex) -> Result<&mut Member, TrussEditError> {
        self.graph
            .edge_weight_mut(member)
            .ok_or(TrussEditError::UnknownMember(member))
    }

    /// Set the restraint state for a joint.
    ///
    /// Each entry in `support` corresponds to the X and Y directions respectively. A
    /// value of `true` holds that degree of freedom at zero displacement.
    ///
    /// # Errors
    ///
    /// Returns [`TrussEditError::UnknownJoint`] when `joint` is not part of this truss.
    pub fn set_support(&mut self, joint: NodeIndex, support: [bool; 2]) -> Result<(), TrussEditError> {
        self.set_constraints(joint, support.map(Dof::from_restrained))
    }

    /// Set explicit per-direction constraints for a joint.
    ///
    /// Constraints prescribing a non-zero displacement are stored but rejected when
    /// the truss is analysed.
    ///
    /// # Errors
    ///
    /// Returns [`TrussEditError::UnknownJoint`] when `joint` is not part of this truss.
    pub fn set_constraints(&mut self, joint: NodeIndex, constraints: [Dof; 2]) -> Result<(), TrussEditError> {
        self.joint_mut(joint)?.support = constraints;
        Ok(())
    }

    /// Apply a point load to a joint.
    ///
    /// # Errors
    ///
    /// Returns [`TrussEditError::UnknownJoint`] when `joint` is not part of this truss.
    pub fn set_load(&mut self, joint: NodeIndex, load: Force) -> Result<(), TrussEditError> {
        self.joint_mut(joint)?.load = load;
        Ok(())
    }

    /// Set the axial properties for a member.
    ///
    /// # Errors
    ///
    /// Returns [`TrussEditError::UnknownMember`] when `member` is not part of this truss and
    /// [`TrussEditError::InvalidMemberProperties`] when either `area` or `elastic_modulus`
    /// is not strictly positive.
    ///
    /// # Examples
    /// ```
    /// use truss2d::{point, Truss, TrussEditError};
    ///
    /// let mut truss = Truss::new();
    /// let a = truss.add_joint(point(0.0, 0.0));
    /// let b = truss.add_joint(point(1.0, 0.0));
    /// let member = truss.add_member(a, b)?;
    ///
    /// let error = truss
    ///     .set_member_properties(member, 0.0, 200.0e9)
    ///     .expect_err("invalid area rejected");
    /// match error {
    ///     TrussEditError::InvalidMemberProperties(_) => (),
    ///     other => panic!("unexpected error: {other:?}"),
    /// }
    /// # Ok::<(), TrussEditError>(())
    /// ```
    pub fn set_member_properties(
        &mut self,
        member: EdgeIndex,
        area: f64,
        elastic_modulus: f64,
    ) -> Result<(), TrussEditError> {
        if self.graph.edge_weight(member).is_none() {
            return Err(TrussEditError::UnknownMember(member));
        }
        MemberPropertyError::check(area, elastic_modulus)
            .map_err(TrussEditError::InvalidMemberProperties)?;
        let edge = self.member_mut(member)?;
        edge.area = Some(area);
        edge.elastic_modulus = Some(elastic_modulus);
        Ok(())
    }

    /// Position of a joint.
    #[must_use]
    pub fn joint_position(&self, joint: NodeIndex) -> Option<Point> {
        self.graph.node_weight(joint).map(|joint| joint.position)
    }

    /// The joints a member connects, as `(start, end)`.
    #[must_use]
    pub fn member_joints(&self, member: EdgeIndex) -> Option<(NodeIndex, NodeIndex)> {
        self.graph.edge_endpoints(member)
    }

    /// Per-DOF constraints in global order.
    #[must_use]
    pub fn constraints(&self) -> Vec<Dof> {
        self.graph
            .node_weights()
            .flat_map(|joint| joint.support)
            .collect()
    }

    /// Nodal loads in joint order.
    #[must_use]
    pub fn loads(&self) -> Vec<Force> {
        self.graph.node_weights().map(|joint| joint.load).collect()
    }

    /// Build the element models for every member, in member order.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::MissingProperties`] for a member without properties and
    /// [`AnalysisError::DegenerateElement`] for a member whose joints coincide.
    pub fn elements(&self) -> Result<Vec<Element>, AnalysisError> {
        self.graph
            .edge_indices()
            .map(|edge| {
                let properties = self.graph[edge].properties();
                let (area, elastic_modulus) =
                    properties.ok_or(AnalysisError::MissingProperties(edge))?;
                let (start, end) = self
                    .graph
                    .edge_endpoints(edge)
                    .ok_or(AnalysisError::MissingProperties(edge))?;
                Element::new(
                    (start.index(), self.graph[start].position),
                    (end.index(), self.graph[end].position),
                    elastic_modulus,
                    area,
                )
            })
            .collect()
    }

    /// Analyse the truss under the configured loads.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError`] when the structure cannot be set up (missing or
    /// invalid member properties, zero-length members, non-zero prescribed
    /// displacements), when the reduced system has a zero diagonal, or when
    /// `config.strict` is set and the relaxation does not converge.
    pub fn analyze(&self, config: &SolverConfig) -> Result<Analysis, AnalysisError> {
        let elements = self.elements()?;
        let mask = BoundaryMask::from_constraints(&self.constraints())?;
        let loads: DVector<f64> = assemble_load_vector(&self.loads());
        analysis::run(elements, self.joint_count(), &mask, &loads, None, config)
    }

    /// Analyse the truss with the default solver configuration.
    ///
    /// # Errors
    ///
    /// See [`Truss::analyze`].
    pub fn evaluate(&self) -> Result<Analysis, AnalysisError> {
        self.analyze(&SolverConfig::default())
    }
}

//! JSON truss definitions.
//!
//! ```json
//! {
//!   "nodes": [[0.0, 0.0], [4.0, 0.0], [0.0, 3.0]],
//!   "supports": [[true, true], [false, true], [false, false]],
//!   "loads": [[0.0, 0.0], [0.0, 0.0], {"magnitude": 50.0, "angle": -53.13}],
//!   "elements": [
//!     {"nodes": [0, 1], "elastic_modulus": 1.0e5, "area": 0.01},
//!     {"nodes": [1, 2], "elastic_modulus": 1.0e5, "diameter": 0.1128}
//!   ],
//!   "solver": {"tolerance": 1.0e-8}
//! }
//! ```
//!
//! `supports` and `loads` may be omitted, otherwise they carry one entry per node.
//! Loads are either `[fx, fy]` or a magnitude with an angle in degrees.

use std::fs;
use std::path::Path;

use log::debug;
use petgraph::graph::NodeIndex;
use serde::Deserialize;

use crate::element::area_from_diameter;
use crate::errors::DefinitionError;
use crate::geometry::{point, Force};
use crate::solver::SolverConfig;
use crate::truss::Truss;

/// A nodal load as written in a definition.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum LoadDefinition {
    /// Cartesian components `[fx, fy]` in newtons.
    Components([f64; 2]),
    /// Magnitude in newtons and direction in degrees from the X axis.
    Polar {
        /// Magnitude in newtons.
        magnitude: f64,
        /// Direction in degrees, counter-clockwise from the X axis.
        angle: f64,
    },
}

impl LoadDefinition {
    /// Resolve into cartesian components.
    #[must_use]
    pub fn to_force(self) -> Force {
        match self {
            LoadDefinition::Components([x, y]) => Force::new(x, y),
            LoadDefinition::Polar { magnitude, angle } => Force::from_polar(magnitude, angle),
        }
    }
}

/// A member as written in a definition.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ElementDefinition {
    /// Start and end node indices.
    pub nodes: [usize; 2],
    /// Elastic modulus in pascals.
    pub elastic_modulus: f64,
    /// Cross-sectional area in square metres.
    #[serde(default)]
    pub area: Option<f64>,
    /// Diameter of a solid circular section in metres.
    #[serde(default)]
    pub diameter: Option<f64>,
}

/// A complete truss definition.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct TrussDefinition {
    /// Node coordinates in metres.
    pub nodes: Vec<[f64; 2]>,
    /// Per-node restraint flags for X and Y.
    #[serde(default)]
    pub supports: Vec<[bool; 2]>,
    /// Per-node loads.
    #[serde(default)]
    pub loads: Vec<LoadDefinition>,
    /// Members.
    pub elements: Vec<ElementDefinition>,
    /// Solver settings.
    #[serde(default)]
    pub solver: SolverConfig,
}

impl TrussDefinition {
    /// Parse a definition from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`DefinitionError::Json`] when the text does not match the schema.
    pub fn from_json(text: &str) -> Result<Self, DefinitionError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Read and parse a definition file.
    ///
    /// # Errors
    ///
    /// Returns [`DefinitionError::Io`] when the file cannot be read and
    /// [`DefinitionError::Json`] when it does not match the schema.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, DefinitionError> {
        let path = path.as_ref();
        debug!("reading truss definition from {}", path.display());
        Self::from_json(&fs::read_to_string(path)?)
    }

    fn check_table(&self, table: &'static str, found: usize) -> Result<(), DefinitionError> {
        if found == 0 || found == self.nodes.len() {
            Ok(())
        } else {
            Err(DefinitionError::ShapeMismatch {
                table,
                expected: self.nodes.len(),
                found,
            })
        }
    }

    /// Build the truss model described by this definition.
    ///
    /// # Errors
    ///
    /// Returns [`DefinitionError`] when a table has the wrong length, an element
    /// refers to a missing node or lacks a unique section, or member properties
    /// are not strictly positive.
    ///
    /// # Examples
    /// ```
    /// use truss2d::TrussDefinition;
    ///
    /// let definition = TrussDefinition::from_json(
    ///     r#"{"nodes": [[0, 0], [1, 0]],
    ///         "elements": [{"nodes": [0, 1], "elastic_modulus": 1.0e9, "area": 0.001}]}"#,
    /// )?;
    /// let truss = definition.to_truss()?;
    /// assert_eq!(truss.member_count(), 1);
    /// # Ok::<(), truss2d::DefinitionError>(())
    /// ```
    pub fn to_truss(&self) -> Result<Truss, DefinitionError> {
        self.check_table("supports", self.supports.len())?;
        self.check_table("loads", self.loads.len())?;

        let mut truss = Truss::new();
        let joints: Vec<NodeIndex> = self
            .nodes
            .iter()
            .map(|&[x, y]| truss.add_joint(point(x, y)))
            .collect();
        for (&joint, &support) in joints.iter().zip(&self.supports) {
            truss.set_support(joint, support)?;
        }
        for (&joint, load) in joints.iter().zip(&self.loads) {
            truss.set_load(joint, load.to_force())?;
        }

        for (index, element) in self.elements.iter().enumerate() {
            let [start, end] = element.nodes.map(|node| {
                joints.get(node).copied().ok_or(DefinitionError::UnknownNode {
                    element: index,
                    node,
                    node_count: joints.len(),
                })
            });
            let area = match (element.area, element.diameter) {
                (Some(area), None) => area,
                (None, Some(diameter)) => area_from_diameter(diameter),
                _ => return Err(DefinitionError::Section { element: index }),
            };
            let member = truss.add_member(start?, end?)?;
            truss.set_member_properties(member, area, element.elastic_modulus)?;
        }
        debug!(
            "built truss with {} joints and {} members",
            truss.joint_count(),
            truss.member_count()
        );
        Ok(truss)
    }
}

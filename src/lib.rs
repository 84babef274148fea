#![warn(clippy::all)]
#![warn(missing_docs)]
#![doc = include_str!("../README.md")]

pub mod analysis;
pub mod assembly;
pub mod boundary;
mod definition;
mod element;
mod errors;
mod geometry;
pub mod post;
pub mod solver;
mod truss;

pub use analysis::{Analysis, SolverReport};
pub use boundary::BoundaryMask;
pub use definition::{ElementDefinition, LoadDefinition, TrussDefinition};
pub use element::{area_from_diameter, Element};
pub use errors::{AnalysisError, DefinitionError, MemberPropertyError, TrussEditError};
pub use geometry::{force, point, Displacement, Dof, Force, Point};
pub use solver::{Convergence, GaussSeidel, Solution, SolverConfig};
pub use truss::Truss;

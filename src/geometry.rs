//! Fundamental geometric types for planar truss modelling.

use nalgebra::Vector2;

/// Position in the plane measured in metres.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    /// Distance along the global X axis.
    pub x: f64,
    /// Distance along the global Y axis.
    pub y: f64,
}

impl Point {
    /// Create a [`Point`] with explicit coordinates.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Convert the point into an algebraic vector.
    #[must_use]
    pub fn to_vector(self) -> Vector2<f64> {
        Vector2::new(self.x, self.y)
    }
}

impl From<Vector2<f64>> for Point {
    fn from(value: Vector2<f64>) -> Self {
        Self::new(value.x, value.y)
    }
}

/// Planar force in newtons.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Force {
    /// Force component acting along the global X axis.
    pub x: f64,
    /// Force component acting along the global Y axis.
    pub y: f64,
}

impl Force {
    /// Create a [`Force`] with explicit components.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Create a [`Force`] from a magnitude and a direction measured
    /// counter-clockwise from the global X axis in degrees.
    ///
    /// # Examples
    /// ```
    /// use truss2d::Force;
    ///
    /// let load = Force::from_polar(10.0, 90.0);
    /// assert!(load.x.abs() < 1.0e-12);
    /// assert!((load.y - 10.0).abs() < 1.0e-12);
    /// ```
    #[must_use]
    pub fn from_polar(magnitude: f64, angle_degrees: f64) -> Self {
        let angle = angle_degrees.to_radians();
        Self::new(magnitude * angle.cos(), magnitude * angle.sin())
    }

    /// Convert the force into an algebraic vector.
    #[must_use]
    pub fn to_vector(self) -> Vector2<f64> {
        Vector2::new(self.x, self.y)
    }
}

impl Default for Force {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

/// Translation describing joint displacement in metres.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Displacement {
    /// Displacement component along the global X axis.
    pub x: f64,
    /// Displacement component along the global Y axis.
    pub y: f64,
}

impl Displacement {
    /// Create a [`Displacement`] with explicit components.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl Default for Displacement {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

/// Constraint state of a single degree of freedom.
///
/// Restraint and prescribed value are kept apart so that "is this DOF supported"
/// never depends on the numeric value stored for it. Only `Fixed(0.0)` is accepted
/// by the analysis; settlement-style non-zero values are rejected.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Dof {
    /// The displacement is an unknown to be solved for.
    #[default]
    Free,
    /// The displacement is prescribed to the contained value.
    Fixed(f64),
}

impl Dof {
    /// A support holding the degree of freedom at zero displacement.
    pub const PINNED: Dof = Dof::Fixed(0.0);

    /// Return `true` when the degree of freedom is restrained.
    #[must_use]
    pub const fn is_fixed(self) -> bool {
        matches!(self, Dof::Fixed(_))
    }

    /// Build a constraint from a "restrained" flag.
    #[must_use]
    pub const fn from_restrained(restrained: bool) -> Self {
        if restrained {
            Dof::PINNED
        } else {
            Dof::Free
        }
    }
}

/// Convenience helper for creating [`Point`] instances.
///
/// # Examples
/// ```
/// use truss2d::point;
///
/// let origin = point(0.0, 0.0);
/// assert_eq!(origin.x, 0.0);
/// ```
#[must_use]
pub const fn point(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

/// Convenience helper for creating [`Force`] instances.
///
/// # Examples
/// ```
/// use truss2d::force;
///
/// let load = force(1.0, -5.0);
/// assert_eq!(load.y, -5.0);
/// ```
#[must_use]
pub const fn force(x: f64, y: f64) -> Force {
    Force::new(x, y)
}

//! Geometry-derived quantities and stiffness of a single truss element.

use std::f64::consts::PI;

use nalgebra::{Matrix4, Vector4};

use crate::errors::{AnalysisError, MemberPropertyError};
use crate::geometry::Point;

/// Cross-sectional area of a solid circular bar in square metres.
///
/// # Examples
/// ```
/// use truss2d::area_from_diameter;
///
/// let area = area_from_diameter(2.0);
/// assert!((area - std::f64::consts::PI).abs() < 1.0e-12);
/// ```
#[must_use]
pub fn area_from_diameter(diameter: f64) -> f64 {
    PI * diameter * diameter / 4.0
}

/// A two-node axial member expressed in global coordinates.
///
/// Everything is derived once in [`Element::new`] and never changes afterwards.
/// Local degrees of freedom 0 to 3 map onto `(start.x, start.y, end.x, end.y)`.
#[derive(Clone, Debug, PartialEq)]
pub struct Element {
    /// Index of the start node.
    start: usize,
    /// Index of the end node.
    end: usize,
    /// Elastic modulus in pascals.
    elastic_modulus: f64,
    /// Cross-sectional area in square metres.
    area: f64,
    /// Distance between the endpoints in metres.
    length: f64,
    /// Direction cosines `(l, m)` of the start-to-end axis.
    cosines: (f64, f64),
    /// Element midpoint, used only for annotating drawings.
    midpoint: Point,
    /// Stiffness in global coordinates.
    stiffness: Matrix4<f64>,
}

impl Element {
    /// Build an element between two nodes.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::InvalidElementProperties`] when `area` or
    /// `elastic_modulus` is not strictly positive and
    /// [`AnalysisError::DegenerateElement`] when the endpoints coincide.
    pub fn new(
        (start, start_position): (usize, Point),
        (end, end_position): (usize, Point),
        elastic_modulus: f64,
        area: f64,
    ) -> Result<Self, AnalysisError> {
        MemberPropertyError::check(area, elastic_modulus)
            .map_err(|source| AnalysisError::InvalidElementProperties { start, end, source })?;

        let delta = end_position.to_vector() - start_position.to_vector();
        let length = delta.norm();
        if !(length > 0.0) || !length.is_finite() {
            return Err(AnalysisError::DegenerateElement { start, end });
        }
        let l = delta.x / length;
        let m = delta.y / length;
        let midpoint = Point::from(start_position.to_vector() + delta / 2.0);

        let ll = l * l;
        let lm = l * m;
        let mm = m * m;
        #[rustfmt::skip]
        let pattern = Matrix4::new(
             ll,  lm, -ll, -lm,
             lm,  mm, -lm, -mm,
            -ll, -lm,  ll,  lm,
            -lm, -mm,  lm,  mm,
        );
        let stiffness = pattern * (elastic_modulus * area / length);

        Ok(Self {
            start,
            end,
            elastic_modulus,
            area,
            length,
            cosines: (l, m),
            midpoint,
            stiffness,
        })
    }

    /// Index of the start node.
    #[must_use]
    pub fn start(&self) -> usize {
        self.start
    }

    /// Index of the end node.
    #[must_use]
    pub fn end(&self) -> usize {
        self.end
    }

    /// Global degrees of freedom in local order.
    #[must_use]
    pub fn dofs(&self) -> [usize; 4] {
        [
            2 * self.start,
            2 * self.start + 1,
            2 * self.end,
            2 * self.end + 1,
        ]
    }

    /// Elastic modulus in pascals.
    #[must_use]
    pub fn elastic_modulus(&self) -> f64 {
        self.elastic_modulus
    }

    /// Cross-sectional area in square metres.
    #[must_use]
    pub fn area(&self) -> f64 {
        self.area
    }

    /// Length in metres.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.length
    }

    /// Direction cosines `(l, m)`.
    #[must_use]
    pub fn cosines(&self) -> (f64, f64) {
        self.cosines
    }

    /// Midpoint of the element.
    #[must_use]
    pub fn midpoint(&self) -> Point {
        self.midpoint
    }

    /// The 4×4 stiffness matrix in global coordinates.
    #[must_use]
    pub fn stiffness(&self) -> &Matrix4<f64> {
        &self.stiffness
    }

    /// Unscaled recovery vector `[-l, -m, l, m]`.
    ///
    /// Its dot product with the element displacements is the change in length.
    #[must_use]
    pub fn recovery_vector(&self) -> Vector4<f64> {
        let (l, m) = self.cosines;
        Vector4::new(-l, -m, l, m)
    }

    /// Stress recovery vector `E / L · [-l, -m, l, m]`.
    #[must_use]
    pub fn stress_vector(&self) -> Vector4<f64> {
        self.recovery_vector() * (self.elastic_modulus / self.length)
    }

    /// Change in length for the element displacements `[u1, v1, u2, v2]`.
    ///
    /// Evaluated as `l·(u2 - u1) + m·(v2 - v1)`, which equals the dot product with
    /// [`Element::recovery_vector`] and is exactly zero for a rigid translation.
    #[must_use]
    pub fn elongation(&self, displacements: &Vector4<f64>) -> f64 {
        let (l, m) = self.cosines;
        l * (displacements[2] - displacements[0]) + m * (displacements[3] - displacements[1])
    }

    /// Axial strain for the element displacements.
    #[must_use]
    pub fn strain(&self, displacements: &Vector4<f64>) -> f64 {
        self.elongation(displacements) / self.length
    }

    /// Axial stress in pascals for the element displacements; tension is positive.
    #[must_use]
    pub fn stress(&self, displacements: &Vector4<f64>) -> f64 {
        self.elastic_modulus / self.length * self.elongation(displacements)
    }
}

#[cfg(test)]
mod tests {
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    use super::*;
    use crate::geometry::point;

    fn element(from: Point, to: Point) -> Element {
        Element::new((0, from), (1, to), 200.0e9, 0.01).expect("valid element")
    }

    fn sample_geometries() -> Vec<(Point, Point)> {
        let mut pairs = Vec::new();
        for step in 0..16_i32 {
            let angle = f64::from(step) * PI / 8.0 + 0.1;
            let length = 0.5 + f64::from(step) * 0.75;
            let start = point(f64::from(step) - 3.0, 2.0 - f64::from(step) * 0.5);
            let end = point(
                start.x + length * angle.cos(),
                start.y + length * angle.sin(),
            );
            pairs.push((start, end));
        }
        pairs
    }

    #[test]
    fn horizontal_element_matches_hand_calculation() {
        let element = element(point(0.0, 0.0), point(2.0, 0.0));
        let k = 200.0e9 * 0.01 / 2.0;
        assert_relative_eq!(element.length(), 2.0);
        assert_eq!(element.cosines(), (1.0, 0.0));
        assert_relative_eq!(element.stiffness()[(0, 0)], k);
        assert_relative_eq!(element.stiffness()[(0, 2)], -k);
        assert_abs_diff_eq!(element.stiffness()[(1, 1)], 0.0);
        assert_eq!(element.midpoint(), point(1.0, 0.0));
        assert_eq!(element.dofs(), [0, 1, 2, 3]);
    }

    #[test]
    fn diagonal_element_cosines() {
        let element = element(point(1.0, 1.0), point(4.0, 5.0));
        assert_relative_eq!(element.length(), 5.0);
        let (l, m) = element.cosines();
        assert_relative_eq!(l, 0.6);
        assert_relative_eq!(m, 0.8);
        assert_relative_eq!(element.midpoint().x, 2.5);
        assert_relative_eq!(element.midpoint().y, 3.0);
        assert_relative_eq!(
            element.stress_vector(),
            Vector4::new(-0.6, -0.8, 0.6, 0.8) * (200.0e9 / 5.0),
            max_relative = 1.0e-12
        );
    }

    #[test]
    fn stiffness_is_symmetric_with_zero_column_sums() {
        for (from, to) in sample_geometries() {
            let element = element(from, to);
            let stiffness = element.stiffness();
            let scale = stiffness.amax();
            assert_eq!(*stiffness, stiffness.transpose());
            for column in stiffness.column_iter() {
                assert_abs_diff_eq!(column.sum(), 0.0, epsilon = scale * 1.0e-12);
            }
            assert!(stiffness.iter().all(|entry| entry.is_finite()));
        }
    }

    #[test]
    fn coincident_endpoints_are_rejected() {
        let error = Element::new((3, point(1.0, 1.0)), (4, point(1.0, 1.0)), 1.0, 1.0)
            .expect_err("zero length rejected");
        assert_eq!(error, AnalysisError::DegenerateElement { start: 3, end: 4 });
    }

    #[test]
    fn invalid_properties_are_rejected() {
        let error = Element::new((0, point(0.0, 0.0)), (1, point(1.0, 0.0)), 1.0, 0.0)
            .expect_err("zero area rejected");
        assert!(matches!(
            error,
            AnalysisError::InvalidElementProperties {
                source: MemberPropertyError::NonPositiveArea { .. },
                ..
            }
        ));
    }

    #[test]
    fn rigid_translation_carries_no_stress() {
        for (from, to) in sample_geometries() {
            let element = element(from, to);
            let translation = Vector4::new(0.37, -1.25, 0.37, -1.25);
            assert_eq!(element.stress(&translation), 0.0);
            assert_eq!(element.strain(&translation), 0.0);
        }
    }

    #[test]
    fn stress_matches_recovery_vector() {
        let element = element(point(0.0, 0.0), point(3.0, 4.0));
        let displacements = Vector4::new(0.001, -0.002, 0.004, 0.003);
        assert_relative_eq!(
            element.stress(&displacements),
            element.stress_vector().dot(&displacements),
            max_relative = 1.0e-12
        );
        assert_relative_eq!(
            element.elongation(&displacements),
            element.recovery_vector().dot(&displacements),
            max_relative = 1.0e-12
        );
    }

    #[test]
    fn diameter_area() {
        assert_relative_eq!(area_from_diameter(0.1), 0.007_853_981_633_974_483);
    }
}

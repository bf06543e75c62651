//! Parametric intersections and projections used by the grid engine.

use super::core::{Point2, Point3, Tolerance, Vec2, Vec3};

/// Hit between an infinite line `p + t·v` and a segment `a + u·(b − a)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSegmentHit {
    pub point: Point2,
    /// Parameter along the infinite line.
    pub t: f64,
    /// Parameter along the segment, within `[-tol, 1 + tol]`.
    pub u: f64,
}

/// Intersect the infinite line `p + t·v` with segment `a → b`.
///
/// `tol` bounds both the parallelism test on the determinant and the slack on `u`, so hits
/// that land a hair past a segment end (rectangle corners) are still reported.
#[must_use]
pub fn line_segment_intersection_2d(
    p: Point2,
    v: Vec2,
    a: Point2,
    b: Point2,
    tol: Tolerance,
) -> Option<LineSegmentHit> {
    let s = b - a;
    let denom = v.cross(s);
    if denom.abs() < tol.eps {
        return None;
    }
    let d = a - p;
    let t = d.cross(s) / denom;
    let u = d.cross(v) / denom;
    if u < -tol.eps || u > 1.0 + tol.eps {
        return None;
    }
    Some(LineSegmentHit {
        point: p + v * t,
        t,
        u,
    })
}

/// Intersect two infinite 2D lines. Returns the parameters `(t, u)` along each line,
/// or `None` when they are parallel within `tol`.
#[must_use]
pub fn line_line_parameters_2d(
    p: Point2,
    v: Vec2,
    q: Point2,
    w: Vec2,
    tol: Tolerance,
) -> Option<(f64, f64)> {
    let denom = v.cross(w);
    if denom.abs() < tol.eps {
        return None;
    }
    let d = q - p;
    Some((d.cross(w) / denom, d.cross(v) / denom))
}

/// Orthogonal projection of `point` onto the line through `origin` with unit direction
/// `unit_dir`. Returns the foot point and its signed parameter.
#[must_use]
pub fn project_point_onto_line(point: Point3, origin: Point3, unit_dir: Vec3) -> (Point3, f64) {
    let t = (point - origin).dot(unit_dir);
    (origin + unit_dir * t, t)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hit_reports_both_parameters() {
        let hit = line_segment_intersection_2d(
            Point2::new(0.0, 0.0),
            Vec2::X,
            Point2::new(2.0, -5.0),
            Point2::new(2.0, 5.0),
            Tolerance::DEFAULT,
        )
        .unwrap();
        assert_eq!(hit.point, Point2::new(2.0, 0.0));
        assert_eq!(hit.t, 2.0);
        assert_eq!(hit.u, 0.5);
    }

    #[test]
    fn negative_line_parameter_is_allowed() {
        let hit = line_segment_intersection_2d(
            Point2::new(5.0, 0.0),
            Vec2::X,
            Point2::new(2.0, -1.0),
            Point2::new(2.0, 1.0),
            Tolerance::DEFAULT,
        )
        .unwrap();
        assert_eq!(hit.t, -3.0);
    }

    #[test]
    fn miss_beyond_segment_end() {
        let hit = line_segment_intersection_2d(
            Point2::new(0.0, 2.0),
            Vec2::X,
            Point2::new(2.0, -1.0),
            Point2::new(2.0, 1.0),
            Tolerance::DEFAULT,
        );
        assert!(hit.is_none());
    }

    #[test]
    fn parallel_line_has_no_hit() {
        let hit = line_segment_intersection_2d(
            Point2::new(0.0, 0.0),
            Vec2::Y,
            Point2::new(2.0, -1.0),
            Point2::new(2.0, 1.0),
            Tolerance::DEFAULT,
        );
        assert!(hit.is_none());
        assert!(
            line_line_parameters_2d(Point2::ORIGIN, Vec2::X, Point2::new(0.0, 1.0), Vec2::X, Tolerance::DEFAULT)
                .is_none()
        );
    }

    #[test]
    fn projection_onto_line() {
        let (foot, t) = project_point_onto_line(
            Point3::new(3.0, 4.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Vec3::X,
        );
        assert_eq!(foot, Point3::new(3.0, 0.0, 0.0));
        assert_eq!(t, 2.0);
    }
}

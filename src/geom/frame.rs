//! Planar frames: an origin plus two orthonormal in-plane directions embedded in model space.
//!
//! A view plane is a [`Frame`] whose `right` / `up` are the view's right and up directions.
//! [`Frame::project`] drops a model point into plane coordinates and [`Frame::lift`] puts
//! plane coordinates back into model space on the plane.

use serde::{Deserialize, Serialize};

use super::core::{Point2, Point3, Tolerance, Transform, Vec2, Vec3};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    origin: Point3,
    right: Vec3,
    up: Vec3,
}

impl Frame {
    /// Model XY plane through the origin.
    pub const WORLD_XY: Self = Self {
        origin: Point3::ORIGIN,
        right: Vec3::X,
        up: Vec3::Y,
    };

    /// Build a frame from two in-plane directions.
    ///
    /// `right` is normalized and `up` is re-orthogonalized against it, so slightly skewed
    /// host directions still give an orthonormal basis. Returns `None` when the directions
    /// are degenerate or parallel.
    #[must_use]
    pub fn new(origin: Point3, right: Vec3, up: Vec3) -> Option<Self> {
        if !origin.is_finite() {
            return None;
        }
        let right = right.normalized()?;
        let up = (up - right * up.dot(right)).normalized()?;
        if Tolerance::ZERO_LENGTH.is_zero_length(right.cross(up).length()) {
            return None;
        }
        Some(Self { origin, right, up })
    }

    /// Frame with the world axes at `origin`.
    #[must_use]
    pub const fn xy_at(origin: Point3) -> Self {
        Self {
            origin,
            right: Vec3::X,
            up: Vec3::Y,
        }
    }

    #[must_use]
    pub const fn origin(&self) -> Point3 {
        self.origin
    }

    #[must_use]
    pub const fn right(&self) -> Vec3 {
        self.right
    }

    #[must_use]
    pub const fn up(&self) -> Vec3 {
        self.up
    }

    #[must_use]
    pub fn normal(&self) -> Vec3 {
        self.right.cross(self.up)
    }

    /// Model point → plane coordinates (`right` = x, `up` = y).
    #[must_use]
    pub fn project(&self, p: Point3) -> Point2 {
        let v = p - self.origin;
        Point2::new(v.dot(self.right), v.dot(self.up))
    }

    /// Direction → plane components. The normal component is discarded.
    #[must_use]
    pub fn project_vec(&self, v: Vec3) -> Vec2 {
        Vec2::new(v.dot(self.right), v.dot(self.up))
    }

    /// Plane coordinates → model point: `origin + x·right + y·up`.
    #[must_use]
    pub fn lift(&self, p: Point2) -> Point3 {
        self.origin + self.right * p.x + self.up * p.y
    }

    /// Squared distance between two model points measured inside the plane.
    #[must_use]
    pub fn planar_distance_squared(&self, a: Point3, b: Point3) -> f64 {
        self.project_vec(a - b).length_squared()
    }

    /// Transform taking plane coordinates `(x, y, n)` to model space.
    #[must_use]
    pub fn to_world(&self) -> Transform {
        Transform::from_axes(self.origin, self.right, self.up, self.normal())
    }
}

impl Default for Frame {
    fn default() -> Self {
        Self::WORLD_XY
    }
}

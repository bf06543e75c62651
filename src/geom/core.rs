use std::ops::{Add, Div, Mul, Neg, Sub};

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Vec2 / Point2
// ─────────────────────────────────────────────────────────────────────────────

/// Displacement in a 2D plane (view plane or sheet plane).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const ZERO: Self = Self::new(0.0, 0.0);
    pub const X: Self = Self::new(1.0, 0.0);
    pub const Y: Self = Self::new(0.0, 1.0);

    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub const fn dot(self, rhs: Self) -> f64 {
        self.x * rhs.x + self.y * rhs.y
    }

    /// Scalar 2D cross product (z component of the 3D cross product).
    #[must_use]
    pub const fn cross(self, rhs: Self) -> f64 {
        self.x * rhs.y - self.y * rhs.x
    }

    #[must_use]
    pub fn length(self) -> f64 {
        self.x.hypot(self.y)
    }

    #[must_use]
    pub const fn length_squared(self) -> f64 {
        self.dot(self)
    }

    #[must_use]
    pub fn normalized(self) -> Option<Self> {
        let len = self.length();
        if len.is_finite() && len > 0.0 {
            Some(Self::new(self.x / len, self.y / len))
        } else {
            None
        }
    }

    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Vec2 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self::Output {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Vec2 {
    type Output = Self;
    fn mul(self, rhs: f64) -> Self::Output {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

impl Div<f64> for Vec2 {
    type Output = Self;
    fn div(self, rhs: f64) -> Self::Output {
        Self::new(self.x / rhs, self.y / rhs)
    }
}

impl Neg for Vec2 {
    type Output = Self;
    fn neg(self) -> Self::Output {
        Self::new(-self.x, -self.y)
    }
}

/// Position in a 2D plane. Which plane is a matter of where the point came from:
/// [`super::Frame::project`] yields view-plane points, the viewport mapper yields sheet points.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    pub const ORIGIN: Self = Self::new(0.0, 0.0);

    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub const fn to_vec2(self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    #[must_use]
    pub fn distance_squared_to(self, other: Self) -> f64 {
        (self - other).length_squared()
    }

    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add<Vec2> for Point2 {
    type Output = Self;
    fn add(self, rhs: Vec2) -> Self::Output {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point2 {
    type Output = Vec2;
    fn sub(self, rhs: Self) -> Self::Output {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Vec3
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);
    pub const X: Self = Self::new(1.0, 0.0, 0.0);
    pub const Y: Self = Self::new(0.0, 1.0, 0.0);
    pub const Z: Self = Self::new(0.0, 0.0, 1.0);

    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    #[must_use]
    pub fn length(self) -> f64 {
        self.dot(self).sqrt()
    }

    #[must_use]
    pub const fn length_squared(self) -> f64 {
        self.dot(self)
    }

    #[must_use]
    pub const fn dot(self, rhs: Self) -> f64 {
        self.x * rhs.x + self.y * rhs.y + self.z * rhs.z
    }

    #[must_use]
    pub const fn cross(self, rhs: Self) -> Self {
        Self {
            x: self.y * rhs.z - self.z * rhs.y,
            y: self.z * rhs.x - self.x * rhs.z,
            z: self.x * rhs.y - self.y * rhs.x,
        }
    }

    #[must_use]
    pub fn normalized(self) -> Option<Self> {
        let len = self.length();
        if len.is_finite() && len > 0.0 {
            Some(self / len)
        } else {
            None
        }
    }

    /// Whether `self` and `other` point the same way within `tol`, after normalization.
    #[must_use]
    pub fn is_almost_parallel_to(self, other: Self, tol: Tolerance) -> bool {
        match (self.normalized(), other.normalized()) {
            (Some(a), Some(b)) => tol.approx_eq_vec3(a, b),
            _ => false,
        }
    }

    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl Add for Vec3 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vec3 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self::Output {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f64> for Vec3 {
    type Output = Self;
    fn mul(self, rhs: f64) -> Self::Output {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Mul<Vec3> for f64 {
    type Output = Vec3;
    fn mul(self, rhs: Vec3) -> Self::Output {
        rhs * self
    }
}

impl Div<f64> for Vec3 {
    type Output = Self;
    fn div(self, rhs: f64) -> Self::Output {
        Self::new(self.x / rhs, self.y / rhs, self.z / rhs)
    }
}

impl Neg for Vec3 {
    type Output = Self;
    fn neg(self) -> Self::Output {
        Self::new(-self.x, -self.y, -self.z)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Point3
// ─────────────────────────────────────────────────────────────────────────────

/// Position in 3D. Model-space unless stated otherwise; sheet points use z = 0.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    pub const ORIGIN: Self = Self::new(0.0, 0.0, 0.0);

    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    #[must_use]
    pub const fn to_vec3(self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }

    /// Linear interpolation; `t = 0` is `self`, `t = 1` is `rhs`.
    #[must_use]
    pub fn lerp(self, rhs: Self, t: f64) -> Self {
        self + (rhs - self) * t
    }

    /// Midpoint between two points.
    #[must_use]
    pub fn midpoint(self, rhs: Self) -> Self {
        self.lerp(rhs, 0.5)
    }

    #[must_use]
    pub fn distance_to(self, other: Self) -> f64 {
        (self - other).length()
    }

    #[must_use]
    pub fn distance_squared_to(self, other: Self) -> f64 {
        (self - other).length_squared()
    }

    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl Add<Vec3> for Point3 {
    type Output = Self;
    fn add(self, rhs: Vec3) -> Self::Output {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub<Vec3> for Point3 {
    type Output = Self;
    fn sub(self, rhs: Vec3) -> Self::Output {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Sub for Point3 {
    type Output = Vec3;
    fn sub(self, rhs: Self) -> Self::Output {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Transform
// ─────────────────────────────────────────────────────────────────────────────

/// Affine transform stored as a row-major 4x4 matrix (last row `0 0 0 1`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    m: [[f64; 4]; 4],
}

impl Transform {
    #[must_use]
    pub const fn identity() -> Self {
        Self {
            m: [
                [1.0, 0.0, 0.0, 0.0],
                [0.0, 1.0, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
        }
    }

    /// Build a transform whose columns are the given basis vectors and origin.
    /// Axes are used as given; no orthonormalization is applied.
    #[must_use]
    pub const fn from_axes(origin: Point3, x_axis: Vec3, y_axis: Vec3, z_axis: Vec3) -> Self {
        Self {
            m: [
                [x_axis.x, y_axis.x, z_axis.x, origin.x],
                [x_axis.y, y_axis.y, z_axis.y, origin.y],
                [x_axis.z, y_axis.z, z_axis.z, origin.z],
                [0.0, 0.0, 0.0, 1.0],
            ],
        }
    }

    /// Build a transform from raw rows. The fourth row is forced to `0 0 0 1`.
    #[must_use]
    pub const fn from_rows(r0: [f64; 4], r1: [f64; 4], r2: [f64; 4]) -> Self {
        Self {
            m: [r0, r1, r2, [0.0, 0.0, 0.0, 1.0]],
        }
    }

    #[must_use]
    pub const fn translate(offset: Vec3) -> Self {
        Self::from_rows(
            [1.0, 0.0, 0.0, offset.x],
            [0.0, 1.0, 0.0, offset.y],
            [0.0, 0.0, 1.0, offset.z],
        )
    }

    #[must_use]
    pub const fn scale(sx: f64, sy: f64, sz: f64) -> Self {
        Self::from_rows([sx, 0.0, 0.0, 0.0], [0.0, sy, 0.0, 0.0], [0.0, 0.0, sz, 0.0])
    }

    /// Counter-clockwise rotation about +Z by `angle` radians.
    #[must_use]
    pub fn rotate_z(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        Self::from_rows([c, -s, 0.0, 0.0], [s, c, 0.0, 0.0], [0.0, 0.0, 1.0, 0.0])
    }

    /// `self * other`: applies `other` first, then `self`.
    #[must_use]
    pub fn compose(self, other: Self) -> Self {
        let mut result = Self::identity();
        for i in 0..4 {
            for j in 0..4 {
                result.m[i][j] = (0..4).map(|k| self.m[i][k] * other.m[k][j]).sum();
            }
        }
        result
    }

    #[must_use]
    pub fn translation(self) -> Vec3 {
        Vec3::new(self.m[0][3], self.m[1][3], self.m[2][3])
    }

    #[must_use]
    pub fn apply_point(self, p: Point3) -> Point3 {
        let v = self.apply_vec(p.to_vec3());
        Point3::new(v.x + self.m[0][3], v.y + self.m[1][3], v.z + self.m[2][3])
    }

    #[must_use]
    pub fn apply_vec(self, v: Vec3) -> Vec3 {
        let row = |r: [f64; 4]| r[0] * v.x + r[1] * v.y + r[2] * v.z;
        Vec3::new(row(self.m[0]), row(self.m[1]), row(self.m[2]))
    }

    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.m.iter().flatten().all(|v| v.is_finite())
    }

    #[must_use]
    pub const fn as_matrix(&self) -> &[[f64; 4]; 4] {
        &self.m
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Mul for Transform {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self::Output {
        self.compose(rhs)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// BBox
// ─────────────────────────────────────────────────────────────────────────────

/// Axis-aligned box in its own local coordinates. Host bounding boxes (crop boxes,
/// scope boxes, title blocks) carry an extra [`Transform`] held by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BBox {
    pub min: Point3,
    pub max: Point3,
}

impl BBox {
    #[must_use]
    pub const fn new(min: Point3, max: Point3) -> Self {
        Self { min, max }
    }

    #[must_use]
    pub fn from_points(points: &[Point3]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        Some(rest.iter().fold(Self::new(*first, *first), |bbox, p| bbox.expand_point(*p)))
    }

    #[must_use]
    pub fn center(self) -> Point3 {
        self.min.midpoint(self.max)
    }

    #[must_use]
    pub fn size(self) -> Vec3 {
        self.max - self.min
    }

    #[must_use]
    pub fn expand_point(self, p: Point3) -> Self {
        Self::new(
            Point3::new(self.min.x.min(p.x), self.min.y.min(p.y), self.min.z.min(p.z)),
            Point3::new(self.max.x.max(p.x), self.max.y.max(p.y), self.max.z.max(p.z)),
        )
    }

    /// Inclusive containment test on X and Y only; Z is ignored.
    #[must_use]
    pub fn contains_point_xy(self, p: Point3) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tolerance
// ─────────────────────────────────────────────────────────────────────────────

/// Tolerance configuration for geometric comparisons.
///
/// Named constants keep the engine's epsilons in one place:
/// - `Tolerance::DEFAULT` - parallelism checks and parametric bounds (1e-9)
/// - `Tolerance::ZERO_LENGTH` - degenerate vectors (1e-12)
/// - `Tolerance::COINCIDENT` - merging coincident intersection hits (1e-6)
/// - `Tolerance::DIRECTION` - comparing unit directions (1e-9)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tolerance {
    pub eps: f64,
}

impl Tolerance {
    pub const DEFAULT: Self = Self { eps: 1e-9 };
    pub const ZERO_LENGTH: Self = Self { eps: 1e-12 };
    pub const COINCIDENT: Self = Self { eps: 1e-6 };
    pub const DIRECTION: Self = Self { eps: 1e-9 };

    #[must_use]
    pub const fn new(eps: f64) -> Self {
        Self { eps }
    }

    #[must_use]
    pub const fn eps_squared(self) -> f64 {
        self.eps * self.eps
    }

    #[must_use]
    pub fn approx_eq_f64(self, a: f64, b: f64) -> bool {
        (a - b).abs() <= self.eps
    }

    #[must_use]
    pub fn approx_eq_point3(self, a: Point3, b: Point3) -> bool {
        a.distance_squared_to(b) <= self.eps_squared()
    }

    #[must_use]
    pub fn approx_eq_vec3(self, a: Vec3, b: Vec3) -> bool {
        (a - b).length_squared() <= self.eps_squared()
    }

    #[must_use]
    pub fn is_zero_length(self, len: f64) -> bool {
        len.abs() <= self.eps
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec2_cross_sign() {
        assert_eq!(Vec2::X.cross(Vec2::Y), 1.0);
        assert_eq!(Vec2::Y.cross(Vec2::X), -1.0);
    }

    #[test]
    fn test_point3_operators() {
        let p = Point3::new(1.0, 2.0, 3.0);
        let v = Vec3::new(1.0, 1.0, 1.0);

        assert_eq!(p + v, Point3::new(2.0, 3.0, 4.0));
        assert_eq!(p - v, Point3::new(0.0, 1.0, 2.0));
        assert_eq!(Point3::new(4.0, 5.0, 6.0) - p, Vec3::new(3.0, 3.0, 3.0));
        assert_eq!(p.midpoint(Point3::new(3.0, 4.0, 5.0)), Point3::new(2.0, 3.0, 4.0));
    }

    #[test]
    fn test_transform_compose_applies_right_first() {
        let rotate = Transform::rotate_z(std::f64::consts::FRAC_PI_2);
        let shift = Transform::translate(Vec3::new(1.0, 0.0, 0.0));
        let p = (rotate * shift).apply_point(Point3::ORIGIN);
        assert!(Tolerance::DEFAULT.approx_eq_point3(p, Point3::new(0.0, 1.0, 0.0)));
    }

    #[test]
    fn test_transform_apply_vec_ignores_translation() {
        let t = Transform::translate(Vec3::new(5.0, 5.0, 5.0)) * Transform::scale(2.0, 3.0, 4.0);
        assert_eq!(t.apply_vec(Vec3::new(1.0, 1.0, 1.0)), Vec3::new(2.0, 3.0, 4.0));
        assert_eq!(t.translation(), Vec3::new(5.0, 5.0, 5.0));
    }

    #[test]
    fn test_bbox_from_points_and_center() {
        let bbox = BBox::from_points(&[
            Point3::new(2.0, -1.0, 0.0),
            Point3::new(-2.0, 3.0, 4.0),
        ])
        .unwrap();
        assert_eq!(bbox.min, Point3::new(-2.0, -1.0, 0.0));
        assert_eq!(bbox.center(), Point3::new(0.0, 1.0, 2.0));
        assert!(bbox.contains_point_xy(Point3::new(0.0, 0.0, 100.0)));
        assert!(BBox::from_points(&[]).is_none());
    }

    #[test]
    fn test_parallel_directions() {
        let tol = Tolerance::DIRECTION;
        assert!(Vec3::new(0.0, 5.0, 0.0).is_almost_parallel_to(Vec3::Y, tol));
        assert!(!Vec3::new(0.0, -5.0, 0.0).is_almost_parallel_to(Vec3::Y, tol));
        assert!(!Vec3::ZERO.is_almost_parallel_to(Vec3::Y, tol));
    }
}

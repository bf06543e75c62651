use serde::{Deserialize, Serialize};

use super::core::{Point3, Tolerance, Vec3};

/// One of a curve's two identified ends. Grid bubbles are attached to these, so the
/// identity has to survive any extent recomputation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CurveEnd {
    End0,
    End1,
}

impl CurveEnd {
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Self::End0 => Self::End1,
            Self::End1 => Self::End0,
        }
    }
}

/// A bounded parametric curve in model space.
///
/// Only `point_at` is required. Curves that can produce their own polyline approximation
/// override [`Curve3::tessellate`]; the sampler falls back to parameter evaluation and then
/// to the end points when they do not.
pub trait Curve3 {
    fn point_at(&self, t: f64) -> Point3;

    #[must_use]
    fn domain(&self) -> (f64, f64) {
        (0.0, 1.0)
    }

    #[must_use]
    fn end_parameter(&self, end: CurveEnd) -> f64 {
        let (t0, t1) = self.domain();
        match end {
            CurveEnd::End0 => t0,
            CurveEnd::End1 => t1,
        }
    }

    #[must_use]
    fn end_point(&self, end: CurveEnd) -> Point3 {
        self.point_at(self.end_parameter(end))
    }

    /// Host-quality polyline approximation, ordered from End-0 to End-1.
    #[must_use]
    fn tessellate(&self) -> Option<Vec<Point3>> {
        None
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Line3
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Line3 {
    pub start: Point3,
    pub end: Point3,
}

impl Line3 {
    #[must_use]
    pub const fn new(start: Point3, end: Point3) -> Self {
        Self { start, end }
    }

    /// Bounded line, rejected when shorter than `min_length` or non-finite.
    #[must_use]
    pub fn bounded(start: Point3, end: Point3, min_length: f64) -> Option<Self> {
        let line = Self::new(start, end);
        (start.is_finite() && end.is_finite() && line.length() >= min_length).then_some(line)
    }

    #[must_use]
    pub fn direction(self) -> Vec3 {
        self.end - self.start
    }

    #[must_use]
    pub fn unit_direction(self) -> Option<Vec3> {
        self.direction().normalized()
    }

    #[must_use]
    pub fn length(self) -> f64 {
        self.direction().length()
    }

    /// Same line with End-0 and End-1 exchanged.
    #[must_use]
    pub const fn reversed(self) -> Self {
        Self::new(self.end, self.start)
    }
}

impl Curve3 for Line3 {
    fn point_at(&self, t: f64) -> Point3 {
        self.start + self.direction() * t
    }

    fn end_point(&self, end: CurveEnd) -> Point3 {
        match end {
            CurveEnd::End0 => self.start,
            CurveEnd::End1 => self.end,
        }
    }

    fn tessellate(&self) -> Option<Vec<Point3>> {
        Some(vec![self.start, self.end])
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Arc3
// ─────────────────────────────────────────────────────────────────────────────

/// Maximum angle covered by one tessellation segment of an arc.
const ARC_SEGMENT_ANGLE: f64 = std::f64::consts::PI / 32.0;

/// Upper bound on arc tessellation segments, whatever the sweep.
const MAX_ARC_SEGMENTS: f64 = 1024.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arc3 {
    pub center: Point3,
    pub x_axis: Vec3,
    pub y_axis: Vec3,
    pub radius: f64,
    pub start_angle: f64,
    pub sweep_angle: f64,
}

impl Arc3 {
    /// Arc in the plane spanned by `x_axis` / `y_axis`; angles are measured from `x_axis`
    /// towards `y_axis`. The axes are orthonormalized.
    #[must_use]
    pub fn new(
        center: Point3,
        x_axis: Vec3,
        y_axis: Vec3,
        radius: f64,
        start_angle: f64,
        sweep_angle: f64,
    ) -> Self {
        let x = x_axis.normalized().unwrap_or(Vec3::X);
        let y = (y_axis - x * y_axis.dot(x)).normalized().unwrap_or_else(|| {
            Vec3::Z.cross(x).normalized().unwrap_or(Vec3::Y)
        });
        Self {
            center,
            x_axis: x,
            y_axis: y,
            radius,
            start_angle,
            sweep_angle,
        }
    }

    fn point_at_angle(&self, angle: f64) -> Point3 {
        let (s, c) = angle.sin_cos();
        self.center + self.x_axis * (self.radius * c) + self.y_axis * (self.radius * s)
    }
}

impl Curve3 for Arc3 {
    fn point_at(&self, t: f64) -> Point3 {
        let (t0, t1) = self.domain();
        let u = ((t - t0) / (t1 - t0)).clamp(0.0, 1.0);
        self.point_at_angle(self.start_angle + self.sweep_angle * u)
    }

    fn tessellate(&self) -> Option<Vec<Point3>> {
        if !(self.radius.is_finite() && self.sweep_angle.is_finite() && self.radius > 0.0) {
            return None;
        }
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let segments = (self.sweep_angle.abs() / ARC_SEGMENT_ANGLE)
            .ceil()
            .clamp(2.0, MAX_ARC_SEGMENTS) as usize;
        #[allow(clippy::cast_precision_loss)]
        let points = (0..=segments)
            .map(|i| {
                let u = i as f64 / segments as f64;
                self.point_at_angle(self.start_angle + self.sweep_angle * u)
            })
            .collect();
        Some(points)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Polyline3
// ─────────────────────────────────────────────────────────────────────────────

/// Open polyline (multi-segment grid), parameterized by normalized arc length.
///
/// Serialized as its point list; deserialization goes through [`Polyline3::new`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Point3>", into = "Vec<Point3>")]
pub struct Polyline3 {
    points: Vec<Point3>,
    cumulative_lengths: Vec<f64>,
}

impl Polyline3 {
    pub fn new(points: Vec<Point3>) -> Result<Self, String> {
        if points.len() < 2 {
            return Err("polyline requires at least 2 points".to_string());
        }
        if !points.iter().all(|p| p.is_finite()) {
            return Err("polyline points must be finite".to_string());
        }
        let mut cumulative_lengths = Vec::with_capacity(points.len());
        let mut total = 0.0;
        cumulative_lengths.push(total);
        for pair in points.windows(2) {
            total += pair[0].distance_to(pair[1]);
            cumulative_lengths.push(total);
        }
        Ok(Self {
            points,
            cumulative_lengths,
        })
    }

    #[must_use]
    pub fn points(&self) -> &[Point3] {
        &self.points
    }

    #[must_use]
    pub fn length(&self) -> f64 {
        self.cumulative_lengths.last().copied().unwrap_or(0.0)
    }
}

impl TryFrom<Vec<Point3>> for Polyline3 {
    type Error = String;

    fn try_from(points: Vec<Point3>) -> Result<Self, Self::Error> {
        Self::new(points)
    }
}

impl From<Polyline3> for Vec<Point3> {
    fn from(polyline: Polyline3) -> Self {
        polyline.points
    }
}

impl Curve3 for Polyline3 {
    fn point_at(&self, t: f64) -> Point3 {
        let total = self.length();
        if total <= 0.0 {
            return self.points[0];
        }
        let target = t.clamp(0.0, 1.0) * total;
        let idx = match self
            .cumulative_lengths
            .binary_search_by(|value| value.total_cmp(&target))
        {
            Ok(i) => i.min(self.points.len() - 2),
            Err(i) => i.max(1) - 1,
        };
        let seg_len = self.cumulative_lengths[idx + 1] - self.cumulative_lengths[idx];
        if seg_len <= 0.0 {
            return self.points[idx];
        }
        let ratio = ((target - self.cumulative_lengths[idx]) / seg_len).clamp(0.0, 1.0);
        self.points[idx].lerp(self.points[idx + 1], ratio)
    }

    fn end_point(&self, end: CurveEnd) -> Point3 {
        match end {
            CurveEnd::End0 => self.points[0],
            CurveEnd::End1 => self.points[self.points.len() - 1],
        }
    }

    fn tessellate(&self) -> Option<Vec<Point3>> {
        Some(self.points.clone())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// GridCurve
// ─────────────────────────────────────────────────────────────────────────────

/// The curve kinds a grid can carry: straight lines versus everything else.
/// Only the `Line` variant can have its 2D extents recomputed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GridCurve {
    Line(Line3),
    Arc(Arc3),
    Polyline(Polyline3),
}

impl GridCurve {
    #[must_use]
    pub fn as_line(&self) -> Option<Line3> {
        match self {
            Self::Line(line) => Some(*line),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_line(&self) -> bool {
        matches!(self, Self::Line(_))
    }

    /// Chord between the two identified ends.
    #[must_use]
    pub fn chord(&self) -> Line3 {
        Line3::new(self.end_point(CurveEnd::End0), self.end_point(CurveEnd::End1))
    }

    /// Whether the chord is shorter than `tol`.
    #[must_use]
    pub fn is_degenerate(&self, tol: Tolerance) -> bool {
        tol.is_zero_length(self.chord().length())
    }
}

impl Curve3 for GridCurve {
    fn point_at(&self, t: f64) -> Point3 {
        match self {
            Self::Line(c) => c.point_at(t),
            Self::Arc(c) => c.point_at(t),
            Self::Polyline(c) => c.point_at(t),
        }
    }

    fn end_point(&self, end: CurveEnd) -> Point3 {
        match self {
            Self::Line(c) => c.end_point(end),
            Self::Arc(c) => c.end_point(end),
            Self::Polyline(c) => c.end_point(end),
        }
    }

    fn tessellate(&self) -> Option<Vec<Point3>> {
        match self {
            Self::Line(c) => c.tessellate(),
            Self::Arc(c) => c.tessellate(),
            Self::Polyline(c) => c.tessellate(),
        }
    }
}

impl From<Line3> for GridCurve {
    fn from(line: Line3) -> Self {
        Self::Line(line)
    }
}

impl From<Arc3> for GridCurve {
    fn from(arc: Arc3) -> Self {
        Self::Arc(arc)
    }
}

impl From<Polyline3> for GridCurve {
    fn from(polyline: Polyline3) -> Self {
        Self::Polyline(polyline)
    }
}

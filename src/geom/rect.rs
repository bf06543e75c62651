//! Oriented rectangles used as scope / crop boundaries.

use serde::{Deserialize, Serialize};

use super::core::{BBox, Point3, Transform};
use super::frame::Frame;

/// Named edge of an [`OrientedRect`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Top,
    Bottom,
    Left,
    Right,
}

impl Side {
    pub const ALL: [Self; 4] = [Self::Top, Self::Bottom, Self::Left, Self::Right];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Bottom => "bottom",
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// One value per rectangle side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SideValues<T> {
    pub top: T,
    pub bottom: T,
    pub left: T,
    pub right: T,
}

impl<T: Copy> SideValues<T> {
    /// Same value on all four sides.
    #[must_use]
    pub const fn uniform(value: T) -> Self {
        Self {
            top: value,
            bottom: value,
            left: value,
            right: value,
        }
    }

    #[must_use]
    pub const fn get(&self, side: Side) -> T {
        match side {
            Side::Top => self.top,
            Side::Bottom => self.bottom,
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    #[must_use]
    pub fn map<U>(&self, mut f: impl FnMut(T) -> U) -> SideValues<U> {
        SideValues {
            top: f(self.top),
            bottom: f(self.bottom),
            left: f(self.left),
            right: f(self.right),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Side, T)> + '_ {
        Side::ALL.into_iter().map(move |side| (side, self.get(side)))
    }
}

impl<T: Copy + PartialEq> SideValues<T> {
    /// Whether all four sides hold the same value.
    #[must_use]
    pub fn is_uniform(&self) -> bool {
        self.top == self.bottom && self.top == self.left && self.top == self.right
    }
}

/// Rectangle edge as a segment `start → end` with the side it belongs to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectEdge {
    pub start: Point3,
    pub end: Point3,
    pub side: Side,
}

/// Four model-space corners of a (possibly rotated) box section, with its center.
///
/// Corners are `p00 = (minX, minY)`, `p10 = (maxX, minY)`, `p11 = (maxX, maxY)`,
/// `p01 = (minX, maxY)` in the box's local coordinates, mapped through the box transform.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrientedRect {
    corners: [Point3; 4],
    center: Point3,
}

impl OrientedRect {
    /// Section of `bbox` at its mid height, mapped to model space by `transform`.
    ///
    /// Returns `None` when the section is degenerate (zero width or height).
    #[must_use]
    pub fn from_bbox(bbox: BBox, transform: Transform) -> Option<Self> {
        let z_mid = 0.5 * (bbox.min.z + bbox.max.z);
        let local = [
            Point3::new(bbox.min.x, bbox.min.y, z_mid),
            Point3::new(bbox.max.x, bbox.min.y, z_mid),
            Point3::new(bbox.max.x, bbox.max.y, z_mid),
            Point3::new(bbox.min.x, bbox.max.y, z_mid),
        ];
        let center = Point3::new(
            0.5 * (bbox.min.x + bbox.max.x),
            0.5 * (bbox.min.y + bbox.max.y),
            z_mid,
        );
        let rect = Self {
            corners: local.map(|p| transform.apply_point(p)),
            center: transform.apply_point(center),
        };
        rect.frame().map(|_| rect)
    }

    /// Axis-aligned rectangle in the model XY plane at height `z`.
    #[must_use]
    pub fn axis_aligned(min_x: f64, min_y: f64, max_x: f64, max_y: f64, z: f64) -> Option<Self> {
        Self::from_bbox(
            BBox::new(Point3::new(min_x, min_y, z), Point3::new(max_x, max_y, z)),
            Transform::identity(),
        )
    }

    #[must_use]
    pub const fn corners(&self) -> [Point3; 4] {
        self.corners
    }

    #[must_use]
    pub const fn center(&self) -> Point3 {
        self.center
    }

    /// Edges in counter-clockwise order: bottom, right, top, left.
    #[must_use]
    pub const fn edges(&self) -> [RectEdge; 4] {
        let [p00, p10, p11, p01] = self.corners;
        [
            RectEdge { start: p00, end: p10, side: Side::Bottom },
            RectEdge { start: p10, end: p11, side: Side::Right },
            RectEdge { start: p11, end: p01, side: Side::Top },
            RectEdge { start: p01, end: p00, side: Side::Left },
        ]
    }

    /// The rectangle's plane, centered, with `right` along the bottom edge.
    #[must_use]
    pub fn frame(&self) -> Option<Frame> {
        let [p00, p10, _, p01] = self.corners;
        Frame::new(self.center, p10 - p00, p01 - p00)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::core::{Tolerance, Vec3};

    #[test]
    fn edges_follow_corner_winding() {
        let rect = OrientedRect::axis_aligned(0.0, 0.0, 4.0, 2.0, 0.0).unwrap();
        let edges = rect.edges();
        assert_eq!(edges[0].side, Side::Bottom);
        assert_eq!(edges[1].side, Side::Right);
        assert_eq!(edges[2].side, Side::Top);
        assert_eq!(edges[3].side, Side::Left);
        assert_eq!(edges[1].start, Point3::new(4.0, 0.0, 0.0));
        assert_eq!(edges[1].end, Point3::new(4.0, 2.0, 0.0));
        assert_eq!(rect.center(), Point3::new(2.0, 1.0, 0.0));
    }

    #[test]
    fn from_bbox_applies_transform_at_mid_height() {
        let bbox = BBox::new(Point3::new(-1.0, -1.0, 0.0), Point3::new(1.0, 1.0, 10.0));
        let t = Transform::translate(Vec3::new(5.0, 0.0, 0.0))
            * Transform::rotate_z(std::f64::consts::FRAC_PI_2);
        let rect = OrientedRect::from_bbox(bbox, t).unwrap();
        let tol = Tolerance::DEFAULT;
        assert!(tol.approx_eq_point3(rect.center(), Point3::new(5.0, 0.0, 5.0)));
        assert!(tol.approx_eq_point3(rect.corners()[0], Point3::new(6.0, -1.0, 5.0)));
    }

    #[test]
    fn degenerate_box_is_rejected() {
        assert!(OrientedRect::axis_aligned(0.0, 0.0, 0.0, 5.0, 0.0).is_none());
    }

    #[test]
    fn side_values_lookup() {
        let values = SideValues { top: 1, bottom: 2, left: 3, right: 4 };
        assert_eq!(values.get(Side::Left), 3);
        assert!(!values.is_uniform());
        assert!(SideValues::uniform(7).is_uniform());
        assert_eq!(values.map(|v| v * 10).right, 40);
    }
}

mod core;
mod curve;
mod frame;
mod intersect;
mod rect;

pub use self::core::{BBox, Point2, Point3, Tolerance, Transform, Vec2, Vec3};
pub use curve::{Arc3, Curve3, CurveEnd, GridCurve, Line3, Polyline3};
pub use frame::Frame;
pub use intersect::{
    LineSegmentHit, line_line_parameters_2d, line_segment_intersection_2d,
    project_point_onto_line,
};
pub use rect::{OrientedRect, RectEdge, Side, SideValues};

#[cfg(test)]
mod tests;

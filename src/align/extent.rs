//! 2D grid extents clipped to a scope or crop rectangle.
//!
//! A straight grid is extended along its own line until it meets the rectangle boundary
//! twice. Each end is then pushed in or out by the offset configured for the side it hit,
//! and the result is matched back onto the reference curve's End-0 / End-1 so that bubble
//! settings stay attached to the same ends.

use serde::{Deserialize, Serialize};

use super::error::{AlignError, AlignResult, ConstructionError, Rejection};
use crate::geom::{
    BBox, Frame, GridCurve, Line3, OrientedRect, Point3, Side, SideValues, Tolerance, Transform,
    Vec3, line_segment_intersection_2d, project_point_onto_line,
};

/// Tolerance for degenerate directions, as used for grid extents.
pub const DEFAULT_EXTENT_TOLERANCE: f64 = 1e-7;
/// Shortest 2D grid the engine will produce, in model units.
pub const DEFAULT_MIN_LENGTH: f64 = 1e-4;

/// Which way an end offset moves relative to the rectangle center.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OffsetMode {
    /// Away from the center, past the boundary.
    #[default]
    Outside,
    /// Towards the center, short of the boundary.
    Inside,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtentOptions {
    /// Offset magnitude per side, in model units.
    pub offsets: SideValues<f64>,
    pub modes: SideValues<OffsetMode>,
    pub tolerance: f64,
    pub min_length: f64,
}

impl Default for ExtentOptions {
    fn default() -> Self {
        Self {
            offsets: SideValues::uniform(0.0),
            modes: SideValues::uniform(OffsetMode::Outside),
            tolerance: DEFAULT_EXTENT_TOLERANCE,
            min_length: DEFAULT_MIN_LENGTH,
        }
    }
}

impl ExtentOptions {
    #[must_use]
    pub fn uniform(offset: f64, mode: OffsetMode) -> Self {
        Self {
            offsets: SideValues::uniform(offset),
            modes: SideValues::uniform(mode),
            ..Self::default()
        }
    }
}

/// Where a clipping rectangle came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RectSource {
    Scope,
    Crop,
}

/// The rectangle that bounds a view's grids: its scope box when one is assigned, else its
/// crop box. Each box comes with the transform placing it in model space.
#[must_use]
pub fn clip_rect(
    scope: Option<(BBox, Transform)>,
    crop: Option<(BBox, Transform)>,
) -> Option<(OrientedRect, RectSource)> {
    let from = |source, bbox: Option<(BBox, Transform)>| {
        bbox.and_then(|(bbox, transform)| OrientedRect::from_bbox(bbox, transform))
            .map(|rect| (rect, source))
    };
    from(RectSource::Scope, scope).or_else(|| from(RectSource::Crop, crop))
}

/// Builds the final line in the target view. Hosts reject lines they cannot hold.
pub trait LineBuilder {
    fn build_line(&self, start: Point3, end: Point3) -> Result<Line3, ConstructionError>;
}

/// Accepts any finite line at least `min_length` long.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundedLineBuilder {
    pub min_length: f64,
}

impl Default for BoundedLineBuilder {
    fn default() -> Self {
        Self {
            min_length: DEFAULT_MIN_LENGTH,
        }
    }
}

impl LineBuilder for BoundedLineBuilder {
    fn build_line(&self, start: Point3, end: Point3) -> Result<Line3, ConstructionError> {
        Line3::bounded(start, end, self.min_length)
            .ok_or_else(|| ConstructionError::new("curve is too short or not finite"))
    }
}

/// A rectangle boundary crossing, in the rectangle's plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundaryHit {
    pub point: Point3,
    pub side: Side,
}

/// Clipped and offset end points, before any end remapping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    /// Crossing with the smaller line parameter.
    pub near: BoundaryHit,
    /// Crossing with the larger line parameter.
    pub far: BoundaryHit,
    /// Offset end derived from `near`.
    pub start: Point3,
    /// Offset end derived from `far`.
    pub end: Point3,
}

/// Move `hit`'s foot on the line through `origin` along `dir` by the offset of its side.
fn offset_end(
    hit: &BoundaryHit,
    origin: Point3,
    dir: Vec3,
    center: Point3,
    frame: &Frame,
    options: &ExtentOptions,
) -> Point3 {
    let (foot, _) = project_point_onto_line(hit.point, origin, dir);
    let magnitude = options.offsets.get(hit.side);
    let plus = foot + dir * magnitude;
    let minus = foot - dir * magnitude;
    let d_plus = frame.planar_distance_squared(plus, center);
    let d_minus = frame.planar_distance_squared(minus, center);
    let take_plus = match options.modes.get(hit.side) {
        OffsetMode::Outside => d_plus >= d_minus,
        OffsetMode::Inside => d_plus <= d_minus,
    };
    if take_plus { plus } else { minus }
}

/// Clip `curve` against `rect` and apply the per-side offsets.
pub fn compute_extent(
    curve: &GridCurve,
    rect: &OrientedRect,
    options: &ExtentOptions,
) -> Result<Extent, Rejection> {
    let line = curve.as_line().ok_or(Rejection::NotALine)?;
    let tol = options.tolerance;
    let direction = line.direction();
    if direction.length() < tol {
        return Err(Rejection::Degenerate);
    }
    let dir = direction.normalized().ok_or(Rejection::Degenerate)?;
    let frame = rect.frame().ok_or(Rejection::UnsuitableInPlane)?;
    let planar = frame.project_vec(dir);
    if planar.length() < tol {
        return Err(Rejection::UnsuitableInPlane);
    }
    let planar = planar.normalized().ok_or(Rejection::UnsuitableInPlane)?;
    let origin = frame.project(line.start);

    let mut hits: Vec<(BoundaryHit, f64)> = Vec::with_capacity(4);
    for edge in rect.edges() {
        let Some(hit) = line_segment_intersection_2d(
            origin,
            planar,
            frame.project(edge.start),
            frame.project(edge.end),
            Tolerance::DEFAULT,
        ) else {
            continue;
        };
        let point = frame.lift(hit.point);
        let duplicate = hits
            .iter()
            .any(|(seen, _)| seen.point.distance_to(point) < Tolerance::COINCIDENT.eps);
        if !duplicate {
            hits.push((BoundaryHit { point, side: edge.side }, hit.t));
        }
    }
    if hits.len() < 2 {
        return Err(Rejection::NoDoubleIntersection);
    }
    hits.sort_by(|a, b| a.1.total_cmp(&b.1));
    let (near, far) = match (hits.first(), hits.last()) {
        (Some(near), Some(far)) => (near.0, far.0),
        _ => return Err(Rejection::NoDoubleIntersection),
    };

    let center = rect.center();
    let start = offset_end(&near, line.start, dir, center, &frame, options);
    let end = offset_end(&far, line.start, dir, center, &frame, options);
    if start.distance_to(end) < options.min_length {
        return Err(Rejection::TooShort);
    }
    log::debug!("extent hits {} then {}", near.side, far.side);
    Ok(Extent {
        near,
        far,
        start,
        end,
    })
}

/// Order `(p1, p2)` so that End-0 lands nearest `reference`'s End-0.
///
/// Distances are measured in `frame`. The pairing is swapped only when that is strictly
/// closer; the flag reports whether it was.
#[must_use]
pub fn remap_endpoints(p1: Point3, p2: Point3, reference: &Line3, frame: &Frame) -> (Line3, bool) {
    let d = |a, b| frame.planar_distance_squared(a, b);
    let keep = d(p1, reference.start) + d(p2, reference.end);
    let swap = d(p1, reference.end) + d(p2, reference.start);
    if swap < keep {
        (Line3::new(p2, p1), true)
    } else {
        (Line3::new(p1, p2), false)
    }
}

/// Outcome of a successful [`recompute_extent`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtentUpdate {
    pub line: Line3,
    pub near_side: Side,
    pub far_side: Side,
    /// The clipped ends were swapped to match the reference ends.
    pub swapped: bool,
    /// The line was built from the reference's own basis after the first attempt failed.
    pub used_fallback: bool,
}

impl ExtentUpdate {
    /// Short status for reports.
    #[must_use]
    pub const fn status(&self) -> &'static str {
        if self.used_fallback {
            "Updated (fallback 2D basis)."
        } else {
            "Updated."
        }
    }
}

/// Recompute the 2D extent of `curve` inside `rect`.
///
/// `reference` is the grid's current view-specific line; when the grid has none, the
/// model line is used in its place. If `builder` rejects the line, the hits are projected
/// onto the reference line instead, offset again and retried once.
pub fn recompute_extent(
    curve: &GridCurve,
    rect: &OrientedRect,
    options: &ExtentOptions,
    reference: Option<Line3>,
    builder: &impl LineBuilder,
) -> AlignResult<ExtentUpdate> {
    let extent = compute_extent(curve, rect, options)?;
    let model = curve.as_line().ok_or(Rejection::NotALine)?;
    let basis = reference.unwrap_or(model);
    let frame = rect.frame().ok_or(Rejection::UnsuitableInPlane)?;
    let (line, swapped) = remap_endpoints(extent.start, extent.end, &basis, &frame);

    let primary = match builder.build_line(line.start, line.end) {
        Ok(line) => {
            return Ok(ExtentUpdate {
                line,
                near_side: extent.near.side,
                far_side: extent.far.side,
                swapped,
                used_fallback: false,
            });
        }
        Err(err) => err,
    };
    log::debug!("line construction failed ({primary}); retrying on reference basis");

    let failure = |fallback| AlignError::ConstructionFailure {
        primary: primary.clone(),
        fallback,
    };
    if basis.length() <= options.tolerance {
        return Err(failure(None));
    }
    let Some(dir) = basis.unit_direction() else {
        return Err(failure(None));
    };
    let center = rect.center();
    let q1 = offset_end(&extent.near, basis.start, dir, center, &frame, options);
    let q2 = offset_end(&extent.far, basis.start, dir, center, &frame, options);
    let (retry, swapped) = remap_endpoints(q1, q2, &basis, &frame);
    if retry.length() < options.min_length {
        return Err(failure(None));
    }
    match builder.build_line(retry.start, retry.end) {
        Ok(line) => Ok(ExtentUpdate {
            line,
            near_side: extent.near.side,
            far_side: extent.far.side,
            swapped,
            used_fallback: true,
        }),
        Err(err) => Err(failure(Some(err))),
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::geom::Arc3;

    fn line(x0: f64, y0: f64, x1: f64, y1: f64) -> GridCurve {
        Line3::new(Point3::new(x0, y0, 0.0), Point3::new(x1, y1, 0.0)).into()
    }

    fn rect() -> OrientedRect {
        OrientedRect::axis_aligned(2.0, -5.0, 8.0, 5.0, 0.0).unwrap()
    }

    fn outside_left_right(offset: f64) -> ExtentOptions {
        ExtentOptions {
            offsets: SideValues::uniform(offset),
            modes: SideValues {
                top: OffsetMode::Inside,
                bottom: OffsetMode::Inside,
                left: OffsetMode::Outside,
                right: OffsetMode::Outside,
            },
            ..ExtentOptions::default()
        }
    }

    /// Rejects the first `failures` calls.
    struct FlakyBuilder {
        failures: Cell<usize>,
    }

    impl LineBuilder for FlakyBuilder {
        fn build_line(&self, start: Point3, end: Point3) -> Result<Line3, ConstructionError> {
            let left = self.failures.get();
            if left > 0 {
                self.failures.set(left - 1);
                return Err(ConstructionError::new(format!("refused attempt {left}")));
            }
            Ok(Line3::new(start, end))
        }
    }

    #[test]
    fn outside_offsets_extend_past_boundary() {
        let extent = compute_extent(&line(0.0, 0.0, 10.0, 0.0), &rect(), &outside_left_right(1.0))
            .unwrap();
        assert_eq!(extent.near.side, Side::Left);
        assert_eq!(extent.far.side, Side::Right);
        assert_eq!(extent.start, Point3::new(1.0, 0.0, 0.0));
        assert_eq!(extent.end, Point3::new(9.0, 0.0, 0.0));
    }

    #[test]
    fn inside_offsets_pull_ends_in() {
        let options = ExtentOptions::uniform(1.5, OffsetMode::Inside);
        let extent = compute_extent(&line(5.0, -20.0, 5.0, 20.0), &rect(), &options).unwrap();
        assert_eq!(extent.near.side, Side::Bottom);
        assert_eq!(extent.start, Point3::new(5.0, -3.5, 0.0));
        assert_eq!(extent.end, Point3::new(5.0, 3.5, 0.0));
    }

    #[test]
    fn rejections() {
        let options = ExtentOptions::default();
        let arc = GridCurve::from(Arc3::new(Point3::ORIGIN, Vec3::X, Vec3::Y, 3.0, 0.0, 1.0));
        assert_eq!(compute_extent(&arc, &rect(), &options), Err(Rejection::NotALine));
        assert_eq!(
            compute_extent(&line(1.0, 1.0, 1.0, 1.0), &rect(), &options),
            Err(Rejection::Degenerate)
        );
        let vertical = GridCurve::from(Line3::new(
            Point3::new(5.0, 0.0, 0.0),
            Point3::new(5.0, 0.0, 10.0),
        ));
        assert_eq!(
            compute_extent(&vertical, &rect(), &options),
            Err(Rejection::UnsuitableInPlane)
        );
        assert_eq!(
            compute_extent(&line(0.0, 50.0, 10.0, 50.0), &rect(), &options),
            Err(Rejection::NoDoubleIntersection)
        );
        assert_eq!(
            compute_extent(&line(0.0, 0.0, 10.0, 0.0), &rect(), &ExtentOptions::uniform(3.0, OffsetMode::Inside)),
            Err(Rejection::TooShort)
        );
    }

    #[test]
    fn corner_hit_is_counted_once() {
        // Touches only the (8, 5) corner: two edges, one point.
        let grazing = line(13.0, 0.0, 3.0, 10.0);
        assert_eq!(
            compute_extent(&grazing, &rect(), &ExtentOptions::default()),
            Err(Rejection::NoDoubleIntersection)
        );
        // Diagonal through opposite corners.
        let diagonal = line(2.0, -5.0, 8.0, 5.0);
        let extent = compute_extent(&diagonal, &rect(), &ExtentOptions::default()).unwrap();
        assert!(Tolerance::COINCIDENT.approx_eq_point3(extent.start, Point3::new(2.0, -5.0, 0.0)));
        assert!(Tolerance::COINCIDENT.approx_eq_point3(extent.end, Point3::new(8.0, 5.0, 0.0)));
    }

    #[test]
    fn remap_keeps_reference_ends() {
        let frame = Frame::WORLD_XY;
        let reference = Line3::new(Point3::new(9.0, 0.0, 0.0), Point3::new(0.0, 0.0, 0.0));
        let (mapped, swapped) =
            remap_endpoints(Point3::new(1.0, 0.0, 0.0), Point3::new(8.0, 0.0, 0.0), &reference, &frame);
        assert!(swapped);
        assert_eq!(mapped.start, Point3::new(8.0, 0.0, 0.0));
        let (again, swapped_again) = remap_endpoints(mapped.start, mapped.end, &reference, &frame);
        assert!(!swapped_again);
        assert_eq!(again, mapped);
    }

    #[test]
    fn reversed_grid_keeps_its_end_identity() {
        let curve = line(10.0, 0.0, 0.0, 0.0);
        let update = recompute_extent(
            &curve,
            &rect(),
            &outside_left_right(1.0),
            None,
            &BoundedLineBuilder::default(),
        )
        .unwrap();
        assert_eq!(update.line.start, Point3::new(9.0, 0.0, 0.0));
        assert_eq!(update.line.end, Point3::new(1.0, 0.0, 0.0));
        assert!(!update.used_fallback);
        assert_eq!(update.status(), "Updated.");
    }

    #[test]
    fn fallback_basis_is_tried_once() {
        let curve = line(0.0, 0.0, 10.0, 0.0);
        let reference = Some(Line3::new(Point3::new(0.0, 0.0, 0.0), Point3::new(10.0, 0.0, 0.0)));
        let builder = FlakyBuilder { failures: Cell::new(1) };
        let update =
            recompute_extent(&curve, &rect(), &outside_left_right(1.0), reference, &builder).unwrap();
        assert!(update.used_fallback);
        assert_eq!(update.line.start, Point3::new(1.0, 0.0, 0.0));

        let builder = FlakyBuilder { failures: Cell::new(2) };
        let err = recompute_extent(&curve, &rect(), &outside_left_right(1.0), reference, &builder)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "curve construction failed: refused attempt 2 (fallback failed: refused attempt 1)"
        );
    }

    #[test]
    fn scope_box_wins_over_crop_box() {
        let scope = BBox::new(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 0.0));
        let crop = BBox::new(Point3::new(0.0, 0.0, 0.0), Point3::new(5.0, 5.0, 0.0));
        let id = Transform::identity();
        assert_eq!(clip_rect(Some((scope, id)), Some((crop, id))).map(|r| r.1), Some(RectSource::Scope));
        assert_eq!(clip_rect(None, Some((crop, id))).map(|r| r.1), Some(RectSource::Crop));
        assert!(clip_rect(None, None).is_none());
    }
}

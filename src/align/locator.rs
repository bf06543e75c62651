//! Grid intersection anchors.
//!
//! [`locate_anchor`] works on classified samples and accepts any curve kind. The exact
//! variant, [`locate_anchor_exact`], only considers straight grids lying along the model axes
//! and intersects the two bounded lines directly.

use super::error::{AlignError, AlignResult};
use super::orientation::{Classification, Orientation, classify};
use super::sampler::CurveSampler;
use crate::geom::{
    BBox, Curve3, Frame, GridCurve, Line3, Point2, Point3, Tolerance, Vec3, line_line_parameters_2d,
};

/// A classified grid, remembering its position in the caller's input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassifiedGrid {
    pub index: usize,
    pub classification: Classification,
}

/// Sample and classify every curve in `basis`.
///
/// Curves that cannot be sampled come back unclassified; they are kept so indices stay
/// aligned with the input.
pub fn classify_grids<C: Curve3>(
    curves: &[C],
    basis: &Frame,
    sampler: &CurveSampler,
    axis_tol: f64,
) -> Vec<ClassifiedGrid> {
    curves
        .iter()
        .enumerate()
        .map(|(index, curve)| {
            let points = sampler.sample(curve, basis);
            let classification = classify(&points, axis_tol);
            if classification.orientation == Orientation::Unclassified {
                log::debug!("grid {index} unclassified ({} samples)", points.len());
            }
            ClassifiedGrid {
                index,
                classification,
            }
        })
        .collect()
}

/// Pick the first candidate with the smallest key. Ties keep the earlier entry.
fn first_minimum<'a>(
    grids: &'a [ClassifiedGrid],
    orientation: Orientation,
    key: impl Fn(Point2) -> f64,
) -> (Option<(&'a ClassifiedGrid, f64)>, usize) {
    let mut best: Option<(&ClassifiedGrid, f64)> = None;
    let mut count = 0;
    for grid in grids {
        let Some(mean) = grid.classification.mean else {
            continue;
        };
        if grid.classification.orientation != orientation {
            continue;
        }
        count += 1;
        let value = key(mean);
        if best.is_none_or(|(_, current)| value < current) {
            best = Some((grid, value));
        }
    }
    (best, count)
}

/// Anchor at the crossing of the left-most vertical and bottom-most horizontal grid.
///
/// The vertical grid's mean `x̄` and the horizontal grid's mean `ȳ` form a plane point that
/// is lifted back to model space through `basis`. On exact ties the grid that comes first in
/// `grids` wins.
pub fn locate_anchor(grids: &[ClassifiedGrid], basis: &Frame) -> AlignResult<Point3> {
    let (left, vertical) = first_minimum(grids, Orientation::Vertical, |m| m.x);
    let (bottom, horizontal) = first_minimum(grids, Orientation::Horizontal, |m| m.y);
    match (left, bottom) {
        (Some((left, x)), Some((bottom, y))) => {
            log::debug!(
                "anchor from vertical grid {} and horizontal grid {}",
                left.index,
                bottom.index
            );
            Ok(basis.lift(Point2::new(x, y)))
        }
        _ => Err(AlignError::NoIntersectionAnchor {
            vertical,
            horizontal,
        }),
    }
}

/// [`classify_grids`] followed by [`locate_anchor`].
pub fn find_grid_anchor<C: Curve3>(
    curves: &[C],
    basis: &Frame,
    sampler: &CurveSampler,
    axis_tol: f64,
) -> AlignResult<Point3> {
    let grids = classify_grids(curves, basis, sampler, axis_tol);
    locate_anchor(&grids, basis)
}

fn along_axis(direction: Vec3, axis: Vec3, tol: Tolerance) -> bool {
    direction.is_almost_parallel_to(axis, tol) || direction.is_almost_parallel_to(-axis, tol)
}

/// Anchor from straight grids only, using model axes.
///
/// A line is vertical when its direction is ±Y and horizontal when it is ±X, both within
/// `tol`. The left-most vertical has the smallest End-0 `x`, the bottom-most horizontal the
/// smallest End-0 `y`. The anchor is where the two bounded lines cross in plan; its height is
/// taken from the vertical grid. Curved grids are ignored.
pub fn locate_anchor_exact(curves: &[GridCurve], tol: Tolerance) -> AlignResult<Point3> {
    let mut left: Option<Line3> = None;
    let mut bottom: Option<Line3> = None;
    let (mut vertical, mut horizontal) = (0, 0);

    for line in curves.iter().filter_map(GridCurve::as_line) {
        let direction = line.direction();
        if along_axis(direction, Vec3::Y, tol) {
            vertical += 1;
            if left.is_none_or(|l| line.start.x < l.start.x) {
                left = Some(line);
            }
        } else if along_axis(direction, Vec3::X, tol) {
            horizontal += 1;
            if bottom.is_none_or(|b| line.start.y < b.start.y) {
                bottom = Some(line);
            }
        }
    }

    let missing = AlignError::NoIntersectionAnchor {
        vertical,
        horizontal,
    };
    let (Some(left), Some(bottom)) = (left, bottom) else {
        return Err(missing);
    };

    let plan = Frame::WORLD_XY;
    let Some((t, u)) = line_line_parameters_2d(
        plan.project(left.start),
        plan.project_vec(left.direction()),
        plan.project(bottom.start),
        plan.project_vec(bottom.direction()),
        tol,
    ) else {
        return Err(missing);
    };
    let within = |s: f64| s >= -tol.eps && s <= 1.0 + tol.eps;
    if !(within(t) && within(u)) {
        log::debug!("left-most and bottom-most grids do not cross (t = {t}, u = {u})");
        return Err(missing);
    }
    Ok(left.start.lerp(left.end, t))
}

/// Index of the first view able to host `point`: one whose crop region contains it in plan,
/// or one that is not cropped at all. `crops` holds each view's active crop box, if any.
#[must_use]
pub fn select_host_view(point: Point3, crops: &[Option<BBox>]) -> Option<usize> {
    crops
        .iter()
        .position(|crop| crop.is_none_or(|bbox| bbox.contains_point_xy(point)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::Arc3;

    fn line(x0: f64, y0: f64, x1: f64, y1: f64) -> Line3 {
        Line3::new(Point3::new(x0, y0, 0.0), Point3::new(x1, y1, 0.0))
    }

    #[test]
    fn missing_horizontal_reports_counts() {
        let curves = [line(0.0, 0.0, 0.0, 10.0), line(5.0, 0.0, 5.0, 10.0)];
        let err = find_grid_anchor(&curves, &Frame::WORLD_XY, &CurveSampler::default(), 0.15)
            .unwrap_err();
        assert_eq!(
            err,
            AlignError::NoIntersectionAnchor {
                vertical: 2,
                horizontal: 0
            }
        );
    }

    #[test]
    fn picks_extreme_means() {
        let curves = [
            line(4.0, 0.0, 4.0, 10.0),
            line(0.0, 7.0, 10.0, 7.0),
            line(-2.0, 0.0, -2.0, 10.0),
            line(0.0, 3.0, 10.0, 3.0),
        ];
        let anchor =
            find_grid_anchor(&curves, &Frame::WORLD_XY, &CurveSampler::default(), 0.15).unwrap();
        assert_eq!(anchor, Point3::new(-2.0, 3.0, 0.0));
    }

    #[test]
    fn ties_go_to_first_in_input_order() {
        let vertical = |index, x| ClassifiedGrid {
            index,
            classification: Classification {
                orientation: Orientation::Vertical,
                mean: Some(Point2::new(x, 5.0)),
            },
        };
        let horizontal = ClassifiedGrid {
            index: 2,
            classification: Classification {
                orientation: Orientation::Horizontal,
                mean: Some(Point2::new(5.0, 0.0)),
            },
        };
        let grids = [vertical(0, 1.0), vertical(1, 1.0), horizontal];
        let (best, count) = first_minimum(&grids, Orientation::Vertical, |m| m.x);
        assert_eq!(count, 2);
        assert_eq!(best.map(|(g, _)| g.index), Some(0));
    }

    #[test]
    fn exact_locator_intersects_bounded_lines() {
        let curves: Vec<GridCurve> = vec![
            line(3.0, 10.0, 3.0, -10.0).into(),
            line(-5.0, 2.0, 5.0, 2.0).into(),
            line(1.0, -10.0, 1.0, 10.0).into(),
            line(-5.0, -4.0, 5.0, -4.0).into(),
            Arc3::new(Point3::ORIGIN, Vec3::X, Vec3::Y, 50.0, 0.0, 1.0).into(),
        ];
        let anchor = locate_anchor_exact(&curves, Tolerance::DEFAULT).unwrap();
        assert!(Tolerance::DEFAULT.approx_eq_point3(anchor, Point3::new(1.0, -4.0, 0.0)));
    }

    #[test]
    fn exact_locator_rejects_grids_that_miss() {
        let curves: Vec<GridCurve> = vec![
            line(0.0, 0.0, 0.0, 10.0).into(),
            line(5.0, 20.0, 15.0, 20.0).into(),
        ];
        assert!(matches!(
            locate_anchor_exact(&curves, Tolerance::DEFAULT),
            Err(AlignError::NoIntersectionAnchor { vertical: 1, horizontal: 1 })
        ));
    }

    #[test]
    fn host_view_prefers_first_match() {
        let crop = |min: (f64, f64), max: (f64, f64)| {
            Some(BBox::new(
                Point3::new(min.0, min.1, -100.0),
                Point3::new(max.0, max.1, 100.0),
            ))
        };
        let crops = [crop((10.0, 10.0), (20.0, 20.0)), crop((0.0, 0.0), (5.0, 5.0)), None];
        assert_eq!(select_host_view(Point3::new(2.0, 2.0, 50.0), &crops), Some(1));
        assert_eq!(select_host_view(Point3::new(50.0, 50.0, 0.0), &crops), Some(2));
        assert_eq!(select_host_view(Point3::new(50.0, 50.0, 0.0), &crops[..2]), None);
    }
}

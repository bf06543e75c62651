//! Axis classification of sampled curves.

use serde::{Deserialize, Serialize};

use super::error::AlignError;
use crate::geom::{Point2, Vec2};

/// Chord length below which a sampled curve has no usable direction.
const MIN_DIRECTION_LENGTH: f64 = 1e-9;

/// Default slack for [`classify`], as used by the sheet-alignment tools.
pub const DEFAULT_AXIS_TOLERANCE: f64 = 0.15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    Vertical,
    Horizontal,
    Unclassified,
}

/// Orientation of a sampled curve plus the mean of its samples.
///
/// The mean is a sortable stand-in for the curve's position: `x` orders vertical grids
/// left to right, `y` orders horizontal grids bottom to top.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub orientation: Orientation,
    pub mean: Option<Point2>,
}

impl Classification {
    pub const UNCLASSIFIABLE: Self = Self {
        orientation: Orientation::Unclassified,
        mean: None,
    };

    /// The orientation and mean, or [`AlignError::Unclassifiable`].
    pub fn require_axis(self) -> Result<(Orientation, Point2), AlignError> {
        match (self.orientation, self.mean) {
            (Orientation::Vertical | Orientation::Horizontal, Some(mean)) => {
                Ok((self.orientation, mean))
            }
            _ => Err(AlignError::Unclassifiable),
        }
    }
}

/// Classify `points` as vertical, horizontal or neither.
///
/// Uses the unit chord from the first to the last sample. With `ax = |dir·X|` and
/// `ay = |dir·Y|`, the curve is vertical when `ay − ax > axis_tol`, horizontal when
/// `ax − ay > axis_tol`, and unclassified otherwise. `axis_tol` is a dimensionless slack in
/// `[0, 1]`; raising it can only turn a classified curve into an unclassified one.
#[must_use]
pub fn classify(points: &[Point2], axis_tol: f64) -> Classification {
    let (Some(first), Some(last)) = (points.first(), points.last()) else {
        return Classification::UNCLASSIFIABLE;
    };
    let mean = mean_point(points);
    let unclassified = Classification {
        orientation: Orientation::Unclassified,
        mean: Some(mean),
    };
    if points.len() < 2 {
        return unclassified;
    }

    let chord = *last - *first;
    if !(chord.length() >= MIN_DIRECTION_LENGTH) {
        return unclassified;
    }
    let Some(dir) = chord.normalized() else {
        return unclassified;
    };

    let ax = dir.dot(Vec2::X).abs();
    let ay = dir.dot(Vec2::Y).abs();
    let orientation = if ay > ax && (ay - ax) > axis_tol {
        Orientation::Vertical
    } else if ax > ay && (ax - ay) > axis_tol {
        Orientation::Horizontal
    } else {
        Orientation::Unclassified
    };
    Classification {
        orientation,
        mean: Some(mean),
    }
}

#[allow(clippy::cast_precision_loss)]
fn mean_point(points: &[Point2]) -> Point2 {
    let n = points.len() as f64;
    let (sx, sy) = points
        .iter()
        .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
    Point2::new(sx / n, sy / n)
}

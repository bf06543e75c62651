//! Curve sampling into a plane basis.
//!
//! Sampling runs an ordered list of [`SampleStrategy`] values and keeps the first one that
//! yields a usable point sequence. The default order is tessellation, then evenly spaced
//! parameter evaluation, then the two end points. New strategies are added to the list; the
//! sampler itself never branches on curve kinds.

use serde::{Deserialize, Serialize};

use crate::geom::{Curve3, CurveEnd, Frame, Point2, Point3};

/// Default number of parameter samples when tessellation is unavailable.
pub const DEFAULT_MIN_SAMPLES: usize = 11;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SampleStrategy {
    /// The curve's own polyline approximation; needs at least two points.
    Tessellate,
    /// `min_samples` evaluations evenly spaced over the curve domain (at least two).
    Parametric,
    /// End-0 and End-1 only.
    Endpoints,
}

impl SampleStrategy {
    /// Model-space points for this strategy, or `None` when it cannot produce any.
    fn model_points(self, curve: &(impl Curve3 + ?Sized), min_samples: usize) -> Option<Vec<Point3>> {
        let points = match self {
            Self::Tessellate => curve.tessellate().filter(|pts| pts.len() >= 2)?,
            Self::Parametric => {
                let (t0, t1) = curve.domain();
                if !(t0.is_finite() && t1.is_finite()) {
                    return None;
                }
                let count = min_samples.max(2);
                #[allow(clippy::cast_precision_loss)]
                let params: Vec<f64> = (0..count)
                    .map(|i| t0 + (t1 - t0) * i as f64 / (count - 1) as f64)
                    .collect();
                params.into_iter().map(|t| curve.point_at(t)).collect()
            }
            Self::Endpoints => vec![
                curve.end_point(CurveEnd::End0),
                curve.end_point(CurveEnd::End1),
            ],
        };
        points.iter().all(|p| p.is_finite()).then_some(points)
    }
}

/// Samples curves into 2D points of a [`Frame`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurveSampler {
    pub strategies: Vec<SampleStrategy>,
    pub min_samples: usize,
}

impl Default for CurveSampler {
    fn default() -> Self {
        Self {
            strategies: vec![
                SampleStrategy::Tessellate,
                SampleStrategy::Parametric,
                SampleStrategy::Endpoints,
            ],
            min_samples: DEFAULT_MIN_SAMPLES,
        }
    }
}

impl CurveSampler {
    #[must_use]
    pub fn with_min_samples(min_samples: usize) -> Self {
        Self {
            min_samples,
            ..Self::default()
        }
    }

    /// Ordered 2D samples of `curve` in `basis`, following the curve's parametric direction.
    ///
    /// An empty result means every strategy failed; callers treat the curve as
    /// unclassifiable rather than as an error.
    #[must_use]
    pub fn sample(&self, curve: &(impl Curve3 + ?Sized), basis: &Frame) -> Vec<Point2> {
        self.sample_with_strategy(curve, basis)
            .map(|(_, points)| points)
            .unwrap_or_default()
    }

    /// Like [`Self::sample`], also reporting which strategy produced the points.
    #[must_use]
    pub fn sample_with_strategy(
        &self,
        curve: &(impl Curve3 + ?Sized),
        basis: &Frame,
    ) -> Option<(SampleStrategy, Vec<Point2>)> {
        self.strategies.iter().find_map(|&strategy| {
            let points = strategy.model_points(curve, self.min_samples)?;
            log::debug!("sampled {} points with {strategy:?}", points.len());
            Some((strategy, points.into_iter().map(|p| basis.project(p)).collect()))
        })
    }
}

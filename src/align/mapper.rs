//! Model space → sheet space.
//!
//! A viewport can expose its model-to-sheet transform directly, or only the pieces needed to
//! rebuild it: where its box center sits on the sheet, the hosting view's plane, crop center
//! and scale. [`to_target_plane_with`] picks between the two with a [`MapStrategy`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::{AlignError, AlignResult};
use crate::geom::{Frame, Point2, Point3, Transform, Vec2, Vec3};

/// Discrete rotation of a viewport relative to its view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ViewportRotation {
    #[default]
    None,
    /// 90° counter-clockwise.
    Ccw90,
    /// 90° clockwise.
    Cw90,
    /// 180°.
    Half,
}

impl ViewportRotation {
    /// Rotation from a signed angle in degrees. Only multiples of 90° are accepted.
    pub fn from_degrees(degrees: i32) -> AlignResult<Self> {
        match degrees.rem_euclid(360) {
            0 => Ok(Self::None),
            90 => Ok(Self::Ccw90),
            180 => Ok(Self::Half),
            270 => Ok(Self::Cw90),
            _ => Err(AlignError::UnsupportedRotation(format!("{degrees} degrees"))),
        }
    }

    /// Counter-clockwise angle in degrees, in `[0, 360)`.
    #[must_use]
    pub const fn degrees(self) -> i32 {
        match self {
            Self::None => 0,
            Self::Ccw90 => 90,
            Self::Half => 180,
            Self::Cw90 => 270,
        }
    }

    /// Apply the rotation to a sheet offset.
    #[must_use]
    pub fn rotate(self, v: Vec2) -> Vec2 {
        match self {
            Self::None => v,
            Self::Ccw90 => Vec2::new(-v.y, v.x),
            Self::Cw90 => Vec2::new(v.y, -v.x),
            Self::Half => Vec2::new(-v.x, -v.y),
        }
    }

    /// Host enumeration name.
    #[must_use]
    pub const fn host_name(self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Ccw90 => "NinetyDegreesCounterclockwise",
            Self::Cw90 => "Clockwise",
            Self::Half => "OneHundredEightyDegrees",
        }
    }
}

impl fmt::Display for ViewportRotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.host_name())
    }
}

impl FromStr for ViewportRotation {
    type Err = AlignError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "None" => Ok(Self::None),
            "NinetyDegreesCounterclockwise" => Ok(Self::Ccw90),
            "Clockwise" => Ok(Self::Cw90),
            "Halfway" | "OneHundredEightyDegrees" => Ok(Self::Half),
            other => other
                .parse::<i32>()
                .map_err(|_| AlignError::UnsupportedRotation(other.to_string()))
                .and_then(Self::from_degrees),
        }
    }
}

/// Rotate a view-plane offset into sheet orientation.
#[must_use]
pub fn rotate_offset(offset: Vec2, rotation: ViewportRotation) -> Vec2 {
    rotation.rotate(offset)
}

/// How a view sits inside its viewport when no direct transform is exposed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewPlacement {
    /// The view plane.
    pub frame: Frame,
    /// Crop region center, in view-plane coordinates.
    pub crop_center: Point2,
    /// View scale denominator (model units per sheet unit).
    pub scale: f64,
}

impl ViewPlacement {
    fn checked_scale(&self) -> AlignResult<f64> {
        if self.scale.is_finite() && self.scale > 0.0 {
            Ok(self.scale)
        } else {
            Err(AlignError::TransformUnavailable)
        }
    }

    /// Sheet-space offset of `model_point` from the viewport center, before rotation.
    pub fn sheet_offset(&self, model_point: Point3) -> AlignResult<Vec2> {
        let scale = self.checked_scale()?;
        Ok((self.frame.project(model_point) - self.crop_center) / scale)
    }

    /// The affine transform the reconstruction is equivalent to, for an unrotated viewport
    /// centered at `box_center`.
    pub fn to_transform(&self, box_center: Point3) -> AlignResult<Transform> {
        let scale = self.checked_scale()?;
        let origin = self.frame.origin().to_vec3();
        let row = |axis: Vec3, center: f64, shift: f64| {
            [
                axis.x / scale,
                axis.y / scale,
                axis.z / scale,
                shift - (origin.dot(axis) + center) / scale,
            ]
        };
        Ok(Transform::from_rows(
            row(self.frame.right(), self.crop_center.x, box_center.x),
            row(self.frame.up(), self.crop_center.y, box_center.y),
            [0.0, 0.0, 0.0, box_center.z],
        ))
    }
}

/// Everything known about one viewport's model-to-sheet mapping.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportContext {
    /// Current viewport box center on the sheet.
    pub box_center: Point3,
    /// Model-to-sheet transform, when the host exposes one.
    pub direct: Option<Transform>,
    /// Pieces for rebuilding the mapping, when available.
    pub legacy: Option<ViewPlacement>,
    pub rotation: ViewportRotation,
}

impl ViewportContext {
    #[must_use]
    pub const fn with_direct(box_center: Point3, transform: Transform) -> Self {
        Self {
            box_center,
            direct: Some(transform),
            legacy: None,
            rotation: ViewportRotation::None,
        }
    }

    #[must_use]
    pub const fn with_placement(box_center: Point3, placement: ViewPlacement) -> Self {
        Self {
            box_center,
            direct: None,
            legacy: Some(placement),
            rotation: ViewportRotation::None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MapStrategy {
    /// Direct transform when available, reconstruction otherwise.
    #[default]
    Auto,
    Direct,
    Reconstructed,
}

/// Map `model_point` to sheet space, preferring the direct transform.
///
/// A missing or non-finite direct transform falls back to the reconstruction;
/// [`AlignError::TransformUnavailable`] means neither could be computed.
pub fn to_target_plane(model_point: Point3, context: &ViewportContext) -> AlignResult<Point3> {
    to_target_plane_with(model_point, context, MapStrategy::Auto)
}

/// Map `model_point` to sheet space with an explicit strategy.
///
/// The reconstruction assumes an unrotated viewport and fails with
/// [`AlignError::UnsupportedRotation`] when `context.rotation` says otherwise.
pub fn to_target_plane_with(
    model_point: Point3,
    context: &ViewportContext,
    strategy: MapStrategy,
) -> AlignResult<Point3> {
    match strategy {
        MapStrategy::Direct => direct(model_point, context),
        MapStrategy::Reconstructed => reconstructed(model_point, context),
        MapStrategy::Auto => direct(model_point, context).or_else(|err| {
            if context.direct.is_some() {
                log::debug!("direct transform unusable ({err}); reconstructing");
            }
            reconstructed(model_point, context)
        }),
    }
}

fn direct(model_point: Point3, context: &ViewportContext) -> AlignResult<Point3> {
    let transform = context
        .direct
        .filter(Transform::is_finite)
        .ok_or(AlignError::TransformUnavailable)?;
    Ok(transform.apply_point(model_point))
}

fn reconstructed(model_point: Point3, context: &ViewportContext) -> AlignResult<Point3> {
    let placement = context.legacy.ok_or(AlignError::TransformUnavailable)?;
    if context.rotation != ViewportRotation::None {
        return Err(AlignError::UnsupportedRotation(format!(
            "{} with a reconstructed transform",
            context.rotation
        )));
    }
    let offset = placement.sheet_offset(model_point)?;
    Ok(context.box_center + Vec3::new(offset.x, offset.y, 0.0))
}

/// Sheet position for an annotation at `model_point`, honouring the viewport rotation.
///
/// Needs the view placement; the direct transform is not consulted.
pub fn place_annotation(model_point: Point3, context: &ViewportContext) -> AlignResult<Point3> {
    let placement = context.legacy.ok_or(AlignError::TransformUnavailable)?;
    let offset = rotate_offset(placement.sheet_offset(model_point)?, context.rotation);
    Ok(context.box_center + Vec3::new(offset.x, offset.y, 0.0))
}

//! Sheet-side placement: title-block targets and viewport moves.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::AlignResult;
use super::mapper::{MapStrategy, ViewportContext, to_target_plane_with};
use crate::geom::{BBox, Point3, Vec3};

/// Title-block corner a viewport anchor is aligned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TitleBlockCorner {
    #[default]
    BottomLeft,
    BottomRight,
    TopLeft,
    TopRight,
}

impl TitleBlockCorner {
    pub const ALL: [Self; 4] = [
        Self::BottomLeft,
        Self::BottomRight,
        Self::TopLeft,
        Self::TopRight,
    ];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::BottomLeft => "Bottom-Left",
            Self::BottomRight => "Bottom-Right",
            Self::TopLeft => "Top-Left",
            Self::TopRight => "Top-Right",
        }
    }

    /// The corner of `bbox` on the sheet plane (z = 0).
    #[must_use]
    pub const fn point(self, bbox: &BBox) -> Point3 {
        let (x, y) = match self {
            Self::BottomLeft => (bbox.min.x, bbox.min.y),
            Self::BottomRight => (bbox.max.x, bbox.min.y),
            Self::TopLeft => (bbox.min.x, bbox.max.y),
            Self::TopRight => (bbox.max.x, bbox.max.y),
        };
        Point3::new(x, y, 0.0)
    }
}

impl fmt::Display for TitleBlockCorner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TitleBlockCorner {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|corner| corner.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown title block corner: {s}"))
    }
}

/// Why a sheet has no usable title block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TitleBlockError {
    #[error("no title block on sheet")]
    Missing,
    #[error("{0} title blocks on sheet, expected exactly one")]
    Multiple(usize),
}

/// The title block to align against. With `strict`, anything but exactly one is refused;
/// otherwise the first is used.
pub fn select_title_block(blocks: &[BBox], strict: bool) -> Result<BBox, TitleBlockError> {
    match blocks {
        [] => Err(TitleBlockError::Missing),
        [only] => Ok(*only),
        [first, ..] if !strict => Ok(*first),
        many => Err(TitleBlockError::Multiple(many.len())),
    }
}

/// Target sheet point: `corner` of the title block shifted by `(dx, dy)` sheet units.
#[must_use]
pub fn sheet_target(corner: TitleBlockCorner, title_block: &BBox, dx: f64, dy: f64) -> Point3 {
    corner.point(title_block) + Vec3::new(dx, dy, 0.0)
}

/// Host view categories that matter for filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewKind {
    FloorPlan,
    CeilingPlan,
    StructuralPlan,
    EngineeringPlan,
    Section,
    Elevation,
    ThreeD,
    Drafting,
    Legend,
    Schedule,
    Other,
}

impl ViewKind {
    /// Plan-like views, where grids read as a 2D layout.
    #[must_use]
    pub const fn is_plan(self) -> bool {
        matches!(
            self,
            Self::FloorPlan | Self::CeilingPlan | Self::StructuralPlan | Self::EngineeringPlan
        )
    }

    /// Views whose grid extents are recomputed: floor and engineering plans only.
    #[must_use]
    pub const fn takes_grid_extents(self) -> bool {
        matches!(self, Self::FloorPlan | Self::EngineeringPlan)
    }
}

/// How a viewport has to move so that its anchor lands on a target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportMove {
    /// Where the anchor currently maps to on the sheet.
    pub current: Point3,
    /// Planar displacement; `z` is always zero.
    pub delta: Vec3,
    pub new_box_center: Point3,
}

/// Move for a viewport so that `anchor` (model space) lands on `target` (sheet space).
pub fn align_viewport(
    anchor: Point3,
    context: &ViewportContext,
    target: Point3,
    strategy: MapStrategy,
) -> AlignResult<ViewportMove> {
    let current = to_target_plane_with(anchor, context, strategy)?;
    let delta = Vec3::new(target.x - current.x, target.y - current.y, 0.0);
    Ok(ViewportMove {
        current,
        delta,
        new_box_center: context.box_center + delta,
    })
}

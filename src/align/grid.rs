//! Grids with per-view overrides.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::ConstructionError;
use crate::geom::{CurveEnd, GridCurve, Line3};

/// Host identifier of a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ViewId(pub u64);

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Bubble visibility at each end of a grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BubbleVisibility {
    pub end0: bool,
    pub end1: bool,
}

impl BubbleVisibility {
    pub const BOTH: Self = Self { end0: true, end1: true };

    #[must_use]
    pub const fn at(self, end: CurveEnd) -> bool {
        match end {
            CurveEnd::End0 => self.end0,
            CurveEnd::End1 => self.end1,
        }
    }
}

impl Default for BubbleVisibility {
    fn default() -> Self {
        Self::BOTH
    }
}

/// Which grid ends should show a bubble. Host labels number the ends from one, so
/// "End 1" is End-0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BubbleChoice {
    FirstEnd,
    SecondEnd,
    #[default]
    BothEnds,
    None,
}

impl BubbleChoice {
    #[must_use]
    pub const fn visibility(self) -> BubbleVisibility {
        let (end0, end1) = match self {
            Self::FirstEnd => (true, false),
            Self::SecondEnd => (false, true),
            Self::BothEnds => (true, true),
            Self::None => (false, false),
        };
        BubbleVisibility { end0, end1 }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::FirstEnd => "End 1 Only",
            Self::SecondEnd => "End 2 Only",
            Self::BothEnds => "Both Ends",
            Self::None => "None",
        }
    }
}

impl FromStr for BubbleChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "End 1 Only" => Ok(Self::FirstEnd),
            "End 2 Only" => Ok(Self::SecondEnd),
            "Both Ends" => Ok(Self::BothEnds),
            "None" => Ok(Self::None),
            other => Err(format!("unknown bubble choice: {other}")),
        }
    }
}

/// What a single view overrides on a grid.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GridViewOverride {
    /// View-specific 2D extent, when one has been set.
    pub curve: Option<Line3>,
    pub bubbles: BubbleVisibility,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    pub name: String,
    /// Model curve.
    pub curve: GridCurve,
    views: BTreeMap<ViewId, GridViewOverride>,
}

impl Grid {
    pub fn new(name: impl Into<String>, curve: impl Into<GridCurve>) -> Self {
        Self {
            name: name.into(),
            curve: curve.into(),
            views: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn view_override(&self, view: ViewId) -> Option<&GridViewOverride> {
        self.views.get(&view)
    }

    #[must_use]
    pub fn view_curve(&self, view: ViewId) -> Option<Line3> {
        self.views.get(&view).and_then(|o| o.curve)
    }

    /// Line the 2D extent in `view` is measured against: the view curve when set,
    /// otherwise the model curve if it is straight.
    #[must_use]
    pub fn reference_line(&self, view: ViewId) -> Option<Line3> {
        self.view_curve(view).or_else(|| self.curve.as_line())
    }

    /// Give `view` a 2D curve if it has none, copying the straight model curve.
    /// A model line shorter than `min_length` is not copied. Returns the view curve
    /// afterwards.
    pub fn ensure_view_curve(&mut self, view: ViewId, min_length: f64) -> Option<Line3> {
        let model = self
            .curve
            .as_line()
            .and_then(|line| Line3::bounded(line.start, line.end, min_length));
        let entry = self.views.entry(view).or_default();
        if entry.curve.is_none() {
            entry.curve = model;
        }
        entry.curve
    }

    /// Replace the 2D curve in `view`. Lines shorter than `min_length` are refused and the
    /// previous curve is kept.
    pub fn set_view_curve(
        &mut self,
        view: ViewId,
        line: Line3,
        min_length: f64,
    ) -> Result<(), ConstructionError> {
        let line = Line3::bounded(line.start, line.end, min_length).ok_or_else(|| {
            ConstructionError::new(format!(
                "2D curve of grid '{}' shorter than {min_length}",
                self.name
            ))
        })?;
        self.views.entry(view).or_default().curve = Some(line);
        Ok(())
    }

    pub fn set_bubbles(&mut self, view: ViewId, bubbles: BubbleVisibility) {
        self.views.entry(view).or_default().bubbles = bubbles;
    }

    /// Bubble visibility in `view`; both ends are shown unless overridden.
    #[must_use]
    pub fn bubbles(&self, view: ViewId) -> BubbleVisibility {
        self.views.get(&view).map(|o| o.bubbles).unwrap_or_default()
    }
}

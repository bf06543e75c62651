//! Grid-driven alignment operations built on [`crate::geom`].

pub mod error;
pub mod extent;
pub mod grid;
pub mod locator;
pub mod mapper;
pub mod orientation;
pub mod sampler;
pub mod sheet;
pub mod units;

pub use error::{AlignError, AlignResult, ConstructionError, Rejection};
pub use extent::{
    BoundaryHit, BoundedLineBuilder, Extent, ExtentOptions, ExtentUpdate, LineBuilder, OffsetMode,
    RectSource, clip_rect, compute_extent, recompute_extent, remap_endpoints,
};
pub use grid::{BubbleChoice, BubbleVisibility, Grid, GridViewOverride, ViewId};
pub use locator::{
    ClassifiedGrid, classify_grids, find_grid_anchor, locate_anchor, locate_anchor_exact,
    select_host_view,
};
pub use mapper::{
    MapStrategy, ViewPlacement, ViewportContext, ViewportRotation, place_annotation,
    rotate_offset, to_target_plane, to_target_plane_with,
};
pub use orientation::{Classification, Orientation, classify};
pub use sampler::{CurveSampler, SampleStrategy};
pub use sheet::{
    TitleBlockCorner, TitleBlockError, ViewKind, ViewportMove, align_viewport, select_title_block,
    sheet_target,
};
pub use units::LengthUnit;

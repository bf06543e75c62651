//! Per-sheet and per-view drivers.
//!
//! The drivers only compute: they return viewport moves and write grid overrides into the
//! caller's [`crate::align::Grid`] values. Committing those edits to a host document is left
//! to the caller. With the `parallel` feature, independent sheets and views are processed on
//! the rayon pool; reports always follow input order.

mod extents;
mod sheets;

pub use extents::{ExtentCounts, ExtentReport, ExtentViewJob, extend_grids};
pub use sheets::{
    AlignReport, SheetAlignment, SheetJob, SkippedSheet, ViewportAlignment, ViewportJob,
    align_sheets,
};

use serde::Serialize;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::align::locator::find_grid_anchor;
use crate::align::mapper::ViewportContext;
use crate::align::sampler::CurveSampler;
use crate::align::sheet::{ViewKind, ViewportMove, align_viewport, select_title_block, sheet_target};
use crate::config::{AlignConfig, ConfigError};
use crate::geom::{BBox, Frame, GridCurve, Point3};

/// One viewport on a sheet, with the grids visible in its view.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewportJob {
    pub view_name: String,
    pub view_kind: ViewKind,
    /// The view plane grids are sampled in.
    pub frame: Frame,
    pub grids: Vec<GridCurve>,
    pub context: ViewportContext,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SheetJob {
    /// Display name, e.g. `"A101 - Level 1"`.
    pub sheet: String,
    /// Title-block bounding boxes in sheet coordinates.
    pub title_blocks: Vec<BBox>,
    pub viewports: Vec<ViewportJob>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewportAlignment {
    pub view_name: String,
    /// Grid anchor in model space.
    pub anchor: Point3,
    pub placement: ViewportMove,
}

/// A sheet with at least one viewport moved.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SheetAlignment {
    pub sheet: String,
    pub viewports: Vec<ViewportAlignment>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedSheet {
    pub sheet: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AlignReport {
    pub aligned: Vec<SheetAlignment>,
    pub skipped: Vec<SkippedSheet>,
}

impl AlignReport {
    /// Sheets whose moves should be committed.
    #[must_use]
    pub fn sheets_processed(&self) -> usize {
        self.aligned.len()
    }
}

#[derive(Debug, Default)]
struct SheetOutcome {
    aligned: Option<SheetAlignment>,
    skipped: Vec<SkippedSheet>,
}

fn skip(sheet: &str, reason: impl Into<String>) -> SkippedSheet {
    let reason = reason.into();
    log::warn!("sheet {sheet}: {reason}");
    SkippedSheet {
        sheet: sheet.to_string(),
        reason,
    }
}

fn align_sheet(job: &SheetJob, config: &AlignConfig, sampler: &CurveSampler) -> SheetOutcome {
    let mut outcome = SheetOutcome::default();
    if job.viewports.is_empty() {
        outcome.skipped.push(skip(&job.sheet, "No viewports"));
        return outcome;
    }
    let title_block = match select_title_block(&job.title_blocks, config.strict_title_block) {
        Ok(bbox) => bbox,
        Err(err) => {
            outcome.skipped.push(skip(&job.sheet, err.to_string()));
            return outcome;
        }
    };
    let (dx, dy) = config.offset_feet();
    let target = sheet_target(config.corner, &title_block, dx, dy);

    let mut viewports = Vec::new();
    for viewport in &job.viewports {
        if config.plan_only && !viewport.view_kind.is_plan() {
            log::debug!("{}: not a plan view", viewport.view_name);
            continue;
        }
        let anchor =
            match find_grid_anchor(&viewport.grids, &viewport.frame, sampler, config.axis_tol) {
                Ok(anchor) => anchor,
                Err(err) => {
                    log::debug!("{}: {err}", viewport.view_name);
                    continue;
                }
            };
        match align_viewport(anchor, &viewport.context, target, config.strategy) {
            Ok(placement) => viewports.push(ViewportAlignment {
                view_name: viewport.view_name.clone(),
                anchor,
                placement,
            }),
            Err(err) => outcome.skipped.push(skip(
                &job.sheet,
                format!("View '{}': error calculating transform: {err}", viewport.view_name),
            )),
        }
    }

    if viewports.is_empty() {
        outcome.skipped.push(skip(
            &job.sheet,
            "No eligible viewports (no grids / filtered by options)",
        ));
    } else {
        outcome.aligned = Some(SheetAlignment {
            sheet: job.sheet.clone(),
            viewports,
        });
    }
    outcome
}

cfg_if::cfg_if! {
    if #[cfg(feature = "parallel")] {
        fn align_each(
            jobs: &[SheetJob],
            config: &AlignConfig,
            sampler: &CurveSampler,
        ) -> Vec<SheetOutcome> {
            jobs.par_iter()
                .map(|job| align_sheet(job, config, sampler))
                .collect()
        }
    } else {
        fn align_each(
            jobs: &[SheetJob],
            config: &AlignConfig,
            sampler: &CurveSampler,
        ) -> Vec<SheetOutcome> {
            jobs.iter()
                .map(|job| align_sheet(job, config, sampler))
                .collect()
        }
    }
}

/// Compute viewport moves for every sheet.
///
/// A sheet's moves are all-or-nothing from the caller's point of view: sheets that end up
/// with no moved viewport are reported as skipped and carry no moves. Report order follows
/// `jobs`.
///
/// # Errors
/// Returns [`ConfigError`] when `config` does not validate; nothing is computed then.
pub fn align_sheets(jobs: &[SheetJob], config: &AlignConfig) -> Result<AlignReport, ConfigError> {
    config.validate()?;
    let sampler = config.sampler();
    let mut report = AlignReport::default();
    for outcome in align_each(jobs, config, &sampler) {
        report.aligned.extend(outcome.aligned);
        report.skipped.extend(outcome.skipped);
    }
    log::debug!(
        "aligned {} of {} sheets",
        report.sheets_processed(),
        jobs.len()
    );
    Ok(report)
}

use serde::Serialize;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::align::error::{AlignError, AlignResult};
use crate::align::extent::{ExtentOptions, ExtentUpdate, LineBuilder, clip_rect, recompute_extent};
use crate::align::grid::{Grid, ViewId};
use crate::align::sheet::ViewKind;
use crate::config::{ConfigError, ExtentConfig};
use crate::geom::{BBox, Transform};

/// One view whose grids get new 2D extents.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtentViewJob {
    pub view: ViewId,
    pub view_name: String,
    pub view_kind: ViewKind,
    /// Assigned scope box, placed in model space.
    pub scope: Option<(BBox, Transform)>,
    /// Crop box, placed in model space.
    pub crop: Option<(BBox, Transform)>,
    /// Indices of the grids visible in the view.
    pub grids: Vec<usize>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ExtentCounts {
    pub views_selected: usize,
    pub views_processed: usize,
    pub grids_modified: usize,
    pub skipped: usize,
    pub errors: usize,
}

/// Result lines in the form `View 'name': Grid 'name' -> message`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExtentReport {
    pub counts: ExtentCounts,
    pub modified: Vec<String>,
    pub skipped: Vec<String>,
    pub errors: Vec<String>,
}

fn grid_line(view: &str, grid: &str, message: impl std::fmt::Display) -> String {
    format!("View '{view}': Grid '{grid}' -> {message}")
}

struct GridEdit {
    grid: usize,
    result: AlignResult<ExtentUpdate>,
}

enum ViewPlan {
    Skipped(String),
    /// The view had a clipping box but nothing to work on.
    Empty(String),
    Edits(Vec<GridEdit>),
}

fn plan_view<B: LineBuilder>(
    job: &ExtentViewJob,
    grids: &[Grid],
    selection: Option<&[usize]>,
    config: &ExtentConfig,
    options: &ExtentOptions,
    builder: &B,
) -> ViewPlan {
    if config.plan_only && !job.view_kind.takes_grid_extents() {
        return ViewPlan::Skipped(format!("View '{}' is not a plan; skipped.", job.view_name));
    }
    let Some((rect, source)) = clip_rect(job.scope, job.crop) else {
        return ViewPlan::Skipped(format!(
            "View '{}' has no Scope/Crop Box; skipped.",
            job.view_name
        ));
    };
    log::debug!("view {}: clipping to {source:?} box", job.view_name);

    let targets: Vec<usize> = match selection {
        Some([]) => {
            return ViewPlan::Empty(format!(
                "View '{}': selection only but no grids selected; skipped.",
                job.view_name
            ));
        }
        Some(selected) => job
            .grids
            .iter()
            .copied()
            .filter(|index| selected.contains(index))
            .collect(),
        None => job.grids.clone(),
    };

    let edits = targets
        .into_iter()
        .filter_map(|index| {
            let grid = grids.get(index)?;
            let result = recompute_extent(
                &grid.curve,
                &rect,
                options,
                grid.view_curve(job.view),
                builder,
            );
            Some(GridEdit {
                grid: index,
                result,
            })
        })
        .collect();
    ViewPlan::Edits(edits)
}

#[cfg(feature = "parallel")]
fn plan_each<B: LineBuilder + Sync>(
    views: &[ExtentViewJob],
    grids: &[Grid],
    selection: Option<&[usize]>,
    config: &ExtentConfig,
    options: &ExtentOptions,
    builder: &B,
) -> Vec<ViewPlan> {
    views
        .par_iter()
        .map(|job| plan_view(job, grids, selection, config, options, builder))
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn plan_each<B: LineBuilder + Sync>(
    views: &[ExtentViewJob],
    grids: &[Grid],
    selection: Option<&[usize]>,
    config: &ExtentConfig,
    options: &ExtentOptions,
    builder: &B,
) -> Vec<ViewPlan> {
    views
        .iter()
        .map(|job| plan_view(job, grids, selection, config, options, builder))
        .collect()
}

/// Recompute 2D extents and bubbles for the grids of each view.
///
/// Extents are computed independently per view and then written to `grids` in view order.
/// Bubble visibility from `config.bubbles` is applied to every grid that was considered,
/// whatever its extent outcome. With `selection`, only the listed grid indices are touched.
///
/// # Errors
/// Returns [`ConfigError`] when `config` does not validate; no grid is modified then.
pub fn extend_grids<B: LineBuilder + Sync>(
    grids: &mut [Grid],
    views: &[ExtentViewJob],
    selection: Option<&[usize]>,
    config: &ExtentConfig,
    builder: &B,
) -> Result<ExtentReport, ConfigError> {
    config.validate()?;
    let options = config.extent_options();
    let plans = plan_each(views, grids, selection, config, &options, builder);

    let mut report = ExtentReport {
        counts: ExtentCounts {
            views_selected: views.len(),
            ..ExtentCounts::default()
        },
        ..ExtentReport::default()
    };
    let bubbles = config.bubbles.visibility();

    for (job, plan) in views.iter().zip(plans) {
        let edits = match plan {
            ViewPlan::Skipped(line) => {
                log::debug!("{line}");
                report.skipped.push(line);
                continue;
            }
            ViewPlan::Empty(line) => {
                log::debug!("{line}");
                report.counts.views_processed += 1;
                report.skipped.push(line);
                continue;
            }
            ViewPlan::Edits(edits) => edits,
        };
        report.counts.views_processed += 1;

        for edit in edits {
            let grid = &mut grids[edit.grid];
            match edit.result {
                Ok(update) => match grid.set_view_curve(job.view, update.line, options.min_length) {
                    Ok(()) => {
                        report.counts.grids_modified += 1;
                        report
                            .modified
                            .push(grid_line(&job.view_name, &grid.name, update.status()));
                    }
                    Err(err) => report
                        .errors
                        .push(grid_line(&job.view_name, &grid.name, format!("ERROR: {err}"))),
                },
                Err(err) => record_failure(&mut report, grid, job, &err, options.min_length),
            }
            grid.set_bubbles(job.view, bubbles);
            report.modified.push(grid_line(
                &job.view_name,
                &grid.name,
                format!("Ends: {}", config.bubbles.label()),
            ));
        }
    }

    report.counts.skipped = report.skipped.len();
    report.counts.errors = report.errors.len();
    Ok(report)
}

fn record_failure(
    report: &mut ExtentReport,
    grid: &mut Grid,
    job: &ExtentViewJob,
    err: &AlignError,
    min_length: f64,
) {
    match err {
        AlignError::GeometryRejected(reason) => {
            report
                .skipped
                .push(grid_line(&job.view_name, &grid.name, format!("Skipped ({reason}).")));
        }
        _ => {
            // Failed constructions still seed a view curve when the model line is long enough.
            grid.ensure_view_curve(job.view, min_length);
            log::warn!("view {}: grid {}: {err}", job.view_name, grid.name);
            report
                .errors
                .push(grid_line(&job.view_name, &grid.name, format!("ERROR: {err}")));
        }
    }
}

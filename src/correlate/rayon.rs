//! Rayon-parallel scan (feature-gated).
//!
//! Row-parallel variant of `correlate_plan`. Each worker scans full rows of
//! placement coordinates against immutable buffers, so there is no shared
//! mutable state; the sequential reduction at the end keeps the result
//! identical to the scalar scan, including tie-breaking.

use crate::correlate::scan::score_window;
use crate::correlate::{MatchPoint, TemplatePlan};
use crate::image::ImageView;
use crate::util::{WheelMatchError, WheelMatchResult};
use rayon::prelude::*;

/// Row-parallel equivalent of [`correlate_plan`](crate::correlate_plan).
pub fn correlate_plan_par(
    target: ImageView<'_, u8>,
    plan: &TemplatePlan,
    min_window_var: f32,
) -> WheelMatchResult<MatchPoint> {
    let img_width = target.width();
    let img_height = target.height();
    let tpl_width = plan.width();
    let tpl_height = plan.height();
    if tpl_width > img_width || tpl_height > img_height {
        return Err(WheelMatchError::TemplateTooLarge {
            tpl_width,
            tpl_height,
            img_width,
            img_height,
        });
    }

    let max_x = img_width - tpl_width;
    let max_y = img_height - tpl_height;

    let row_bests: Vec<Option<MatchPoint>> = (0..=max_y)
        .into_par_iter()
        .map(|y| {
            let mut best: Option<MatchPoint> = None;
            for x in 0..=max_x {
                if let Some(score) = score_window(target, plan, x, y, min_window_var) {
                    if best.map_or(true, |b| score > b.score) {
                        best = Some(MatchPoint { x, y, score });
                    }
                }
            }
            best
        })
        .collect();

    // Rows are reduced in ascending y, matching the scalar scan order.
    let mut best: Option<MatchPoint> = None;
    for candidate in row_bests.into_iter().flatten() {
        if best.map_or(true, |b| candidate.score > b.score) {
            best = Some(candidate);
        }
    }

    best.ok_or(WheelMatchError::FlatTarget)
}

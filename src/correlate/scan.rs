//! Dense scalar scan over every valid template placement.

use crate::correlate::TemplatePlan;
use crate::image::ImageView;
use crate::util::{WheelMatchError, WheelMatchResult};

/// Variance floor below which a target window is considered flat.
pub const DEFAULT_MIN_WINDOW_VAR: f32 = 1e-8;

/// Best-scoring placement of a template inside a target.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MatchPoint {
    /// X coordinate (column) of the placement's top-left corner.
    pub x: usize,
    /// Y coordinate (row) of the placement's top-left corner.
    pub y: usize,
    /// ZNCC score at the placement, approximately in `[-1, 1]`.
    pub score: f32,
}

/// Correlates a template against a target and returns the best placement.
///
/// Convenience wrapper that plans the template and scans with the default
/// window-variance floor.
pub fn correlate(
    target: ImageView<'_, u8>,
    template: ImageView<'_, u8>,
) -> WheelMatchResult<MatchPoint> {
    let plan = TemplatePlan::from_view(template)?;
    correlate_plan(target, &plan, DEFAULT_MIN_WINDOW_VAR)
}

/// Scans every valid placement of a planned template and returns the maximum
/// ZNCC score with its location.
///
/// Ties resolve to the first placement in row-major scan order, keeping the
/// result deterministic. Fails with `TemplateTooLarge` when the template does
/// not fit inside the target, and with `FlatTarget` when every window falls
/// below `min_window_var` (a uniform target correlates with nothing).
pub fn correlate_plan(
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
    let mut best: Option<MatchPoint> = None;
    for y in 0..=max_y {
        for x in 0..=max_x {
            if let Some(score) = score_window(target, plan, x, y, min_window_var) {
                if best.map_or(true, |b| score > b.score) {
                    best = Some(MatchPoint { x, y, score });
                }
            }
        }
    }

    best.ok_or(WheelMatchError::FlatTarget)
}

/// Scores one placement; `None` when the window is flat or the score is not
/// finite.
pub(crate) fn score_window(
    target: ImageView<'_, u8>,
    plan: &TemplatePlan,
    x: usize,
    y: usize,
    min_window_var: f32,
) -> Option<f32> {
    let tpl_width = plan.width();
    let tpl_height = plan.height();
    let t_prime = plan.t_prime();
    let var_t = plan.var_t();
    let n = (tpl_width * tpl_height) as f32;

    let mut dot = 0.0f32;
    let mut sum_i = 0.0f32;
    let mut sum_i2 = 0.0f32;

    for ty in 0..tpl_height {
        let img_row = target.row(y + ty)?;
        let base = ty * tpl_width;
        for tx in 0..tpl_width {
            let value = img_row[x + tx] as f32;
            dot += t_prime[base + tx] * value;
            sum_i += value;
            sum_i2 += value * value;
        }
    }

    let var_i = sum_i2 - (sum_i * sum_i) / n;
    if var_i <= min_window_var {
        return None;
    }

    let score = dot / (var_t * var_i).sqrt();
    score.is_finite().then_some(score)
}

//! Template quality analysis.
//!
//! Validates the inputs the classifier consumes: a template with little fill,
//! near-uniform pixels, an oversized crop, or a high score against a
//! negative-control image (one known to contain none of the 37 patterns)
//! cannot be trusted to discriminate. Shares the correlation primitive with
//! the classifier and never mutates the template, so it can run as a lint
//! pass at load time or on demand.

use crate::correlate::{correlate_plan, TemplatePlan, DEFAULT_MIN_WINDOW_VAR};
use crate::image::ImageView;
use crate::library::{Template, TemplateLibrary};
use crate::trace::trace_span;

#[cfg(feature = "serde")]
use serde::Serialize;

/// Thresholds for the quality signals.
#[derive(Clone, Copy, Debug)]
pub struct QualityConfig {
    /// Intensities at or below this count as background for the fill ratio.
    pub background_level: u8,
    /// Fill ratios below this flag `LowFill`.
    pub min_fill_ratio: f32,
    /// Pixel variances below this flag `LowVariance`.
    pub min_variance: f32,
    /// Either dimension above this flags `Oversized`.
    pub max_dimension: usize,
    /// Negative-control confidences at or above this flag `TooGeneric`.
    pub generic_threshold: f32,
    /// Variance floor for control windows during correlation.
    pub min_window_var: f32,
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            background_level: 10,
            min_fill_ratio: 0.10,
            min_variance: 100.0,
            max_dimension: 100,
            generic_threshold: 0.75,
            min_window_var: DEFAULT_MIN_WINDOW_VAR,
        }
    }
}

/// Qualitative defects a template can carry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum QualityFlag {
    /// Too few non-background pixels; scores will be weak everywhere.
    LowFill,
    /// Near-uniform pixels; spuriously correlates with unrelated regions.
    LowVariance,
    /// Dimensions capture surrounding context, raising false-positive risk.
    Oversized,
    /// Matches the negative control; cannot separate pattern from absence.
    TooGeneric,
}

/// Per-template quality signals and flags.
///
/// A value object owned by the caller; producing one never mutates the
/// template.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct QualityReport {
    /// Outcome label of the analyzed template.
    pub label: u8,
    /// Template width in pixels.
    pub width: usize,
    /// Template height in pixels.
    pub height: usize,
    /// Fraction of non-background pixels, in `[0, 1]`.
    pub fill_ratio: f32,
    /// Population variance of pixel intensities.
    pub variance: f32,
    /// Best confidence against the negative control; `None` when that
    /// correlation could not run (template larger than the control, or a
    /// degenerate buffer on either side).
    pub control_confidence: Option<f32>,
    /// Union of the triggered flags.
    pub flags: Vec<QualityFlag>,
}

impl QualityReport {
    /// True when any flag is set.
    pub fn is_problematic(&self) -> bool {
        !self.flags.is_empty()
    }
}

/// Analyzes one template against a negative-control image.
pub fn analyze(
    template: &Template,
    control: ImageView<'_, u8>,
    cfg: &QualityConfig,
) -> QualityReport {
    let view = template.view();
    let fill_ratio = fill_ratio(view, cfg.background_level);
    let variance = intensity_variance(view);

    let mut flags = Vec::new();
    if fill_ratio < cfg.min_fill_ratio {
        flags.push(QualityFlag::LowFill);
    }
    if variance < cfg.min_variance {
        flags.push(QualityFlag::LowVariance);
    }
    if view.width() > cfg.max_dimension || view.height() > cfg.max_dimension {
        flags.push(QualityFlag::Oversized);
    }

    // A control correlation that cannot run is absorbed: no confidence, no
    // TooGeneric verdict either way.
    let control_confidence = TemplatePlan::from_view(view)
        .and_then(|plan| correlate_plan(control, &plan, cfg.min_window_var))
        .ok()
        .map(|point| point.score);
    if let Some(confidence) = control_confidence {
        if confidence >= cfg.generic_threshold {
            flags.push(QualityFlag::TooGeneric);
        }
    }

    QualityReport {
        label: template.label(),
        width: view.width(),
        height: view.height(),
        fill_ratio,
        variance,
        control_confidence,
        flags,
    }
}

/// Lints every template in a library in one pass, ascending label order.
pub fn analyze_library(
    library: &TemplateLibrary,
    control: ImageView<'_, u8>,
    cfg: &QualityConfig,
) -> Vec<QualityReport> {
    let _guard = trace_span!("quality_lint", templates = library.all().len()).entered();
    library
        .all()
        .iter()
        .map(|template| analyze(template, control, cfg))
        .collect()
}

/// Fraction of pixels strictly above `background_level`.
fn fill_ratio(view: ImageView<'_, u8>, background_level: u8) -> f32 {
    let total = view.width() * view.height();
    let filled = (0..view.height())
        .filter_map(|y| view.row(y))
        .flatten()
        .filter(|&&v| v > background_level)
        .count();
    filled as f32 / total as f32
}

/// Population variance of pixel intensities.
fn intensity_variance(view: ImageView<'_, u8>) -> f32 {
    let total = (view.width() * view.height()) as f64;
    let mut sum = 0.0f64;
    let mut sum_sq = 0.0f64;
    for row in (0..view.height()).filter_map(|y| view.row(y)) {
        for &value in row {
            let v = value as f64;
            sum += v;
            sum_sq += v * v;
        }
    }
    let mean = sum / total;
    ((sum_sq / total) - mean * mean).max(0.0) as f32
}

#[cfg(test)]
mod tests {
    use super::{fill_ratio, intensity_variance};
    use crate::image::ImageView;

    #[test]
    fn fill_ratio_counts_above_background() {
        let data = [0u8, 10, 11, 200];
        let view = ImageView::from_slice(&data, 2, 2).unwrap();
        // 10 is background at level 10, 11 and 200 are fill.
        assert!((fill_ratio(view, 10) - 0.5).abs() < 1e-6);
        assert!((fill_ratio(view, 0) - 0.75).abs() < 1e-6);
    }

    #[test]
    fn variance_of_uniform_image_is_zero() {
        let data = [33u8; 16];
        let view = ImageView::from_slice(&data, 4, 4).unwrap();
        assert_eq!(intensity_variance(view), 0.0);
    }

    #[test]
    fn variance_matches_hand_computation() {
        let data = [0u8, 0, 10, 10];
        let view = ImageView::from_slice(&data, 2, 2).unwrap();
        assert!((intensity_variance(view) - 25.0).abs() < 1e-4);
    }
}

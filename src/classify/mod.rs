//! Classification of a target image against a template library.
//!
//! Every usable template is correlated against the target, results are ranked
//! descending by confidence (ties broken by ascending label, an arbitrary but
//! deterministic rule), and the accept/reject/ambiguity policy is applied on
//! top of the ranking. A failed pass is an `Err`, never a `Rejected` or
//! `Ambiguous` decision: "could not attempt" and "attempted, low confidence"
//! stay distinct outcomes.

use crate::correlate::{correlate_plan, TemplatePlan, DEFAULT_MIN_WINDOW_VAR};
use crate::image::ImageView;
use crate::library::{Template, TemplateLibrary};
use crate::trace::{trace_event, trace_span};
use crate::util::{WheelMatchError, WheelMatchResult};

#[cfg(feature = "serde")]
use serde::Serialize;

/// Knobs for the decision policy.
///
/// The default threshold and margin are empirically chosen values carried
/// over from field use; they are configuration, not derived constants.
#[derive(Clone, Copy, Debug)]
pub struct ClassifyConfig {
    /// Minimum best confidence for a decision other than `Rejected`.
    pub threshold: f32,
    /// Minimum gap between best and runner-up for an `Accepted` decision.
    pub min_margin: f32,
    /// Variance floor for target windows during correlation.
    pub min_window_var: f32,
    /// Correlate templates across the rayon pool (needs the `rayon` feature;
    /// ignored otherwise).
    pub parallel: bool,
}

impl Default for ClassifyConfig {
    fn default() -> Self {
        Self {
            threshold: 0.75,
            min_margin: 0.10,
            min_window_var: DEFAULT_MIN_WINDOW_VAR,
            parallel: false,
        }
    }
}

/// Outcome of a completed classification pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Status {
    /// Best confidence cleared the threshold with a sufficient margin.
    Accepted,
    /// Best confidence fell below the threshold.
    Rejected,
    /// Two or more templates scored too close to trust the winner.
    Ambiguous,
}

/// Score and location of one template against the target.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct MatchResult {
    /// Outcome label of the template.
    pub label: u8,
    /// Best ZNCC score over all placements.
    pub confidence: f32,
    /// X coordinate of the best placement.
    pub x: usize,
    /// Y coordinate of the best placement.
    pub y: usize,
}

/// A template that could not be correlated in this pass.
///
/// Skips are absorbed per template (the pass continues); they surface here so
/// reports can show reduced effective coverage.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct SkippedTemplate {
    /// Outcome label of the skipped template.
    pub label: u8,
    /// Why the correlation could not run.
    pub reason: String,
}

/// Ranked results plus the derived decision.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct ClassificationDecision {
    /// Derived accept/reject/ambiguous status.
    pub status: Status,
    /// Best-scoring result.
    pub best: MatchResult,
    /// Second-best result, absent with fewer than two usable templates.
    pub runner_up: Option<MatchResult>,
    /// `best - runner_up` confidence gap; `None` means no ambiguity is
    /// possible. Never negative: results are ranked before it is computed.
    pub margin: Option<f32>,
    /// Every usable result, descending confidence, label-ascending on ties.
    pub ranked: Vec<MatchResult>,
    /// Templates skipped by per-template failures.
    pub skipped: Vec<SkippedTemplate>,
}

fn score_template(
    target: ImageView<'_, u8>,
    template: &Template,
    cfg: &ClassifyConfig,
) -> Result<MatchResult, SkippedTemplate> {
    let outcome = TemplatePlan::from_view(template.view())
        .and_then(|plan| correlate_plan(target, &plan, cfg.min_window_var));
    match outcome {
        Ok(point) => Ok(MatchResult {
            label: template.label(),
            confidence: point.score,
            x: point.x,
            y: point.y,
        }),
        Err(err) => Err(SkippedTemplate {
            label: template.label(),
            reason: err.to_string(),
        }),
    }
}

/// Scores every template, in library order; `parallel` fans the templates
/// out over the rayon pool.
#[cfg(feature = "rayon")]
fn score_all(
    target: ImageView<'_, u8>,
    library: &TemplateLibrary,
    cfg: &ClassifyConfig,
) -> Vec<Result<MatchResult, SkippedTemplate>> {
    use rayon::prelude::*;
    if cfg.parallel {
        library
            .all()
            .par_iter()
            .map(|t| score_template(target, t, cfg))
            .collect()
    } else {
        library
            .all()
            .iter()
            .map(|t| score_template(target, t, cfg))
            .collect()
    }
}

#[cfg(not(feature = "rayon"))]
fn score_all(
    target: ImageView<'_, u8>,
    library: &TemplateLibrary,
    cfg: &ClassifyConfig,
) -> Vec<Result<MatchResult, SkippedTemplate>> {
    library
        .all()
        .iter()
        .map(|t| score_template(target, t, cfg))
        .collect()
}

/// Classifies a target image against every template in the library.
///
/// Pure function of its inputs; safe to call concurrently against a shared
/// library. Fails with `NoTemplatesAvailable` when not a single template
/// produced a usable result.
pub fn classify(
    target: ImageView<'_, u8>,
    library: &TemplateLibrary,
    cfg: &ClassifyConfig,
) -> WheelMatchResult<ClassificationDecision> {
    let _guard = trace_span!("classify", templates = library.all().len()).entered();

    let outcomes = score_all(target, library, cfg);

    let mut ranked = Vec::with_capacity(outcomes.len());
    let mut skipped = Vec::new();
    for outcome in outcomes {
        match outcome {
            Ok(result) => ranked.push(result),
            Err(skip) => {
                trace_event!("template_skipped", label = skip.label);
                skipped.push(skip);
            }
        }
    }

    if ranked.is_empty() {
        return Err(WheelMatchError::NoTemplatesAvailable);
    }

    ranked.sort_by(|a, b| {
        b.confidence
            .total_cmp(&a.confidence)
            .then_with(|| a.label.cmp(&b.label))
    });

    let best = ranked[0];
    let runner_up = ranked.get(1).copied();
    let margin = runner_up.map(|r| best.confidence - r.confidence);
    let status = if best.confidence < cfg.threshold {
        Status::Rejected
    } else {
        match margin {
            Some(m) if m < cfg.min_margin => Status::Ambiguous,
            _ => Status::Accepted,
        }
    };

    trace_event!(
        "classified",
        label = best.label,
        confidence = best.confidence,
        usable = ranked.len(),
    );

    Ok(ClassificationDecision {
        status,
        best,
        runner_up,
        margin,
        ranked,
        skipped,
    })
}

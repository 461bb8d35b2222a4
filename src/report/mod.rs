//! Diagnostic report assembly.
//!
//! Formatting and aggregation only: the structures here restate what the
//! classifier and quality analyzer already decided, in a shape suitable for
//! serialization and offline template-set maintenance. Nothing in this
//! module has decision authority.

use crate::classify::{ClassificationDecision, ClassifyConfig, MatchResult, SkippedTemplate, Status};
use crate::library::TemplateLibrary;
use crate::quality::QualityReport;

#[cfg(feature = "serde")]
use serde::Serialize;

/// One ranked entry of a classification pass.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct RankedMatch {
    /// 1-based rank, best first.
    pub rank: usize,
    /// Outcome label.
    pub label: u8,
    /// Best ZNCC confidence for this template.
    pub confidence: f32,
    /// X coordinate of the best placement.
    pub x: usize,
    /// Y coordinate of the best placement.
    pub y: usize,
    /// Whether the confidence cleared the acceptance threshold.
    pub meets_threshold: bool,
}

/// Full record of one classification pass.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct ClassificationReport {
    /// Derived decision status.
    pub status: Status,
    /// Winning label, only for `Accepted` decisions.
    pub winner: Option<u8>,
    /// Confidence of the best-ranked template.
    pub best_confidence: f32,
    /// Confidence gap to the runner-up, `None` with fewer than two results.
    pub margin: Option<f32>,
    /// Usable templates in the library.
    pub coverage_present: usize,
    /// Expected library size (37).
    pub coverage_expected: usize,
    /// Rank-ordered results with threshold markers.
    pub matches: Vec<RankedMatch>,
    /// Templates skipped by per-template failures in this pass.
    pub skipped: Vec<SkippedTemplate>,
}

/// Builds the classification record from a decision.
pub fn classification_report(
    decision: &ClassificationDecision,
    library: &TemplateLibrary,
    cfg: &ClassifyConfig,
) -> ClassificationReport {
    let (coverage_present, coverage_expected) = library.coverage();
    let matches = decision
        .ranked
        .iter()
        .enumerate()
        .map(|(idx, result)| ranked_entry(idx, result, cfg.threshold))
        .collect();
    ClassificationReport {
        status: decision.status,
        winner: (decision.status == Status::Accepted).then_some(decision.best.label),
        best_confidence: decision.best.confidence,
        margin: decision.margin,
        coverage_present,
        coverage_expected,
        matches,
        skipped: decision.skipped.clone(),
    }
}

fn ranked_entry(idx: usize, result: &MatchResult, threshold: f32) -> RankedMatch {
    RankedMatch {
        rank: idx + 1,
        label: result.label,
        confidence: result.confidence,
        x: result.x,
        y: result.y,
        meets_threshold: result.confidence >= threshold,
    }
}

/// Quality reports partitioned for offline inspection.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct QualitySummary {
    /// Templates analyzed.
    pub total: usize,
    /// Templates with at least one flag, with their numeric signals.
    pub problematic: Vec<QualityReport>,
    /// Templates with no flags.
    pub clean: Vec<QualityReport>,
}

/// Partitions quality reports into problematic and clean sets.
pub fn quality_summary(reports: Vec<QualityReport>) -> QualitySummary {
    let total = reports.len();
    let (problematic, clean) = reports
        .into_iter()
        .partition(|report| report.is_problematic());
    QualitySummary {
        total,
        problematic,
        clean,
    }
}

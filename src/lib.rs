//! WheelMatch recognizes which of 37 discrete wheel outcomes (labels 0..=36)
//! a captured image region shows.
//!
//! The crate matches a grayscale target against a fixed library of reference
//! templates using normalized cross-correlation (ZNCC), ranks the per-template
//! scores and applies an accept/reject/ambiguity policy. A separate quality
//! analyzer lints individual templates against static pixel statistics and a
//! negative-control image, flagging templates that are too generic to be
//! trusted. Optional parallelism is available via the `rayon` feature; image
//! decoding lives behind `image-io`.

pub mod classify;
pub mod correlate;
pub mod image;
pub mod library;
pub mod quality;
pub mod report;
pub mod util;

mod trace;

#[cfg(feature = "image-io")]
pub use image::io;

pub use classify::{
    classify, ClassificationDecision, ClassifyConfig, MatchResult, SkippedTemplate, Status,
};
pub use correlate::{correlate, correlate_plan, MatchPoint, TemplatePlan};
pub use image::{ImageView, OwnedImage};
pub use library::{Template, TemplateLibrary, UnreadableTemplate, LABEL_COUNT, MAX_LABEL};
pub use quality::{analyze, analyze_library, QualityConfig, QualityFlag, QualityReport};
pub use report::{
    classification_report, quality_summary, ClassificationReport, QualitySummary, RankedMatch,
};
pub use util::{WheelMatchError, WheelMatchResult};

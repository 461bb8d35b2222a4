//! Normalized cross-correlation between one target image and one template.
//!
//! The engine is a pure function of its inputs: no shared mutable state, so
//! distinct template/target pairs may be correlated concurrently. Scores come
//! straight from the ZNCC formula, so identical images yield 1.0 and
//! uncorrelated images land near zero or below; no extra clamping is applied.

mod plan;
mod scan;

#[cfg(feature = "rayon")]
pub mod rayon;

pub use plan::TemplatePlan;
pub use scan::{correlate, correlate_plan, MatchPoint, DEFAULT_MIN_WINDOW_VAR};

//! Template plan precomputation for ZNCC.

use crate::image::ImageView;
use crate::util::{WheelMatchError, WheelMatchResult};

/// Precomputed zero-mean buffer and statistics for one template.
///
/// Planning is done once per template per pass; the scan then only touches
/// target pixels. `var_t` is the sum of squared deviations from the mean, the
/// template half of the ZNCC denominator.
pub struct TemplatePlan {
    width: usize,
    height: usize,
    mean: f32,
    var_t: f32,
    t_prime: Vec<f32>,
}

impl TemplatePlan {
    /// Builds a plan from a template view.
    ///
    /// Fails with `DegenerateTemplate` when the template has (numerically)
    /// zero variance; ZNCC is undefined for a flat template.
    pub fn from_view(tpl: ImageView<'_, u8>) -> WheelMatchResult<Self> {
        let width = tpl.width();
        let height = tpl.height();
        let count = width
            .checked_mul(height)
            .ok_or(WheelMatchError::InvalidDimensions { width, height })?;

        let mut sum = 0.0f64;
        let mut sum_sq = 0.0f64;
        for y in 0..height {
            let row = tpl.row(y).ok_or(WheelMatchError::BufferTooSmall {
                needed: y * tpl.stride() + width,
                got: tpl.as_slice().len(),
            })?;
            for &value in row {
                let v = value as f64;
                sum += v;
                sum_sq += v * v;
            }
        }

        let count_f = count as f64;
        let mean_f64 = sum / count_f;
        let var_t_f64 = sum_sq - sum * sum / count_f;
        if var_t_f64 <= 1e-8 {
            return Err(WheelMatchError::DegenerateTemplate {
                reason: "zero variance",
            });
        }

        let mut t_prime = Vec::with_capacity(count);
        for y in 0..height {
            let row = tpl.row(y).ok_or(WheelMatchError::BufferTooSmall {
                needed: y * tpl.stride() + width,
                got: tpl.as_slice().len(),
            })?;
            for &value in row {
                t_prime.push(value as f32 - mean_f64 as f32);
            }
        }

        Ok(Self {
            width,
            height,
            mean: mean_f64 as f32,
            var_t: var_t_f64 as f32,
            t_prime,
        })
    }

    /// Returns the template width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the template height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the mean intensity of the template.
    pub fn mean(&self) -> f32 {
        self.mean
    }

    /// Returns the sum of squared deviations from the mean.
    pub fn var_t(&self) -> f32 {
        self.var_t
    }

    /// Returns the zero-mean template buffer in row-major order.
    pub fn t_prime(&self) -> &[f32] {
        &self.t_prime
    }
}

use ndarray::ArrayViewMut2;
use rand::Rng;
use rand_distr::{Distribution, Normal};

use super::{NoiseError, clip_range};

pub const DEFAULT_MEAN: f64 = 0.0;
pub const DEFAULT_VAR: f64 = 0.01;

/// Additive Gaussian noise: `x + N(mean, var)`, clipped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaussianNoise {
    pub mean: f64,
    pub var: f64,
}

impl Default for GaussianNoise {
    fn default() -> Self {
        Self {
            mean: DEFAULT_MEAN,
            var: DEFAULT_VAR,
        }
    }
}

impl GaussianNoise {
    pub fn apply_channel<R: Rng + ?Sized>(
        &self,
        mut channel: ArrayViewMut2<'_, f64>,
        rng: &mut R,
    ) -> Result<(), NoiseError> {
        let (low, high) = clip_range(channel.view());
        let dist = normal(self.mean, self.var)?;
        for pixel in channel.iter_mut() {
            *pixel = (*pixel + dist.sample(rng)).clamp(low, high);
        }
        Ok(())
    }
}

/// Normal distribution parameterised by variance rather than std dev.
pub(crate) fn normal(mean: f64, var: f64) -> Result<Normal<f64>, NoiseError> {
    Normal::new(mean, var.sqrt())
        .map_err(|e| NoiseError::Distribution(format!("mean={mean}, var={var}: {e}")))
}

use ndarray::ArrayViewMut2;
use rand::Rng;
use rand_distr::Distribution;

use super::gaussian::normal;
use super::{NoiseError, clip_range};

pub const DEFAULT_MEAN: f64 = 0.0;
pub const DEFAULT_VAR: f64 = 0.01;

/// Multiplicative noise: `x + x * N(mean, var)`, clipped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeckleNoise {
    pub mean: f64,
    pub var: f64,
}

impl Default for SpeckleNoise {
    fn default() -> Self {
        Self {
            mean: DEFAULT_MEAN,
            var: DEFAULT_VAR,
        }
    }
}

impl SpeckleNoise {
    pub fn apply_channel<R: Rng + ?Sized>(
        &self,
        mut channel: ArrayViewMut2<'_, f64>,
        rng: &mut R,
    ) -> Result<(), NoiseError> {
        let (low, high) = clip_range(channel.view());
        let dist = normal(self.mean, self.var)?;
        for pixel in channel.iter_mut() {
            let n = dist.sample(rng);
            *pixel = (*pixel + *pixel * n).clamp(low, high);
        }
        Ok(())
    }
}

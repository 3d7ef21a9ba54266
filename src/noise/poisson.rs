use ndarray::{ArrayView2, ArrayViewMut2};
use rand::Rng;
use rand_distr::{Distribution, Poisson};

use super::{NoiseError, clip_range};

/// Signal-dependent shot noise with no tunable parameters.
///
/// Samples are scaled by the number of distinct intensity levels in the
/// channel (rounded up to a power of two), replaced by a Poisson draw of
/// that count, and scaled back. Channels holding negative samples are
/// shifted into `[0, 1]` first and shifted back afterwards.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PoissonNoise;

impl PoissonNoise {
    pub fn apply_channel<R: Rng + ?Sized>(
        &self,
        mut channel: ArrayViewMut2<'_, f64>,
        rng: &mut R,
    ) -> Result<(), NoiseError> {
        if channel.is_empty() {
            return Ok(());
        }
        let (low, high) = clip_range(channel.view());
        let levels = intensity_levels(channel.view());

        let signed = low < 0.0;
        let old_max = channel.fold(f64::NEG_INFINITY, |acc, &v| acc.max(v));
        if signed {
            for pixel in channel.iter_mut() {
                *pixel = (*pixel + 1.0) / (old_max + 1.0);
            }
        }

        for pixel in channel.iter_mut() {
            let lambda = *pixel * levels;
            *pixel = if lambda == 0.0 {
                0.0
            } else {
                let dist = Poisson::new(lambda)
                    .map_err(|e| NoiseError::Distribution(format!("lambda={lambda}: {e}")))?;
                dist.sample(rng) / levels
            };
        }

        for pixel in channel.iter_mut() {
            if signed {
                *pixel = *pixel * (old_max + 1.0) - 1.0;
            }
            *pixel = pixel.clamp(low, high);
        }
        Ok(())
    }
}

/// Distinct sample count, rounded up to the next power of two.
fn intensity_levels(channel: ArrayView2<'_, f64>) -> f64 {
    let mut samples: Vec<f64> = channel.iter().copied().collect();
    samples.sort_by(f64::total_cmp);
    samples.dedup();
    let unique = samples.len().max(1) as f64;
    2f64.powf(unique.log2().ceil())
}

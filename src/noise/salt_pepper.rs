use ndarray::ArrayViewMut2;
use rand::Rng;
use rand::distr::Bernoulli;
use rand_distr::Distribution;

use super::{NoiseError, clip_range};

pub const DEFAULT_AMOUNT: f64 = 0.05;
pub const DEFAULT_SALT_VS_PEPPER: f64 = 0.5;

/// Impulse noise: a fraction `amount` of samples is replaced by salt (the
/// upper clip bound) or pepper (the lower one). `salt_vs_pepper` is the
/// share of salt among replaced samples.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SaltPepperNoise {
    pub amount: f64,
    pub salt_vs_pepper: f64,
}

impl Default for SaltPepperNoise {
    fn default() -> Self {
        Self {
            amount: DEFAULT_AMOUNT,
            salt_vs_pepper: DEFAULT_SALT_VS_PEPPER,
        }
    }
}

impl SaltPepperNoise {
    pub fn apply_channel<R: Rng + ?Sized>(
        &self,
        mut channel: ArrayViewMut2<'_, f64>,
        rng: &mut R,
    ) -> Result<(), NoiseError> {
        let (low, high) = clip_range(channel.view());
        let flip = bernoulli("amount", self.amount)?;
        let salt = bernoulli("salt_vs_pepper", self.salt_vs_pepper)?;
        for pixel in channel.iter_mut() {
            let flipped = flip.sample(rng);
            let salted = salt.sample(rng);
            *pixel = match (flipped, salted) {
                (true, true) => high,
                (true, false) => low,
                (false, _) => pixel.clamp(low, high),
            };
        }
        Ok(())
    }
}

fn bernoulli(name: &str, p: f64) -> Result<Bernoulli, NoiseError> {
    Bernoulli::new(p).map_err(|e| NoiseError::Distribution(format!("{name}={p}: {e}")))
}

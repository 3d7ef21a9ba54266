//! The noise configurations a dataset run uses when none are given.

use super::NoiseModel;

pub const GAUSSIAN_VARIANCES: &[f64] = &[0.001, 0.005, 0.01, 0.02, 0.04];
pub const SPECKLE_VARIANCES: &[f64] = &[0.02, 0.05, 0.1];
pub const SALT_PEPPER_AMOUNTS: &[f64] = &[0.02, 0.05, 0.1];

/// Zero-mean Gaussian and speckle sweeps, a salt-and-pepper sweep at an even
/// salt/pepper split, then Poisson.
pub fn default_models() -> Vec<NoiseModel> {
    let gaussian = GAUSSIAN_VARIANCES
        .iter()
        .map(|&var| NoiseModel::gaussian(0.0, var));
    let speckle = SPECKLE_VARIANCES
        .iter()
        .map(|&var| NoiseModel::speckle(0.0, var));
    let salt_pepper = SALT_PEPPER_AMOUNTS
        .iter()
        .map(|&amount| NoiseModel::salt_and_pepper(amount, 0.5));

    gaussian
        .chain(speckle)
        .chain(salt_pepper)
        .chain(std::iter::once(NoiseModel::poisson()))
        .collect()
}

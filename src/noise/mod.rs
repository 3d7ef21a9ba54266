//! Channel-wise noise models for degrading image datasets.
//!
//! A [`NoiseModel`] pairs a [`NoiseMode`] with the subset of the parameter
//! schema that mode accepts. It is validated once at construction and then
//! applied to any number of images. Every call to [`NoiseModel::apply`] takes
//! an explicit random source, so a seeded generator reproduces its output.

pub mod gaussian;
pub mod poisson;
pub mod presets;
pub mod salt_pepper;
pub mod speckle;

use ndarray::{Array3, ArrayBase, ArrayView2, ArrayViewMut2, Axis, Data, Ix3};
use rand::Rng;
use std::fmt;
use std::str::FromStr;

use gaussian::GaussianNoise;
use poisson::PoissonNoise;
use salt_pepper::SaltPepperNoise;
use speckle::SpeckleNoise;

/// Float image with axes `(row, column, channel)` and samples in `[0, 1]`.
pub type Image = Array3<f64>;

/// Replaces the decimal point of parameter values in canonical names.
pub const DECIMAL_MARKER: &str = "p";

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum NoiseError {
    #[error("Invalid mode: {0}")]
    InvalidMode(String),
    #[error("Parameter '{key}' not valid for mode '{mode}'")]
    InvalidParameter { key: String, mode: NoiseMode },
    #[error("Invalid noise spec: {0}")]
    InvalidSpec(String),
    #[error("Noise distribution error: {0}")]
    Distribution(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoiseMode {
    Gaussian,
    Speckle,
    Poisson,
    SaltAndPepper,
}

impl NoiseMode {
    pub const ALL: &[NoiseMode] = &[
        NoiseMode::Gaussian,
        NoiseMode::Speckle,
        NoiseMode::Poisson,
        NoiseMode::SaltAndPepper,
    ];

    pub fn name(self) -> &'static str {
        match self {
            NoiseMode::Gaussian => "gaussian",
            NoiseMode::Speckle => "speckle",
            NoiseMode::Poisson => "poisson",
            NoiseMode::SaltAndPepper => "s&p",
        }
    }

    /// Parameters this mode accepts, in schema order.
    pub fn allowed_params(self) -> &'static [NoiseParam] {
        match self {
            NoiseMode::Gaussian | NoiseMode::Speckle => &[NoiseParam::Mean, NoiseParam::Var],
            NoiseMode::Poisson => &[],
            NoiseMode::SaltAndPepper => &[NoiseParam::Amount, NoiseParam::SaltVsPepper],
        }
    }

    pub fn allows(self, param: NoiseParam) -> bool {
        self.allowed_params().contains(&param)
    }
}

impl fmt::Display for NoiseMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for NoiseMode {
    type Err = NoiseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NoiseMode::ALL
            .iter()
            .copied()
            .find(|mode| mode.name() == s)
            .ok_or_else(|| NoiseError::InvalidMode(s.to_owned()))
    }
}

/// The global parameter schema. Every value is an `f64`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoiseParam {
    Mean,
    Var,
    Amount,
    SaltVsPepper,
}

impl NoiseParam {
    pub const ALL: &[NoiseParam] = &[
        NoiseParam::Mean,
        NoiseParam::Var,
        NoiseParam::Amount,
        NoiseParam::SaltVsPepper,
    ];

    pub fn name(self) -> &'static str {
        match self {
            NoiseParam::Mean => "mean",
            NoiseParam::Var => "var",
            NoiseParam::Amount => "amount",
            NoiseParam::SaltVsPepper => "salt_vs_pepper",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        NoiseParam::ALL.iter().copied().find(|p| p.name() == name)
    }
}

/// Per-mode parameter record with defaults filled in.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Kernel {
    Gaussian(GaussianNoise),
    Speckle(SpeckleNoise),
    Poisson(PoissonNoise),
    SaltAndPepper(SaltPepperNoise),
}

impl Kernel {
    fn resolve(mode: NoiseMode, params: &[(NoiseParam, Option<f64>)]) -> Self {
        let get = |key: NoiseParam| {
            params
                .iter()
                .find(|(param, _)| *param == key)
                .and_then(|(_, value)| *value)
        };
        match mode {
            NoiseMode::Gaussian => Kernel::Gaussian(GaussianNoise {
                mean: get(NoiseParam::Mean).unwrap_or(gaussian::DEFAULT_MEAN),
                var: get(NoiseParam::Var).unwrap_or(gaussian::DEFAULT_VAR),
            }),
            NoiseMode::Speckle => Kernel::Speckle(SpeckleNoise {
                mean: get(NoiseParam::Mean).unwrap_or(speckle::DEFAULT_MEAN),
                var: get(NoiseParam::Var).unwrap_or(speckle::DEFAULT_VAR),
            }),
            NoiseMode::Poisson => Kernel::Poisson(PoissonNoise),
            NoiseMode::SaltAndPepper => Kernel::SaltAndPepper(SaltPepperNoise {
                amount: get(NoiseParam::Amount).unwrap_or(salt_pepper::DEFAULT_AMOUNT),
                salt_vs_pepper: get(NoiseParam::SaltVsPepper)
                    .unwrap_or(salt_pepper::DEFAULT_SALT_VS_PEPPER),
            }),
        }
    }

    fn apply_channel<R: Rng + ?Sized>(
        &self,
        channel: ArrayViewMut2<'_, f64>,
        rng: &mut R,
    ) -> Result<(), NoiseError> {
        match self {
            Kernel::Gaussian(noise) => noise.apply_channel(channel, rng),
            Kernel::Speckle(noise) => noise.apply_channel(channel, rng),
            Kernel::Poisson(noise) => noise.apply_channel(channel, rng),
            Kernel::SaltAndPepper(noise) => noise.apply_channel(channel, rng),
        }
    }
}

/// A validated, immutable noise configuration.
///
/// Parameters keep the order they were supplied in; that order is what
/// [`canonical_name`](Self::canonical_name) enumerates. A parameter given
/// as `None` falls back to the mode's default and is left out of the name.
#[derive(Debug, Clone, PartialEq)]
pub struct NoiseModel {
    mode: NoiseMode,
    params: Vec<(NoiseParam, Option<f64>)>,
    kernel: Kernel,
}

impl NoiseModel {
    /// Build a model from a mode string and string-keyed parameters.
    ///
    /// ```
    /// use noisy_dataset::NoiseModel;
    ///
    /// let model = NoiseModel::new("gaussian", [("mean", 0.0), ("var", 0.001)]).unwrap();
    /// assert_eq!(model.canonical_name(), "gaussian_mean0_var0p001");
    /// ```
    ///
    /// # Errors
    ///
    /// [`NoiseError::InvalidMode`] for a mode outside `gaussian`, `speckle`,
    /// `poisson`, `s&p`; [`NoiseError::InvalidParameter`] for any key the
    /// mode does not accept.
    pub fn new<I, K, V>(mode: &str, params: I) -> Result<Self, NoiseError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Option<f64>>,
    {
        let mode: NoiseMode = mode.parse()?;
        let params = params
            .into_iter()
            .map(|(key, value)| {
                let key = key.as_ref();
                NoiseParam::from_name(key)
                    .filter(|param| mode.allows(*param))
                    .map(|param| (param, value.into()))
                    .ok_or_else(|| NoiseError::InvalidParameter {
                        key: key.to_owned(),
                        mode,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::with_params(mode, params)
    }

    /// Build a model from typed parameters.
    ///
    /// A parameter supplied twice keeps its first position and its last value.
    pub fn with_params<I>(mode: NoiseMode, params: I) -> Result<Self, NoiseError>
    where
        I: IntoIterator<Item = (NoiseParam, Option<f64>)>,
    {
        let mut ordered: Vec<(NoiseParam, Option<f64>)> = Vec::new();
        for (param, value) in params {
            if !mode.allows(param) {
                return Err(NoiseError::InvalidParameter {
                    key: param.name().to_owned(),
                    mode,
                });
            }
            match ordered.iter_mut().find(|(existing, _)| *existing == param) {
                Some(slot) => slot.1 = value,
                None => ordered.push((param, value)),
            }
        }
        Ok(Self::build(mode, ordered))
    }

    pub fn gaussian(mean: f64, var: f64) -> Self {
        Self::build(
            NoiseMode::Gaussian,
            vec![(NoiseParam::Mean, Some(mean)), (NoiseParam::Var, Some(var))],
        )
    }

    pub fn speckle(mean: f64, var: f64) -> Self {
        Self::build(
            NoiseMode::Speckle,
            vec![(NoiseParam::Mean, Some(mean)), (NoiseParam::Var, Some(var))],
        )
    }

    pub fn poisson() -> Self {
        Self::build(NoiseMode::Poisson, Vec::new())
    }

    pub fn salt_and_pepper(amount: f64, salt_vs_pepper: f64) -> Self {
        Self::build(
            NoiseMode::SaltAndPepper,
            vec![
                (NoiseParam::Amount, Some(amount)),
                (NoiseParam::SaltVsPepper, Some(salt_vs_pepper)),
            ],
        )
    }

    fn build(mode: NoiseMode, params: Vec<(NoiseParam, Option<f64>)>) -> Self {
        let kernel = Kernel::resolve(mode, &params);
        Self {
            mode,
            params,
            kernel,
        }
    }

    pub fn mode(&self) -> NoiseMode {
        self.mode
    }

    /// Parameters as supplied, in insertion order.
    pub fn params(&self) -> &[(NoiseParam, Option<f64>)] {
        &self.params
    }

    /// The value actually used for `param`, default included.
    pub fn value(&self, param: NoiseParam) -> Option<f64> {
        match (self.kernel, param) {
            (Kernel::Gaussian(n), NoiseParam::Mean) => Some(n.mean),
            (Kernel::Gaussian(n), NoiseParam::Var) => Some(n.var),
            (Kernel::Speckle(n), NoiseParam::Mean) => Some(n.mean),
            (Kernel::Speckle(n), NoiseParam::Var) => Some(n.var),
            (Kernel::SaltAndPepper(n), NoiseParam::Amount) => Some(n.amount),
            (Kernel::SaltAndPepper(n), NoiseParam::SaltVsPepper) => Some(n.salt_vs_pepper),
            _ => None,
        }
    }

    /// Apply the noise to a copy of `image`, one channel at a time.
    ///
    /// Each channel draws its own samples from `rng`; channels are never
    /// correlated. The input is left untouched.
    ///
    /// # Errors
    ///
    /// [`NoiseError::Distribution`] when the parameters are outside what the
    /// underlying distribution accepts (negative variance, `amount > 1`, ...).
    pub fn apply<S, R>(&self, image: &ArrayBase<S, Ix3>, rng: &mut R) -> Result<Image, NoiseError>
    where
        S: Data<Elem = f64>,
        R: Rng + ?Sized,
    {
        let mut noisy = image.to_owned();
        for channel in noisy.axis_iter_mut(Axis(2)) {
            self.kernel.apply_channel(channel, rng)?;
        }
        Ok(noisy)
    }

    /// Filesystem-safe name for this configuration, e.g.
    /// `gaussian_mean0_var0p001`, or just the mode when no parameter is set.
    pub fn canonical_name(&self) -> String {
        let parts: Vec<String> = self
            .params
            .iter()
            .filter_map(|(param, value)| {
                value.map(|v| format!("{}{}", param.name(), format_value(v)))
            })
            .collect();
        if parts.is_empty() {
            self.mode.name().to_owned()
        } else {
            format!("{}_{}", self.mode.name(), parts.join("_"))
        }
    }
}

fn format_value(value: f64) -> String {
    value.to_string().replace('.', DECIMAL_MARKER)
}

/// Formats as the `mode:key=value,...` syntax accepted by [`FromStr`].
impl fmt::Display for NoiseModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mode.name())?;
        let mut sep = ':';
        for (param, value) in &self.params {
            if let Some(value) = value {
                write!(f, "{sep}{}={value}", param.name())?;
                sep = ',';
            }
        }
        Ok(())
    }
}

/// Parses `mode` or `mode:key=value,key=value`.
impl FromStr for NoiseModel {
    type Err = NoiseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (mode, rest) = match s.trim().split_once(':') {
            Some((mode, rest)) => (mode, rest.trim()),
            None => (s.trim(), ""),
        };
        let mut params = Vec::new();
        if !rest.is_empty() {
            for pair in rest.split(',') {
                let (key, value) = pair.split_once('=').ok_or_else(|| {
                    NoiseError::InvalidSpec(format!("expected key=value, got '{pair}'"))
                })?;
                let value: f64 = value.trim().parse().map_err(|_| {
                    NoiseError::InvalidSpec(format!(
                        "value '{}' for '{}' is not a number",
                        value.trim(),
                        key.trim()
                    ))
                })?;
                params.push((key.trim().to_owned(), value));
            }
        }
        Self::new(mode.trim(), params)
    }
}

/// Clip bounds for a channel: `[-1, 1]` if it holds negative samples,
/// `[0, 1]` otherwise.
pub(crate) fn clip_range(channel: ArrayView2<'_, f64>) -> (f64, f64) {
    if channel.iter().any(|&v| v < 0.0) {
        (-1.0, 1.0)
    } else {
        (0.0, 1.0)
    }
}

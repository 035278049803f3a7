//! One period of normalized amplitude samples

use crate::codec::SAMPLE_COUNT;
use crate::{ArbError, Result};

/// Exactly [`SAMPLE_COUNT`] amplitudes, nominally in [-1.0, 1.0]
///
/// Index `i` sits at `i / (SAMPLE_COUNT - 1)` of the waveform period.
#[derive(Debug, Clone, PartialEq)]
pub struct Waveform {
    samples: Vec<f64>,
}

impl Waveform {
    /// Wrap a sample vector
    ///
    /// # Errors
    ///
    /// Returns `SizeMismatch` unless `samples` holds exactly [`SAMPLE_COUNT`] values
    pub fn new(samples: Vec<f64>) -> Result<Self> {
        if samples.len() != SAMPLE_COUNT {
            return Err(ArbError::SizeMismatch {
                what: "sample count",
                expected: SAMPLE_COUNT,
                actual: samples.len(),
            });
        }
        Ok(Self { samples })
    }

    /// Build a waveform by evaluating `f` at each period fraction in [0.0, 1.0]
    pub fn from_fn(mut f: impl FnMut(f64) -> f64) -> Self {
        let samples = (0..SAMPLE_COUNT).map(|i| f(Self::phase(i))).collect();
        Self { samples }
    }

    /// Flat line at 0.0
    pub fn silence() -> Self {
        Self {
            samples: vec![0.0; SAMPLE_COUNT],
        }
    }

    /// Fraction of the period at sample `index`
    pub fn phase(index: usize) -> f64 {
        index as f64 / (SAMPLE_COUNT - 1) as f64
    }

    /// Sample slice
    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    /// Unwrap into the sample vector
    pub fn into_samples(self) -> Vec<f64> {
        self.samples
    }

    /// Smallest and largest amplitude
    pub fn bounds(&self) -> (f64, f64) {
        self.samples
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            })
    }
}

impl TryFrom<Vec<f64>> for Waveform {
    type Error = ArbError;

    fn try_from(samples: Vec<f64>) -> Result<Self> {
        Self::new(samples)
    }
}

impl AsRef<[f64]> for Waveform {
    fn as_ref(&self) -> &[f64] {
        &self.samples
    }
}

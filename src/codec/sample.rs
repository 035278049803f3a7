//! Amplitude/code mapping and the sample block

use bytes::{Buf, BufMut};
use tracing::warn;

use super::format::{BLOCK_SIZE, CODE_MAX, SAMPLE_COUNT};
use crate::config::RangePolicy;
use crate::{ArbError, Result};

/// Codes per unit of amplitude: (N - 1) / 2
pub const SCALE: f64 = (SAMPLE_COUNT - 1) as f64 / 2.0;

/// Map an amplitude onto the code axis without rounding
#[must_use]
pub fn scale(amplitude: f64) -> f64 {
    (amplitude + 1.0) * SCALE
}

/// Round a scaled value half-to-even and narrow it to an i16
fn round_code(scaled: f64) -> Option<i16> {
    let code = scaled.round_ties_even();
    if code.is_finite() && code >= f64::from(i16::MIN) && code <= f64::from(i16::MAX) {
        Some(code as i16)
    } else {
        None
    }
}

/// Forward quantization
///
/// Returns `None` when the code does not fit in an i16 (including NaN and
/// infinite input). Amplitudes in [-1.0, 1.0] always land in [0, 4095].
#[must_use]
pub fn quantize(amplitude: f64) -> Option<i16> {
    round_code(scale(amplitude))
}

/// Forward quantization under a range policy
#[must_use]
pub fn quantize_with(amplitude: f64, policy: RangePolicy) -> Option<i16> {
    match policy {
        RangePolicy::Strict if !(-1.0..=1.0).contains(&amplitude) => None,
        _ => quantize(amplitude),
    }
}

/// Inverse quantization
#[must_use]
pub fn dequantize(code: i16) -> f64 {
    f64::from(code) / SCALE - 1.0
}

/// Whether a code lies on the 12-bit DAC lattice
#[must_use]
pub fn is_dac_code(code: i16) -> bool {
    (0..=CODE_MAX).contains(&code)
}

/// Quantize a full period of amplitudes
///
/// # Errors
///
/// Returns `SizeMismatch` unless there are exactly [`SAMPLE_COUNT`] values,
/// and `ValueOutOfRange` for the first amplitude the policy refuses
pub fn quantize_all(samples: &[f64], policy: RangePolicy) -> Result<Vec<i16>> {
    if samples.len() != SAMPLE_COUNT {
        return Err(ArbError::SizeMismatch {
            what: "sample count",
            expected: SAMPLE_COUNT,
            actual: samples.len(),
        });
    }

    let codes = samples
        .iter()
        .enumerate()
        .map(|(index, &value)| {
            quantize_with(value, policy).ok_or(ArbError::ValueOutOfRange { index, value })
        })
        .collect::<Result<Vec<_>>>()?;

    let off_lattice = codes.iter().filter(|&&c| !is_dac_code(c)).count();
    if off_lattice > 0 {
        warn!("{off_lattice} codes fall outside the 12-bit range 0..={CODE_MAX}");
    }

    Ok(codes)
}

/// Encode a full period of amplitudes as little-endian i16 codes
///
/// Nothing is written to `out` unless every sample encodes.
///
/// # Errors
///
/// Same as [`quantize_all`]
pub fn encode_samples(
    samples: &[f64],
    policy: RangePolicy,
    out: &mut impl BufMut,
) -> Result<()> {
    let codes = quantize_all(samples, policy)?;
    for code in codes {
        out.put_i16_le(code);
    }
    Ok(())
}

/// Read the i16 codes of a sample block
///
/// # Errors
///
/// Returns `SizeMismatch` unless `block` is exactly [`BLOCK_SIZE`] bytes
pub fn decode_codes(mut block: &[u8]) -> Result<Vec<i16>> {
    if block.len() != BLOCK_SIZE {
        return Err(ArbError::SizeMismatch {
            what: "sample block bytes",
            expected: BLOCK_SIZE,
            actual: block.len(),
        });
    }

    let mut codes = Vec::with_capacity(SAMPLE_COUNT);
    while block.has_remaining() {
        codes.push(block.get_i16_le());
    }
    Ok(codes)
}

/// Decode a sample block into amplitudes
///
/// # Errors
///
/// Same as [`decode_codes`]
pub fn decode_samples(block: &[u8]) -> Result<Vec<f64>> {
    Ok(decode_codes(block)?.into_iter().map(dequantize).collect())
}

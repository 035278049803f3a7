//! Whole-file ARB framing

use bytes::{BufMut, Bytes, BytesMut};
use tracing::debug;

use super::format::{read_header, write_header, ArbHeader, FILE_SIZE, HEADER_SIZE, MAGIC};
use super::sample::{decode_codes, dequantize, encode_samples, is_dac_code};
use crate::config::CodecConfig;
use crate::error::FormatError;
use crate::waveform::Waveform;
use crate::{ArbError, Result};

/// Decoded ARB file with its raw header and codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArbFile {
    /// Parsed header
    pub header: ArbHeader,
    /// Codes in sample order
    pub codes: Vec<i16>,
}

impl ArbFile {
    /// Parse a complete file image
    ///
    /// # Errors
    ///
    /// Returns `BadMagic` unless the image starts with [`MAGIC`], then
    /// `SizeMismatch` if it is not [`FILE_SIZE`] bytes long, or a header
    /// error from [`read_header`]
    pub fn parse(bytes: &[u8], config: &CodecConfig) -> Result<Self> {
        // Foreign files are reported as such whatever their length
        if bytes.get(..MAGIC.len()) != Some(&MAGIC[..]) {
            let mut found = [0u8; 3];
            let n = bytes.len().min(found.len());
            found[..n].copy_from_slice(&bytes[..n]);
            return Err(FormatError::BadMagic { found }.into());
        }

        let Some((header, block)) = bytes.split_first_chunk::<HEADER_SIZE>() else {
            return Err(ArbError::SizeMismatch {
                what: "ARB file bytes",
                expected: FILE_SIZE,
                actual: bytes.len(),
            });
        };

        let header = read_header(header, config.header_check)?;

        if bytes.len() != FILE_SIZE {
            return Err(ArbError::SizeMismatch {
                what: "ARB file bytes",
                expected: FILE_SIZE,
                actual: bytes.len(),
            });
        }

        let codes = decode_codes(block)?;
        debug!(
            "Parsed ARB header {} with {} codes",
            hex::encode(bytemuck::bytes_of(&header)),
            codes.len()
        );

        Ok(Self { header, codes })
    }

    /// Smallest and largest code
    pub fn code_range(&self) -> (i16, i16) {
        self.codes
            .iter()
            .fold((i16::MAX, i16::MIN), |(lo, hi), &c| (lo.min(c), hi.max(c)))
    }

    /// Number of codes outside the 12-bit DAC range
    pub fn off_lattice(&self) -> usize {
        self.codes.iter().filter(|&&c| !is_dac_code(c)).count()
    }

    /// Dequantize into a waveform
    ///
    /// # Errors
    ///
    /// Returns `SizeMismatch` if `codes` was edited to the wrong length
    pub fn waveform(&self) -> Result<Waveform> {
        Waveform::new(self.codes.iter().copied().map(dequantize).collect())
    }
}

/// Encode a waveform as a complete ARB file image
///
/// # Errors
///
/// Returns `ValueOutOfRange` if a sample is refused by the range policy
pub fn encode_arb(waveform: &Waveform, config: &CodecConfig) -> Result<Bytes> {
    let mut out = BytesMut::with_capacity(FILE_SIZE);
    out.put_slice(&write_header());
    encode_samples(waveform.samples(), config.range_policy, &mut out)?;
    debug_assert_eq!(out.len(), FILE_SIZE);
    Ok(out.freeze())
}

/// Decode a complete ARB file image into a waveform
///
/// # Errors
///
/// Returns `BadMagic` for a foreign file and `SizeMismatch` for a file
/// that is not exactly [`FILE_SIZE`] bytes
pub fn decode_arb(bytes: &[u8], config: &CodecConfig) -> Result<Waveform> {
    ArbFile::parse(bytes, config)?.waveform()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{BLOCK_SIZE, SAMPLE_COUNT};
    use crate::config::{HeaderCheck, RangePolicy};

    fn padded(head: &[f64]) -> Waveform {
        let mut samples = head.to_vec();
        samples.resize(SAMPLE_COUNT, 0.0);
        Waveform::new(samples).unwrap()
    }

    #[test]
    fn test_end_to_end() {
        let config = CodecConfig::default();
        let original = padded(&[-1.0, 0.0, 1.0]);

        let bytes = encode_arb(&original, &config).unwrap();
        assert_eq!(bytes.len(), FILE_SIZE);
        assert_eq!(&bytes[..3], b"arb");

        let decoded = decode_arb(&bytes, &config).unwrap();
        for (i, (a, b)) in original.samples().iter().zip(decoded.samples()).enumerate() {
            assert!((a - b).abs() <= 1.0 / 2047.5, "sample {i}: {a} vs {b}");
        }
        assert_eq!(decoded.samples()[0], -1.0);
        assert_eq!(decoded.samples()[2], 1.0);
    }

    #[test]
    fn test_reencode_is_stable() {
        let config = CodecConfig::default();
        let sine = Waveform::from_fn(|t| (t * std::f64::consts::TAU).sin());

        let first = encode_arb(&sine, &config).unwrap();
        let second = encode_arb(&decode_arb(&first, &config).unwrap(), &config).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_wrong_file_size() {
        let config = CodecConfig::default();
        let bytes = encode_arb(&Waveform::silence(), &config).unwrap();

        for len in [HEADER_SIZE, FILE_SIZE - 1] {
            let err = decode_arb(&bytes[..len], &config).unwrap_err();
            assert!(matches!(err, ArbError::SizeMismatch { actual, .. } if actual == len));
        }

        let mut longer = bytes.to_vec();
        longer.extend_from_slice(&[0, 0]);
        assert!(matches!(
            decode_arb(&longer, &config),
            Err(ArbError::SizeMismatch { actual, .. }) if actual == FILE_SIZE + 2
        ));

        assert!(matches!(
            decode_arb(b"arb", &config),
            Err(ArbError::SizeMismatch { .. })
        ));
    }

    #[test]
    fn test_short_foreign_file_is_bad_magic() {
        let config = CodecConfig::default();

        assert!(matches!(
            decode_arb(b"RIFF\x00", &config),
            Err(ArbError::Format(FormatError::BadMagic { found })) if &found == b"RIF"
        ));
        assert!(matches!(
            decode_arb(b"ar", &config),
            Err(ArbError::Format(FormatError::BadMagic { found })) if found == [b'a', b'r', 0]
        ));
        assert!(matches!(
            decode_arb(b"", &config),
            Err(ArbError::Format(FormatError::BadMagic { .. }))
        ));
    }

    #[test]
    fn test_bad_magic_regardless_of_body() {
        let config = CodecConfig::default();
        for fill in [0x00u8, 0x7f, 0xff] {
            let mut bytes = vec![fill; FILE_SIZE];
            bytes[..3].copy_from_slice(b"ARB");
            assert!(matches!(
                decode_arb(&bytes, &config),
                Err(ArbError::Format(FormatError::BadMagic { .. }))
            ));
        }
    }

    #[test]
    fn test_strict_header_check() {
        let mut bytes = encode_arb(&Waveform::silence(), &CodecConfig::default())
            .unwrap()
            .to_vec();
        bytes[4] = 0x01;

        let lenient = CodecConfig::default();
        assert!(decode_arb(&bytes, &lenient).is_ok());

        let strict = CodecConfig {
            header_check: HeaderCheck::Strict,
            ..CodecConfig::default()
        };
        assert!(matches!(
            decode_arb(&bytes, &strict),
            Err(ArbError::Format(FormatError::UnexpectedReserved { .. }))
        ));
    }

    #[test]
    fn test_range_policy() {
        let loud = padded(&[0.5, 1.5]);

        let strict = CodecConfig::default();
        assert!(matches!(
            encode_arb(&loud, &strict),
            Err(ArbError::ValueOutOfRange { index: 1, .. })
        ));

        let permissive = CodecConfig {
            range_policy: RangePolicy::Permissive,
            ..CodecConfig::default()
        };
        let bytes = encode_arb(&loud, &permissive).unwrap();
        let file = ArbFile::parse(&bytes, &permissive).unwrap();
        assert_eq!(file.codes[1], 5119);
        assert_eq!(file.off_lattice(), 1);
        assert_eq!(file.code_range(), (2048, 5119));
    }

    #[test]
    fn test_parse_exposes_codes() {
        let config = CodecConfig::default();
        let ramp = Waveform::from_fn(|t| 2.0 * t - 1.0);
        let bytes = encode_arb(&ramp, &config).unwrap();

        let file = ArbFile::parse(&bytes, &config).unwrap();
        assert_eq!(file.header, ArbHeader::default());
        assert_eq!(file.codes.len(), BLOCK_SIZE / 2);
        assert_eq!(file.code_range(), (0, 4095));
        assert_eq!(file.off_lattice(), 0);
        assert!(file.codes.windows(2).all(|w| w[0] <= w[1]));
    }
}

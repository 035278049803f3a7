//! Tabular text format: one amplitude per line
//!
//! Records are lines split on commas and must hold a single field. A field
//! may be wrapped in one pair of double quotes, as CSV writers emit it.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use crate::codec::SAMPLE_COUNT;
use crate::waveform::Waveform;
use crate::{ArbError, Result};

/// Field separator accepted inside a record
const DELIMITER: char = ',';

/// Parse table text into a waveform
///
/// Every line must carry exactly one floating-point field. Blank lines count
/// as records with no fields and are rejected.
///
/// # Errors
///
/// Returns `Parse` for a malformed record and `SizeMismatch` unless there
/// are exactly [`SAMPLE_COUNT`] records
pub fn parse_table(text: &str) -> Result<Waveform> {
    let mut samples = Vec::with_capacity(SAMPLE_COUNT);

    for (i, line) in text.lines().enumerate() {
        samples.push(parse_record(i + 1, line)?);
    }

    if samples.len() != SAMPLE_COUNT {
        return Err(ArbError::SizeMismatch {
            what: "table rows",
            expected: SAMPLE_COUNT,
            actual: samples.len(),
        });
    }

    Waveform::new(samples)
}

fn parse_record(line: usize, record: &str) -> Result<f64> {
    let mut fields = record.split(DELIMITER);
    let field = match (fields.next(), fields.next()) {
        (Some(field), None) if !field.trim().is_empty() => field.trim(),
        _ => {
            return Err(ArbError::Parse {
                line,
                message: "expected exactly one value per row".to_string(),
            })
        }
    };

    let field = field
        .strip_prefix('"')
        .and_then(|f| f.strip_suffix('"'))
        .map_or(field, str::trim);

    field.parse().map_err(|_| ArbError::Parse {
        line,
        message: format!("invalid value '{field}'"),
    })
}

/// Format a waveform as table text with `precision` fractional digits
#[must_use]
pub fn format_table(waveform: &Waveform, precision: usize) -> String {
    let mut out = String::with_capacity(waveform.samples().len() * (precision + 4));
    for value in waveform.samples() {
        // Writing to a String cannot fail
        let _ = writeln!(out, "{value:.precision$}");
    }
    out
}

/// Read a table file
///
/// # Errors
///
/// Returns error if the file cannot be read or parsed
pub fn read_table(path: &Path) -> Result<Waveform> {
    let text = fs::read_to_string(path)?;
    parse_table(&text)
}

/// Write a table file
///
/// # Errors
///
/// Returns error if the file cannot be written
pub fn write_table(path: &Path, waveform: &Waveform, precision: usize) -> Result<()> {
    fs::write(path, format_table(waveform, precision))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn lines_of(value: &str) -> String {
        format!("{value}\n").repeat(SAMPLE_COUNT)
    }

    #[test]
    fn test_round_trip_within_precision() {
        let sine = Waveform::from_fn(|t| (t * std::f64::consts::TAU).sin() * 0.9);
        let text = format_table(&sine, 8);

        let parsed = parse_table(&text).unwrap();
        for (a, b) in sine.samples().iter().zip(parsed.samples()) {
            assert!((a - b).abs() <= 5e-9, "{a} vs {b}");
        }
    }

    #[test]
    fn test_eight_digit_format() {
        let mut samples = vec![0.0; SAMPLE_COUNT];
        samples[0] = -1.0;
        samples[1] = 1.0 / 3.0;
        samples[2] = 0.000_244_2;
        let text = format_table(&Waveform::new(samples).unwrap(), 8);

        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("-1.00000000"));
        assert_eq!(lines.next(), Some("0.33333333"));
        assert_eq!(lines.next(), Some("0.00024420"));
        assert_eq!(lines.next(), Some("0.00000000"));
        assert_eq!(text.lines().count(), SAMPLE_COUNT);
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn test_accepts_crlf_and_whitespace() {
        let text = " 0.5 \r\n".repeat(SAMPLE_COUNT);
        let parsed = parse_table(&text).unwrap();
        assert!(parsed.samples().iter().all(|&v| v == 0.5));
    }

    #[test]
    fn test_accepts_scientific_notation() {
        let parsed = parse_table(&lines_of("-2.5e-1")).unwrap();
        assert_eq!(parsed.samples()[0], -0.25);
    }

    #[test]
    fn test_accepts_quoted_field() {
        let text = format!("\"0.5\"\n\" -0.25 \"\n{}", "0.0\n".repeat(SAMPLE_COUNT - 2));
        let parsed = parse_table(&text).unwrap();
        assert_eq!(parsed.samples()[0], 0.5);
        assert_eq!(parsed.samples()[1], -0.25);
    }

    #[test]
    fn test_unbalanced_quote() {
        let text = format!("\"0.5\n{}", lines_of("0.0"));
        assert!(matches!(
            parse_table(&text),
            Err(ArbError::Parse { line: 1, .. })
        ));
    }

    #[test]
    fn test_row_count_mismatch() {
        let text = "0.0\n".repeat(SAMPLE_COUNT - 1);
        let err = parse_table(&text).unwrap_err();
        assert!(matches!(
            err,
            ArbError::SizeMismatch {
                expected: SAMPLE_COUNT,
                actual: 4095,
                ..
            }
        ));

        let text = "0.0\n".repeat(SAMPLE_COUNT + 1);
        assert!(matches!(
            parse_table(&text),
            Err(ArbError::SizeMismatch { actual: 4097, .. })
        ));
    }

    #[test]
    fn test_invalid_value() {
        let mut text = lines_of("0.1");
        text.insert_str(0, "abc\n");
        let err = parse_table(&text).unwrap_err();
        assert!(matches!(err, ArbError::Parse { line: 1, ref message } if message.contains("abc")));
    }

    #[test]
    fn test_extra_column() {
        let text = format!("0.1\n0.2,0.3\n{}", lines_of("0.0"));
        assert!(matches!(
            parse_table(&text),
            Err(ArbError::Parse { line: 2, .. })
        ));
    }

    #[test]
    fn test_blank_line() {
        let text = format!("0.1\n\n{}", lines_of("0.0"));
        assert!(matches!(
            parse_table(&text),
            Err(ArbError::Parse { line: 2, .. })
        ));
    }

    #[test]
    fn test_file_round_trip() {
        let file = NamedTempFile::new().unwrap();
        let ramp = Waveform::from_fn(|t| 2.0 * t - 1.0);

        write_table(file.path(), &ramp, 8).unwrap();
        let read = read_table(file.path()).unwrap();
        assert_eq!(read.samples()[0], -1.0);
        assert_eq!(read.samples()[SAMPLE_COUNT - 1], 1.0);
    }
}

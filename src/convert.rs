//! File-level conversions between ARB, table text and PNG

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::codec::{encode_arb, ArbFile};
use crate::config::Config;
use crate::waveform::Waveform;
use crate::{plot, table, ArbError, Result};

/// ARB file extension
pub const ARB_EXT: &str = "arb";

/// Table file extension
pub const TABLE_EXT: &str = "csv";

/// Plot file extension
pub const PNG_EXT: &str = "png";

/// Output path: the given one, or the input with its extension replaced
#[must_use]
pub fn derive_output(input: &Path, output: Option<&Path>, ext: &str) -> PathBuf {
    output.map_or_else(|| input.with_extension(ext), Path::to_path_buf)
}

fn require_file(path: &Path) -> Result<()> {
    if path.is_file() {
        Ok(())
    } else {
        Err(ArbError::FileNotFound(path.to_path_buf()))
    }
}

/// Read and parse an ARB file
///
/// # Errors
///
/// Returns `FileNotFound`, an I/O error, or any decode error
pub fn inspect(input: &Path, config: &Config) -> Result<ArbFile> {
    require_file(input)?;
    let bytes = fs::read(input)?;
    debug!("Read {} bytes from {}", bytes.len(), input.display());
    ArbFile::parse(&bytes, &config.codec)
}

/// Read an ARB file into a waveform
///
/// # Errors
///
/// Same as [`inspect`]
pub fn load_arb(input: &Path, config: &Config) -> Result<Waveform> {
    inspect(input, config)?.waveform()
}

/// Read a table file into a waveform
///
/// # Errors
///
/// Returns `FileNotFound`, an I/O error, or any table parse error
pub fn load_table(input: &Path) -> Result<Waveform> {
    require_file(input)?;
    table::read_table(input)
}

/// Convert an ARB file to a table file
///
/// # Errors
///
/// Returns error if the input cannot be read or decoded, or the output
/// cannot be written
pub fn arb_to_table(input: &Path, output: &Path, config: &Config) -> Result<()> {
    let waveform = load_arb(input, config)?;
    table::write_table(output, &waveform, config.table.precision)?;
    info!("Converted {} -> {}", input.display(), output.display());
    Ok(())
}

/// Convert a table file to an ARB file
///
/// The output is only created once every sample has been encoded.
///
/// # Errors
///
/// Returns error if the input cannot be read or parsed, a sample is out of
/// range, or the output cannot be written
pub fn table_to_arb(input: &Path, output: &Path, config: &Config) -> Result<()> {
    let waveform = load_table(input)?;
    let bytes = encode_arb(&waveform, &config.codec)?;
    fs::write(output, &bytes)?;
    info!("Converted {} -> {}", input.display(), output.display());
    Ok(())
}

/// Plot a table file as PNG
///
/// # Errors
///
/// Returns error if the input cannot be read or parsed, or the image
/// cannot be written
pub fn table_to_png(input: &Path, output: &Path, config: &Config) -> Result<()> {
    let waveform = load_table(input)?;
    plot::write_png(output, &waveform, &config.plot)?;
    info!("Plotted {} -> {}", input.display(), output.display());
    Ok(())
}

/// Plot an ARB file as PNG
///
/// # Errors
///
/// Returns error if the input cannot be read or decoded, or the image
/// cannot be written
pub fn arb_to_png(input: &Path, output: &Path, config: &Config) -> Result<()> {
    let waveform = load_arb(input, config)?;
    plot::write_png(output, &waveform, &config.plot)?;
    info!("Plotted {} -> {}", input.display(), output.display());
    Ok(())
}

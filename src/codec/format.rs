//! ARB binary layout

use bytemuck::{bytes_of, from_bytes, Pod, Zeroable};

use crate::config::HeaderCheck;
use crate::error::FormatError;
use crate::Result;

/// Samples per waveform period
pub const SAMPLE_COUNT: usize = 4096;

/// Largest code the 12-bit DAC accepts
pub const CODE_MAX: i16 = (SAMPLE_COUNT - 1) as i16;

/// File magic bytes: "arb"
pub const MAGIC: [u8; 3] = *b"arb";

/// Reserved/version bytes written after the magic
pub const RESERVED: [u8; 5] = [0x00, 0x00, 0x11, 0x00, 0x00];

/// Header size in bytes
pub const HEADER_SIZE: usize = 8;

/// Bytes per encoded sample
pub const CODE_SIZE: usize = std::mem::size_of::<i16>();

/// Sample block size in bytes
pub const BLOCK_SIZE: usize = SAMPLE_COUNT * CODE_SIZE;

/// Total file size in bytes
pub const FILE_SIZE: usize = HEADER_SIZE + BLOCK_SIZE;

/// File header (8 bytes, no padding)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
#[repr(C)]
pub struct ArbHeader {
    /// Magic bytes for file format identification
    pub magic: [u8; 3],

    /// Reserved/version field
    pub reserved: [u8; 5],
}

static_assertions::const_assert_eq!(std::mem::size_of::<ArbHeader>(), HEADER_SIZE);
static_assertions::const_assert_eq!(FILE_SIZE, 8200);

impl Default for ArbHeader {
    fn default() -> Self {
        Self {
            magic: MAGIC,
            reserved: RESERVED,
        }
    }
}

impl ArbHeader {
    /// Whether the reserved field holds the literal this crate writes
    #[must_use]
    pub fn has_standard_reserved(&self) -> bool {
        self.reserved == RESERVED
    }
}

/// Serialize the standard header
#[must_use]
pub fn write_header() -> [u8; HEADER_SIZE] {
    let mut out = [0u8; HEADER_SIZE];
    out.copy_from_slice(bytes_of(&ArbHeader::default()));
    out
}

/// Parse and validate a header
///
/// # Errors
///
/// Returns `BadMagic` if the magic is wrong, and `UnexpectedReserved` if
/// `check` is strict and the reserved bytes differ from [`RESERVED`]
pub fn read_header(bytes: &[u8; HEADER_SIZE], check: HeaderCheck) -> Result<ArbHeader> {
    let header: ArbHeader = *from_bytes(bytes);

    if header.magic != MAGIC {
        return Err(FormatError::BadMagic {
            found: header.magic,
        }
        .into());
    }

    if check == HeaderCheck::Strict && !header.has_standard_reserved() {
        return Err(FormatError::UnexpectedReserved {
            found: header.reserved,
        }
        .into());
    }

    Ok(header)
}

//! ARB binary codec
//!
//! An ARB file is an 8-byte header (`"arb"` plus five reserved bytes)
//! followed by [`SAMPLE_COUNT`] little-endian i16 DAC codes. Amplitudes in
//! [-1.0, 1.0] map onto codes 0..=4095 with `(a + 1) * 2047.5`, rounded
//! half to even.

mod format;
mod frame;
mod sample;

pub use format::{
    read_header, write_header, ArbHeader, BLOCK_SIZE, CODE_MAX, CODE_SIZE, FILE_SIZE, HEADER_SIZE,
    MAGIC, RESERVED, SAMPLE_COUNT,
};
pub use frame::{decode_arb, encode_arb, ArbFile};
pub use sample::{
    decode_codes, decode_samples, dequantize, encode_samples, is_dac_code, quantize, quantize_all,
    quantize_with, scale, SCALE,
};

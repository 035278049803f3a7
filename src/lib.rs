//! arbconv - ARB arbitrary-waveform file converter
//!
//! Converts between the 8200-byte ARB binary format used by
//! arbitrary-waveform generators, one-value-per-line sample tables and
//! PNG plots.

#![deny(unsafe_op_in_unsafe_fn)]
#![warn(missing_docs, clippy::all, clippy::pedantic, clippy::cargo)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss,
    clippy::multiple_crate_versions
)]

pub mod codec;
pub mod config;
pub mod convert;
pub mod error;
pub mod plot;
pub mod table;
pub mod waveform;

pub use error::{ArbError, FormatError, Result};
pub use waveform::Waveform;

//! # bomsniff_core - Unicode byte order mark detection
//!
//! Modules:
//! - `signature` for the five BOM signatures and [`BomKind`]
//! - `classify` for the naive and strict classifiers and the `is_*_bom` predicates
//! - `reader` for [`BomReader`], which strips a BOM from a stream
//! - `file` for probing files on disk

mod classify;
mod config;
mod error;
mod file;
mod reader;
mod signature;

pub use classify::{
    Detection, NAIVE_MIN_LEN, NAIVE_ORDER, STRICT_ORDER, Strategy, bytes_to_skip, classify_naive,
    classify_strict, detect, is_utf8_bom, is_utf16_bom, is_utf16be_bom, is_utf16le_bom,
    is_utf32_bom, is_utf32be_bom, is_utf32le_bom,
};
pub use config::ClassifyConfig;
pub use error::{BomError, BomResult};
pub use file::{classify_file, open_stripped};
pub use reader::BomReader;
pub use signature::{
    BomKind, MAX_BOM_LEN, UTF8_BOM, UTF16BE_BOM, UTF16LE_BOM, UTF32BE_BOM, UTF32LE_BOM,
};

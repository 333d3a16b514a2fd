//! Codec layer for byte-level operations.
//!
//! # Submodules
//!
//! - [`compression`][]: File loading with gzip decompression
//! - [`binary`][]: Native/declared-endian scalar and label unpacking

pub mod binary;
pub mod compression;

//! File format parsing layer for case files.
//!
//! This module bridges between raw file bytes and the high-level
//! [`FoamCase`](crate::foam::reader::FoamCase).
//!
//! # Module Organization
//!
//! - [`lexer`]: Byte-level tokens (words, strings, punctuation, raw blocks)
//! - [`dictionary`]: Recursive-descent parser into dictionaries and lists
//! - [`header`]: Typed `FoamFile` header
//! - [`field`]: Field category, storage mode and value decoding
//! - [`topology`]: `points`, `faces`, `owner`, `neighbour`, `boundary`
//!
//! # Architecture
//!
//! ```text
//! File Structure:
//! ┌─────────────────┐
//! │  FoamFile {}    │ ← header::Header::from_dict()
//! ├─────────────────┤
//! │  dimensions     │ ← dictionary::Document::dimensions()
//! │  internalField  │ ← field::decode_internal()
//! │  boundaryField  │ ← field::decode_patch()
//! ├─────────────────┤
//! │  N ( ... )      │ ← topology::parse_*()
//! │  (bare lists)   │
//! └─────────────────┘
//! ```

pub mod dictionary;
pub mod field;
pub mod header;
pub mod lexer;
pub mod topology;

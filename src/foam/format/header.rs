//! `FoamFile` header parsing.
//!
//! Every case file starts with a header dictionary:
//!
//! ```text
//! FoamFile
//! {
//!     version     2.0;
//!     format      binary;
//!     arch        "LSB;label=32;scalar=64";
//!     class       volVectorField;
//!     location    "0";
//!     object      U;
//! }
//! ```
//!
//! The header decides how the rest of the file is tokenized: `format`
//! switches counted lists to raw binary payloads, `arch` fixes their widths
//! and byte order, and `class` supplies the element kind of bare lists in
//! topology files.

use log::debug;

use super::dictionary::Dictionary;
use crate::foam::types::error::{FoamError, Result};
use crate::foam::types::models::{Arch, ElementKind, StreamFormat};

/// Typed view of the `FoamFile` dictionary.
#[derive(Debug, Clone, PartialEq)]
pub struct Header {
    pub version: Option<String>,
    pub format: StreamFormat,
    pub class: String,
    pub location: Option<String>,
    pub object: String,
    pub note: Option<String>,
    pub arch: Arch,
}

fn required<'d>(dict: &'d Dictionary, key: &str) -> Result<&'d str> {
    dict.word(key).ok_or_else(|| FoamError::MissingEntry {
        context: "FoamFile header".to_string(),
        key: key.to_string(),
    })
}

impl Header {
    pub fn from_dict(dict: &Dictionary) -> Result<Self> {
        let format = StreamFormat::try_from(required(dict, "format")?)?;
        let class = required(dict, "class")?.to_string();
        let object = required(dict, "object")?.to_string();
        let arch = match dict.word("arch") {
            Some(text) => Arch::parse(text)?,
            None => Arch::default(),
        };
        debug!("FoamFile header: object={}, class={}, format={}, arch={:?}", object, class, format, arch);

        Ok(Self {
            version: dict.word("version").map(str::to_string),
            format,
            class,
            location: dict.word("location").map(str::to_string),
            object,
            note: dict.word("note").map(str::to_string),
            arch,
        })
    }

    pub fn is_binary(&self) -> bool {
        self.format == StreamFormat::Binary
    }

    /// Element kind of a bare counted list at nesting `depth`, as implied
    /// by the file class. Lists inside field dictionaries carry an explicit
    /// `List<T>` token instead.
    pub fn binary_list_kind(&self, depth: usize) -> Option<ElementKind> {
        match (self.class.as_str(), depth) {
            ("vectorField", 0) => Some(ElementKind::Scalars(3)),
            ("scalarField", 0) => Some(ElementKind::Scalars(1)),
            ("labelList", 0) | ("faceCompactList", 0) => Some(ElementKind::Label),
            ("faceList", 1) => Some(ElementKind::Label),
            _ => None,
        }
    }
}

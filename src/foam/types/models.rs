//! Core data structures shared by the parsing layers.
//!
//! This module defines the small value types used throughout the library:
//! - Stream format and binary architecture of a file
//! - Field categories and storage modes
//! - Structured diagnostics attached to read results

use std::fmt;

use super::error::{FoamError, Result};

/// Encoding of the payload that follows the `FoamFile` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StreamFormat {
    #[default]
    Ascii,
    Binary,
}

impl TryFrom<&str> for StreamFormat {
    type Error = FoamError;
    fn try_from(value: &str) -> Result<Self> {
        match value {
            "ascii" => Ok(Self::Ascii),
            "binary" => Ok(Self::Binary),
            _ => Err(FoamError::InvalidFormat(format!("Unknown stream format: {}", value))),
        }
    }
}

impl fmt::Display for StreamFormat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            StreamFormat::Ascii => write!(f, "ascii"),
            StreamFormat::Binary => write!(f, "binary"),
        }
    }
}

/// Byte order of binary payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrderKind {
    Little,
    Big,
}

impl ByteOrderKind {
    pub fn native() -> Self {
        if cfg!(target_endian = "big") {
            ByteOrderKind::Big
        } else {
            ByteOrderKind::Little
        }
    }
}

/// Binary layout declared by the optional `arch` header entry,
/// e.g. `"LSB;label=32;scalar=64"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Arch {
    pub byte_order: ByteOrderKind,
    /// Width of an integer label in bytes (4 or 8).
    pub label_bytes: usize,
    /// Width of a floating point scalar in bytes (4 or 8).
    pub scalar_bytes: usize,
}

impl Default for Arch {
    fn default() -> Self {
        Self {
            byte_order: ByteOrderKind::native(),
            label_bytes: 4,
            scalar_bytes: 8,
        }
    }
}

impl Arch {
    /// Parses an `arch` string. Unknown fields are ignored; missing fields
    /// keep their defaults.
    pub fn parse(text: &str) -> Result<Self> {
        let mut arch = Arch::default();
        for part in text.split(';').map(str::trim).filter(|p| !p.is_empty()) {
            match part {
                "LSB" => arch.byte_order = ByteOrderKind::Little,
                "MSB" => arch.byte_order = ByteOrderKind::Big,
                _ => {
                    if let Some((key, bits)) = part.split_once('=') {
                        let bytes = match bits.trim() {
                            "32" => 4,
                            "64" => 8,
                            other => {
                                return Err(FoamError::InvalidFormat(format!(
                                    "Unsupported width '{}' in arch '{}'",
                                    other, text
                                )))
                            }
                        };
                        match key.trim() {
                            "label" => arch.label_bytes = bytes,
                            "scalar" => arch.scalar_bytes = bytes,
                            _ => {}
                        }
                    }
                }
            }
        }
        Ok(arch)
    }
}

/// Category of a field, carrying its number of components per element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldCategory {
    Scalar,
    Vector,
    SymmTensor,
    Tensor,
}

impl FieldCategory {
    pub const ALL: [FieldCategory; 4] = [
        FieldCategory::Scalar,
        FieldCategory::Vector,
        FieldCategory::SymmTensor,
        FieldCategory::Tensor,
    ];

    /// Number of scalar components per element.
    pub fn components(&self) -> usize {
        match self {
            FieldCategory::Scalar => 1,
            FieldCategory::Vector => 3,
            FieldCategory::SymmTensor => 6,
            FieldCategory::Tensor => 9,
        }
    }

    /// Element type name as written in `List<...>` tokens.
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldCategory::Scalar => "scalar",
            FieldCategory::Vector => "vector",
            FieldCategory::SymmTensor => "symmTensor",
            FieldCategory::Tensor => "tensor",
        }
    }

    /// Maps a `List<...>` element type name back to its category.
    pub fn from_type_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.type_name() == name)
    }
}

impl fmt::Display for FieldCategory {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// Physical dimension exponents:
/// mass, length, time, temperature, quantity, current, luminous intensity.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Dimensions(pub [f64; 7]);

impl Dimensions {
    pub fn mass(&self) -> f64 {
        self.0[0]
    }

    pub fn length(&self) -> f64 {
        self.0[1]
    }

    pub fn time(&self) -> f64 {
        self.0[2]
    }

    pub fn temperature(&self) -> f64 {
        self.0[3]
    }

    pub fn quantity(&self) -> f64 {
        self.0[4]
    }

    pub fn current(&self) -> f64 {
        self.0[5]
    }

    pub fn luminous_intensity(&self) -> f64 {
        self.0[6]
    }
}

/// On-disk list layout of a non-uniform value block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListForm {
    /// Count and opening parenthesis on the same line.
    Short,
    /// Count on its own line followed by a multi-line block.
    Long,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Distribution {
    /// A single element that applies to every entity.
    Uniform,
    NonUniform(ListForm),
}

/// How a value block is stored on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StorageMode {
    pub distribution: Distribution,
    pub format: StreamFormat,
}

impl StorageMode {
    pub fn is_uniform(&self) -> bool {
        self.distribution == Distribution::Uniform
    }
}

/// Element layout of a binary list payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    /// `n` floating point components per element.
    Scalars(usize),
    /// One integer label per element.
    Label,
}

impl ElementKind {
    /// Bytes occupied by one element for the given architecture.
    pub fn byte_width(&self, arch: &Arch) -> usize {
        match self {
            ElementKind::Scalars(n) => n * arch.scalar_bytes,
            ElementKind::Label => arch.label_bytes,
        }
    }
}

/// How cell centres are aggregated from face points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CentroidMode {
    /// Only faces the cell owns contribute.
    #[default]
    OwnerFaces,
    /// Faces where the cell is owner or neighbour contribute.
    AllFaces,
}

/// Non-fatal events observed while reading.
#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    /// The value block was `uniform`; only the broadcast element is returned.
    UniformField { category: FieldCategory },
    /// The patch block has no `value` entry; values were taken from owner cells.
    BoundaryFallback { patch: String, faces: usize },
    /// A reshape was requested but not applied.
    ReshapeIgnored { requested: Vec<usize> },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Diagnostic::UniformField { category } => {
                write!(f, "uniform {} field, only the constant value is returned", category)
            }
            Diagnostic::BoundaryFallback { patch, faces } => write!(
                f,
                "no value stored on patch '{}', using owner cell values for {} faces",
                patch, faces
            ),
            Diagnostic::ReshapeIgnored { requested } => {
                write!(f, "field is uniform, reshape to {:?} ignored", requested)
            }
        }
    }
}

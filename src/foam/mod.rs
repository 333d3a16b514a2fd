//! Core OpenFOAM case reader module

pub mod boundary;
pub mod codec;
pub mod format;
pub mod mesh;
pub mod path;
pub mod reader;
pub mod reshape;
pub mod types;

pub use reader::{FoamCase, Field, FieldOptions, MeshCentres, MeshOptions, Topology};
pub use types::error::{FoamError, Result};
pub use types::models;

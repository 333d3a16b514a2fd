//! # foam-reader
//!
//! A reader for OpenFOAM case directories.
//! Reconstructs cell and boundary face centres from `constant/polyMesh`
//! and decodes scalar, vector, symmTensor and tensor fields stored in
//! ascii or binary format, optionally gzipped.
pub mod foam;

// Re-export the main types for convenience
pub use foam::{
    Field,
    FieldOptions,
    FoamCase,
    FoamError,
    MeshCentres,
    MeshOptions,
    Result,
    Topology,
    models::{
        CentroidMode,
        Diagnostic,
        Dimensions,
        FieldCategory,
        StorageMode,
    },
};

use std::path::{Path, PathBuf};

use log::{info, warn};
use ndarray::{ArrayD, ArrayViewD, Axis};

use super::boundary;
use super::codec::compression;
use super::format::dictionary::{self, Document};
use super::format::field::{self, DecodedField, PatchValue};
use super::format::topology::{self, BoundaryMesh, Faces, Owner, Points};
use super::mesh;
use super::path;
use super::reshape;
use super::types::error::{FoamError, Result};
use super::types::models::{CentroidMode, Diagnostic, Dimensions, FieldCategory, StorageMode};

/// Options for [`FoamCase::read_mesh`].
#[derive(Debug, Clone, Default)]
pub struct MeshOptions {
    /// Restrict the result to the faces of one boundary patch.
    pub boundary: Option<String>,
    /// Structured-mesh extents to reshape the coordinate arrays to.
    pub shape: Option<Vec<usize>>,
    pub centroid_mode: CentroidMode,
}

impl MeshOptions {
    pub fn boundary(mut self, patch: impl Into<String>) -> Self {
        self.boundary = Some(patch.into());
        self
    }

    pub fn shape(mut self, extents: impl Into<Vec<usize>>) -> Self {
        self.shape = Some(extents.into());
        self
    }

    pub fn centroid_mode(mut self, mode: CentroidMode) -> Self {
        self.centroid_mode = mode;
        self
    }
}

/// Options for [`FoamCase::read_field`] and the typed readers.
#[derive(Debug, Clone, Default)]
pub struct FieldOptions {
    /// Read the values of one boundary patch instead of the internal field.
    pub boundary: Option<String>,
    /// Structured-mesh extents to reshape the values to.
    pub shape: Option<Vec<usize>>,
}

impl FieldOptions {
    pub fn boundary(mut self, patch: impl Into<String>) -> Self {
        self.boundary = Some(patch.into());
        self
    }

    pub fn shape(mut self, extents: impl Into<Vec<usize>>) -> Self {
        self.shape = Some(extents.into());
        self
    }
}

/// A field read from disk and reshaped.
#[derive(Debug, Clone)]
pub struct Field {
    pub category: FieldCategory,
    pub storage: StorageMode,
    /// Number of elements: cells, patch faces, or 1 for uniform fields.
    pub count: usize,
    /// `(extents...)` for scalars, `(components, extents...)` otherwise,
    /// in column-major layout.
    pub data: ArrayD<f64>,
    pub dimensions: Option<Dimensions>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Field {
    pub fn is_uniform(&self) -> bool {
        self.storage.is_uniform()
    }

    /// View of component `index` (x/y/z = 0/1/2 for vectors).
    ///
    /// Scalar fields have a single component, the whole array.
    pub fn component(&self, index: usize) -> Option<ArrayViewD<'_, f64>> {
        if self.category == FieldCategory::Scalar {
            return (index == 0).then(|| self.data.view());
        }
        (index < self.category.components()).then(|| self.data.index_axis(Axis(0), index))
    }

    /// Values in flat on-disk order (components fastest).
    pub fn to_flat(&self) -> Vec<f64> {
        self.data.t().iter().copied().collect()
    }
}

/// Cell or patch face centres, reshaped like field data.
#[derive(Debug, Clone)]
pub struct MeshCentres {
    pub x: ArrayD<f64>,
    pub y: ArrayD<f64>,
    pub z: ArrayD<f64>,
    pub diagnostics: Vec<Diagnostic>,
}

impl MeshCentres {
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}

/// All `constant/polyMesh` files of a case.
#[derive(Debug, Clone)]
pub struct Topology {
    pub points: Points,
    pub faces: Faces,
    pub owner: Owner,
    pub neighbour: Option<Vec<usize>>,
    pub boundary: BoundaryMesh,
}

/// A case directory.
///
/// Every read opens, parses and releases its files; nothing is cached
/// between calls.
#[derive(Debug, Clone)]
pub struct FoamCase {
    root: PathBuf,
}

impl FoamCase {
    /// Opens the case at `path`.
    ///
    /// # Errors
    /// Returns `PathNotFound` if the directory does not exist.
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let root = path.as_ref().to_path_buf();
        if !root.is_dir() {
            return Err(FoamError::PathNotFound { path: root });
        }
        info!("Opening case: {}", root.display());
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn load_document(&self, path: &Path) -> Result<Document> {
        info!("Reading file {}", path.display());
        let content = compression::load(path)?;
        dictionary::parse_document(&content)
    }

    fn load_mesh_file(&self, name: &str) -> Result<Document> {
        let path = path::mesh_file(&self.root, name)?;
        self.load_document(&path)
    }

    fn read_points(&self) -> Result<Points> {
        topology::parse_points(&self.load_mesh_file("points")?)
    }

    fn read_faces(&self) -> Result<Faces> {
        topology::parse_faces(&self.load_mesh_file("faces")?)
    }

    fn read_owner(&self) -> Result<Owner> {
        topology::parse_owner(&self.load_mesh_file("owner")?)
    }

    fn read_neighbour(&self) -> Result<Vec<usize>> {
        topology::parse_neighbour(&self.load_mesh_file("neighbour")?)
    }

    /// Reads the boundary patch list.
    pub fn read_boundary(&self) -> Result<BoundaryMesh> {
        topology::parse_boundary(&self.load_mesh_file("boundary")?)
    }

    /// Reads every topology file. The `neighbour` file is optional.
    pub fn read_topology(&self) -> Result<Topology> {
        let points = self.read_points()?;
        let faces = self.read_faces()?;
        let owner = self.read_owner()?;
        let neighbour = match self.read_neighbour() {
            Ok(n) => Some(n),
            Err(FoamError::PathNotFound { .. }) => None,
            Err(e) => return Err(e),
        };
        let boundary = self.read_boundary()?;
        boundary.validate(faces.len(), neighbour.as_ref().map(Vec::len))?;
        Ok(Topology { points, faces, owner, neighbour, boundary })
    }

    /// Reads cell centres, or face centres of one patch.
    pub fn read_mesh(&self, options: &MeshOptions) -> Result<MeshCentres> {
        let faces = self.read_faces()?;
        let points = self.read_points()?;

        let centres = match &options.boundary {
            Some(name) => {
                let boundary = self.read_boundary()?;
                boundary.validate(faces.len(), None)?;
                let patch = boundary.get(name).ok_or_else(|| FoamError::PatchNotFound(name.clone()))?;
                mesh::patch_centres(&points, &faces, patch)?
            }
            None => {
                let owner = self.read_owner()?;
                let neighbour = match options.centroid_mode {
                    CentroidMode::AllFaces => Some(self.read_neighbour()?),
                    CentroidMode::OwnerFaces => None,
                };
                mesh::cell_centres(&points, &faces, &owner, neighbour.as_deref(), options.centroid_mode)?
            }
        };

        let mut diagnostics = Vec::new();
        let shape = options.shape.as_deref();
        let x = reshape::reshape(centres.x, 1, false, shape, &mut diagnostics)?;
        let y = reshape::reshape(centres.y, 1, false, shape, &mut diagnostics)?;
        let z = reshape::reshape(centres.z, 1, false, shape, &mut diagnostics)?;
        info!("Mesh read: {} centres", x.len());
        Ok(MeshCentres { x, y, z, diagnostics })
    }

    fn field_path(&self, time_name: &str, name: &str) -> Result<PathBuf> {
        path::resolve(&self.root, Some(time_name), Some(name))
    }

    /// Returns the category declared by a field file.
    pub fn read_field_type(&self, time_name: &str, name: &str) -> Result<FieldCategory> {
        let path = self.field_path(time_name, name)?;
        field::category_of(&self.load_document(&path)?.header)
    }

    /// Reads a field at `time_name`, optionally restricted to one patch.
    pub fn read_field(&self, time_name: &str, name: &str, options: &FieldOptions) -> Result<Field> {
        let path = self.field_path(time_name, name)?;
        self.read_field_at(&path, options)
    }

    fn read_field_at(&self, path: &Path, options: &FieldOptions) -> Result<Field> {
        let doc = self.load_document(path)?;
        let dimensions = doc.dimensions()?;
        let mut diagnostics = Vec::new();

        let decoded = match &options.boundary {
            Some(patch) => match field::decode_patch(&doc, patch)? {
                PatchValue::Stored(decoded) => decoded,
                PatchValue::Missing => {
                    let (decoded, diagnostic) = self.resolve_patch(&doc, patch)?;
                    diagnostics.push(diagnostic);
                    decoded
                }
            },
            None => field::decode_internal(&doc)?,
        };

        if decoded.storage.is_uniform() {
            let diagnostic = Diagnostic::UniformField { category: decoded.category };
            warn!("{}", diagnostic);
            diagnostics.push(diagnostic);
        }

        let DecodedField { category, storage, count, values } = decoded;
        let data = reshape::reshape(
            values,
            category.components(),
            storage.is_uniform(),
            options.shape.as_deref(),
            &mut diagnostics,
        )?;
        info!("Field read: {} {} elements from {}", count, category, path.display());

        Ok(Field { category, storage, count, data, dimensions, diagnostics })
    }

    fn resolve_patch(&self, doc: &Document, patch: &str) -> Result<(DecodedField, Diagnostic)> {
        let boundary = self.read_boundary()?;
        let patch = boundary.get(patch).ok_or_else(|| FoamError::PatchNotFound(patch.to_string()))?;
        let owner = self.read_owner()?;
        let internal = field::decode_internal(doc)?;
        boundary::resolve_from_owner(&internal, &owner, patch)
    }

    fn read_typed(
        &self,
        time_name: &str,
        name: &str,
        options: &FieldOptions,
        expected: FieldCategory,
    ) -> Result<Field> {
        let path = self.field_path(time_name, name)?;
        let field = self.read_field_at(&path, options)?;
        if field.category != expected {
            return Err(FoamError::TypeMismatch { path, expected, found: field.category });
        }
        Ok(field)
    }

    pub fn read_scalar(&self, time_name: &str, name: &str, options: &FieldOptions) -> Result<Field> {
        self.read_typed(time_name, name, options, FieldCategory::Scalar)
    }

    pub fn read_vector(&self, time_name: &str, name: &str, options: &FieldOptions) -> Result<Field> {
        self.read_typed(time_name, name, options, FieldCategory::Vector)
    }

    pub fn read_symm_tensor(&self, time_name: &str, name: &str, options: &FieldOptions) -> Result<Field> {
        self.read_typed(time_name, name, options, FieldCategory::SymmTensor)
    }

    pub fn read_tensor(&self, time_name: &str, name: &str, options: &FieldOptions) -> Result<Field> {
        self.read_typed(time_name, name, options, FieldCategory::Tensor)
    }
}

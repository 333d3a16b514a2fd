//! Cell and boundary face centre reconstruction.
//!
//! Centres are arithmetic means of point coordinates, not area/volume
//! weighted centroids:
//! - a face centre averages the points of that face;
//! - a cell centre averages the distinct points referenced by the faces
//!   selected by [`CentroidMode`].

use log::debug;

use super::format::topology::{Faces, Owner, Patch, Points};
use super::types::error::{FoamError, Result};
use super::types::models::CentroidMode;

/// Centre coordinates, one entry per cell or per patch face.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Centres {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub z: Vec<f64>,
}

impl Centres {
    fn with_capacity(n: usize) -> Self {
        Self {
            x: Vec::with_capacity(n),
            y: Vec::with_capacity(n),
            z: Vec::with_capacity(n),
        }
    }

    fn push(&mut self, [x, y, z]: [f64; 3]) {
        self.x.push(x);
        self.y.push(y);
        self.z.push(z);
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}

fn mean_of(points: &Points, ids: &[usize]) -> Result<[f64; 3]> {
    if ids.is_empty() {
        return Err(FoamError::InvalidFormat("Cannot average an empty point set".to_string()));
    }
    let mut sum = [0.0; 3];
    for &id in ids {
        let p = points.point(id).ok_or_else(|| {
            FoamError::InvalidFormat(format!("Point id {} out of range ({} points)", id, points.len()))
        })?;
        for (s, v) in sum.iter_mut().zip(p) {
            *s += v;
        }
    }
    let n = ids.len() as f64;
    Ok([sum[0] / n, sum[1] / n, sum[2] / n])
}

/// Computes one centre per cell.
///
/// `neighbour` is required for [`CentroidMode::AllFaces`] and ignored otherwise.
pub fn cell_centres(
    points: &Points,
    faces: &Faces,
    owner: &Owner,
    neighbour: Option<&[usize]>,
    mode: CentroidMode,
) -> Result<Centres> {
    if owner.cells.len() != faces.len() {
        return Err(FoamError::CountMismatch {
            item_type: "owner labels",
            expected: faces.len() as u64,
            found: owner.cells.len() as u64,
        });
    }

    let neighbour = match mode {
        CentroidMode::OwnerFaces => &[][..],
        CentroidMode::AllFaces => neighbour.ok_or_else(|| {
            FoamError::InvalidFormat("All-faces centroid mode requires the neighbour file".to_string())
        })?,
    };
    if neighbour.len() > faces.len() {
        return Err(FoamError::CountMismatch {
            item_type: "neighbour labels",
            expected: faces.len() as u64,
            found: neighbour.len() as u64,
        });
    }

    let n_cells = neighbour.iter().copied().map(|c| c + 1).fold(owner.n_cells, usize::max);
    let mut cell_points: Vec<Vec<usize>> = vec![Vec::new(); n_cells];
    for (face_id, &cell) in owner.cells.iter().enumerate() {
        cell_points[cell].extend_from_slice(faces.face(face_id).unwrap_or_default());
    }
    for (face_id, &cell) in neighbour.iter().enumerate() {
        cell_points[cell].extend_from_slice(faces.face(face_id).unwrap_or_default());
    }

    let mut centres = Centres::with_capacity(n_cells);
    for (cell, ids) in cell_points.iter_mut().enumerate() {
        ids.sort_unstable();
        ids.dedup();
        if ids.is_empty() {
            return Err(FoamError::InvalidFormat(format!("Cell {} has no faces", cell)));
        }
        centres.push(mean_of(points, ids)?);
    }
    debug!("Computed {} cell centres ({:?})", centres.len(), mode);
    Ok(centres)
}

/// Computes one centre per face of `patch`.
pub fn patch_centres(points: &Points, faces: &Faces, patch: &Patch) -> Result<Centres> {
    let mut centres = Centres::with_capacity(patch.n_faces);
    for face_id in patch.faces() {
        let ids = faces.face(face_id).ok_or_else(|| {
            FoamError::InvalidFormat(format!(
                "Patch '{}' references face {} but the mesh has {} faces",
                patch.name,
                face_id,
                faces.len()
            ))
        })?;
        centres.push(mean_of(points, ids)?);
    }
    debug!("Computed {} face centres on patch '{}'", centres.len(), patch.name);
    Ok(centres)
}

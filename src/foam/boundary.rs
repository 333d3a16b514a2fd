//! Boundary value fallback.
//!
//! Patches such as `zeroGradient` store no `value` entry. Their face values
//! are then taken from the interior cell owning each face.

use log::{debug, warn};

use super::format::field::DecodedField;
use super::format::topology::{Owner, Patch};
use super::types::error::{FoamError, Result};
use super::types::models::Diagnostic;

/// Builds per-face values for `patch` from the owning cells' internal values.
///
/// A uniform internal field is returned unchanged: its single element already
/// applies to every face.
pub fn resolve_from_owner(
    internal: &DecodedField,
    owner: &Owner,
    patch: &Patch,
) -> Result<(DecodedField, Diagnostic)> {
    let diagnostic = Diagnostic::BoundaryFallback {
        patch: patch.name.clone(),
        faces: patch.n_faces,
    };
    warn!("{}", diagnostic);

    if internal.storage.is_uniform() {
        debug!("Internal field is uniform; patch '{}' takes the constant value", patch.name);
        return Ok((internal.clone(), diagnostic));
    }

    let width = internal.category.components();
    let cells = owner.cells.get(patch.faces()).ok_or_else(|| {
        FoamError::InvalidFormat(format!(
            "Patch '{}' spans faces {:?} but the owner file lists {} faces",
            patch.name,
            patch.faces(),
            owner.cells.len()
        ))
    })?;

    let mut values = Vec::with_capacity(patch.n_faces * width);
    for &cell in cells {
        let slot = internal.values.get(cell * width..(cell + 1) * width).ok_or_else(|| {
            FoamError::InvalidFormat(format!(
                "Owner cell {} out of range for an internal field of {} cells",
                cell, internal.count
            ))
        })?;
        values.extend_from_slice(slot);
    }

    Ok((
        DecodedField {
            category: internal.category,
            storage: internal.storage,
            count: patch.n_faces,
            values,
        },
        diagnostic,
    ))
}

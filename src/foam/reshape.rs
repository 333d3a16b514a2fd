//! Reshaping of flat decoded arrays into column-major n-d arrays.
//!
//! Flat field data is element-major with components varying fastest. For a
//! structured mesh of extents `(e0, e1, ...)` the flat index of component
//! `w` of element `(i0, i1, ...)` is `w + W * (i0 + e0 * (i1 + ...))`, which
//! is exactly Fortran (first-index-fastest) order over `(W, e0, e1, ...)`.

use log::warn;
use ndarray::{ArrayD, IxDyn, ShapeBuilder};

use super::types::error::{FoamError, Result};
use super::types::models::Diagnostic;

/// Reshapes `values` (elements of `components` scalars each).
///
/// - scalar fields become `(extents...)`, others `(components, extents...)`;
/// - without `shape`, a single extent of the element count is used;
/// - uniform fields keep their single element and ignore `shape`, recording
///   a [`Diagnostic::ReshapeIgnored`].
pub fn reshape(
    values: Vec<f64>,
    components: usize,
    uniform: bool,
    shape: Option<&[usize]>,
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<ArrayD<f64>> {
    let count = values.len() / components.max(1);

    let extents: Vec<usize> = match shape {
        Some(requested) if uniform => {
            let diagnostic = Diagnostic::ReshapeIgnored { requested: requested.to_vec() };
            warn!("{}", diagnostic);
            diagnostics.push(diagnostic);
            vec![count]
        }
        Some(requested) => {
            if requested.iter().product::<usize>() != count {
                return Err(FoamError::ShapeMismatch {
                    expected: count,
                    shape: requested.to_vec(),
                });
            }
            requested.to_vec()
        }
        None => vec![count],
    };

    let dims: Vec<usize> = if components == 1 {
        extents
    } else {
        std::iter::once(components).chain(extents).collect()
    };

    ArrayD::from_shape_vec(IxDyn(&dims).f(), values).map_err(|_| FoamError::ShapeMismatch {
        expected: count,
        shape: dims,
    })
}

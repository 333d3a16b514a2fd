//! Unpacking of raw binary list payloads.

use byteorder::{BigEndian, ByteOrder, LittleEndian};

use crate::foam::types::error::{FoamError, Result};
use crate::foam::types::models::{Arch, ByteOrderKind};

/// Decodes packed IEEE-754 scalars (4 or 8 bytes each) into `f64`.
pub fn unpack_scalars(bytes: &[u8], arch: &Arch) -> Result<Vec<f64>> {
    match arch.byte_order {
        ByteOrderKind::Little => scalars_as::<LittleEndian>(bytes, arch.scalar_bytes),
        ByteOrderKind::Big => scalars_as::<BigEndian>(bytes, arch.scalar_bytes),
    }
}

/// Decodes packed signed integer labels (4 or 8 bytes each).
///
/// Negative labels are rejected: every label read by this crate is an index.
pub fn unpack_labels(bytes: &[u8], arch: &Arch) -> Result<Vec<usize>> {
    let raw = match arch.byte_order {
        ByteOrderKind::Little => labels_as::<LittleEndian>(bytes, arch.label_bytes)?,
        ByteOrderKind::Big => labels_as::<BigEndian>(bytes, arch.label_bytes)?,
    };
    raw.into_iter()
        .map(|v| {
            usize::try_from(v)
                .map_err(|_| FoamError::InvalidFormat(format!("Negative label in binary list: {}", v)))
        })
        .collect()
}

fn check_width(bytes: &[u8], width: usize, context: &str) -> Result<usize> {
    if width != 4 && width != 8 {
        return Err(FoamError::InvalidFormat(format!("Invalid {} width: {}", context, width)));
    }
    if bytes.len() % width != 0 {
        return Err(FoamError::SizeMismatch {
            context: format!("{} payload", context),
            expected: (bytes.len() / width * width) as u64,
            found: bytes.len() as u64,
        });
    }
    Ok(bytes.len() / width)
}

fn scalars_as<B: ByteOrder>(bytes: &[u8], width: usize) -> Result<Vec<f64>> {
    let n = check_width(bytes, width, "scalar")?;
    if width == 8 {
        let mut out = vec![0f64; n];
        B::read_f64_into(bytes, &mut out);
        Ok(out)
    } else {
        let mut out = vec![0f32; n];
        B::read_f32_into(bytes, &mut out);
        Ok(out.into_iter().map(f64::from).collect())
    }
}

fn labels_as<B: ByteOrder>(bytes: &[u8], width: usize) -> Result<Vec<i64>> {
    let n = check_width(bytes, width, "label")?;
    if width == 8 {
        let mut out = vec![0i64; n];
        B::read_i64_into(bytes, &mut out);
        Ok(out)
    } else {
        let mut out = vec![0i32; n];
        B::read_i32_into(bytes, &mut out);
        Ok(out.into_iter().map(i64::from).collect())
    }
}

//! Field value decoding.
//!
//! Turns the `internalField` entry, or a patch `value` entry inside
//! `boundaryField`, into a flat `Vec<f64>` of `count × components` values.
//!
//! # Value Block Forms
//! ```text
//! internalField   uniform 0.5;
//! internalField   uniform (1 0 0);
//! internalField   nonuniform List<scalar> 3(1 2 3);       // short form
//! internalField   nonuniform List<vector>
//! 2
//! (
//! (0 0 0)
//! (1 0 0)
//! )
//! ;                                                      // long form
//! internalField   nonuniform List<scalar> 4{0.1};        // repeated
//! ```
//! In binary files the list body is `count × components` packed scalars.

use std::sync::OnceLock;

use log::{debug, trace, warn};
use regex::Regex;

use super::dictionary::{Document, Item, List, ListBody};
use super::header::Header;
use crate::foam::codec::binary;
use crate::foam::types::error::{FoamError, Result};
use crate::foam::types::models::{Distribution, ElementKind, FieldCategory, StorageMode};

/// Compiled pattern for the category part of a field class token.
static CLASS_PATTERN: OnceLock<Regex> = OnceLock::new();

fn class_regex() -> &'static Regex {
    CLASS_PATTERN.get_or_init(|| {
        Regex::new(r"(SymmTensor|Tensor|Vector|Scalar)Field").expect("Invalid field class regex pattern")
    })
}

/// A decoded value block, still flat and unshaped.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedField {
    pub category: FieldCategory,
    pub storage: StorageMode,
    /// Number of logical elements (1 for uniform blocks).
    pub count: usize,
    /// `count × category.components()` values, component-major per element.
    pub values: Vec<f64>,
}

/// Outcome of decoding a boundary patch block.
#[derive(Debug, Clone, PartialEq)]
pub enum PatchValue {
    Stored(DecodedField),
    /// The patch block has no `value` entry.
    Missing,
}

/// Determines the field category from the header `class` token,
/// e.g. `volVectorField`, `surfaceScalarField`, `volSymmTensorField::Internal`.
pub fn category_of(header: &Header) -> Result<FieldCategory> {
    let captures = class_regex()
        .captures(&header.class)
        .ok_or_else(|| FoamError::UnsupportedFieldType(header.class.clone()))?;
    let category = match &captures[1] {
        "Scalar" => FieldCategory::Scalar,
        "Vector" => FieldCategory::Vector,
        "SymmTensor" => FieldCategory::SymmTensor,
        _ => FieldCategory::Tensor,
    };
    debug!("Field class '{}' -> {}", header.class, category);
    Ok(category)
}

/// Decodes the `internalField` entry.
pub fn decode_internal(doc: &Document) -> Result<DecodedField> {
    let category = category_of(&doc.header)?;
    let items = doc.body.items("internalField").ok_or_else(|| FoamError::MissingEntry {
        context: format!("field '{}'", doc.header.object),
        key: "internalField".to_string(),
    })?;
    decode_value(items, category, &doc.header, "internalField")
}

/// Decodes the `value` entry of patch `patch` in `boundaryField`.
///
/// Patch keys may be regular expressions; see
/// [`Dictionary::lookup_pattern`](super::dictionary::Dictionary::lookup_pattern).
pub fn decode_patch(doc: &Document, patch: &str) -> Result<PatchValue> {
    let category = category_of(&doc.header)?;
    let boundary = doc.body.dict("boundaryField").ok_or_else(|| FoamError::MissingEntry {
        context: format!("field '{}'", doc.header.object),
        key: "boundaryField".to_string(),
    })?;
    let block = boundary
        .lookup_pattern(patch)
        .and_then(|entry| entry.as_dict())
        .ok_or_else(|| FoamError::PatchNotFound(patch.to_string()))?;

    match block.items("value") {
        Some(items) => {
            let context = format!("boundaryField.{}.value", patch);
            decode_value(items, category, &doc.header, &context).map(PatchValue::Stored)
        }
        None => {
            debug!("Patch '{}' (type {:?}) stores no value", patch, block.word("type"));
            Ok(PatchValue::Missing)
        }
    }
}

/// Decodes a value entry: `uniform <elem>` or `nonuniform [List<T>] <list>`.
pub fn decode_value(
    items: &[Item],
    category: FieldCategory,
    header: &Header,
    context: &str,
) -> Result<DecodedField> {
    let format = header.format;
    match items.first().and_then(Item::as_word) {
        Some("uniform") => {
            let element = items.get(1).ok_or_else(|| {
                FoamError::InvalidFormat(format!("{}: 'uniform' without a value", context))
            })?;
            let values = element_values(element, category, context)?;
            debug!("{}: uniform {} value", context, category);
            Ok(DecodedField {
                category,
                storage: StorageMode { distribution: Distribution::Uniform, format },
                count: 1,
                values,
            })
        }
        Some("nonuniform") => {
            if let Some(declared) = items.iter().filter_map(Item::as_word).find_map(|w| {
                w.strip_prefix("List<").and_then(|w| w.strip_suffix('>'))
            }) {
                if FieldCategory::from_type_name(declared) != Some(category) {
                    warn!("{}: list type List<{}> does not match {} field class", context, declared, category);
                }
            }
            let list = items.iter().find_map(Item::as_list).ok_or_else(|| {
                FoamError::InvalidFormat(format!("{}: 'nonuniform' without a list", context))
            })?;
            let (count, values) = decode_list(list, category, header, context)?;
            debug!("{}: nonuniform {} list of {} elements ({:?}, {})", context, category, count, list.form, format);
            Ok(DecodedField {
                category,
                storage: StorageMode {
                    distribution: Distribution::NonUniform(list.form),
                    format,
                },
                count,
                values,
            })
        }
        _ => match (items, category) {
            ([single], FieldCategory::Scalar) if single.as_f64().is_some() => {
                let values = element_values(single, category, context)?;
                Ok(DecodedField {
                    category,
                    storage: StorageMode { distribution: Distribution::Uniform, format },
                    count: 1,
                    values,
                })
            }
            _ => Err(FoamError::InvalidFormat(format!(
                "{}: expected 'uniform' or 'nonuniform' value",
                context
            ))),
        },
    }
}

/// Decodes a counted list of field elements into `(count, flat values)`.
pub fn decode_list(
    list: &List,
    category: FieldCategory,
    header: &Header,
    context: &str,
) -> Result<(usize, Vec<f64>)> {
    let width = category.components();
    match &list.body {
        ListBody::Binary { kind, bytes } => {
            if *kind != ElementKind::Scalars(width) {
                return Err(FoamError::InvalidFormat(format!(
                    "{}: binary list of {:?} where {} elements were expected",
                    context, kind, category
                )));
            }
            let count = list.count.unwrap_or(0);
            let expected = (count * width * header.arch.scalar_bytes) as u64;
            if bytes.len() as u64 != expected {
                return Err(FoamError::SizeMismatch {
                    context: context.to_string(),
                    expected,
                    found: bytes.len() as u64,
                });
            }
            trace!("{}: unpacking {} bytes as {} scalars", context, bytes.len(), count * width);
            let values = binary::unpack_scalars(bytes, &header.arch)?;
            Ok((count, values))
        }
        ListBody::Items(items) => {
            let count = list.count.unwrap_or(items.len());
            if items.len() != count {
                return Err(FoamError::CountMismatch {
                    item_type: "field elements",
                    expected: count as u64,
                    found: items.len() as u64,
                });
            }
            let mut values = Vec::with_capacity(count * width);
            for item in items {
                values.extend(element_values(item, category, context)?);
            }
            Ok((count, values))
        }
        ListBody::Repeated(item) => {
            let count = list.count.unwrap_or(1);
            let element = element_values(item, category, context)?;
            Ok((count, element.repeat(count)))
        }
    }
}

/// Values of one ascii element: a bare number for scalars, `( ... )` of
/// `components` numbers otherwise.
fn element_values(item: &Item, category: FieldCategory, context: &str) -> Result<Vec<f64>> {
    let width = category.components();
    if width == 1 {
        if let Some(v) = item.as_f64() {
            return Ok(vec![v]);
        }
    }
    let numbers = match item.as_list().map(|l| &l.body) {
        Some(ListBody::Items(inner)) => inner
            .iter()
            .map(Item::as_f64)
            .collect::<Option<Vec<f64>>>()
            .ok_or_else(|| FoamError::InvalidFormat(format!("{}: non-numeric component in {:?}", context, item)))?,
        _ => {
            return Err(FoamError::InvalidFormat(format!(
                "{}: expected a {} element, found {:?}",
                context, category, item
            )))
        }
    };
    if numbers.len() != width {
        return Err(FoamError::InvalidFormat(format!(
            "{}: {} element has {} components, expected {}",
            context,
            category,
            numbers.len(),
            width
        )));
    }
    Ok(numbers)
}

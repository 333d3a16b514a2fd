//! Parsers for the `constant/polyMesh` topology files.
//!
//! | File        | Class                          | Content                         |
//! |-------------|--------------------------------|---------------------------------|
//! | `points`    | `vectorField`                  | `N ( (x y z) ... )`             |
//! | `faces`     | `faceList` / `faceCompactList` | point ids per face              |
//! | `owner`     | `labelList`                    | owning cell per face            |
//! | `neighbour` | `labelList`                    | neighbour cell per internal face|
//! | `boundary`  | `polyBoundaryMesh`             | `N ( name { ... } ... )`        |
//!
//! Binary `faces` files use the compact form: a list of `N+1` cumulative
//! offsets followed by the flat list of point ids, so that face `i` spans
//! `ids[offsets[i]..offsets[i+1]]`.

use log::{debug, trace};
use ndarray::{Array2, ArrayView1, Axis};

use super::dictionary::{Dictionary, Document, Item, List, ListBody};
use super::field;
use crate::foam::codec::binary;
use crate::foam::types::error::{FoamError, Result};
use crate::foam::types::models::{ElementKind, FieldCategory};

/// Point coordinates, one row per point id.
#[derive(Debug, Clone, PartialEq)]
pub struct Points {
    coords: Array2<f64>,
}

impl Points {
    pub fn from_interleaved(values: Vec<f64>) -> Result<Self> {
        let n = values.len() / 3;
        let coords = Array2::from_shape_vec((n, 3), values)
            .map_err(|e| FoamError::InvalidFormat(format!("Point coordinates are not xyz triples: {}", e)))?;
        Ok(Self { coords })
    }

    pub fn len(&self) -> usize {
        self.coords.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The `n × 3` coordinate array.
    pub fn coords(&self) -> &Array2<f64> {
        &self.coords
    }

    pub fn x(&self) -> ArrayView1<'_, f64> {
        self.coords.index_axis(Axis(1), 0)
    }

    pub fn y(&self) -> ArrayView1<'_, f64> {
        self.coords.index_axis(Axis(1), 1)
    }

    pub fn z(&self) -> ArrayView1<'_, f64> {
        self.coords.index_axis(Axis(1), 2)
    }

    pub fn point(&self, id: usize) -> Option<[f64; 3]> {
        (id < self.len()).then(|| [self.coords[[id, 0]], self.coords[[id, 1]], self.coords[[id, 2]]])
    }
}

/// Face-to-point connectivity in compressed-row form.
#[derive(Debug, Clone, PartialEq)]
pub struct Faces {
    offsets: Vec<usize>,
    point_ids: Vec<usize>,
}

impl Faces {
    /// Builds faces from cumulative offsets and flat point ids.
    pub fn from_compact(offsets: Vec<usize>, point_ids: Vec<usize>) -> Result<Self> {
        let offsets = if offsets.is_empty() { vec![0] } else { offsets };
        if offsets[0] != 0 {
            return Err(FoamError::InvalidFormat(format!("Face offsets start at {}, not 0", offsets[0])));
        }
        if let Some(i) = offsets.windows(2).position(|w| w[1] < w[0]) {
            return Err(FoamError::InvalidFormat(format!("Face offsets decrease at face {}", i)));
        }
        let last = offsets[offsets.len() - 1];
        if last != point_ids.len() {
            return Err(FoamError::CountMismatch {
                item_type: "face point ids",
                expected: last as u64,
                found: point_ids.len() as u64,
            });
        }
        Ok(Self { offsets, point_ids })
    }

    pub fn len(&self) -> usize {
        self.offsets.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Point ids of face `id`, in stored order.
    pub fn face(&self, id: usize) -> Option<&[usize]> {
        let start = *self.offsets.get(id)?;
        let end = *self.offsets.get(id + 1)?;
        Some(&self.point_ids[start..end])
    }

    pub fn iter(&self) -> impl Iterator<Item = &[usize]> {
        self.offsets.windows(2).map(move |w| &self.point_ids[w[0]..w[1]])
    }
}

/// Owning cell of every face.
#[derive(Debug, Clone, PartialEq)]
pub struct Owner {
    pub cells: Vec<usize>,
    /// `max(cells) + 1`.
    pub n_cells: usize,
}

impl Owner {
    pub fn new(cells: Vec<usize>) -> Self {
        let n_cells = cells.iter().max().map_or(0, |m| m + 1);
        Self { cells, n_cells }
    }
}

/// One boundary patch from the `boundary` file.
#[derive(Debug, Clone, PartialEq)]
pub struct Patch {
    pub name: String,
    pub patch_type: String,
    pub start_face: usize,
    pub n_faces: usize,
    pub in_groups: Vec<String>,
}

impl Patch {
    /// Face ids covered by this patch.
    pub fn faces(&self) -> std::ops::Range<usize> {
        self.start_face..self.start_face + self.n_faces
    }
}

/// Ordered list of boundary patches.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BoundaryMesh {
    pub patches: Vec<Patch>,
}

impl BoundaryMesh {
    pub fn get(&self, name: &str) -> Option<&Patch> {
        self.patches.iter().find(|p| p.name == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.patches.iter().map(|p| p.name.as_str())
    }

    /// Checks that patch ranges are disjoint, lie within `n_faces` and,
    /// when known, start at or after the last internal face.
    pub fn validate(&self, n_faces: usize, n_internal_faces: Option<usize>) -> Result<()> {
        let mut sorted: Vec<&Patch> = self.patches.iter().collect();
        sorted.sort_by_key(|p| p.start_face);
        for patch in &sorted {
            if patch.start_face + patch.n_faces > n_faces {
                return Err(FoamError::InvalidFormat(format!(
                    "Patch '{}' spans faces {:?} but the mesh has {} faces",
                    patch.name,
                    patch.faces(),
                    n_faces
                )));
            }
            if let Some(n_internal) = n_internal_faces {
                if patch.n_faces > 0 && patch.start_face < n_internal {
                    return Err(FoamError::InvalidFormat(format!(
                        "Patch '{}' starts at face {} inside the {} internal faces",
                        patch.name, patch.start_face, n_internal
                    )));
                }
            }
        }
        for pair in sorted.windows(2) {
            if pair[0].start_face + pair[0].n_faces > pair[1].start_face && pair[1].n_faces > 0 {
                return Err(FoamError::InvalidFormat(format!(
                    "Patches '{}' and '{}' overlap",
                    pair[0].name, pair[1].name
                )));
            }
        }
        Ok(())
    }
}

fn first_list<'d>(doc: &'d Document, what: &str) -> Result<&'d List> {
    doc.lists.first().ok_or_else(|| {
        FoamError::InvalidFormat(format!("{} file '{}' contains no list", what, doc.header.object))
    })
}

/// Decodes a list of non-negative integer labels.
pub fn decode_labels(list: &List, doc: &Document, item_type: &'static str) -> Result<Vec<usize>> {
    let labels = match &list.body {
        ListBody::Binary { kind: ElementKind::Label, bytes } => binary::unpack_labels(bytes, &doc.header.arch)?,
        ListBody::Binary { kind, .. } => {
            return Err(FoamError::InvalidFormat(format!("{}: binary list of {:?}, expected labels", item_type, kind)))
        }
        ListBody::Items(items) => items
            .iter()
            .map(|item| {
                item.as_word().and_then(|w| w.parse::<usize>().ok()).ok_or_else(|| {
                    FoamError::InvalidFormat(format!("{}: invalid label {:?}", item_type, item))
                })
            })
            .collect::<Result<Vec<usize>>>()?,
        ListBody::Repeated(item) => {
            let label = item.as_word().and_then(|w| w.parse::<usize>().ok()).ok_or_else(|| {
                FoamError::InvalidFormat(format!("{}: invalid label {:?}", item_type, item))
            })?;
            vec![label; list.count.unwrap_or(1)]
        }
    };
    if let Some(count) = list.count {
        if labels.len() != count {
            return Err(FoamError::CountMismatch {
                item_type,
                expected: count as u64,
                found: labels.len() as u64,
            });
        }
    }
    Ok(labels)
}

pub fn parse_points(doc: &Document) -> Result<Points> {
    let list = first_list(doc, "points")?;
    let (count, values) = field::decode_list(list, FieldCategory::Vector, &doc.header, "points")?;
    debug!("Parsed {} points", count);
    Points::from_interleaved(values)
}

pub fn parse_faces(doc: &Document) -> Result<Faces> {
    let faces = if doc.header.class == "faceCompactList" {
        let (offsets, ids) = match doc.lists.as_slice() {
            [offsets, ids, ..] => (offsets, ids),
            _ => {
                return Err(FoamError::InvalidFormat(
                    "faceCompactList needs an offsets list and a point id list".to_string(),
                ))
            }
        };
        let offsets = decode_labels(offsets, doc, "face offsets")?;
        let ids = decode_labels(ids, doc, "face point ids")?;
        trace!("Compact faces: {} offsets, {} point ids", offsets.len(), ids.len());
        Faces::from_compact(offsets, ids)?
    } else {
        let list = first_list(doc, "faces")?;
        let ListBody::Items(items) = &list.body else {
            return Err(FoamError::InvalidFormat("faceList body is not a list of faces".to_string()));
        };
        if let Some(count) = list.count {
            if items.len() != count {
                return Err(FoamError::CountMismatch {
                    item_type: "faces",
                    expected: count as u64,
                    found: items.len() as u64,
                });
            }
        }
        let mut offsets = Vec::with_capacity(items.len() + 1);
        let mut ids = Vec::new();
        offsets.push(0);
        for item in items {
            let face = item
                .as_list()
                .ok_or_else(|| FoamError::InvalidFormat(format!("Expected a face point list, found {:?}", item)))?;
            ids.extend(decode_labels(face, doc, "face point ids")?);
            offsets.push(ids.len());
        }
        Faces::from_compact(offsets, ids)?
    };
    debug!("Parsed {} faces", faces.len());
    Ok(faces)
}

pub fn parse_owner(doc: &Document) -> Result<Owner> {
    let cells = decode_labels(first_list(doc, "owner")?, doc, "owner labels")?;
    let owner = Owner::new(cells);
    debug!("Parsed owner of {} faces, {} cells", owner.cells.len(), owner.n_cells);
    Ok(owner)
}

pub fn parse_neighbour(doc: &Document) -> Result<Vec<usize>> {
    let cells = decode_labels(first_list(doc, "neighbour")?, doc, "neighbour labels")?;
    debug!("Parsed neighbour of {} internal faces", cells.len());
    Ok(cells)
}

fn required_label(dict: &Dictionary, patch: &str, key: &str) -> Result<usize> {
    let word = dict.word(key).ok_or_else(|| FoamError::MissingEntry {
        context: format!("boundary patch '{}'", patch),
        key: key.to_string(),
    })?;
    word.parse().map_err(|_| {
        FoamError::InvalidFormat(format!("Patch '{}': {} is not a label: {}", patch, key, word))
    })
}

/// Parses the list of named patch dictionaries in the `boundary` file.
pub fn parse_boundary(doc: &Document) -> Result<BoundaryMesh> {
    let list = first_list(doc, "boundary")?;
    let ListBody::Items(items) = &list.body else {
        return Err(FoamError::InvalidFormat("boundary body is not a list of patches".to_string()));
    };

    let mut patches = Vec::new();
    let mut iter = items.iter();
    while let Some(item) = iter.next() {
        let name = item
            .as_word()
            .ok_or_else(|| FoamError::InvalidFormat(format!("Expected a patch name, found {:?}", item)))?;
        let dict = iter
            .next()
            .and_then(Item::as_dict)
            .ok_or_else(|| FoamError::InvalidFormat(format!("Patch '{}' has no dictionary", name)))?;

        let patch_type = dict
            .word("type")
            .ok_or_else(|| FoamError::MissingEntry {
                context: format!("boundary patch '{}'", name),
                key: "type".to_string(),
            })?
            .to_string();
        let in_groups = dict
            .items("inGroups")
            .and_then(|items| items.iter().find_map(Item::as_list))
            .map(|l| match &l.body {
                ListBody::Items(groups) => groups.iter().filter_map(Item::as_word).map(str::to_string).collect(),
                _ => Vec::new(),
            })
            .unwrap_or_default();

        patches.push(Patch {
            name: name.to_string(),
            patch_type,
            start_face: required_label(dict, name, "startFace")?,
            n_faces: required_label(dict, name, "nFaces")?,
            in_groups,
        });
    }

    if let Some(count) = list.count {
        if patches.len() != count {
            return Err(FoamError::CountMismatch {
                item_type: "boundary patches",
                expected: count as u64,
                found: patches.len() as u64,
            });
        }
    }
    debug!("Parsed {} boundary patches", patches.len());
    Ok(BoundaryMesh { patches })
}

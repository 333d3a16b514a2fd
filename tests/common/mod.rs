#![allow(dead_code)]

use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::TempDir;

/// A throwaway case directory.
pub struct Case {
    dir: TempDir,
}

impl Case {
    pub fn new() -> Self {
        Self { dir: TempDir::new().unwrap() }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn write(&self, rel: &str, content: impl AsRef<[u8]>) {
        let path = self.dir.path().join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    /// Writes `rel.gz` holding the gzipped content.
    pub fn write_gz(&self, rel: &str, content: impl AsRef<[u8]>) {
        let path = self.dir.path().join(format!("{}.gz", rel));
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        let mut encoder = GzEncoder::new(fs::File::create(path).unwrap(), Compression::default());
        encoder.write_all(content.as_ref()).unwrap();
        encoder.finish().unwrap();
    }

    pub fn write_mesh(&self, name: &str, content: impl AsRef<[u8]>) {
        self.write(&format!("constant/polyMesh/{}", name), content);
    }
}

pub fn header_with_arch(format: &str, class: &str, object: &str, arch: &str) -> String {
    format!(
        "/*--------------------------------*- C++ -*----------------------------------*\\\n\
         | =========                 |                                                 |\n\
         \\*---------------------------------------------------------------------------*/\n\
         FoamFile\n{{\n    version     2.0;\n    format      {};\n    arch        \"{}\";\n    \
         class       {};\n    location    \"0\";\n    object      {};\n}}\n\
         // * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * //\n\n",
        format, arch, class, object
    )
}

pub fn header(format: &str, class: &str, object: &str) -> String {
    header_with_arch(format, class, object, "LSB;label=32;scalar=64")
}

/// An ascii field file with the given internal field and boundaryField body.
pub fn ascii_field(class: &str, object: &str, internal: &str, boundary: &str) -> String {
    format!(
        "{}dimensions      [0 1 -1 0 0 0 0];\n\ninternalField   {};\n\nboundaryField\n{{\n{}\n}}\n",
        header("ascii", class, object),
        internal,
        boundary
    )
}

/// `nonuniform List<type> N(` + packed little-endian doubles + `)`.
pub fn binary_field(class: &str, object: &str, type_name: &str, count: usize, values: &[f64]) -> Vec<u8> {
    let mut out = header("binary", class, object).into_bytes();
    out.extend_from_slice(b"dimensions      [0 0 0 0 0 0 0];\n\n");
    out.extend_from_slice(format!("internalField   nonuniform List<{}> {}\n(", type_name, count).as_bytes());
    out.extend(le_f64(values));
    out.extend_from_slice(b")\n;\n\nboundaryField\n{\n    walls\n    {\n        type zeroGradient;\n    }\n}\n");
    out
}

pub fn le_f64(values: &[f64]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_le_bytes()).collect()
}

pub fn le_i32(values: &[i32]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_le_bytes()).collect()
}

fn ascii_labels(labels: &[usize]) -> String {
    let body: Vec<String> = labels.iter().map(|l| l.to_string()).collect();
    format!("{}\n(\n{}\n)\n", labels.len(), body.join("\n"))
}

fn ascii_points(points: &[[f64; 3]]) -> String {
    let body: Vec<String> = points.iter().map(|p| format!("({} {} {})", p[0], p[1], p[2])).collect();
    format!("{}\n(\n{}\n)\n", points.len(), body.join("\n"))
}

fn ascii_faces(faces: &[&[usize]]) -> String {
    let body: Vec<String> = faces
        .iter()
        .map(|f| {
            let ids: Vec<String> = f.iter().map(|i| i.to_string()).collect();
            format!("{}({})", f.len(), ids.join(" "))
        })
        .collect();
    format!("{}\n(\n{}\n)\n", faces.len(), body.join("\n"))
}

/// `(name, type, startFace, nFaces)`
pub fn ascii_boundary(patches: &[(&str, &str, usize, usize)]) -> String {
    let mut out = header("ascii", "polyBoundaryMesh", "boundary");
    out.push_str(&format!("{}\n(\n", patches.len()));
    for (name, kind, start, n) in patches {
        out.push_str(&format!(
            "    {}\n    {{\n        type            {};\n        inGroups        List<word> 1({});\n        \
             nFaces          {};\n        startFace       {};\n    }}\n",
            name, kind, kind, n, start
        ));
    }
    out.push_str(")\n");
    out
}

pub const UNIT_HEX_POINTS: [[f64; 3]; 8] = [
    [0.0, 0.0, 0.0],
    [1.0, 0.0, 0.0],
    [1.0, 1.0, 0.0],
    [0.0, 1.0, 0.0],
    [0.0, 0.0, 1.0],
    [1.0, 0.0, 1.0],
    [1.0, 1.0, 1.0],
    [0.0, 1.0, 1.0],
];

pub const UNIT_HEX_FACES: [[usize; 4]; 6] = [
    [0, 3, 2, 1],
    [4, 5, 6, 7],
    [0, 1, 5, 4],
    [3, 7, 6, 2],
    [0, 4, 7, 3],
    [1, 2, 6, 5],
];

/// One unit cube cell with a single `walls` patch of 6 faces.
pub fn write_unit_hex(case: &Case) {
    let faces: Vec<&[usize]> = UNIT_HEX_FACES.iter().map(|f| &f[..]).collect();
    case.write_mesh("points", header("ascii", "vectorField", "points") + &ascii_points(&UNIT_HEX_POINTS));
    case.write_mesh("faces", header("ascii", "faceList", "faces") + &ascii_faces(&faces));
    case.write_mesh("owner", header("ascii", "labelList", "owner") + &ascii_labels(&[0; 6]));
    case.write_mesh("neighbour", header("ascii", "labelList", "neighbour") + &ascii_labels(&[]));
    case.write_mesh("boundary", ascii_boundary(&[("walls", "wall", 0, 6)]));
}

/// The unit hex written in binary, with compact faces.
pub fn write_unit_hex_binary(case: &Case) {
    let coords: Vec<f64> = UNIT_HEX_POINTS.iter().flatten().copied().collect();
    let offsets: Vec<i32> = (0..=6).map(|i| i * 4).collect();
    let ids: Vec<i32> = UNIT_HEX_FACES.iter().flatten().map(|&i| i as i32).collect();

    let mut points = header("binary", "vectorField", "points").into_bytes();
    points.extend_from_slice(b"8\n(");
    points.extend(le_f64(&coords));
    points.extend_from_slice(b")\n");
    case.write_mesh("points", points);

    let mut faces = header("binary", "faceCompactList", "faces").into_bytes();
    faces.extend_from_slice(b"7\n(");
    faces.extend(le_i32(&offsets));
    faces.extend_from_slice(b")\n\n24\n(");
    faces.extend(le_i32(&ids));
    faces.extend_from_slice(b")\n");
    case.write_mesh("faces", faces);

    let mut owner = header("binary", "labelList", "owner").into_bytes();
    owner.extend_from_slice(b"6\n(");
    owner.extend(le_i32(&[0; 6]));
    owner.extend_from_slice(b")\n");
    case.write_mesh("owner", owner);

    case.write_mesh("boundary", ascii_boundary(&[("walls", "wall", 0, 6)]));
}

/// Two unit cells side by side along x, sharing face 0.
///
/// Patches: `left` (face 1, cell 0), `right` (face 2, cell 1) and
/// `walls` (faces 3..11, alternating cells 0 and 1).
pub fn write_two_cells(case: &Case) {
    let mut points = Vec::new();
    for z in [0.0, 1.0] {
        for y in [0.0, 1.0] {
            for x in [0.0, 1.0, 2.0] {
                points.push([x, y, z]);
            }
        }
    }
    let faces: [&[usize]; 11] = [
        &[1, 4, 10, 7],
        &[0, 6, 9, 3],
        &[2, 5, 11, 8],
        &[0, 3, 4, 1],
        &[1, 4, 5, 2],
        &[6, 7, 10, 9],
        &[7, 8, 11, 10],
        &[0, 1, 7, 6],
        &[1, 2, 8, 7],
        &[3, 9, 10, 4],
        &[4, 10, 11, 5],
    ];
    case.write_mesh("points", header("ascii", "vectorField", "points") + &ascii_points(&points));
    case.write_mesh("faces", header("ascii", "faceList", "faces") + &ascii_faces(&faces));
    case.write_mesh(
        "owner",
        header("ascii", "labelList", "owner") + &ascii_labels(&[0, 0, 1, 0, 1, 0, 1, 0, 1, 0, 1]),
    );
    case.write_mesh("neighbour", header("ascii", "labelList", "neighbour") + &ascii_labels(&[1]));
    case.write_mesh(
        "boundary",
        ascii_boundary(&[("left", "patch", 1, 1), ("right", "patch", 2, 1), ("walls", "wall", 3, 8)]),
    );
}

/// Two cells where cell 1 owns only its far face, so its owned faces miss
/// the points of the shared face.
pub fn write_open_two_cells(case: &Case) {
    write_two_cells(case);
    let faces: [&[usize]; 2] = [&[1, 4, 10, 7], &[2, 5, 11, 8]];
    case.write_mesh("faces", header("ascii", "faceList", "faces") + &ascii_faces(&faces));
    case.write_mesh("owner", header("ascii", "labelList", "owner") + &ascii_labels(&[0, 1]));
    case.write_mesh("boundary", ascii_boundary(&[("right", "patch", 1, 1)]));
}

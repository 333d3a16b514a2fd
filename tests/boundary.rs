mod common;

use common::{ascii_field, write_two_cells, Case};
use foam_reader::{Diagnostic, FieldOptions, FoamCase, FoamError};

const T_BOUNDARY: &str = "    left\n    {\n        type zeroGradient;\n    }\n\
    right\n    {\n        type zeroGradient;\n    }\n\
    walls\n    {\n        type fixedValue;\n        value uniform 300;\n    }";

fn two_cell_case() -> Case {
    let case = Case::new();
    write_two_cells(&case);
    case.write(
        "0/T",
        ascii_field("volScalarField", "T", "nonuniform List<scalar> 2(280 290)", T_BOUNDARY),
    );
    case
}

#[test]
fn test_missing_patch_value_falls_back_to_owner_cells() {
    let case = two_cell_case();
    let foam = FoamCase::new(case.path()).unwrap();

    let left = foam.read_scalar("0", "T", &FieldOptions::default().boundary("left")).unwrap();
    assert_eq!(left.to_flat(), vec![280.0]);
    assert_eq!(
        left.diagnostics,
        vec![Diagnostic::BoundaryFallback { patch: "left".to_string(), faces: 1 }]
    );

    let right = foam.read_scalar("0", "T", &FieldOptions::default().boundary("right")).unwrap();
    assert_eq!(right.to_flat(), vec![290.0]);
    assert_eq!(right.count, 1);
}

#[test]
fn test_stored_patch_value_is_used() {
    let case = two_cell_case();
    let foam = FoamCase::new(case.path()).unwrap();

    let walls = foam.read_scalar("0", "T", &FieldOptions::default().boundary("walls")).unwrap();
    assert!(walls.is_uniform());
    assert_eq!(walls.to_flat(), vec![300.0]);
    assert!(!walls
        .diagnostics
        .iter()
        .any(|d| matches!(d, Diagnostic::BoundaryFallback { .. })));
}

#[test]
fn test_vector_fallback_copies_all_components() {
    let case = Case::new();
    write_two_cells(&case);
    case.write(
        "0/U",
        ascii_field(
            "volVectorField",
            "U",
            "nonuniform List<vector> 2((1 0 0) (2 0 -1))",
            "    \".*\"\n    {\n        type slip;\n    }",
        ),
    );
    let foam = FoamCase::new(case.path()).unwrap();

    let walls = foam.read_vector("0", "U", &FieldOptions::default().boundary("walls")).unwrap();
    assert_eq!(walls.count, 8);
    assert_eq!(walls.data.shape(), &[3, 8]);
    let ux: Vec<f64> = walls.component(0).unwrap().iter().copied().collect();
    assert_eq!(ux, vec![1.0, 2.0, 1.0, 2.0, 1.0, 2.0, 1.0, 2.0]);
    let uz: Vec<f64> = walls.component(2).unwrap().iter().copied().collect();
    assert_eq!(uz, vec![0.0, -1.0, 0.0, -1.0, 0.0, -1.0, 0.0, -1.0]);

    let reshaped = foam
        .read_vector("0", "U", &FieldOptions::default().boundary("walls").shape(vec![2, 4]))
        .unwrap();
    assert_eq!(reshaped.data.shape(), &[3, 2, 4]);
    assert_eq!(reshaped.data[[0, 1, 3]], 2.0);
}

#[test]
fn test_pattern_patch_keys() {
    let case = Case::new();
    write_two_cells(&case);
    case.write(
        "0/p",
        ascii_field(
            "volScalarField",
            "p",
            "nonuniform List<scalar> 2(1 2)",
            "    \".*\"\n    {\n        type zeroGradient;\n    }\n    \
             \"(left|right)\"\n    {\n        type fixedValue;\n        value uniform 5;\n    }\n    \
             right\n    {\n        type fixedValue;\n        value uniform 7;\n    }",
        ),
    );
    let foam = FoamCase::new(case.path()).unwrap();
    let read = |patch: &str| {
        foam.read_scalar("0", "p", &FieldOptions::default().boundary(patch))
            .unwrap()
            .to_flat()
    };

    assert_eq!(read("right"), vec![7.0]);
    assert_eq!(read("left"), vec![5.0]);
    assert_eq!(read("walls"), vec![1.0, 2.0, 1.0, 2.0, 1.0, 2.0, 1.0, 2.0]);
}

#[test]
fn test_uniform_internal_field_fallback() {
    let case = Case::new();
    write_two_cells(&case);
    case.write("0/k", ascii_field("volScalarField", "k", "uniform 0.1", "    \".*\" { type zeroGradient; }"));
    let foam = FoamCase::new(case.path()).unwrap();

    let walls = foam.read_scalar("0", "k", &FieldOptions::default().boundary("walls")).unwrap();
    assert!(walls.is_uniform());
    assert_eq!(walls.to_flat(), vec![0.1]);
    assert!(walls
        .diagnostics
        .contains(&Diagnostic::BoundaryFallback { patch: "walls".to_string(), faces: 8 }));
    assert!(walls.diagnostics.iter().any(|d| matches!(d, Diagnostic::UniformField { .. })));
}

#[test]
fn test_unknown_patch() {
    let case = two_cell_case();
    let foam = FoamCase::new(case.path()).unwrap();

    assert!(matches!(
        foam.read_field("0", "T", &FieldOptions::default().boundary("inlet")),
        Err(FoamError::PatchNotFound(name)) if name == "inlet"
    ));
}

#[test]
fn test_pattern_matching_patch_absent_from_mesh() {
    let case = Case::new();
    write_two_cells(&case);
    case.write("0/k", ascii_field("volScalarField", "k", "uniform 0.1", "    \".*\" { type zeroGradient; }"));
    let foam = FoamCase::new(case.path()).unwrap();

    assert!(matches!(
        foam.read_field("0", "k", &FieldOptions::default().boundary("inlet")),
        Err(FoamError::PatchNotFound(_))
    ));
}

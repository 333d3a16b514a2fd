mod common;

use common::{ascii_field, binary_field, header_with_arch, Case};
use foam_reader::foam::models::{Distribution, ListForm, StreamFormat};
use foam_reader::{Diagnostic, FieldCategory, FieldOptions, FoamCase, FoamError};
use proptest::prelude::*;

const WALLS: &str = "    walls\n    {\n        type zeroGradient;\n    }";

fn scalar_list(values: &[f64]) -> String {
    let body: Vec<String> = values.iter().map(|v| v.to_string()).collect();
    format!("nonuniform List<scalar>\n{}\n(\n{}\n)\n", values.len(), body.join("\n"))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn ascii_scalar_field_decodes_every_value(values in prop::collection::vec(-1.0e6f64..1.0e6, 1..40)) {
        let case = Case::new();
        case.write("0/p", ascii_field("volScalarField", "p", &scalar_list(&values), WALLS));

        let foam = FoamCase::new(case.path()).unwrap();
        let field = foam.read_field("0", "p", &FieldOptions::default()).unwrap();

        prop_assert_eq!(field.category, FieldCategory::Scalar);
        prop_assert_eq!(field.count, values.len());
        prop_assert_eq!(field.data.shape(), &[values.len()][..]);
        prop_assert_eq!(field.to_flat(), values);
        prop_assert!(field.diagnostics.is_empty());
    }

    #[test]
    fn binary_field_round_trips_for_every_category(
        index in 0usize..4,
        count in 1usize..25,
        seed in prop::collection::vec(-1.0e3f64..1.0e3, 9 * 25),
    ) {
        let category = FieldCategory::ALL[index];
        let (class, type_name) = match category {
            FieldCategory::Scalar => ("volScalarField", "scalar"),
            FieldCategory::Vector => ("volVectorField", "vector"),
            FieldCategory::SymmTensor => ("volSymmTensorField", "symmTensor"),
            FieldCategory::Tensor => ("volTensorField", "tensor"),
        };
        let width = category.components();
        let values = &seed[..count * width];

        let case = Case::new();
        case.write("1.5/q", binary_field(class, "q", type_name, count, values));

        let foam = FoamCase::new(case.path()).unwrap();
        let field = foam.read_field("1.5", "q", &FieldOptions::default()).unwrap();

        prop_assert_eq!(field.category, category);
        prop_assert_eq!(field.storage.format, StreamFormat::Binary);
        prop_assert_eq!(field.count, count);
        if width == 1 {
            prop_assert_eq!(field.data.shape(), &[count][..]);
        } else {
            prop_assert_eq!(field.data.shape(), &[width, count][..]);
        }
        prop_assert_eq!(field.to_flat(), values.to_vec());
    }
}

#[test]
fn test_uniform_vector_is_broadcast_element() {
    let case = Case::new();
    case.write("0/U", ascii_field("volVectorField", "U", "uniform (1 2 3)", WALLS));
    let foam = FoamCase::new(case.path()).unwrap();

    let field = foam.read_vector("0", "U", &FieldOptions::default()).unwrap();
    assert!(field.is_uniform());
    assert_eq!(field.count, 1);
    assert_eq!(field.data.shape(), &[3, 1]);
    assert_eq!(field.to_flat(), vec![1.0, 2.0, 3.0]);
    assert_eq!(
        field.diagnostics,
        vec![Diagnostic::UniformField { category: FieldCategory::Vector }]
    );

    let reshaped = foam
        .read_vector("0", "U", &FieldOptions::default().shape(vec![2, 2]))
        .unwrap();
    assert_eq!(reshaped.data.shape(), &[3, 1]);
    assert!(reshaped
        .diagnostics
        .contains(&Diagnostic::ReshapeIgnored { requested: vec![2, 2] }));
}

#[test]
fn test_short_and_long_list_forms() {
    let case = Case::new();
    case.write(
        "0/short",
        ascii_field("volScalarField", "short", "nonuniform List<scalar> 3(1 2 3)", WALLS),
    );
    case.write("0/long", ascii_field("volScalarField", "long", &scalar_list(&[1.0, 2.0, 3.0]), WALLS));
    let foam = FoamCase::new(case.path()).unwrap();

    let short = foam.read_scalar("0", "short", &FieldOptions::default()).unwrap();
    let long = foam.read_scalar("0", "long", &FieldOptions::default()).unwrap();

    assert_eq!(short.storage.distribution, Distribution::NonUniform(ListForm::Short));
    assert_eq!(long.storage.distribution, Distribution::NonUniform(ListForm::Long));
    assert_eq!(short.to_flat(), long.to_flat());
}

#[test]
fn test_vector_components_and_shape() {
    let case = Case::new();
    case.write(
        "0/U",
        ascii_field(
            "volVectorField",
            "U",
            "nonuniform List<vector> 4((1 10 100) (2 20 200) (3 30 300) (4 40 400))",
            WALLS,
        ),
    );
    let foam = FoamCase::new(case.path()).unwrap();

    let field = foam.read_vector("0", "U", &FieldOptions::default().shape(vec![2, 2])).unwrap();
    assert_eq!(field.data.shape(), &[3, 2, 2]);
    assert_eq!(field.data[[1, 1, 0]], 20.0);
    assert_eq!(field.data[[2, 0, 1]], 300.0);

    let uy = field.component(1).unwrap();
    assert_eq!(uy.shape(), &[2, 2]);
    assert_eq!(uy[[1, 0]], 20.0);
    assert_eq!(uy[[0, 1]], 30.0);
    assert!(field.component(3).is_none());
}

#[test]
fn test_repeated_list() {
    let case = Case::new();
    case.write("0/k", ascii_field("volScalarField", "k", "nonuniform List<scalar> 4{0.25}", WALLS));
    let foam = FoamCase::new(case.path()).unwrap();

    let field = foam.read_scalar("0", "k", &FieldOptions::default()).unwrap();
    assert_eq!(field.count, 4);
    assert_eq!(field.to_flat(), vec![0.25; 4]);
}

#[test]
fn test_typed_read_rejects_other_category() {
    let case = Case::new();
    case.write("0/p", ascii_field("volScalarField", "p", "uniform 0", WALLS));
    let foam = FoamCase::new(case.path()).unwrap();

    match foam.read_vector("0", "p", &FieldOptions::default()) {
        Err(FoamError::TypeMismatch { path, expected, found }) => {
            assert!(path.ends_with("0/p"));
            assert_eq!(expected, FieldCategory::Vector);
            assert_eq!(found, FieldCategory::Scalar);
        }
        other => panic!("expected TypeMismatch, got {:?}", other),
    }
    assert!(foam.read_scalar("0", "p", &FieldOptions::default()).is_ok());
}

#[test]
fn test_field_type_detection() {
    let case = Case::new();
    case.write("0/sigma", ascii_field("volSymmTensorField", "sigma", "uniform (1 0 0 1 0 1)", WALLS));
    case.write("0/phi", ascii_field("surfaceScalarField", "phi", "uniform 0", WALLS));
    case.write("0/cells", ascii_field("cellSet", "cells", "uniform 0", WALLS));
    let foam = FoamCase::new(case.path()).unwrap();

    assert_eq!(foam.read_field_type("0", "sigma").unwrap(), FieldCategory::SymmTensor);
    assert_eq!(foam.read_field_type("0", "phi").unwrap(), FieldCategory::Scalar);
    assert!(matches!(
        foam.read_field_type("0", "cells"),
        Err(FoamError::UnsupportedFieldType(class)) if class == "cellSet"
    ));
    assert!(matches!(
        foam.read_field("0", "cells", &FieldOptions::default()),
        Err(FoamError::UnsupportedFieldType(_))
    ));
}

#[test]
fn test_big_endian_single_precision_payload() {
    let values = [1.5f32, -2.25, 1024.0];
    let mut content = header_with_arch("binary", "volScalarField", "T", "MSB;label=32;scalar=32").into_bytes();
    content.extend_from_slice(b"internalField   nonuniform List<scalar> 3(");
    content.extend(values.iter().flat_map(|v| v.to_be_bytes()));
    content.extend_from_slice(b");\nboundaryField\n{\n}\n");

    let case = Case::new();
    case.write("0/T", content);
    let foam = FoamCase::new(case.path()).unwrap();

    let field = foam.read_scalar("0", "T", &FieldOptions::default()).unwrap();
    assert_eq!(field.to_flat(), vec![1.5, -2.25, 1024.0]);
    assert_eq!(field.storage.distribution, Distribution::NonUniform(ListForm::Short));
}

#[test]
fn test_truncated_binary_payload_is_error() {
    let mut content = binary_field("volScalarField", "T", "scalar", 4, &[1.0, 2.0, 3.0, 4.0]);
    let cut = content.len() - 90;
    content.truncate(cut);

    let case = Case::new();
    case.write("0/T", content);
    let foam = FoamCase::new(case.path()).unwrap();

    assert!(foam.read_field("0", "T", &FieldOptions::default()).is_err());
}

#[test]
fn test_count_mismatch_is_error() {
    let case = Case::new();
    case.write("0/p", ascii_field("volScalarField", "p", "nonuniform List<scalar> 3(1 2)", WALLS));
    let foam = FoamCase::new(case.path()).unwrap();

    assert!(matches!(
        foam.read_field("0", "p", &FieldOptions::default()),
        Err(FoamError::CountMismatch { expected: 3, found: 2, .. })
    ));
}

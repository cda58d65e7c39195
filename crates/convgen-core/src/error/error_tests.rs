#![allow(non_snake_case)]

use super::*;
use crate::shape::Shape;
use test_case::test_case;

fn unsupported() -> GenError {
    GenError::UnsupportedShape {
        function: "to_dto".to_string(),
        pair: ShapePair::new(Shape::Unrecognized("sequence".to_string()), Shape::Struct),
    }
}

fn invalid_expression() -> GenError {
    let source = syn::parse_str::<syn::Expr>("a +").unwrap_err();
    GenError::InvalidExpression {
        expr: "a +".to_string(),
        source,
    }
}

#[test]
fn GenError___unsupported_shape___names_function_and_pair() {
    let message = unsupported().to_string();

    assert!(message.contains("to_dto"));
    assert!(message.contains("unknown(sequence) -> Struct"));
}

#[test]
fn GenError___signature___reports_counts() {
    let err = GenError::Signature {
        function: "convert".to_string(),
        params: 2,
        results: 0,
    };

    assert_eq!(
        err.to_string(),
        "invalid signature for `convert`: expected 1 parameter and 1 result, found 2 and 0"
    );
}

#[test]
fn GenError___invalid_expression___keeps_source() {
    use std::error::Error;

    let err = invalid_expression();

    assert!(err.to_string().starts_with("invalid expression `a +`"));
    assert!(err.source().is_some());
}

#[test_case(unsupported(), true ; "unsupported shape")]
#[test_case(GenError::Signature { function: "f".into(), params: 0, results: 1 }, true ; "signature")]
#[test_case(GenError::UnresolvedType { function: "f".into(), ty: "A".into() }, false ; "unresolved type")]
#[test_case(GenError::Config("bad".into()), false ; "config")]
#[test_case(invalid_expression(), false ; "invalid expression")]
fn GenError___is_per_declaration___matches_skippable_variants(err: GenError, expected: bool) {
    assert_eq!(err.is_per_declaration(), expected);
}

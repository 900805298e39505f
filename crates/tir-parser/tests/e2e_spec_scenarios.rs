//! End-to-end scenarios over the full `parse_module` entry point, one test
//! per named scenario plus the error-case properties that need a whole
//! module to trigger (forward branches, duplicate top-level names, and so
//! on). Per-production unit tests live next to their parser module instead.

use tir_common::DataType;
use tir_parser::ast::{InstructionKind, Stage, Type};
use tir_parser::{parse, ParseError};

#[test]
fn e5_function_with_branch() {
    let src = "module \"m\"\nstage canonical\nfunc @f: (i32) -> i32 {\n'entry(%x: i32):\n  branch 'exit(%x: i32)\n'exit(%y: i32):\n  return %y: i32\n}\n";
    let module = parse(src).expect("parses");
    assert_eq!(module.stage, Stage::Canonical);
    let f = &module.functions[0];
    assert_eq!(f.name, "f");
    assert_eq!(f.return_type, Type::scalar(DataType::I32));
    assert_eq!(f.basic_blocks.len(), 2);
    assert_eq!(f.basic_blocks[1].arguments[0].name, "y");
    match &f.basic_blocks[0].instructions[0].kind {
        InstructionKind::Branch(target) => assert_eq!(target.block, 1),
        other => panic!("expected a branch, got {other:?}"),
    }
}

#[test]
fn e6_non_function_type_is_rejected() {
    let src = "module \"m\"\nstage raw\nfunc @f: i32 {\n}\n";
    let err = parse(src).unwrap_err();
    assert!(matches!(err, ParseError::NotFunctionType { .. }));
}

#[test]
fn duplicate_top_level_function_name_is_redefined_identifier() {
    let src = "module \"m\"\nstage raw\nfunc @f: () -> void {\n}\nfunc @f: () -> void {\n}\n";
    let err = parse(src).unwrap_err();
    assert!(matches!(err, ParseError::RedefinedIdentifier { ref name, .. } if name == "f"));
}

#[test]
fn extern_declaration_cannot_have_a_body() {
    let src = "module \"m\"\nstage raw\n[extern]\nfunc @f: (i32) -> i32 {\n}\n";
    let err = parse(src).unwrap_err();
    assert!(matches!(err, ParseError::DeclarationCannotHaveBody { .. }));
}

#[test]
fn use_type_mismatch_against_bound_argument_type() {
    let src = "module \"m\"\nstage raw\nfunc @f: (f64) -> void {\n'entry(%x: f64):\n  retain %x: i32\n}\n";
    let err = parse(src).unwrap_err();
    assert!(matches!(err, ParseError::TypeMismatch { .. }));
}

#[test]
fn anonymous_identifier_out_of_range_is_rejected() {
    let src = "module \"m\"\nstage raw\nfunc @f: () -> i32 {\n'entry:\n  %a = dataTypeCast 1: i32 to i32\n  return #0.5: i32\n}\n";
    let err = parse(src).unwrap_err();
    assert!(matches!(err, ParseError::InvalidAnonymousIdentifierIndex { .. }));
}

#[test]
fn anonymous_identifier_resolves_to_an_unnamed_instruction() {
    let src = "module \"m\"\nstage raw\nfunc @f: () -> i32 {\n'entry:\n  #0.0 = dataTypeCast 1: i32 to i32\n  return #0.0: i32\n}\n";
    let module = parse(src).expect("parses");
    let f = &module.functions[0];
    match &f.basic_blocks[0].instructions[1].kind {
        InstructionKind::Return(Some(value)) => {
            assert_eq!(value.ty, Type::scalar(DataType::I32));
        }
        other => panic!("expected return of a value, got {other:?}"),
    }
}

#[test]
fn bare_return_is_distinguished_from_returning_a_value() {
    let src = "module \"m\"\nstage raw\nfunc @f: () -> void {\n'entry:\n  return\n}\n";
    let module = parse(src).expect("parses");
    let f = &module.functions[0];
    assert!(matches!(&f.basic_blocks[0].instructions[0].kind, InstructionKind::Return(None)));
}

#[test]
fn forward_reference_to_a_later_function_resolves() {
    let src = "module \"m\"\nstage raw\nfunc @a: () -> void {\n'entry:\n  apply @b() : void\n  return\n}\nfunc @b: () -> void {\n'entry:\n  return\n}\n";
    let module = parse(src).expect("parses");
    assert_eq!(module.functions.len(), 2);
}

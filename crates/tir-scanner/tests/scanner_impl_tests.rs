use tir_common::DataType;
use tir_scanner::{tokenize, IdentifierKind, Keyword, Opcode, Punct, TokenKind};

fn kinds(src: &str) -> Vec<TokenKind> {
    tokenize(src)
        .unwrap()
        .into_iter()
        .map(|t| t.kind)
        .collect()
}

#[test]
fn module_header_tokens() {
    let got = kinds("module \"m\"\nstage raw\n");
    assert_eq!(
        got,
        vec![
            TokenKind::Keyword(Keyword::Module),
            TokenKind::StringLiteral("m".to_string()),
            TokenKind::Newline,
            TokenKind::Keyword(Keyword::Stage),
            TokenKind::Keyword(Keyword::Raw),
            TokenKind::Newline,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn global_and_temporary_and_block_identifiers() {
    let got = kinds("@f %x 'entry");
    assert_eq!(
        got,
        vec![
            TokenKind::Identifier {
                kind: IdentifierKind::Global,
                name: "f".to_string()
            },
            TokenKind::Identifier {
                kind: IdentifierKind::Temporary,
                name: "x".to_string()
            },
            TokenKind::Identifier {
                kind: IdentifierKind::BasicBlock,
                name: "entry".to_string()
            },
            TokenKind::Eof,
        ]
    );
}

#[test]
fn type_identifier_is_distinguished_by_leading_case() {
    let got = kinds("%T %x");
    assert_eq!(
        got,
        vec![
            TokenKind::Identifier {
                kind: IdentifierKind::Type,
                name: "T".to_string()
            },
            TokenKind::Identifier {
                kind: IdentifierKind::Temporary,
                name: "x".to_string()
            },
            TokenKind::Eof,
        ]
    );
}

#[test]
fn key_identifier_vs_anonymous_identifier() {
    let got = kinds("#a #0.3");
    assert_eq!(
        got,
        vec![
            TokenKind::Identifier {
                kind: IdentifierKind::Key,
                name: "a".to_string()
            },
            TokenKind::AnonymousIdentifier {
                bb_index: 0,
                inst_index: 3
            },
            TokenKind::Eof,
        ]
    );
}

#[test]
fn data_type_and_opcode_and_punct() {
    let got = kinds("i32 branch -> ,");
    assert_eq!(
        got,
        vec![
            TokenKind::DataType(DataType::I32),
            TokenKind::Opcode(Opcode::Branch),
            TokenKind::Punct(Punct::Arrow),
            TokenKind::Punct(Punct::Comma),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn negative_integer_and_float_literals() {
    let got = kinds("-5 3.25 -1.5e2");
    assert_eq!(
        got,
        vec![
            TokenKind::Integer(-5),
            TokenKind::Float(3.25),
            TokenKind::Float(-150.0),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn string_literal_with_escapes() {
    let got = kinds("\"a\\nb\"");
    assert_eq!(
        got,
        vec![TokenKind::StringLiteral("a\nb".to_string()), TokenKind::Eof]
    );
}

#[test]
fn line_comment_is_skipped() {
    let got = kinds("i32 // a comment\ni64");
    assert_eq!(
        got,
        vec![
            TokenKind::DataType(DataType::I32),
            TokenKind::Newline,
            TokenKind::DataType(DataType::I64),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn unrecognized_word_is_a_lex_error() {
    let err = tokenize("bogus").unwrap_err();
    assert!(err.message.contains("bogus"));
}

#[test]
fn tensor_shape_dimensions_lex_without_surrounding_whitespace() {
    let got = kinds("<4x4xf32>");
    assert_eq!(
        got,
        vec![
            TokenKind::Punct(Punct::LAngle),
            TokenKind::Integer(4),
            TokenKind::Keyword(Keyword::X),
            TokenKind::Integer(4),
            TokenKind::Keyword(Keyword::X),
            TokenKind::DataType(DataType::F32),
            TokenKind::Punct(Punct::RAngle),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn tensor_shape_dimensions_lex_with_surrounding_whitespace() {
    let got = kinds("< 4 x 4 x f32 >");
    assert_eq!(
        got,
        vec![
            TokenKind::Punct(Punct::LAngle),
            TokenKind::Integer(4),
            TokenKind::Keyword(Keyword::X),
            TokenKind::Integer(4),
            TokenKind::Keyword(Keyword::X),
            TokenKind::DataType(DataType::F32),
            TokenKind::Punct(Punct::RAngle),
            TokenKind::Eof,
        ]
    );
}

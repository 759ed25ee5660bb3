//! Unit tests for the lexer module.
//!
//! This module contains tests for tokenization including:
//! - Keywords and identifiers
//! - Numeric literals (integers and floats)
//! - Operators and punctuation
//! - Comments and line tracking
//! - Error cases

use super::{lexer::tokenize, tokens::TokenKind};

#[test]
fn test_tokenize_keywords() {
    let source = "program let in begin end type var static function if then else endif while do enddo for to break return int float array of".to_string();
    let tokens = tokenize(source, Some("test.tiger".to_string())).unwrap();

    assert_eq!(tokens[0].kind, TokenKind::Program);
    assert_eq!(tokens[1].kind, TokenKind::Let);
    assert_eq!(tokens[2].kind, TokenKind::In);
    assert_eq!(tokens[3].kind, TokenKind::Begin);
    assert_eq!(tokens[4].kind, TokenKind::End);
    assert_eq!(tokens[5].kind, TokenKind::Type);
    assert_eq!(tokens[6].kind, TokenKind::Var);
    assert_eq!(tokens[7].kind, TokenKind::Static);
    assert_eq!(tokens[8].kind, TokenKind::Function);
    assert_eq!(tokens[9].kind, TokenKind::If);
    assert_eq!(tokens[10].kind, TokenKind::Then);
    assert_eq!(tokens[11].kind, TokenKind::Else);
    assert_eq!(tokens[12].kind, TokenKind::Endif);
    assert_eq!(tokens[13].kind, TokenKind::While);
    assert_eq!(tokens[14].kind, TokenKind::Do);
    assert_eq!(tokens[15].kind, TokenKind::Enddo);
    assert_eq!(tokens[16].kind, TokenKind::For);
    assert_eq!(tokens[17].kind, TokenKind::To);
    assert_eq!(tokens[18].kind, TokenKind::Break);
    assert_eq!(tokens[19].kind, TokenKind::Return);
    assert_eq!(tokens[20].kind, TokenKind::Int);
    assert_eq!(tokens[21].kind, TokenKind::Float);
    assert_eq!(tokens[22].kind, TokenKind::Array);
    assert_eq!(tokens[23].kind, TokenKind::Of);
    assert_eq!(tokens[24].kind, TokenKind::EOF);
}

#[test]
fn test_tokenize_identifiers() {
    let source = "foo bar baz_123 _underscore programx".to_string();
    let tokens = tokenize(source, Some("test.tiger".to_string())).unwrap();

    assert_eq!(tokens[0].kind, TokenKind::Identifier);
    assert_eq!(tokens[0].value, "foo");
    assert_eq!(tokens[1].kind, TokenKind::Identifier);
    assert_eq!(tokens[1].value, "bar");
    assert_eq!(tokens[2].kind, TokenKind::Identifier);
    assert_eq!(tokens[2].value, "baz_123");
    assert_eq!(tokens[3].kind, TokenKind::Identifier);
    assert_eq!(tokens[3].value, "_underscore");
    // A keyword prefix does not make an identifier reserved
    assert_eq!(tokens[4].kind, TokenKind::Identifier);
    assert_eq!(tokens[4].value, "programx");
    assert_eq!(tokens[5].kind, TokenKind::EOF);
}

#[test]
fn test_tokenize_numbers() {
    let source = "42 3.14 0 100.".to_string();
    let tokens = tokenize(source, Some("test.tiger".to_string())).unwrap();

    assert_eq!(tokens[0].kind, TokenKind::IntLit);
    assert_eq!(tokens[0].value, "42");
    assert_eq!(tokens[1].kind, TokenKind::FloatLit);
    assert_eq!(tokens[1].value, "3.14");
    assert_eq!(tokens[2].kind, TokenKind::IntLit);
    assert_eq!(tokens[2].value, "0");
    assert_eq!(tokens[3].kind, TokenKind::FloatLit);
    assert_eq!(tokens[3].value, "100.");
    assert_eq!(tokens[4].kind, TokenKind::EOF);
}

#[test]
fn test_tokenize_operators() {
    let source = ":= = <> < > <= >= + - * / ** & |".to_string();
    let tokens = tokenize(source, Some("test.tiger".to_string())).unwrap();

    assert_eq!(tokens[0].kind, TokenKind::Assign);
    assert_eq!(tokens[1].kind, TokenKind::Equals);
    assert_eq!(tokens[2].kind, TokenKind::NotEquals);
    assert_eq!(tokens[3].kind, TokenKind::Less);
    assert_eq!(tokens[4].kind, TokenKind::Greater);
    assert_eq!(tokens[5].kind, TokenKind::LessEquals);
    assert_eq!(tokens[6].kind, TokenKind::GreaterEquals);
    assert_eq!(tokens[7].kind, TokenKind::Plus);
    assert_eq!(tokens[8].kind, TokenKind::Dash);
    assert_eq!(tokens[9].kind, TokenKind::Star);
    assert_eq!(tokens[10].kind, TokenKind::Slash);
    assert_eq!(tokens[11].kind, TokenKind::Pow);
    assert_eq!(tokens[12].kind, TokenKind::And);
    assert_eq!(tokens[13].kind, TokenKind::Or);
    assert_eq!(tokens[14].kind, TokenKind::EOF);
}

#[test]
fn test_tokenize_punctuation() {
    let source = "( ) [ ] : ; ,".to_string();
    let tokens = tokenize(source, Some("test.tiger".to_string())).unwrap();

    assert_eq!(tokens[0].kind, TokenKind::OpenParen);
    assert_eq!(tokens[1].kind, TokenKind::CloseParen);
    assert_eq!(tokens[2].kind, TokenKind::OpenBracket);
    assert_eq!(tokens[3].kind, TokenKind::CloseBracket);
    assert_eq!(tokens[4].kind, TokenKind::Colon);
    assert_eq!(tokens[5].kind, TokenKind::Semicolon);
    assert_eq!(tokens[6].kind, TokenKind::Comma);
    assert_eq!(tokens[7].kind, TokenKind::EOF);
}

#[test]
fn test_tokenize_assign_vs_colon() {
    let source = "x : int := 1".to_string();
    let tokens = tokenize(source, Some("test.tiger".to_string())).unwrap();

    assert_eq!(tokens[0].kind, TokenKind::Identifier);
    assert_eq!(tokens[1].kind, TokenKind::Colon);
    assert_eq!(tokens[2].kind, TokenKind::Int);
    assert_eq!(tokens[3].kind, TokenKind::Assign);
    assert_eq!(tokens[4].kind, TokenKind::IntLit);
}

#[test]
fn test_tokenize_pow_vs_star() {
    let source = "a ** b * c".to_string();
    let tokens = tokenize(source, Some("test.tiger".to_string())).unwrap();

    assert_eq!(tokens[1].kind, TokenKind::Pow);
    assert_eq!(tokens[3].kind, TokenKind::Star);
}

#[test]
fn test_tokenize_comments() {
    let source = "x := 5; /* this is a comment */ y := 10;".to_string();
    let tokens = tokenize(source, Some("test.tiger".to_string())).unwrap();

    // Comments should be skipped
    assert_eq!(tokens[0].kind, TokenKind::Identifier);
    assert_eq!(tokens[0].value, "x");
    assert_eq!(tokens[1].kind, TokenKind::Assign);
    assert_eq!(tokens[2].kind, TokenKind::IntLit);
    assert_eq!(tokens[3].kind, TokenKind::Semicolon);
    assert_eq!(tokens[4].kind, TokenKind::Identifier);
    assert_eq!(tokens[4].value, "y");
}

#[test]
fn test_tokenize_multiline_comment_lines() {
    let source = "x\n/* one\ntwo\nthree */\ny".to_string();
    let tokens = tokenize(source, Some("test.tiger".to_string())).unwrap();

    assert_eq!(tokens[0].value, "x");
    assert_eq!(tokens[0].line(), 1);
    assert_eq!(tokens[1].value, "y");
    assert_eq!(tokens[1].line(), 5);
}

#[test]
fn test_tokenize_line_numbers() {
    let source = "program main begin\nvar x : int;\nend".to_string();
    let tokens = tokenize(source, Some("test.tiger".to_string())).unwrap();

    assert_eq!(tokens[0].line(), 1); // program
    assert_eq!(tokens[3].line(), 2); // var
    assert_eq!(tokens[8].line(), 3); // end
}

#[test]
fn test_tokenize_unrecognised_character() {
    let source = "x := @".to_string();
    let result = tokenize(source, Some("test.tiger".to_string()));

    assert!(result.is_err());
    let error = result.err().unwrap();
    assert_eq!(error.kind_name(), "UnrecognisedToken");
    assert_eq!(error.line(), 1);
}

#[test]
fn test_tokenize_unrecognised_character_line() {
    let source = "x := 1\ny := #".to_string();
    let result = tokenize(source, Some("test.tiger".to_string()));

    assert!(result.is_err());
    assert_eq!(result.err().unwrap().line(), 2);
}

#[test]
fn test_tokenize_whitespace_handling() {
    let source = "  x   :=   42  ".to_string();
    let tokens = tokenize(source, Some("test.tiger".to_string())).unwrap();

    assert_eq!(tokens[0].kind, TokenKind::Identifier);
    assert_eq!(tokens[1].kind, TokenKind::Assign);
    assert_eq!(tokens[2].kind, TokenKind::IntLit);
    assert_eq!(tokens[3].kind, TokenKind::EOF);
}

#[test]
fn test_tokenize_empty_source() {
    let source = "".to_string();
    let tokens = tokenize(source, Some("test.tiger".to_string())).unwrap();

    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].kind, TokenKind::EOF);
}

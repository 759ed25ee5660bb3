//! Type annotation parsing.
//!
//! Tiger type annotations are small: a plain name (`int`, `float`, or an
//! alias identifier) or a fixed-size array `array [N] of <base>`. Nothing
//! here needs the Pratt machinery, so this is a plain recursive-descent
//! function.

use crate::{
    ast::types::TypeAnnotation,
    errors::errors::{Error, ErrorKind},
    lexer::tokens::TokenKind,
    Span,
};

use super::parser::Parser;

pub fn parse_type(parser: &mut Parser) -> Result<TypeAnnotation, Error> {
    match parser.current_token_kind() {
        TokenKind::Int | TokenKind::Float | TokenKind::Identifier => {
            let token = parser.advance().clone();
            Ok(TypeAnnotation::Name {
                name: token.value,
                span: token.span,
            })
        }
        TokenKind::Array => {
            let start = parser.advance().span.start.clone();
            parser.expect(TokenKind::OpenBracket)?;
            let size_token = parser.expect(TokenKind::IntLit)?;
            let size: u32 = size_token.value.parse().map_err(|_| {
                Error::new(
                    ErrorKind::NumberParseError {
                        token: size_token.value.clone(),
                    },
                    size_token.span.start.clone(),
                )
            })?;
            parser.expect(TokenKind::CloseBracket)?;
            parser.expect(TokenKind::Of)?;

            match parser.current_token_kind() {
                TokenKind::Int | TokenKind::Float | TokenKind::Identifier => {
                    let base_token = parser.advance().clone();
                    Ok(TypeAnnotation::Array {
                        size,
                        base: base_token.value,
                        span: Span {
                            start,
                            end: base_token.span.end,
                        },
                    })
                }
                _ => Err(Error::new(
                    ErrorKind::UnexpectedTokenDetailed {
                        token: parser.current_token().value.clone(),
                        message: String::from("expected an element type after `of`"),
                    },
                    parser.get_position(),
                )),
            }
        }
        _ => Err(Error::new(
            ErrorKind::UnexpectedTokenDetailed {
                token: parser.current_token().value.clone(),
                message: String::from("expected a type"),
            },
            parser.get_position(),
        )),
    }
}

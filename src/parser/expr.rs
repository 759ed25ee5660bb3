use crate::{
    ast::expressions::{BinOp, CmpOp, Expr, ValueRef},
    errors::errors::{Error, ErrorKind},
    lexer::tokens::TokenKind,
    Span,
};

use super::{lookups::BindingPower, parser::Parser};

pub fn parse_expr(parser: &mut Parser, bp: BindingPower) -> Result<Expr, Error> {
    // First parse NUD
    let token_kind = parser.current_token_kind();
    let nud = match parser.get_nud_lookup().get(&token_kind) {
        Some(nud) => *nud,
        None => {
            return Err(Error::new(
                ErrorKind::UnexpectedToken {
                    token: parser.current_token().value.clone(),
                },
                parser.get_position(),
            ))
        }
    };

    let mut left = nud(parser)?;

    // While LED and current BP is greater than the BP of the caller, keep
    // extending the left-hand side
    while *parser
        .get_bp_lookup()
        .get(&parser.current_token_kind())
        .unwrap_or(&BindingPower::Default)
        > bp
    {
        let token_kind = parser.current_token_kind();
        let led = match parser.get_led_lookup().get(&token_kind) {
            Some(led) => *led,
            None => {
                return Err(Error::new(
                    ErrorKind::UnexpectedToken {
                        token: parser.current_token().value.clone(),
                    },
                    parser.get_position(),
                ))
            }
        };

        let binding_power = *parser.get_bp_lookup().get(&token_kind).unwrap();
        left = led(parser, left, binding_power)?;
    }

    Ok(left)
}

pub fn parse_primary_expr(parser: &mut Parser) -> Result<Expr, Error> {
    match parser.current_token_kind() {
        TokenKind::IntLit => {
            let token = parser.advance().clone();
            match token.value.parse() {
                Ok(value) => Ok(Expr::Int {
                    value,
                    span: token.span,
                }),
                Err(_) => Err(Error::new(
                    ErrorKind::NumberParseError { token: token.value },
                    token.span.start,
                )),
            }
        }
        TokenKind::FloatLit => {
            let token = parser.advance().clone();
            match token.value.parse() {
                Ok(value) => Ok(Expr::Float {
                    value,
                    span: token.span,
                }),
                Err(_) => Err(Error::new(
                    ErrorKind::NumberParseError { token: token.value },
                    token.span.start,
                )),
            }
        }
        TokenKind::Identifier => Ok(Expr::Value(parse_value(parser)?)),
        _ => Err(Error::new(
            ErrorKind::UnexpectedToken {
                token: parser.current_token().value.clone(),
            },
            parser.get_position(),
        )),
    }
}

/// Parses a value reference: `name` or `name[index]`.
pub fn parse_value(parser: &mut Parser) -> Result<ValueRef, Error> {
    let name_token = parser.expect(TokenKind::Identifier)?;

    let subscript = if parser.current_token_kind() == TokenKind::OpenBracket {
        parser.advance();
        let index = parse_expr(parser, BindingPower::Default)?;
        parser.expect(TokenKind::CloseBracket)?;
        Some(Box::new(index))
    } else {
        None
    };

    Ok(ValueRef {
        name: name_token.value,
        span: Span {
            start: name_token.span.start,
            end: parser.get_position(),
        },
        subscript,
    })
}

pub fn parse_binary_expr(parser: &mut Parser, left: Expr, bp: BindingPower) -> Result<Expr, Error> {
    let operator_token = parser.advance().clone();
    let op = match operator_token.kind {
        TokenKind::Plus => BinOp::Add,
        TokenKind::Dash => BinOp::Sub,
        TokenKind::Star => BinOp::Mul,
        TokenKind::Slash => BinOp::Div,
        TokenKind::And => BinOp::And,
        TokenKind::Or => BinOp::Or,
        _ => {
            return Err(Error::new(
                ErrorKind::UnexpectedToken {
                    token: operator_token.value,
                },
                operator_token.span.start,
            ))
        }
    };

    let right = parse_expr(parser, bp)?;

    Ok(Expr::Binary {
        span: Span {
            start: left.span().start.clone(),
            end: right.span().end.clone(),
        },
        op,
        left: Box::new(left),
        right: Box::new(right),
    })
}

/// `**` is right-associative: the right-hand side is parsed at the next
/// looser level so that a following `**` binds into it.
pub fn parse_pow_expr(parser: &mut Parser, left: Expr, _bp: BindingPower) -> Result<Expr, Error> {
    parser.advance();

    let right = parse_expr(parser, BindingPower::Multiplicative)?;

    Ok(Expr::Binary {
        span: Span {
            start: left.span().start.clone(),
            end: right.span().end.clone(),
        },
        op: BinOp::Pow,
        left: Box::new(left),
        right: Box::new(right),
    })
}

/// Extends a relational chain. `a < b` produces a fresh comparison node;
/// a further comparator on the same chain pushes into the existing node, so
/// the checker can see the whole chain and reject it.
pub fn parse_comparison_expr(
    parser: &mut Parser,
    left: Expr,
    _bp: BindingPower,
) -> Result<Expr, Error> {
    let operator_token = parser.advance().clone();
    let op = match operator_token.kind {
        TokenKind::Equals => CmpOp::Eq,
        TokenKind::NotEquals => CmpOp::Neq,
        TokenKind::Less => CmpOp::Lt,
        TokenKind::LessEquals => CmpOp::Le,
        TokenKind::Greater => CmpOp::Gt,
        TokenKind::GreaterEquals => CmpOp::Ge,
        _ => {
            return Err(Error::new(
                ErrorKind::UnexpectedToken {
                    token: operator_token.value,
                },
                operator_token.span.start,
            ))
        }
    };

    let right = parse_expr(parser, BindingPower::Relational)?;
    let end = right.span().end.clone();

    match left {
        Expr::Comparison { left, mut ops, span } => {
            ops.push((op, right));
            Ok(Expr::Comparison {
                left,
                ops,
                span: Span {
                    start: span.start,
                    end,
                },
            })
        }
        other => Ok(Expr::Comparison {
            span: Span {
                start: other.span().start.clone(),
                end,
            },
            left: Box::new(other),
            ops: vec![(op, right)],
        }),
    }
}

pub fn parse_grouping_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let start = parser.advance().span.start.clone();
    let inner = parse_expr(parser, BindingPower::Default)?;
    let end_token = parser.expect(TokenKind::CloseParen)?;

    Ok(Expr::Grouping {
        inner: Box::new(inner),
        span: Span {
            start,
            end: end_token.span.end,
        },
    })
}

use crate::{
    ast::{
        ast::Program,
        expressions::Expr,
        statements::{
            AssignStmt, BreakStmt, CallStmt, Constant, Decl, ForStmt, FunctDecl, IfStmt, LetStmt,
            Param, ReturnStmt, Stmt, StorageClass, TypeDecl, VarDecl, WhileStmt,
        },
    },
    errors::errors::{Error, ErrorKind},
    lexer::tokens::TokenKind,
    Span,
};

use super::{
    expr::{parse_expr, parse_value},
    lookups::BindingPower,
    parser::Parser,
    types::parse_type,
};

/// Parses `program <name> begin <declseg> <statseq> end`.
pub fn parse_program(parser: &mut Parser) -> Result<Program, Error> {
    let start = parser.expect(TokenKind::Program)?.span.start;
    let name = parser.expect(TokenKind::Identifier)?.value;
    parser.expect(TokenKind::Begin)?;

    let decls = parse_decl_seg(parser, true)?;
    let body = parse_stat_seq(parser, &[TokenKind::End])?;

    parser.expect(TokenKind::End)?;

    if parser.has_tokens() {
        return Err(Error::new(
            ErrorKind::UnexpectedTokenDetailed {
                token: parser.current_token().value.clone(),
                message: String::from("expected end of input after program"),
            },
            parser.get_position(),
        ));
    }

    let stray_breaks = parser.swap_stray_breaks(vec![]);

    Ok(Program {
        name,
        decls,
        body,
        stray_breaks,
        span: Span {
            start,
            end: parser.get_position(),
        },
    })
}

/// Parses a declaration segment. Functions are only allowed at program
/// level; `let` blocks declare types and variables only.
fn parse_decl_seg(parser: &mut Parser, allow_functions: bool) -> Result<Vec<Decl>, Error> {
    let mut decls = vec![];

    loop {
        match parser.current_token_kind() {
            TokenKind::Type => decls.push(Decl::Type(parse_type_decl(parser)?)),
            TokenKind::Var | TokenKind::Static => decls.push(Decl::Var(parse_var_decl(parser)?)),
            TokenKind::Function if allow_functions => {
                decls.push(Decl::Funct(parse_funct_decl(parser)?))
            }
            _ => break,
        }
    }

    Ok(decls)
}

/// `type <name> = <type>;`
pub fn parse_type_decl(parser: &mut Parser) -> Result<TypeDecl, Error> {
    let start = parser.advance().span.start.clone();
    let name = parser.expect(TokenKind::Identifier)?.value;
    parser.expect(TokenKind::Equals)?;
    let aliased = parse_type(parser)?;
    parser.expect(TokenKind::Semicolon)?;

    Ok(TypeDecl {
        name,
        aliased,
        span: Span {
            start,
            end: parser.get_position(),
        },
    })
}

/// `var|static <id-list> : <type> [:= <const>];`
pub fn parse_var_decl(parser: &mut Parser) -> Result<VarDecl, Error> {
    let start_token = parser.advance().clone();
    let storage = if start_token.kind == TokenKind::Var {
        StorageClass::Var
    } else {
        StorageClass::Static
    };

    let mut names = vec![];
    loop {
        let error = Error::new(
            ErrorKind::UnexpectedTokenDetailed {
                token: parser.current_token().value.clone(),
                message: String::from("expected identifier during variable declaration"),
            },
            parser.get_position(),
        );
        names.push(parser.expect_error(TokenKind::Identifier, Some(error))?.value);

        if parser.current_token_kind() == TokenKind::Comma {
            parser.advance();
        } else {
            break;
        }
    }

    parser.expect(TokenKind::Colon)?;
    let declared = parse_type(parser)?;

    let init = if parser.current_token_kind() == TokenKind::Assign {
        parser.advance();
        Some(parse_constant(parser)?)
    } else {
        None
    };

    parser.expect(TokenKind::Semicolon)?;

    Ok(VarDecl {
        names,
        storage,
        declared,
        init,
        span: Span {
            start: start_token.span.start,
            end: parser.get_position(),
        },
    })
}

fn parse_constant(parser: &mut Parser) -> Result<Constant, Error> {
    let token = parser.current_token().clone();
    match token.kind {
        TokenKind::IntLit => {
            parser.advance();
            token.value.parse().map(Constant::Int).map_err(|_| {
                Error::new(
                    ErrorKind::NumberParseError { token: token.value },
                    token.span.start,
                )
            })
        }
        TokenKind::FloatLit => {
            parser.advance();
            token.value.parse().map(Constant::Float).map_err(|_| {
                Error::new(
                    ErrorKind::NumberParseError { token: token.value },
                    token.span.start,
                )
            })
        }
        _ => Err(Error::new(
            ErrorKind::UnexpectedTokenDetailed {
                token: token.value,
                message: String::from("expected a constant initializer"),
            },
            token.span.start,
        )),
    }
}

/// `function <name>(<params>) [: <type>] begin <statseq> end;`
///
/// Synthesizes `always_returns` and the stray-break line set for the body
/// before handing the node to the semantic pass.
pub fn parse_funct_decl(parser: &mut Parser) -> Result<FunctDecl, Error> {
    let start = parser.advance().span.start.clone();
    let name = parser.expect(TokenKind::Identifier)?.value;

    parser.expect(TokenKind::OpenParen)?;

    let mut params = vec![];
    while parser.current_token_kind() != TokenKind::CloseParen
        && parser.current_token_kind() != TokenKind::EOF
    {
        let name_token = parser.expect(TokenKind::Identifier)?;
        parser.expect(TokenKind::Colon)?;
        let declared = parse_type(parser)?;

        params.push(Param {
            name: name_token.value,
            declared,
            span: Span {
                start: name_token.span.start,
                end: parser.get_position(),
            },
        });

        if parser.current_token_kind() == TokenKind::Comma {
            parser.advance();
        }
    }
    parser.expect(TokenKind::CloseParen)?;

    let return_type = if parser.current_token_kind() == TokenKind::Colon {
        parser.advance();
        Some(parse_type(parser)?)
    } else {
        None
    };

    parser.expect(TokenKind::Begin)?;

    // Scope the stray-break accumulator to this body; functions do not nest.
    let outer_breaks = parser.swap_stray_breaks(vec![]);
    let body = parse_stat_seq(parser, &[TokenKind::End]);
    let stray_breaks = parser.swap_stray_breaks(outer_breaks);
    let body = body?;

    parser.expect(TokenKind::End)?;
    parser.expect(TokenKind::Semicolon)?;

    let always_returns = stat_seq_returns(&body);

    Ok(FunctDecl {
        name,
        params,
        return_type,
        body,
        always_returns,
        stray_breaks,
        span: Span {
            start,
            end: parser.get_position(),
        },
    })
}

/// True when every path through the statement sequence executes a `return`.
/// Loops are never counted on: their bodies may not run at all.
fn stat_seq_returns(stats: &[Stmt]) -> bool {
    stats.iter().any(stmt_returns)
}

fn stmt_returns(stmt: &Stmt) -> bool {
    match stmt {
        Stmt::Return(_) => true,
        Stmt::If(s) => match &s.else_body {
            Some(else_body) => stat_seq_returns(&s.then_body) && stat_seq_returns(else_body),
            None => false,
        },
        Stmt::Let(s) => stat_seq_returns(&s.body),
        _ => false,
    }
}

/// Parses statements until one of the `until` kinds (or EOF) is reached.
pub fn parse_stat_seq(parser: &mut Parser, until: &[TokenKind]) -> Result<Vec<Stmt>, Error> {
    let mut stats = vec![];

    while !until.contains(&parser.current_token_kind())
        && parser.current_token_kind() != TokenKind::EOF
    {
        stats.push(parse_stmt(parser)?);
    }

    Ok(stats)
}

pub fn parse_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let handler = parser
        .get_stmt_lookup()
        .get(&parser.current_token_kind())
        .copied();
    if let Some(handler) = handler {
        return handler(parser);
    }

    Err(Error::new(
        ErrorKind::UnexpectedTokenDetailed {
            token: parser.current_token().value.clone(),
            message: String::from("expected a statement"),
        },
        parser.get_position(),
    ))
}

/// `let <decls> in <statseq> end;`
pub fn parse_let_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start.clone();

    let decls = parse_decl_seg(parser, false)?;
    parser.expect(TokenKind::In)?;
    let body = parse_stat_seq(parser, &[TokenKind::End])?;
    parser.expect(TokenKind::End)?;
    parser.expect(TokenKind::Semicolon)?;

    Ok(Stmt::Let(LetStmt {
        decls,
        body,
        span: Span {
            start,
            end: parser.get_position(),
        },
    }))
}

/// `if <expr> then <statseq> [else <statseq>] endif;`
pub fn parse_if_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start.clone();

    let condition = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::Then)?;
    let then_body = parse_stat_seq(parser, &[TokenKind::Else, TokenKind::Endif])?;

    let else_body = if parser.current_token_kind() == TokenKind::Else {
        parser.advance();
        Some(parse_stat_seq(parser, &[TokenKind::Endif])?)
    } else {
        None
    };

    parser.expect(TokenKind::Endif)?;
    parser.expect(TokenKind::Semicolon)?;

    Ok(Stmt::If(IfStmt {
        condition,
        then_body,
        else_body,
        span: Span {
            start,
            end: parser.get_position(),
        },
    }))
}

/// `while <expr> do <statseq> enddo;`
pub fn parse_while_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start.clone();

    let condition = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::Do)?;

    parser.enter_loop();
    let body = parse_stat_seq(parser, &[TokenKind::Enddo]);
    parser.exit_loop();
    let body = body?;

    parser.expect(TokenKind::Enddo)?;
    parser.expect(TokenKind::Semicolon)?;

    Ok(Stmt::While(WhileStmt {
        condition,
        body,
        span: Span {
            start,
            end: parser.get_position(),
        },
    }))
}

/// `for <id> := <expr> to <expr> do <statseq> enddo;`
pub fn parse_for_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start.clone();

    let var = parser.expect(TokenKind::Identifier)?.value;
    parser.expect(TokenKind::Assign)?;
    let from = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::To)?;
    let to = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::Do)?;

    parser.enter_loop();
    let body = parse_stat_seq(parser, &[TokenKind::Enddo]);
    parser.exit_loop();
    let body = body?;

    parser.expect(TokenKind::Enddo)?;
    parser.expect(TokenKind::Semicolon)?;

    Ok(Stmt::For(ForStmt {
        var,
        from,
        to,
        body,
        span: Span {
            start,
            end: parser.get_position(),
        },
    }))
}

/// `break;` — a break outside any loop is recorded as a stray line for the
/// semantic pass rather than rejected here.
pub fn parse_break_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let token = parser.advance().clone();
    parser.expect(TokenKind::Semicolon)?;

    if !parser.in_loop() {
        parser.note_stray_break(token.span.start.0);
    }

    Ok(Stmt::Break(BreakStmt { span: token.span }))
}

/// `return [<expr>];`
pub fn parse_return_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start.clone();

    let value = if parser.current_token_kind() != TokenKind::Semicolon {
        Some(parse_expr(parser, BindingPower::Default)?)
    } else {
        None
    };

    parser.expect(TokenKind::Semicolon)?;

    Ok(Stmt::Return(ReturnStmt {
        value,
        span: Span {
            start,
            end: parser.get_position(),
        },
    }))
}

/// Statements that begin with an identifier: a bare call `f(args);`, an
/// assignment `value := expr;`, or a call with a target `value := f(args);`.
pub fn parse_id_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.get_position();

    if parser.peek_kind(1) == TokenKind::OpenParen {
        return parse_call_stmt(parser, None, start);
    }

    let target = parse_value(parser)?;
    parser.expect(TokenKind::Assign)?;

    if parser.current_token_kind() == TokenKind::Identifier
        && parser.peek_kind(1) == TokenKind::OpenParen
    {
        return parse_call_stmt(parser, Some(target), start);
    }

    let value = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::Semicolon)?;

    Ok(Stmt::Assign(AssignStmt {
        target,
        value,
        span: Span {
            start,
            end: parser.get_position(),
        },
    }))
}

fn parse_call_stmt(
    parser: &mut Parser,
    target: Option<crate::ast::expressions::ValueRef>,
    start: crate::Position,
) -> Result<Stmt, Error> {
    let name = parser.expect(TokenKind::Identifier)?.value;
    parser.expect(TokenKind::OpenParen)?;

    let mut args: Vec<Expr> = vec![];
    while parser.current_token_kind() != TokenKind::CloseParen
        && parser.current_token_kind() != TokenKind::EOF
    {
        args.push(parse_expr(parser, BindingPower::Default)?);

        if parser.current_token_kind() == TokenKind::Comma {
            parser.advance();
        } else {
            break;
        }
    }

    parser.expect(TokenKind::CloseParen)?;
    parser.expect(TokenKind::Semicolon)?;

    Ok(Stmt::Call(CallStmt {
        target,
        name,
        args,
        span: Span {
            start,
            end: parser.get_position(),
        },
    }))
}

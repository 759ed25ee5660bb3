use lazy_static::lazy_static;
use std::{collections::HashMap, fmt::Display};

use crate::Span;

lazy_static! {
    pub static ref RESERVED_LOOKUP: HashMap<&'static str, TokenKind> = {
        let mut map = HashMap::new();
        map.insert("program", TokenKind::Program);
        map.insert("let", TokenKind::Let);
        map.insert("in", TokenKind::In);
        map.insert("begin", TokenKind::Begin);
        map.insert("end", TokenKind::End);
        map.insert("type", TokenKind::Type);
        map.insert("var", TokenKind::Var);
        map.insert("static", TokenKind::Static);
        map.insert("function", TokenKind::Function);
        map.insert("if", TokenKind::If);
        map.insert("then", TokenKind::Then);
        map.insert("else", TokenKind::Else);
        map.insert("endif", TokenKind::Endif);
        map.insert("while", TokenKind::While);
        map.insert("do", TokenKind::Do);
        map.insert("enddo", TokenKind::Enddo);
        map.insert("for", TokenKind::For);
        map.insert("to", TokenKind::To);
        map.insert("break", TokenKind::Break);
        map.insert("return", TokenKind::Return);
        map.insert("int", TokenKind::Int);
        map.insert("float", TokenKind::Float);
        map.insert("array", TokenKind::Array);
        map.insert("of", TokenKind::Of);
        map
    };
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TokenKind {
    EOF,
    IntLit,
    FloatLit,
    Identifier,

    OpenParen,
    CloseParen,
    OpenBracket,
    CloseBracket,

    Assign,        // :=
    Equals,        // =
    NotEquals,     // <>
    Less,
    LessEquals,
    Greater,
    GreaterEquals,

    Or,            // |
    And,           // &

    Plus,
    Dash,
    Star,
    Slash,
    Pow,           // **

    Colon,
    Semicolon,
    Comma,

    // Reserved
    Program,
    Let,
    In,
    Begin,
    End,
    Type,
    Var,
    Static,
    Function,
    If,
    Then,
    Else,
    Endif,
    While,
    Do,
    Enddo,
    For,
    To,
    Break,
    Return,
    Int,
    Float,
    Array,
    Of,
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    pub span: Span,
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.kind, self.value)
    }
}

impl Token {
    pub fn line(&self) -> u32 {
        self.span.start.0
    }
}

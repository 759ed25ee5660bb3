#![allow(clippy::module_inception)]

use std::rc::Rc;

pub mod ast;
pub mod errors;
pub mod ir;
pub mod lexer;
pub mod macros;
pub mod parser;
pub mod semantic;

/// A source location: 1-based line number plus the originating file name.
///
/// Diagnostics are line-oriented (`line <N>: <message>`), so the line number
/// is the only coordinate carried through the pipeline.
#[derive(Debug, Clone)]
pub struct Position(pub u32, pub Rc<String>);

impl Position {
    pub fn null() -> Self {
        Position(0, Rc::new(String::from("<null>")))
    }
}

#[derive(Debug, Clone)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

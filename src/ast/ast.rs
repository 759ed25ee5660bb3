use crate::Span;

use super::statements::{Decl, Stmt};

/// Root of the syntax tree: `program <name> begin <declseg> <statseq> end`.
///
/// `stray_breaks` carries the lines of `break` statements in the program
/// body that are not lexically inside any loop; it is synthesized by the
/// parser, the checker only reports it.
#[derive(Debug, Clone)]
pub struct Program {
    pub name: String,
    pub decls: Vec<Decl>,
    pub body: Vec<Stmt>,
    pub stray_breaks: Vec<u32>,
    pub span: Span,
}

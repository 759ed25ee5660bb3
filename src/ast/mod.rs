/// AST (Abstract Syntax Tree) module
/// Contains all definitions related to the AST structure
///
/// Submodules:
/// - ast: The program root node
/// - expressions: Definitions for the expression grammar
/// - statements: Definitions for declarations and statements
/// - types: Syntactic type annotations
pub mod ast;
pub mod expressions;
pub mod statements;
pub mod types;

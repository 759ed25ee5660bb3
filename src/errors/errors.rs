use std::fmt::Display;

use thiserror::Error as ThisError;

use crate::Position;

/// A diagnostic: one entry from the error catalog plus the source line it
/// was raised on. Rendered as `line <N>: <message>`.
#[derive(Debug, Clone)]
pub struct Error {
    kind: ErrorKind,
    position: Position,
}

impl Error {
    pub fn new(kind: ErrorKind, position: Position) -> Self {
        Error { kind, position }
    }

    pub fn get_position(&self) -> &Position {
        &self.position
    }

    pub fn line(&self) -> u32 {
        self.position.0
    }

    pub fn get_kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// Catalog name of the diagnostic, for tests and tooling.
    pub fn kind_name(&self) -> &'static str {
        match &self.kind {
            ErrorKind::UnrecognisedToken { .. } => "UnrecognisedToken",
            ErrorKind::UnexpectedToken { .. } => "UnexpectedToken",
            ErrorKind::UnexpectedTokenDetailed { .. } => "UnexpectedTokenDetailed",
            ErrorKind::NumberParseError { .. } => "NumberParseError",
            ErrorKind::Redefinition { .. } => "Redefinition",
            ErrorKind::NotDefined { .. } => "NotDefined",
            ErrorKind::UndefinedType { .. } => "UndefinedType",
            ErrorKind::TypeMismatch { .. } => "TypeMismatch",
            ErrorKind::Narrowing => "Narrowing",
            ErrorKind::ReturnType { .. } => "ReturnType",
            ErrorKind::ArrayType => "ArrayType",
            ErrorKind::MissingReturn { .. } => "MissingReturn",
            ErrorKind::IncorrectParameterCount { .. } => "IncorrectParameter",
            ErrorKind::IncorrectParameterType { .. } => "IncorrectParameter",
            ErrorKind::Condition => "Condition",
            ErrorKind::OutsideBreak => "OutsideBreak",
            ErrorKind::Comparison => "Comparison",
            ErrorKind::Generic { .. } => "Generic",
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}: {}", self.position.0, self.kind)
    }
}

/// The fixed diagnostic catalog. The first four entries belong to the
/// lexer and parser; the rest are the semantic catalog.
#[derive(ThisError, Debug, Clone)]
pub enum ErrorKind {
    #[error("unrecognised character {token:?}")]
    UnrecognisedToken { token: String },
    #[error("unexpected token {token:?}")]
    UnexpectedToken { token: String },
    #[error("unexpected token {token:?}: {message}")]
    UnexpectedTokenDetailed { token: String, message: String },
    #[error("error parsing number {token:?}")]
    NumberParseError { token: String },
    #[error("redefinition of {name:?}")]
    Redefinition { name: String },
    #[error("{name:?} is not defined")]
    NotDefined { name: String },
    #[error("type {name:?} is not defined")]
    UndefinedType { name: String },
    #[error("type mismatch: expected {expected}, found {received}")]
    TypeMismatch { expected: String, received: String },
    #[error("narrowing conversion from float to int")]
    Narrowing,
    #[error("return type mismatch: expected {expected}, found {received}")]
    ReturnType { expected: String, received: String },
    #[error("array type not allowed here")]
    ArrayType,
    #[error("function {function:?} does not return on every path")]
    MissingReturn { function: String },
    #[error("call to {function:?} expects {expected} parameters, found {received}")]
    IncorrectParameterCount {
        function: String,
        expected: usize,
        received: usize,
    },
    #[error("parameter {index} of call to {function:?} expects {expected}, found {received}")]
    IncorrectParameterType {
        function: String,
        index: usize,
        expected: String,
        received: String,
    },
    #[error("condition must be int")]
    Condition,
    #[error("break outside of loop")]
    OutsideBreak,
    #[error("comparison is not associative")]
    Comparison,
    #[error("{message}")]
    Generic { message: String },
}

/// Process exit statuses used by the driver. The checker never exits the
/// process itself; it only records diagnostics, and the driver picks one of
/// these after the relevant stage completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    NoError,
    ArgumentError,
    LexicalError,
    SyntaxError,
    SemanticError,
}

impl ExitStatus {
    pub fn code(&self) -> i32 {
        match self {
            ExitStatus::NoError => 0,
            ExitStatus::ArgumentError => 1,
            ExitStatus::LexicalError => 2,
            ExitStatus::SyntaxError => 3,
            ExitStatus::SemanticError => 4,
        }
    }
}

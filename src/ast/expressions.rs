use std::fmt::Display;

use crate::Span;

/// The expression grammar. Function calls are statements in Tiger, so they
/// never appear here.
#[derive(Debug, Clone)]
pub enum Expr {
    Int { value: i64, span: Span },
    Float { value: f64, span: Span },
    Value(ValueRef),
    Grouping { inner: Box<Expr>, span: Span },
    Binary {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
        span: Span,
    },
    /// A relational chain `a < b < c`. The grammar allows more than one
    /// comparator so that the checker can reject chains with a precise
    /// diagnostic instead of a parse error.
    Comparison {
        left: Box<Expr>,
        ops: Vec<(CmpOp, Expr)>,
        span: Span,
    },
}

impl Expr {
    pub fn span(&self) -> &Span {
        match self {
            Expr::Int { span, .. } => span,
            Expr::Float { span, .. } => span,
            Expr::Value(value) => &value.span,
            Expr::Grouping { span, .. } => span,
            Expr::Binary { span, .. } => span,
            Expr::Comparison { span, .. } => span,
        }
    }
}

/// A reference to a declared name, optionally subscripted: `x` or `x[i]`.
#[derive(Debug, Clone)]
pub struct ValueRef {
    pub name: String,
    pub subscript: Option<Box<Expr>>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Pow,
    Mul,
    Div,
    Add,
    Sub,
    And,
    Or,
}

impl Display for BinOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let op = match self {
            BinOp::Pow => "**",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::And => "&",
            BinOp::Or => "|",
        };
        write!(f, "{}", op)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Eq,
    Neq,
    Lt,
    Gt,
    Le,
    Ge,
}

impl Display for CmpOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let op = match self {
            CmpOp::Eq => "=",
            CmpOp::Neq => "<>",
            CmpOp::Lt => "<",
            CmpOp::Gt => ">",
            CmpOp::Le => "<=",
            CmpOp::Ge => ">=",
        };
        write!(f, "{}", op)
    }
}

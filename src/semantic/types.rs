use std::fmt::Display;

use crate::ast::types::TypeAnnotation;

/// Base tag of a static type. `Named` types are aliases that resolve to a
/// built-in through the symbol table; everything else is a built-in.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BaseType {
    Int,
    Float,
    Void,
    Error,
    Named(String),
}

/// An immutable static type: a base tag plus an optional fixed array size.
/// Compared structurally everywhere; there are no shared singleton
/// instances.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Type {
    base: BaseType,
    array_size: Option<u32>,
}

impl Type {
    pub fn scalar(base: BaseType) -> Self {
        Type {
            base,
            array_size: None,
        }
    }

    pub fn array(base: BaseType, size: u32) -> Self {
        Type {
            base,
            array_size: Some(size),
        }
    }

    pub fn int() -> Self {
        Type::scalar(BaseType::Int)
    }

    pub fn float() -> Self {
        Type::scalar(BaseType::Float)
    }

    pub fn void() -> Self {
        Type::scalar(BaseType::Void)
    }

    /// The contagious sentinel substituted after a reported error so that
    /// dependent checks degrade without cascading diagnostics.
    pub fn error() -> Self {
        Type::scalar(BaseType::Error)
    }

    /// Builds the semantic type named by a syntactic annotation. Alias
    /// names stay `Named` until resolved against the symbol table.
    pub fn from_annotation(annotation: &TypeAnnotation) -> Self {
        match annotation {
            TypeAnnotation::Name { name, .. } => Type::scalar(base_from_name(name)),
            TypeAnnotation::Array { size, base, .. } => Type::array(base_from_name(base), *size),
        }
    }

    pub fn base(&self) -> &BaseType {
        &self.base
    }

    pub fn array_size(&self) -> Option<u32> {
        self.array_size
    }

    pub fn is_array(&self) -> bool {
        self.array_size.is_some()
    }

    pub fn is_builtin(&self) -> bool {
        !matches!(self.base, BaseType::Named(_))
    }

    /// Scalar `int`. Arrays of int are not int.
    pub fn is_int(&self) -> bool {
        self.base == BaseType::Int && self.array_size.is_none()
    }

    /// Scalar `float`. Arrays of float are not float.
    pub fn is_float(&self) -> bool {
        self.base == BaseType::Float && self.array_size.is_none()
    }

    pub fn is_void(&self) -> bool {
        self.base == BaseType::Void && self.array_size.is_none()
    }

    pub fn is_error(&self) -> bool {
        self.base == BaseType::Error
    }

    /// The scalar type of one element of an array (or of the type itself
    /// when it is already scalar).
    pub fn element(&self) -> Type {
        Type::scalar(self.base.clone())
    }

    /// The one implicit conversion: scalar `int` widens to scalar `float`.
    pub fn widens_to(&self, target: &Type) -> bool {
        self.is_int() && target.is_float()
    }
}

fn base_from_name(name: &str) -> BaseType {
    match name {
        "int" => BaseType::Int,
        "float" => BaseType::Float,
        other => BaseType::Named(other.to_string()),
    }
}

impl Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match &self.base {
            BaseType::Int => "int",
            BaseType::Float => "float",
            BaseType::Void => "void",
            BaseType::Error => "error",
            BaseType::Named(name) => name.as_str(),
        };
        match self.array_size {
            Some(size) => write!(f, "{}[{}]", name, size),
            None => write!(f, "{}", name),
        }
    }
}

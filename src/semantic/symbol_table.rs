//! Symbol table: a stack of lexical scopes with an incremental text report.

use std::collections::HashSet;
use std::fmt::Display;

use crate::ast::statements::StorageClass;

use super::types::{BaseType, Type};

// Well-known attribute keys.
pub const VAR_TYPE: &str = "varType";
pub const STORAGE_CLASS: &str = "storageClass";
pub const PARAMS: &str = "params";
pub const RETURN_TYPE: &str = "returnType";

/// A symbol attribute value. Which keys a symbol carries depends on what it
/// declares: variables get `varType` + `storageClass`, functions get
/// `params` + `returnType`, type aliases get `varType` only.
#[derive(Debug, Clone, PartialEq)]
pub enum Attr {
    Type(Type),
    Storage(StorageClass),
    Params(Vec<Type>),
}

impl Display for Attr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Attr::Type(ty) => write!(f, "{}", ty),
            Attr::Storage(storage) => write!(f, "{}", storage),
            Attr::Params(params) => {
                write!(f, "(")?;
                for (i, param) in params.iter().enumerate() {
                    if i != 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", param)?;
                }
                write!(f, ")")
            }
        }
    }
}

/// A declared name plus its attributes, in insertion order.
#[derive(Debug, Clone)]
pub struct Symbol {
    name: String,
    attributes: Vec<(&'static str, Attr)>,
}

impl Symbol {
    pub fn new(name: impl Into<String>) -> Self {
        Symbol {
            name: name.into(),
            attributes: vec![],
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set(&mut self, key: &'static str, attr: Attr) {
        self.attributes.push((key, attr));
    }

    pub fn get(&self, key: &str) -> Option<&Attr> {
        self.attributes
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, attr)| attr)
    }

    pub fn var_type(&self) -> Option<&Type> {
        match self.get(VAR_TYPE) {
            Some(Attr::Type(ty)) => Some(ty),
            _ => None,
        }
    }

    pub fn return_type(&self) -> Option<&Type> {
        match self.get(RETURN_TYPE) {
            Some(Attr::Type(ty)) => Some(ty),
            _ => None,
        }
    }

    pub fn params(&self) -> Option<&[Type]> {
        match self.get(PARAMS) {
            Some(Attr::Params(params)) => Some(params),
            _ => None,
        }
    }

    pub fn storage_class(&self) -> Option<StorageClass> {
        match self.get(STORAGE_CLASS) {
            Some(Attr::Storage(storage)) => Some(*storage),
            _ => None,
        }
    }

    /// One report line: the name and the attribute values in insertion
    /// order, joined by `", "`.
    fn render(&self) -> String {
        let mut line = self.name.clone();
        for (_, attr) in &self.attributes {
            line.push_str(", ");
            line.push_str(&attr.to_string());
        }
        line
    }
}

/// Distinguishes a plain block scope from the scope introduced by a
/// function body, which carries the function's name for return-statement
/// resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScopeKind {
    Generic,
    Function(String),
}

/// One lexical nesting level: an insertion-ordered, name-unique collection
/// of symbols.
#[derive(Debug, Clone)]
pub struct Scope {
    kind: ScopeKind,
    symbols: Vec<Symbol>,
}

impl Scope {
    pub fn new(kind: ScopeKind) -> Self {
        Scope {
            kind,
            symbols: vec![],
        }
    }

    pub fn kind(&self) -> &ScopeKind {
        &self.kind
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    pub fn add_symbol(&mut self, symbol: Symbol) {
        self.symbols.push(symbol);
    }

    pub fn get_symbol(&self, name: &str) -> Option<&Symbol> {
        self.symbols.iter().find(|symbol| symbol.name == name)
    }

    pub fn has_symbol(&self, name: &str) -> bool {
        self.get_symbol(name).is_some()
    }

    pub fn remove_symbol(&mut self, name: &str) {
        self.symbols.retain(|symbol| symbol.name != name);
    }
}

/// Why a `Named` type failed to resolve to a built-in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    Undefined(String),
    Cycle(String),
    NestedArray(String),
}

/// The scope stack. Index 0 is the permanent built-in floor (never popped),
/// index 1 the global program scope, deeper indices nested block/function
/// scopes. The indented text report is built incrementally as scopes and
/// symbols are added, so it survives pops and rollbacks.
#[derive(Debug)]
pub struct SymbolTable {
    table: Vec<Scope>,
    report: String,
    indentation: usize,
}

impl SymbolTable {
    pub fn new() -> Self {
        let mut table = SymbolTable {
            table: vec![],
            report: String::new(),
            indentation: 0,
        };
        table.init_builtins();
        table
    }

    // The built-in runtime functions live in the floor scope, reachable
    // from every nesting depth. They are not part of the report.
    fn init_builtins(&mut self) {
        let mut builtins = Scope::new(ScopeKind::Generic);

        let mut printi = Symbol::new("printi");
        printi.set(RETURN_TYPE, Attr::Type(Type::void()));
        printi.set(PARAMS, Attr::Params(vec![Type::int()]));
        builtins.add_symbol(printi);

        let mut printf = Symbol::new("printf");
        printf.set(RETURN_TYPE, Attr::Type(Type::void()));
        printf.set(PARAMS, Attr::Params(vec![Type::float()]));
        builtins.add_symbol(printf);

        let mut not = Symbol::new("not");
        not.set(RETURN_TYPE, Attr::Type(Type::int()));
        not.set(PARAMS, Attr::Params(vec![Type::int()]));
        builtins.add_symbol(not);

        let mut exit = Symbol::new("exit");
        exit.set(RETURN_TYPE, Attr::Type(Type::void()));
        exit.set(PARAMS, Attr::Params(vec![Type::int()]));
        builtins.add_symbol(exit);

        self.table.push(builtins);
    }

    pub fn push_scope(&mut self, kind: ScopeKind) {
        self.table.push(Scope::new(kind));
        self.indentation += 1;
        self.report.push_str(&"\t".repeat(self.indentation));
        self.report
            .push_str(&format!("Scope {}:\n", self.table.len()));
    }

    pub fn pop_scope(&mut self) {
        assert!(self.table.len() > 1, "scope stack underflow");
        self.table.pop();
        self.indentation -= 1;
    }

    /// Number of scopes currently on the stack, built-in floor included.
    pub fn depth(&self) -> usize {
        self.table.len()
    }

    /// Inserts into the current top scope. The caller must already have
    /// checked for redefinition; the table does not re-check.
    pub fn add_symbol(&mut self, symbol: Symbol) {
        self.report.push_str(&"\t".repeat(self.indentation + 1));
        self.report.push_str(&symbol.render());
        self.report.push('\n');
        self.table.last_mut().unwrap().add_symbol(symbol);
    }

    /// Removes a symbol from the current top scope (function rollback).
    /// The already-written report lines are intentionally left in place.
    pub fn remove_symbol(&mut self, name: &str) {
        self.table.last_mut().unwrap().remove_symbol(name);
    }

    pub fn current_scope(&self) -> &Scope {
        self.table.last().unwrap()
    }

    pub fn current_scope_has(&self, name: &str) -> bool {
        self.current_scope().has_symbol(name)
    }

    /// Innermost-to-outermost lookup, built-in floor included.
    pub fn lookup(&self, name: &str) -> Option<&Symbol> {
        self.table
            .iter()
            .rev()
            .find_map(|scope| scope.get_symbol(name))
    }

    /// Name of the nearest enclosing function scope, if any.
    pub fn current_function(&self) -> Option<&str> {
        self.table.iter().rev().find_map(|scope| match scope.kind() {
            ScopeKind::Function(name) => Some(name.as_str()),
            ScopeKind::Generic => None,
        })
    }

    /// Follows alias definitions until a built-in base is reached. A chain
    /// that revisits a name, names an unknown type, or layers an array on
    /// top of another array is an error, never a hang.
    pub fn resolve(&self, ty: &Type) -> Result<Type, ResolveError> {
        let mut size = ty.array_size();
        let mut base = ty.base().clone();
        let mut seen: HashSet<String> = HashSet::new();

        loop {
            let name = match base {
                BaseType::Named(name) => name,
                other => {
                    return Ok(match size {
                        Some(size) => Type::array(other, size),
                        None => Type::scalar(other),
                    })
                }
            };

            if !seen.insert(name.clone()) {
                return Err(ResolveError::Cycle(name));
            }

            let target = match self.lookup(&name).and_then(|symbol| symbol.var_type()) {
                Some(target) => target.clone(),
                None => return Err(ResolveError::Undefined(name)),
            };

            if let Some(target_size) = target.array_size() {
                if size.is_some() {
                    return Err(ResolveError::NestedArray(name));
                }
                size = Some(target_size);
            }
            base = target.base().clone();
        }
    }

    /// The indented report accumulated so far: one `Scope N:` header per
    /// pushed scope, one line per added symbol.
    pub fn report(&self) -> &str {
        &self.report
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

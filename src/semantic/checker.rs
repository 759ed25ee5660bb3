//! The attribute-evaluation pass.
//!
//! A single depth-first walk over the syntax tree that mutates the scope
//! stack on entering/leaving declarative constructs, synthesizes a type for
//! every expression bottom-up, and records diagnostics. The walk always
//! completes; no check aborts the traversal.

use std::rc::Rc;

use crate::{
    ast::{
        ast::Program,
        expressions::{BinOp, Expr, ValueRef},
        statements::{
            AssignStmt, CallStmt, Constant, Decl, FunctDecl, ReturnStmt, Stmt, StorageClass,
            TypeDecl, VarDecl,
        },
    },
    errors::errors::{Error, ErrorKind},
    ir::generator::IrGenerator,
    Position, Span,
};

use super::{
    symbol_table::{
        Attr, ResolveError, ScopeKind, Symbol, SymbolTable, PARAMS, RETURN_TYPE, STORAGE_CLASS,
        VAR_TYPE,
    },
    types::{BaseType, Type},
};

/// Runs the semantic pass over one program. All diagnostics are accumulated
/// on the returned checker; nothing aborts the walk.
pub fn check(program: &Program, file: Rc<String>) -> SemanticChecker {
    let mut checker = SemanticChecker {
        table: SymbolTable::new(),
        ir: IrGenerator::new(),
        errors: vec![],
        file,
    };
    checker.check_program(program);
    checker
}

pub struct SemanticChecker {
    table: SymbolTable,
    ir: IrGenerator,
    errors: Vec<Error>,
    file: Rc<String>,
}

impl SemanticChecker {
    pub fn semantic_error_occurred(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn errors(&self) -> &[Error] {
        &self.errors
    }

    pub fn symbol_table(&self) -> &SymbolTable {
        &self.table
    }

    pub fn ir(&self) -> &IrGenerator {
        &self.ir
    }

    fn report(&mut self, kind: ErrorKind, line: u32) {
        self.errors
            .push(Error::new(kind, Position(line, Rc::clone(&self.file))));
    }

    fn line(span: &Span) -> u32 {
        span.start.0
    }

    fn check_program(&mut self, program: &Program) {
        self.table.push_scope(ScopeKind::Generic); // global scope
        self.ir.start_program(&program.name);

        for line in &program.stray_breaks {
            self.report(ErrorKind::OutsideBreak, *line);
        }

        for decl in &program.decls {
            self.check_decl(decl);
        }
        for stmt in &program.body {
            self.check_stmt(stmt);
        }

        self.table.pop_scope();
    }

    fn check_decl(&mut self, decl: &Decl) {
        match decl {
            Decl::Type(decl) => self.check_type_decl(decl),
            Decl::Var(decl) => self.check_var_decl(decl),
            Decl::Funct(decl) => self.check_funct(decl),
        }
    }

    fn check_type_decl(&mut self, decl: &TypeDecl) {
        let line = Self::line(&decl.span);

        if self.table.current_scope_has(&decl.name) {
            self.report(
                ErrorKind::Redefinition {
                    name: decl.name.clone(),
                },
                line,
            );
            return;
        }

        let mut symbol = Symbol::new(&decl.name);
        symbol.set(VAR_TYPE, Attr::Type(Type::from_annotation(&decl.aliased)));
        self.table.add_symbol(symbol);
    }

    /// Resolves a type to its built-in base, reporting resolution failures
    /// and substituting the error sentinel. Already-poisoned types stay
    /// silent so one root cause yields one diagnostic.
    fn resolve_or_report(&mut self, ty: &Type, line: u32) -> Type {
        if ty.is_error() {
            return Type::error();
        }
        match self.table.resolve(ty) {
            Ok(resolved) => resolved,
            Err(ResolveError::Undefined(name)) => {
                self.report(ErrorKind::UndefinedType { name }, line);
                Type::error()
            }
            Err(ResolveError::Cycle(name)) => {
                self.report(
                    ErrorKind::Generic {
                        message: format!("circular type alias {name:?}"),
                    },
                    line,
                );
                Type::error()
            }
            Err(ResolveError::NestedArray(_)) => {
                self.report(ErrorKind::ArrayType, line);
                Type::error()
            }
        }
    }

    fn check_var_decl(&mut self, decl: &VarDecl) {
        let line = Self::line(&decl.span);
        let declared = Type::from_annotation(&decl.declared);

        for name in &decl.names {
            if self.table.current_scope_has(name) {
                self.report(ErrorKind::Redefinition { name: name.clone() }, line);
                continue;
            }

            match decl.storage {
                StorageClass::Var if self.table.depth() != 2 => {
                    self.report(
                        ErrorKind::Generic {
                            message: String::from(
                                "storage class \"var\" is only allowed at global scope",
                            ),
                        },
                        line,
                    );
                }
                StorageClass::Static if self.table.depth() == 2 => {
                    self.report(
                        ErrorKind::Generic {
                            message: String::from(
                                "storage class \"static\" is not allowed at global scope",
                            ),
                        },
                        line,
                    );
                }
                _ => {}
            }

            let resolved = self.resolve_or_report(&declared, line);

            if let Some(init) = &decl.init {
                let init_type = match init {
                    Constant::Int(_) => Type::int(),
                    Constant::Float(_) => Type::float(),
                };
                let target = resolved.element();
                if !resolved.is_error() && init_type != target && !init_type.widens_to(&target) {
                    self.report(
                        ErrorKind::TypeMismatch {
                            expected: target.to_string(),
                            received: init_type.to_string(),
                        },
                        line,
                    );
                }
            }

            // The declared spelling (possibly an alias) is what the symbol
            // carries; uses resolve on demand.
            let stored = if resolved.is_error() {
                Type::error()
            } else {
                declared.clone()
            };
            let mut symbol = Symbol::new(name);
            symbol.set(VAR_TYPE, Attr::Type(stored));
            symbol.set(STORAGE_CLASS, Attr::Storage(decl.storage));
            self.table.add_symbol(symbol);

            match resolved.base() {
                BaseType::Int => self.ir.add_int(name, resolved.array_size().unwrap_or(0)),
                BaseType::Float => self.ir.add_float(name, resolved.array_size().unwrap_or(0)),
                _ => {}
            }
        }
    }

    /// Function declarations run the header checks in a fixed order, then
    /// register the signature, walk the body in a function-tagged scope,
    /// and on a failed header roll the registration back so later calls
    /// report "not defined" instead of cascading on a broken signature.
    fn check_funct(&mut self, decl: &FunctDecl) {
        let line = Self::line(&decl.span);
        let mut header_ok = true;

        // (a) a non-void function must return on every path
        if decl.return_type.is_some() && !decl.always_returns {
            self.report(
                ErrorKind::MissingReturn {
                    function: decl.name.clone(),
                },
                line,
            );
            header_ok = false;
        }

        // (b) breaks outside any loop, one diagnostic per offending line
        for break_line in &decl.stray_breaks {
            self.report(ErrorKind::OutsideBreak, *break_line);
        }
        if !decl.stray_breaks.is_empty() {
            header_ok = false;
        }

        // (c) redefinition in the global scope; the first registration wins
        let redefined = self.table.current_scope_has(&decl.name);
        if redefined {
            self.report(
                ErrorKind::Redefinition {
                    name: decl.name.clone(),
                },
                line,
            );
        }

        // (d) the return type must resolve to a scalar
        let return_type = match &decl.return_type {
            Some(annotation) => {
                let resolved = self.resolve_or_report(&Type::from_annotation(annotation), line);
                if resolved.is_array() {
                    self.report(ErrorKind::ArrayType, line);
                    header_ok = false;
                    Type::error()
                } else if resolved.is_error() {
                    header_ok = false;
                    Type::error()
                } else {
                    resolved
                }
            }
            None => Type::void(),
        };

        // (e) parameter types must resolve to scalars
        let mut param_types = vec![];
        let mut param_skipped = vec![];
        for param in &decl.params {
            let param_line = Self::line(&param.span);
            let resolved =
                self.resolve_or_report(&Type::from_annotation(&param.declared), param_line);
            if resolved.is_array() {
                self.report(ErrorKind::ArrayType, param_line);
                header_ok = false;
                param_types.push(Type::error());
                param_skipped.push(true);
            } else if resolved.is_error() {
                header_ok = false;
                param_types.push(Type::error());
                param_skipped.push(false);
            } else {
                param_types.push(resolved);
                param_skipped.push(false);
            }
        }

        if !redefined {
            let mut symbol = Symbol::new(&decl.name);
            symbol.set(RETURN_TYPE, Attr::Type(return_type.clone()));
            symbol.set(PARAMS, Attr::Params(param_types.clone()));
            self.table.add_symbol(symbol);
        }

        self.table.push_scope(ScopeKind::Function(decl.name.clone()));
        self.ir.start_function(&decl.name, &return_type);

        for ((param, ty), skipped) in decl.params.iter().zip(&param_types).zip(&param_skipped) {
            let param_line = Self::line(&param.span);
            if *skipped {
                continue;
            }
            if self.table.current_scope_has(&param.name) {
                self.report(
                    ErrorKind::Redefinition {
                        name: param.name.clone(),
                    },
                    param_line,
                );
                continue;
            }
            let mut symbol = Symbol::new(&param.name);
            symbol.set(VAR_TYPE, Attr::Type(ty.clone()));
            self.table.add_symbol(symbol);
            if matches!(ty.base(), BaseType::Int | BaseType::Float) {
                self.ir.add_param(&param.name, ty);
            }
        }

        for stmt in &decl.body {
            self.check_stmt(stmt);
        }

        self.table.pop_scope();
        self.ir.end_function();

        if !header_ok && !redefined {
            self.table.remove_symbol(&decl.name);
        }
    }

    fn check_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Let(stmt) => {
                self.table.push_scope(ScopeKind::Generic);
                for decl in &stmt.decls {
                    self.check_decl(decl);
                }
                for stmt in &stmt.body {
                    self.check_stmt(stmt);
                }
                self.table.pop_scope();
            }
            Stmt::If(stmt) => {
                self.check_condition(&stmt.condition);
                for stmt in &stmt.then_body {
                    self.check_stmt(stmt);
                }
                if let Some(else_body) = &stmt.else_body {
                    for stmt in else_body {
                        self.check_stmt(stmt);
                    }
                }
            }
            Stmt::While(stmt) => {
                self.check_condition(&stmt.condition);
                for stmt in &stmt.body {
                    self.check_stmt(stmt);
                }
            }
            Stmt::For(stmt) => {
                if self.table.lookup(&stmt.var).is_none() {
                    self.report(
                        ErrorKind::NotDefined {
                            name: stmt.var.clone(),
                        },
                        Self::line(&stmt.span),
                    );
                }
                self.check_condition(&stmt.from);
                self.check_condition(&stmt.to);
                for stmt in &stmt.body {
                    self.check_stmt(stmt);
                }
            }
            // Placement was synthesized by the grammar and reported at the
            // enclosing declaration; nothing to do per break.
            Stmt::Break(_) => {}
            Stmt::Return(stmt) => self.check_return(stmt),
            Stmt::Assign(stmt) => self.check_assign(stmt),
            Stmt::Call(stmt) => self.check_call(stmt),
        }
    }

    /// Controlling expressions of `if`/`while` and both `for` bounds must
    /// be int. An error operand was already reported; stay silent.
    fn check_condition(&mut self, expr: &Expr) {
        let ty = self.check_expr(expr);
        if !ty.is_error() && !ty.is_int() {
            self.report(ErrorKind::Condition, Self::line(expr.span()));
        }
    }

    fn check_assign(&mut self, stmt: &AssignStmt) {
        let left = self.check_value(&stmt.target);
        let right = self.check_expr(&stmt.value);

        if left.is_error() || right.is_error() {
            return;
        }
        if right == left || right.widens_to(&left) {
            return;
        }
        self.report(
            ErrorKind::TypeMismatch {
                expected: left.to_string(),
                received: right.to_string(),
            },
            Self::line(&stmt.span),
        );
    }

    fn check_return(&mut self, stmt: &ReturnStmt) {
        let line = Self::line(&stmt.span);

        // Outside any function, a return is checked against void.
        let function = self.table.current_function().map(str::to_string);
        let declared = match function {
            Some(name) => self
                .table
                .lookup(&name)
                .and_then(|symbol| symbol.return_type())
                .cloned()
                .unwrap_or_else(Type::void),
            None => Type::void(),
        };

        let actual = match &stmt.value {
            Some(expr) => self.check_expr(expr),
            None => Type::void(),
        };

        if actual.is_error() || declared.is_error() {
            return;
        }
        if actual.is_float() && declared.is_int() {
            self.report(ErrorKind::Narrowing, line);
            return;
        }
        if actual == declared || actual.widens_to(&declared) {
            return;
        }
        self.report(
            ErrorKind::ReturnType {
                expected: declared.to_string(),
                received: actual.to_string(),
            },
            line,
        );
    }

    fn check_call(&mut self, stmt: &CallStmt) {
        let line = Self::line(&stmt.span);

        let signature = self
            .table
            .lookup(&stmt.name)
            .map(|symbol| (symbol.params().map(<[Type]>::to_vec), symbol.return_type().cloned()));
        let Some((params, return_type)) = signature else {
            self.report(
                ErrorKind::NotDefined {
                    name: stmt.name.clone(),
                },
                line,
            );
            return;
        };
        let (Some(params), Some(return_type)) = (params, return_type) else {
            self.report(
                ErrorKind::Generic {
                    message: format!("{:?} is not a function", stmt.name),
                },
                line,
            );
            return;
        };

        if stmt.args.len() != params.len() {
            self.report(
                ErrorKind::IncorrectParameterCount {
                    function: stmt.name.clone(),
                    expected: params.len(),
                    received: stmt.args.len(),
                },
                line,
            );
            return;
        }

        // Mismatches are reported per argument; the rest of the call is
        // still checked.
        for (index, (arg, param_type)) in stmt.args.iter().zip(&params).enumerate() {
            let arg_type = self.check_expr(arg);
            if arg_type.is_error() || param_type.is_error() {
                continue;
            }
            if arg_type == *param_type || arg_type.widens_to(param_type) {
                continue;
            }
            self.report(
                ErrorKind::IncorrectParameterType {
                    function: stmt.name.clone(),
                    index: index + 1,
                    expected: param_type.to_string(),
                    received: arg_type.to_string(),
                },
                Self::line(arg.span()),
            );
        }

        // The result-usage type: void when the result is discarded, else
        // the target's type, which must match or accept a widened result.
        let usage = match &stmt.target {
            Some(target) => self.check_value(target),
            None => Type::void(),
        };
        if usage.is_error() || return_type.is_error() {
            return;
        }
        if usage.is_void() || usage == return_type || return_type.widens_to(&usage) {
            return;
        }
        self.report(
            ErrorKind::TypeMismatch {
                expected: usage.to_string(),
                received: return_type.to_string(),
            },
            line,
        );
    }

    /// Looks up a value reference and synthesizes its type: the resolved
    /// base of the declared type, or the element type when subscripted.
    fn check_value(&mut self, value: &ValueRef) -> Type {
        let line = Self::line(&value.span);

        let var_type = self
            .table
            .lookup(&value.name)
            .map(|symbol| symbol.var_type().cloned());
        let Some(var_type) = var_type else {
            self.report(
                ErrorKind::NotDefined {
                    name: value.name.clone(),
                },
                line,
            );
            return Type::error();
        };
        let Some(var_type) = var_type else {
            self.report(
                ErrorKind::Generic {
                    message: format!("{:?} is not a variable", value.name),
                },
                line,
            );
            return Type::error();
        };

        let resolved = self.resolve_or_report(&var_type, line);
        if resolved.is_error() {
            return Type::error();
        }

        match &value.subscript {
            Some(index) => {
                let index_type = self.check_expr(index);
                if !index_type.is_error() && !index_type.is_int() {
                    self.report(
                        ErrorKind::TypeMismatch {
                            expected: String::from("int"),
                            received: index_type.to_string(),
                        },
                        Self::line(index.span()),
                    );
                }
                if !resolved.is_array() {
                    self.report(
                        ErrorKind::Generic {
                            message: format!("{:?} is not an array", value.name),
                        },
                        line,
                    );
                    return Type::error();
                }
                resolved.element()
            }
            None => resolved,
        }
    }

    /// Bottom-up type synthesis for the expression grammar.
    fn check_expr(&mut self, expr: &Expr) -> Type {
        match expr {
            Expr::Int { .. } => Type::int(),
            Expr::Float { .. } => Type::float(),
            Expr::Value(value) => self.check_value(value),
            Expr::Grouping { inner, .. } => self.check_expr(inner),
            Expr::Binary {
                op,
                left,
                right,
                span,
            } => self.check_binary(*op, left, right, span),
            Expr::Comparison { left, ops, span } => self.check_comparison(left, ops, span),
        }
    }

    fn check_binary(&mut self, op: BinOp, left: &Expr, right: &Expr, span: &Span) -> Type {
        let line = Self::line(span);
        let left_type = self.check_expr(left);
        let right_type = self.check_expr(right);

        if left_type.is_error() || right_type.is_error() {
            return Type::error();
        }

        match op {
            BinOp::Pow => {
                // The exponent must be float; the base keeps its own type.
                if !right_type.is_float() {
                    self.report(
                        ErrorKind::TypeMismatch {
                            expected: String::from("float"),
                            received: right_type.to_string(),
                        },
                        line,
                    );
                    return Type::error();
                }
                if !left_type.is_int() && !left_type.is_float() {
                    self.report(
                        ErrorKind::TypeMismatch {
                            expected: String::from("int or float"),
                            received: left_type.to_string(),
                        },
                        line,
                    );
                    return Type::error();
                }
                left_type
            }
            BinOp::Add | BinOp::Sub | BinOp::Mul | BinOp::Div => {
                for ty in [&left_type, &right_type] {
                    if !ty.is_int() && !ty.is_float() {
                        self.report(
                            ErrorKind::TypeMismatch {
                                expected: String::from("int or float"),
                                received: ty.to_string(),
                            },
                            line,
                        );
                        return Type::error();
                    }
                }
                if left_type.is_float() || right_type.is_float() {
                    Type::float()
                } else {
                    Type::int()
                }
            }
            BinOp::And | BinOp::Or => {
                for ty in [&left_type, &right_type] {
                    if !ty.is_int() {
                        self.report(
                            ErrorKind::TypeMismatch {
                                expected: String::from("int"),
                                received: ty.to_string(),
                            },
                            line,
                        );
                        return Type::error();
                    }
                }
                Type::int()
            }
        }
    }

    /// Exactly one comparator is permitted per chain; the operand types
    /// must match, and the result is int.
    fn check_comparison(
        &mut self,
        left: &Expr,
        ops: &[(crate::ast::expressions::CmpOp, Expr)],
        span: &Span,
    ) -> Type {
        let line = Self::line(span);

        if ops.len() > 1 {
            // Visit the operands anyway so their own problems surface once.
            self.check_expr(left);
            for (_, operand) in ops {
                self.check_expr(operand);
            }
            self.report(ErrorKind::Comparison, line);
            return Type::error();
        }

        let left_type = self.check_expr(left);
        let (_, right) = &ops[0];
        let right_type = self.check_expr(right);

        if left_type.is_error() || right_type.is_error() {
            return Type::error();
        }
        if left_type != right_type {
            self.report(
                ErrorKind::TypeMismatch {
                    expected: left_type.to_string(),
                    received: right_type.to_string(),
                },
                line,
            );
            return Type::error();
        }
        Type::int()
    }
}

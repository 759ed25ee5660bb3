//! Unit tests for the semantic pass.
//!
//! Covers scope handling, name resolution, type synthesis, and the full
//! diagnostic catalog: redefinitions, storage-class placement, array
//! restrictions, return completeness, break placement, and call checking.

use std::rc::Rc;

use crate::{lexer::lexer::tokenize, parser::parser::parse};

use super::checker::{check, SemanticChecker};

fn check_source(source: &str) -> SemanticChecker {
    let tokens = tokenize(source.to_string(), Some("test.tiger".to_string())).unwrap();
    let (_, program) = parse(tokens, Rc::new("test.tiger".to_string()));
    let program = program.expect("test program should parse");
    check(&program, Rc::new("test.tiger".to_string()))
}

fn kinds(checker: &SemanticChecker) -> Vec<&'static str> {
    checker.errors().iter().map(|error| error.kind_name()).collect()
}

#[test]
fn test_clean_program_has_no_errors() {
    let checker = check_source(
        "program main begin\n\
         var x, y : int;\n\
         var f : float;\n\
         function add(a: int, b: int): int begin\n\
         return a + b;\n\
         end;\n\
         x := 1;\n\
         y := x + 2;\n\
         f := x;\n\
         x := add(x, y);\n\
         end",
    );

    assert!(!checker.semantic_error_occurred(), "{:?}", checker.errors());
}

#[test]
fn test_scope_stack_balanced_after_pass() {
    let checker = check_source(
        "program main begin\n\
         function f() begin\n\
         let static x : int; in\n\
         let static y : int; in\n\
         x := y;\n\
         end;\n\
         end;\n\
         end;\n\
         end",
    );

    // Only the built-in floor remains
    assert_eq!(checker.symbol_table().depth(), 1);
}

#[test]
fn test_builtins_reachable_from_nested_scopes() {
    let checker = check_source(
        "program main begin\n\
         function f() begin\n\
         let static x : int; in\n\
         printi(x);\n\
         printf(1.5);\n\
         x := not(0);\n\
         exit(0);\n\
         end;\n\
         end;\n\
         end",
    );

    assert!(!checker.semantic_error_occurred(), "{:?}", checker.errors());
}

#[test]
fn test_redefinition_in_same_scope() {
    let checker = check_source(
        "program main begin\n\
         var v : int;\n\
         var v : float;\n\
         v := 1;\n\
         end",
    );

    // Exactly one diagnostic, and the first declaration is retained: the
    // later use of v as int passes.
    assert_eq!(kinds(&checker), vec!["Redefinition"]);
    assert_eq!(checker.errors()[0].line(), 3);
    let report = checker.symbol_table().report();
    assert!(report.contains("v, int, var"));
    assert!(!report.contains("v, float"));
}

#[test]
fn test_shadowing_resolves_to_inner_symbol() {
    let checker = check_source(
        "program main begin\n\
         var x : int;\n\
         function f() begin\n\
         let static x : float; in\n\
         x := 1.5;\n\
         end;\n\
         end;\n\
         x := 1;\n\
         end",
    );

    assert!(!checker.semantic_error_occurred(), "{:?}", checker.errors());
}

#[test]
fn test_alias_chain_resolves_to_builtin() {
    let checker = check_source(
        "program main begin\n\
         type b = int;\n\
         type a = b;\n\
         var x : a;\n\
         x := 1;\n\
         end",
    );

    assert!(!checker.semantic_error_occurred(), "{:?}", checker.errors());
}

#[test]
fn test_alias_cycle_is_an_error_not_a_hang() {
    let checker = check_source(
        "program main begin\n\
         type a = b;\n\
         type b = a;\n\
         var x : a;\n\
         x := 1;\n\
         end",
    );

    // One diagnostic at the declaration; the poisoned variable suppresses
    // the follow-on assignment check.
    assert_eq!(kinds(&checker), vec!["Generic"]);
    assert_eq!(checker.errors()[0].line(), 4);
}

#[test]
fn test_undefined_type_in_declaration() {
    let checker = check_source(
        "program main begin\n\
         var x : matrix;\n\
         x := 1;\n\
         end",
    );

    assert_eq!(kinds(&checker), vec!["UndefinedType"]);
}

#[test]
fn test_assignment_widens_int_to_float() {
    let checker = check_source(
        "program main begin\n\
         var f : float;\n\
         f := 1;\n\
         end",
    );

    assert!(!checker.semantic_error_occurred(), "{:?}", checker.errors());
}

#[test]
fn test_assignment_float_into_int_is_mismatch() {
    let checker = check_source(
        "program main begin\n\
         var x : int;\n\
         x := 1.5;\n\
         end",
    );

    assert_eq!(kinds(&checker), vec!["TypeMismatch"]);
    assert_eq!(checker.errors()[0].line(), 3);
}

#[test]
fn test_assignment_to_undefined_reports_once() {
    let checker = check_source(
        "program main begin\n\
         y := 1;\n\
         end",
    );

    assert_eq!(kinds(&checker), vec!["NotDefined"]);
}

#[test]
fn test_missing_return_flagged() {
    let checker = check_source(
        "program main begin\n\
         function f(): int begin\n\
         printi(1);\n\
         end;\n\
         end",
    );

    assert_eq!(kinds(&checker), vec!["MissingReturn"]);
}

#[test]
fn test_void_function_exempt_from_missing_return() {
    let checker = check_source(
        "program main begin\n\
         function f() begin\n\
         printi(1);\n\
         end;\n\
         end",
    );

    assert!(!checker.semantic_error_occurred(), "{:?}", checker.errors());
}

#[test]
fn test_return_on_both_branches_satisfies() {
    let checker = check_source(
        "program main begin\n\
         function sign(x: int): int begin\n\
         if x < 0 then\n\
         return 0 - 1;\n\
         else\n\
         return 1;\n\
         endif;\n\
         end;\n\
         end",
    );

    assert!(!checker.semantic_error_occurred(), "{:?}", checker.errors());
}

#[test]
fn test_narrowing_return() {
    let checker = check_source(
        "program main begin\n\
         function f(): int begin\n\
         return 1.5;\n\
         end;\n\
         end",
    );

    // Narrowing is reported once; no secondary return-type mismatch.
    assert_eq!(kinds(&checker), vec!["Narrowing"]);
}

#[test]
fn test_return_widens_int_to_float() {
    let checker = check_source(
        "program main begin\n\
         function f(): float begin\n\
         return 1;\n\
         end;\n\
         end",
    );

    assert!(!checker.semantic_error_occurred(), "{:?}", checker.errors());
}

#[test]
fn test_return_at_global_scope_checked_against_void() {
    let checker = check_source(
        "program main begin\n\
         return 5;\n\
         end",
    );

    assert_eq!(kinds(&checker), vec!["ReturnType"]);
}

#[test]
fn test_break_outside_loop_flagged() {
    let checker = check_source(
        "program main begin\n\
         function f() begin\n\
         break;\n\
         end;\n\
         end",
    );

    assert_eq!(kinds(&checker), vec!["OutsideBreak"]);
    assert_eq!(checker.errors()[0].line(), 3);
}

#[test]
fn test_break_inside_nested_loops_accepted() {
    let checker = check_source(
        "program main begin\n\
         var x : int;\n\
         while 1 do\n\
         while 1 do\n\
         break;\n\
         enddo;\n\
         break;\n\
         enddo;\n\
         x := 1;\n\
         end",
    );

    assert!(!checker.semantic_error_occurred(), "{:?}", checker.errors());
}

#[test]
fn test_call_arity_mismatch() {
    let checker = check_source(
        "program main begin\n\
         printi(1, 2);\n\
         end",
    );

    assert_eq!(kinds(&checker), vec!["IncorrectParameter"]);
}

#[test]
fn test_call_argument_type_mismatch() {
    let checker = check_source(
        "program main begin\n\
         printi(1.5);\n\
         end",
    );

    assert_eq!(kinds(&checker), vec!["IncorrectParameter"]);
}

#[test]
fn test_call_arguments_checked_independently() {
    let checker = check_source(
        "program main begin\n\
         function g(a: int, b: int, c: int) begin\n\
         printi(a + b + c);\n\
         end;\n\
         g(1.5, 2, 3.5);\n\
         end",
    );

    // One diagnostic per offending argument; the good argument in between
    // is still accepted.
    assert_eq!(kinds(&checker), vec!["IncorrectParameter", "IncorrectParameter"]);
}

#[test]
fn test_call_argument_widens() {
    let checker = check_source(
        "program main begin\n\
         printf(1);\n\
         end",
    );

    assert!(!checker.semantic_error_occurred(), "{:?}", checker.errors());
}

#[test]
fn test_call_result_discarded_is_void_compatible() {
    let checker = check_source(
        "program main begin\n\
         function f(): int begin\n\
         return 1;\n\
         end;\n\
         f();\n\
         end",
    );

    assert!(!checker.semantic_error_occurred(), "{:?}", checker.errors());
}

#[test]
fn test_call_result_into_mismatched_target() {
    let checker = check_source(
        "program main begin\n\
         var x : int;\n\
         function f(): float begin\n\
         return 1.5;\n\
         end;\n\
         x := f();\n\
         end",
    );

    assert_eq!(kinds(&checker), vec!["TypeMismatch"]);
}

#[test]
fn test_call_result_widens_into_float_target() {
    let checker = check_source(
        "program main begin\n\
         var f : float;\n\
         function g(): int begin\n\
         return 1;\n\
         end;\n\
         f := g();\n\
         end",
    );

    assert!(!checker.semantic_error_occurred(), "{:?}", checker.errors());
}

#[test]
fn test_call_of_undefined_function() {
    let checker = check_source(
        "program main begin\n\
         foo(1);\n\
         end",
    );

    assert_eq!(kinds(&checker), vec!["NotDefined"]);
}

#[test]
fn test_call_of_non_function() {
    let checker = check_source(
        "program main begin\n\
         var x : int;\n\
         x(1);\n\
         end",
    );

    assert_eq!(kinds(&checker), vec!["Generic"]);
}

#[test]
fn test_condition_must_be_int() {
    let checker = check_source(
        "program main begin\n\
         if 1.5 then\n\
         printi(1);\n\
         endif;\n\
         end",
    );

    assert_eq!(kinds(&checker), vec!["Condition"]);
    assert_eq!(checker.errors()[0].line(), 2);
}

#[test]
fn test_for_bounds_must_be_int() {
    let checker = check_source(
        "program main begin\n\
         var i : int;\n\
         for i := 1.5 to 10 do\n\
         printi(i);\n\
         enddo;\n\
         end",
    );

    assert_eq!(kinds(&checker), vec!["Condition"]);
}

#[test]
fn test_while_condition_error_operand_suppressed() {
    let checker = check_source(
        "program main begin\n\
         while y do\n\
         printi(1);\n\
         enddo;\n\
         end",
    );

    // The undefined name is the root cause; no condition diagnostic.
    assert_eq!(kinds(&checker), vec!["NotDefined"]);
}

#[test]
fn test_comparison_chain_rejected() {
    let checker = check_source(
        "program main begin\n\
         if 1 < 2 < 3 then\n\
         printi(1);\n\
         endif;\n\
         end",
    );

    assert_eq!(kinds(&checker), vec!["Comparison"]);
}

#[test]
fn test_comparison_operand_types_must_match() {
    let checker = check_source(
        "program main begin\n\
         if 1 < 2.5 then\n\
         printi(1);\n\
         endif;\n\
         end",
    );

    assert_eq!(kinds(&checker), vec!["TypeMismatch"]);
}

#[test]
fn test_logical_operands_must_not_be_float() {
    let checker = check_source(
        "program main begin\n\
         if 1.0 & 1 then\n\
         printi(1);\n\
         endif;\n\
         end",
    );

    assert_eq!(kinds(&checker), vec!["TypeMismatch"]);
}

#[test]
fn test_power_exponent_must_be_float() {
    let checker = check_source(
        "program main begin\n\
         var x : int;\n\
         x := 2 ** 2;\n\
         end",
    );

    assert_eq!(kinds(&checker), vec!["TypeMismatch"]);
}

#[test]
fn test_power_keeps_base_type() {
    let checker = check_source(
        "program main begin\n\
         var x : int;\n\
         x := 2 ** 2.0;\n\
         end",
    );

    assert!(!checker.semantic_error_occurred(), "{:?}", checker.errors());
}

#[test]
fn test_arithmetic_mixes_to_float() {
    let checker = check_source(
        "program main begin\n\
         var f : float;\n\
         f := 1 + 2.5;\n\
         end",
    );

    assert!(!checker.semantic_error_occurred(), "{:?}", checker.errors());
}

#[test]
fn test_storage_var_only_at_global_scope() {
    let checker = check_source(
        "program main begin\n\
         function f() begin\n\
         let var x : int; in\n\
         x := 1;\n\
         end;\n\
         end;\n\
         end",
    );

    assert_eq!(kinds(&checker), vec!["Generic"]);
    assert_eq!(checker.errors()[0].line(), 3);
}

#[test]
fn test_storage_static_only_in_nested_scopes() {
    let checker = check_source(
        "program main begin\n\
         static x : int;\n\
         x := 1;\n\
         end",
    );

    assert_eq!(kinds(&checker), vec!["Generic"]);
}

#[test]
fn test_array_return_type_rejected_and_rolled_back() {
    let checker = check_source(
        "program main begin\n\
         function f(): array [4] of int begin\n\
         return 1;\n\
         end;\n\
         f();\n\
         end",
    );

    // The broken signature is rolled back, so the later call reports
    // not-defined instead of cascading.
    assert_eq!(kinds(&checker), vec!["ArrayType", "NotDefined"]);
}

#[test]
fn test_array_parameter_rejected() {
    let checker = check_source(
        "program main begin\n\
         function f(a: array [4] of int) begin\n\
         printi(1);\n\
         end;\n\
         end",
    );

    assert_eq!(kinds(&checker), vec!["ArrayType"]);
}

#[test]
fn test_rollback_after_missing_return() {
    let checker = check_source(
        "program main begin\n\
         function f(): int begin\n\
         printi(1);\n\
         end;\n\
         f();\n\
         end",
    );

    assert_eq!(kinds(&checker), vec!["MissingReturn", "NotDefined"]);
}

#[test]
fn test_function_redefinition_keeps_first_signature() {
    let checker = check_source(
        "program main begin\n\
         var x : int;\n\
         function f(): int begin\n\
         return 1;\n\
         end;\n\
         function f(): float begin\n\
         return 1;\n\
         end;\n\
         x := f();\n\
         end",
    );

    // Second declaration is rejected; the call checks against the first
    // signature and passes.
    assert_eq!(kinds(&checker), vec!["Redefinition"]);
}

#[test]
fn test_subscript_index_must_be_int() {
    let checker = check_source(
        "program main begin\n\
         var a : array [10] of int;\n\
         a[1.5] := 1;\n\
         end",
    );

    assert_eq!(kinds(&checker), vec!["TypeMismatch"]);
}

#[test]
fn test_subscript_of_scalar_rejected() {
    let checker = check_source(
        "program main begin\n\
         var x : int;\n\
         x[0] := 1;\n\
         end",
    );

    assert_eq!(kinds(&checker), vec!["Generic"]);
}

#[test]
fn test_subscript_through_alias() {
    let checker = check_source(
        "program main begin\n\
         type vector = array [8] of float;\n\
         var v : vector;\n\
         v[0] := 1.5;\n\
         v[1] := 2;\n\
         end",
    );

    assert!(!checker.semantic_error_occurred(), "{:?}", checker.errors());
}

#[test]
fn test_array_used_whole_in_arithmetic_rejected() {
    let checker = check_source(
        "program main begin\n\
         var a : array [10] of int;\n\
         var x : int;\n\
         x := a + 1;\n\
         end",
    );

    assert_eq!(kinds(&checker), vec!["TypeMismatch"]);
}

#[test]
fn test_var_init_type_checked() {
    let checker = check_source(
        "program main begin\n\
         var x : int := 1.5;\n\
         end",
    );

    assert_eq!(kinds(&checker), vec!["TypeMismatch"]);
}

#[test]
fn test_var_init_widens() {
    let checker = check_source(
        "program main begin\n\
         var f : float := 1;\n\
         end",
    );

    assert!(!checker.semantic_error_occurred(), "{:?}", checker.errors());
}

#[test]
fn test_symbol_table_report_shape() {
    let checker = check_source(
        "program main begin\n\
         var x : int;\n\
         function add(a: int, b: float): int begin\n\
         return a;\n\
         end;\n\
         end",
    );

    let report = checker.symbol_table().report();
    assert!(report.starts_with("\tScope 2:\n"));
    assert!(report.contains("\t\tx, int, var\n"));
    assert!(report.contains("\t\tadd, int, (int, float)\n"));
    assert!(report.contains("\t\tScope 3:\n"));
    assert!(report.contains("\t\t\ta, int\n"));
    assert!(report.contains("\t\t\tb, float\n"));
}

#[test]
fn test_sibling_scopes_report_same_depth() {
    let checker = check_source(
        "program main begin\n\
         function f() begin\n\
         printi(1);\n\
         end;\n\
         function g() begin\n\
         printi(2);\n\
         end;\n\
         end",
    );

    let report = checker.symbol_table().report();
    assert_eq!(report.matches("\t\tScope 3:\n").count(), 2);
}

#[test]
fn test_ir_notified_of_declarations() {
    let checker = check_source(
        "program main begin\n\
         var x : int;\n\
         var a : array [10] of float;\n\
         function f(p: float): int begin\n\
         let static n : int; in\n\
         n := 1;\n\
         end;\n\
         return 0;\n\
         end;\n\
         end",
    );

    assert!(!checker.semantic_error_occurred(), "{:?}", checker.errors());
    let listing = checker.ir().to_string();
    assert!(listing.contains("start-program main"));
    assert!(listing.contains("static-int-list: x"));
    assert!(listing.contains("static-float-list: a[10]"));
    assert!(listing.contains("start-function f"));
    assert!(listing.contains("int f (float p)"));
    assert!(listing.contains("end-program main"));
}

#[test]
fn test_ir_let_slot_belongs_to_enclosing_function() {
    let checker = check_source(
        "program main begin\n\
         function f() begin\n\
         let static n : int; in\n\
         n := 1;\n\
         end;\n\
         end;\n\
         end",
    );

    let listing = checker.ir().to_string();
    let function_block = listing.split("start-function f").nth(1).unwrap();
    assert!(function_block.contains("static-int-list: n"));
}

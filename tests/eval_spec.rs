/// Spec tests for the tree-walking interpreter.
///
/// Tests load procedures straight through the lexer and parser and invoke
/// them on a bare `Interpreter`, so they focus on runtime semantics without
/// the manager facade.
use std::cell::RefCell;
use std::rc::Rc;

use hostscript::interpreter::{Interpreter, RuntimeError};
use hostscript::lexer::Lexer;
use hostscript::parser::Parser;
use hostscript::value::{ops, ArrayRef, BaseType, TypeInfo, Value};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn load(src: &str) -> Interpreter {
    let tokens = Lexer::new(src).tokenize();
    let mut parser = Parser::new(tokens, "eval.script");
    let script = parser.parse();
    assert!(
        !parser.has_errors(),
        "parse failed: {:?}",
        parser.errors()
    );
    let mut interp = Interpreter::new();
    interp.load_script(&script);
    interp
}

fn call(src: &str, name: &str, args: &[Value]) -> Value {
    load(src).invoke(name, args).expect("invoke failed")
}

fn call_err(src: &str, name: &str, args: &[Value]) -> RuntimeError {
    load(src)
        .invoke(name, args)
        .expect_err("invoke unexpectedly succeeded")
}

fn int_array(values: &[i32]) -> Value {
    Value::Array(ArrayRef::from_values(
        BaseType::Int32,
        values.iter().map(|v| Value::Int32(*v)).collect(),
    ))
}

// ---------------------------------------------------------------------------
// Arithmetic and promotion
// ---------------------------------------------------------------------------

#[test]
fn integer_arithmetic() {
    assert_eq!(
        call("int32 f() { return 2 + 3 * 4 - 6 / 2; }", "f", &[]),
        Value::Int32(11)
    );
}

#[test]
fn modulo() {
    assert_eq!(call("int32 f() { return 7 % 3; }", "f", &[]), Value::Int32(1));
}

#[test]
fn double_arithmetic() {
    assert_eq!(
        call("double f() { return 1.5 + 2.25; }", "f", &[]),
        Value::Double(3.75)
    );
}

#[test]
fn int_double_promotion() {
    assert_eq!(
        call("double f() { return 1 + 0.5; }", "f", &[]),
        Value::Double(1.5)
    );
}

#[test]
fn result_takes_wider_operand_type() {
    assert_eq!(
        call("int64 f(int64 a) { return a + 1; }", "f", &[Value::Int64(1)]),
        Value::Int64(2)
    );
}

#[test]
fn unsigned_operand_forces_unsigned_math() {
    // 0u32 - 1 wraps through 64-bit unsigned and is truncated to uint32.
    assert_eq!(
        call("uint32 f() { uint32 z = 0; return z - 1; }", "f", &[]),
        Value::UInt32(u32::MAX)
    );
}

#[test]
fn int32_wraps_at_width() {
    assert_eq!(
        call("int32 f() { int32 x = 2147483647; return x + 1; }", "f", &[]),
        Value::Int32(i32::MIN)
    );
}

#[test]
fn int8_wraps_at_width() {
    assert_eq!(
        call("int8 f() { int8 a = 127; int8 b = 1; return a + b; }", "f", &[]),
        Value::Int8(-128)
    );
}

#[test]
fn uint8_wraps_at_width() {
    assert_eq!(
        call(
            "uint8 f() { uint8 a = 255; uint8 b = 1; return a + b; }",
            "f",
            &[]
        ),
        Value::UInt8(0)
    );
}

#[test]
fn division_by_zero() {
    let err = call_err("int32 f() { return 1 / 0; }", "f", &[]);
    assert!(err.message.contains("Division by zero"));
}

#[test]
fn modulo_by_zero() {
    let err = call_err("int32 f() { return 1 % 0; }", "f", &[]);
    assert!(err.message.contains("Modulo by zero"));
}

#[test]
fn modulo_rejects_double() {
    let err = call_err("double f() { return 5.0 % 2.0; }", "f", &[]);
    assert!(err.message.contains("Modulo"));
}

#[test]
fn string_concatenation_with_number() {
    assert_eq!(
        call("string f(int32 x) { return \"v=\" + x; }", "f", &[Value::Int32(42)]),
        Value::Str("v=42".to_string())
    );
}

#[test]
fn string_concatenation_both_sides() {
    assert_eq!(
        call("string f() { return 1 + \"x\" + 2.5; }", "f", &[]),
        Value::Str("1x2.5".to_string())
    );
}

#[test]
fn subtracting_a_string_fails() {
    let err = call_err("int32 f() { return \"a\" - 1; }", "f", &[]);
    assert!(err.message.contains("Cannot convert string"));
}

// ---------------------------------------------------------------------------
// Unary operators
// ---------------------------------------------------------------------------

#[test]
fn negation_keeps_operand_width() {
    assert_eq!(
        call(
            "int64 f(int64 big) { return -big; }",
            "f",
            &[Value::Int64(5_000_000_000)]
        ),
        Value::Int64(-5_000_000_000)
    );
}

#[test]
fn negation_of_double() {
    assert_eq!(call("double f() { return -2.5; }", "f", &[]), Value::Double(-2.5));
}

#[test]
fn logical_not_uses_truthiness() {
    assert_eq!(call("bool f() { return !3; }", "f", &[]), Value::Bool(false));
    assert_eq!(call("bool f() { return !!3; }", "f", &[]), Value::Bool(true));
    assert_eq!(call("bool f() { return !\"\"; }", "f", &[]), Value::Bool(true));
}

#[test]
fn bitwise_not_widens_to_64_bits() {
    assert_eq!(call("int64 f() { return ~0; }", "f", &[]), Value::Int64(-1));
}

// ---------------------------------------------------------------------------
// Comparison, equality, logic
// ---------------------------------------------------------------------------

#[test]
fn ordered_comparisons() {
    assert_eq!(call("bool f() { return 1 < 2; }", "f", &[]), Value::Bool(true));
    assert_eq!(call("bool f() { return 2 <= 1; }", "f", &[]), Value::Bool(false));
    assert_eq!(call("bool f() { return 2.5 > 2; }", "f", &[]), Value::Bool(true));
}

#[test]
fn string_comparison_is_lexicographic() {
    assert_eq!(
        call("bool f() { return \"abc\" < \"abd\"; }", "f", &[]),
        Value::Bool(true)
    );
}

#[test]
fn equality_broadcasts_across_integer_widths() {
    assert_eq!(
        call("bool f() { int64 a = 5; return a == 5; }", "f", &[]),
        Value::Bool(true)
    );
}

#[test]
fn string_never_equals_number() {
    assert_eq!(
        call("bool f() { return \"5\" == 5; }", "f", &[]),
        Value::Bool(false)
    );
}

#[test]
fn array_equality_is_deep() {
    assert_eq!(
        call("bool f() { return [1, 2] == [1, 2]; }", "f", &[]),
        Value::Bool(true)
    );
    assert_eq!(
        call("bool f() { return [1, 2] == [1, 2, 3]; }", "f", &[]),
        Value::Bool(false)
    );
}

#[test]
fn ordering_arrays_is_an_error() {
    let err = call_err("bool f() { return [1] < [2]; }", "f", &[]);
    assert!(err.message.contains("array"));
}

#[test]
fn logical_operators_return_bool() {
    assert_eq!(
        call("bool f() { return 1 && \"x\"; }", "f", &[]),
        Value::Bool(true)
    );
    assert_eq!(
        call("bool f() { return 0 || \"\"; }", "f", &[]),
        Value::Bool(false)
    );
}

#[test]
fn short_circuit_skips_right_operand() {
    let src = "bool t() { return false && boom(); } bool u() { return true || boom(); }";
    let mut interp = load(src);

    let counter = Rc::new(RefCell::new(0));
    let hits = counter.clone();
    interp.register_external_fn("boom", move |_args| {
        *hits.borrow_mut() += 1;
        Ok(Value::Bool(true))
    });

    assert_eq!(interp.invoke("t", &[]).unwrap(), Value::Bool(false));
    assert_eq!(interp.invoke("u", &[]).unwrap(), Value::Bool(true));
    assert_eq!(*counter.borrow(), 0);
}

// ---------------------------------------------------------------------------
// Bitwise operators
// ---------------------------------------------------------------------------

#[test]
fn bitwise_operations() {
    assert_eq!(call("int64 f() { return 6 & 3; }", "f", &[]), Value::Int64(2));
    assert_eq!(call("int64 f() { return 6 | 3; }", "f", &[]), Value::Int64(7));
    assert_eq!(call("int64 f() { return 6 ^ 3; }", "f", &[]), Value::Int64(5));
    assert_eq!(call("int64 f() { return 1 << 4; }", "f", &[]), Value::Int64(16));
    assert_eq!(call("int64 f() { return 32 >> 2; }", "f", &[]), Value::Int64(8));
}

#[test]
fn bitwise_with_unsigned_operand_is_unsigned() {
    assert_eq!(
        call("uint64 f(uint8 x) { return x | 0; }", "f", &[Value::UInt8(5)]),
        Value::UInt64(5)
    );
}

#[test]
fn bitwise_rejects_double() {
    let err = call_err("int32 f() { return 1 & 2.0; }", "f", &[]);
    assert!(err.message.contains("integer operands"));
}

#[test]
fn bitwise_rejects_bool() {
    let err = call_err("int32 f() { return true & 1; }", "f", &[]);
    assert!(err.message.contains("integer operands"));
}

// ---------------------------------------------------------------------------
// Control flow
// ---------------------------------------------------------------------------

#[test]
fn factorial() {
    let src = "int32 fact(int32 n) { if (n <= 1) return 1; return n * fact(n - 1); }";
    assert_eq!(call(src, "fact", &[Value::Int32(5)]), Value::Int32(120));
}

#[test]
fn fibonacci_recursion() {
    let src = "int32 fib(int32 n) { if (n < 2) return n; return fib(n - 1) + fib(n - 2); }";
    assert_eq!(call(src, "fib", &[Value::Int32(10)]), Value::Int32(55));
}

#[test]
fn while_loop_with_break() {
    let src = "int32 f() { int32 i = 0; while (true) { i += 1; if (i == 3) break; } return i; }";
    assert_eq!(call(src, "f", &[]), Value::Int32(3));
}

#[test]
fn do_while_runs_body_first() {
    let src = "int32 f() { int32 n = 0; do { n += 1; } while (false); return n; }";
    assert_eq!(call(src, "f", &[]), Value::Int32(1));
}

#[test]
fn for_loop_sums() {
    let src = "int32 f() { int32 s = 0; for (int32 i = 1; i <= 4; i += 1) { s += i; } return s; }";
    assert_eq!(call(src, "f", &[]), Value::Int32(10));
}

#[test]
fn continue_in_for_reaches_increment() {
    let src = "int32 f() {
        int32 s = 0;
        for (int32 i = 0; i < 5; i += 1) {
            if (i % 2 == 0) continue;
            s += i;
        }
        return s;
    }";
    assert_eq!(call(src, "f", &[]), Value::Int32(4));
}

#[test]
fn empty_for_condition_is_true() {
    let src = "int32 f() { int32 i = 0; for (;;) { i += 1; if (i == 2) break; } return i; }";
    assert_eq!(call(src, "f", &[]), Value::Int32(2));
}

#[test]
fn ternary_evaluates_only_taken_branch() {
    assert_eq!(
        call("int32 f() { return true ? 1 : 1 / 0; }", "f", &[]),
        Value::Int32(1)
    );
}

#[test]
fn break_outside_loop_is_a_runtime_error() {
    let err = call_err("int32 f() { break; return 1; }", "f", &[]);
    assert!(err.message.contains("break"));
}

// ---------------------------------------------------------------------------
// Switch
// ---------------------------------------------------------------------------

#[test]
fn switch_falls_through_until_break() {
    let src = "int32 g(int32 v) {
        int32 o = 0;
        switch (v) {
            case 1: o += 1;
            case 2: o += 2;
            case 3: o += 3; break;
            default: o = -1;
        }
        return o;
    }";
    assert_eq!(call(src, "g", &[Value::Int32(1)]), Value::Int32(6));
    assert_eq!(call(src, "g", &[Value::Int32(2)]), Value::Int32(5));
    assert_eq!(call(src, "g", &[Value::Int32(3)]), Value::Int32(3));
    assert_eq!(call(src, "g", &[Value::Int32(7)]), Value::Int32(-1));
}

#[test]
fn switch_without_match_or_default_is_noop() {
    let src = "int32 f() { int32 o = 9; switch (5) { case 1: o = 0; } return o; }";
    assert_eq!(call(src, "f", &[]), Value::Int32(9));
}

#[test]
fn switch_case_expressions_are_evaluated() {
    let src = "int32 f(int32 v) {
        int32 probe = 2;
        switch (v) {
            case probe: return 20;
            default: return -1;
        }
    }";
    assert_eq!(call(src, "f", &[Value::Int32(2)]), Value::Int32(20));
}

#[test]
fn continue_inside_switch_escapes_to_loop() {
    let src = "int32 f() {
        int32 s = 0;
        for (int32 i = 0; i < 4; i += 1) {
            switch (i) {
                case 1: continue;
                case 2: s += 10;
            }
            s += 1;
        }
        return s;
    }";
    assert_eq!(call(src, "f", &[]), Value::Int32(13));
}

// ---------------------------------------------------------------------------
// Scoping
// ---------------------------------------------------------------------------

#[test]
fn inner_block_shadows_outer_binding() {
    let src = "int32 f() { int32 x = 1; { int32 x = 2; } return x; }";
    assert_eq!(call(src, "f", &[]), Value::Int32(1));
}

#[test]
fn for_initializer_is_scoped_to_the_loop() {
    let src = "int32 f() { for (int32 i = 0; i < 1; i += 1) { } return i; }";
    let err = call_err(src, "f", &[]);
    assert!(err.message.contains("Undefined variable: 'i'"));
}

#[test]
fn names_never_resolve_into_the_callers_frame() {
    let src = "int32 helper() { return x; }
               int32 f() { int32 x = 1; return helper(); }";
    let err = call_err(src, "f", &[]);
    assert!(err.message.contains("Undefined variable: 'x'"));
    assert_eq!(err.procedure, "helper");
}

// ---------------------------------------------------------------------------
// Variables, conversion, returns
// ---------------------------------------------------------------------------

#[test]
fn declaration_converts_initializer_to_declared_type() {
    assert_eq!(
        call("int32 f() { int32 x = 2.9; return x; }", "f", &[]),
        Value::Int32(2)
    );
}

#[test]
fn default_initialization() {
    assert_eq!(call("int32 f() { int32 x; return x; }", "f", &[]), Value::Int32(0));
    assert_eq!(
        call("string f() { string s; return s; }", "f", &[]),
        Value::Str(String::new())
    );
    assert_eq!(
        call("bool f() { bool b; return b; }", "f", &[]),
        Value::Bool(false)
    );
    assert_eq!(
        call("int32 f() { int32[] a; return len(a); }", "f", &[]),
        Value::Int32(0)
    );
}

#[test]
fn compound_assignment_applies_operator() {
    let src = "int32 f() { int32 x = 10; x -= 3; x *= 2; x /= 7; return x; }";
    assert_eq!(call(src, "f", &[]), Value::Int32(2));
}

#[test]
fn return_converts_to_declared_type() {
    assert_eq!(call("int8 f() { return 300; }", "f", &[]), Value::Int8(44));
    assert_eq!(
        call("string f() { return 7; }", "f", &[]),
        Value::Str("7".to_string())
    );
    assert_eq!(call("bool f() { return 2; }", "f", &[]), Value::Bool(true));
}

#[test]
fn arguments_convert_to_parameter_types() {
    assert_eq!(
        call("int32 f(int32 x) { return x; }", "f", &[Value::Double(3.7)]),
        Value::Int32(3)
    );
}

#[test]
fn arity_mismatch_is_an_error() {
    let err = call_err("int32 f(int32 x) { return x; }", "f", &[]);
    assert!(err.message.contains("expects 1 arguments, got 0"));
}

#[test]
fn missing_procedure_is_an_error() {
    let err = call_err("void f() { }", "nope", &[]);
    assert!(err.message.contains("Procedure not found"));
}

#[test]
fn non_void_fall_through_is_an_error() {
    let err = call_err("int32 f() { }", "f", &[]);
    assert!(err.message.contains("must return a value"));
    assert_eq!(err.procedure, "f");
}

#[test]
fn void_fall_through_is_fine() {
    assert_eq!(call("void f() { }", "f", &[]), Value::Void);
}

#[test]
fn void_ignores_returned_value() {
    assert_eq!(call("void f() { return; }", "f", &[]), Value::Void);
}

#[test]
fn undefined_variable_read() {
    let err = call_err("int32 f() { return ghost; }", "f", &[]);
    assert!(err.message.contains("Undefined variable: 'ghost'"));
}

#[test]
fn undefined_function_call() {
    let err = call_err("int32 f() { return ghost(); }", "f", &[]);
    assert!(err.message.contains("Undefined function: 'ghost'"));
}

// ---------------------------------------------------------------------------
// Arrays
// ---------------------------------------------------------------------------

#[test]
fn array_literal_index_and_len() {
    let src = "int32 f() { int32[] a = [10, 20, 30]; return a[1] + len(a); }";
    assert_eq!(call(src, "f", &[]), Value::Int32(23));
}

#[test]
fn push_returns_new_length() {
    let src = "int32 h() { int32[] a = [1, 2, 3]; push(a, 4); return len(a); }";
    assert_eq!(call(src, "h", &[]), Value::Int32(4));
}

#[test]
fn pop_removes_and_returns_last() {
    let src = "int32 f() { int32[] a = [1, 2, 3]; int32 last = pop(a); return last + len(a); }";
    assert_eq!(call(src, "f", &[]), Value::Int32(5));
}

#[test]
fn index_assignment_writes_in_place() {
    let src = "int32 f() { int32[] a = [1, 2]; a[0] = 9; return a[0]; }";
    assert_eq!(call(src, "f", &[]), Value::Int32(9));
}

#[test]
fn index_out_of_bounds_with_position() {
    let src = "int32 f() {
    int32[] a = [1, 2, 3];
    return a[3];
}";
    let err = call_err(src, "f", &[]);
    assert!(err.message.contains("index out of bounds"));
    assert_eq!(err.line, 3);
    assert_eq!(err.column, 13);
}

#[test]
fn index_assignment_out_of_bounds() {
    let err = call_err("void f() { int32[] a = []; a[0] = 1; }", "f", &[]);
    assert!(err.message.contains("index out of bounds"));
}

#[test]
fn push_converts_to_element_type() {
    let src = "int32 f() { int32[] a = [1]; push(a, 2.5); push(a, true); return a[1] + a[2]; }";
    assert_eq!(call(src, "f", &[]), Value::Int32(3));
}

#[test]
fn push_incompatible_element_fails() {
    let err = call_err("void f() { int32[] a = [1]; push(a, \"nope\"); }", "f", &[]);
    assert!(err.message.contains("Cannot convert string"));
}

#[test]
fn pop_empty_array_fails() {
    let err = call_err("void f() { int32[] a = []; pop(a); }", "f", &[]);
    assert!(err.message.contains("Cannot pop from an empty array"));
}

#[test]
fn len_requires_an_array() {
    let err = call_err("int32 f() { return len(5); }", "f", &[]);
    assert!(err.message.contains("array"));
}

#[test]
fn push_requires_an_array() {
    let err = call_err("int32 f() { return push(1, 2); }", "f", &[]);
    assert!(err.message.contains("array"));
}

#[test]
fn pop_requires_an_array() {
    let err = call_err("int32 f() { return pop(1); }", "f", &[]);
    assert!(err.message.contains("array"));
}

#[test]
fn array_literal_elements_convert_to_first_element_type() {
    let src = "int32 f() { int32[] a = [1, 2.9]; return a[1]; }";
    assert_eq!(call(src, "f", &[]), Value::Int32(2));
}

#[test]
fn nested_array_literal_is_rejected() {
    let err = call_err("void f() { int32[] a = [[1]]; }", "f", &[]);
    assert!(err.message.contains("Nested arrays"));
}

#[test]
fn arrays_share_through_parameter_passing() {
    let src = "void grow(int32[] a) { push(a, 9); }
               int32 f() { int32[] a = [1]; grow(a); return len(a); }";
    assert_eq!(call(src, "f", &[]), Value::Int32(2));
}

#[test]
fn host_array_argument_aliases_script_mutations() {
    let arr = ArrayRef::from_values(BaseType::Int32, vec![Value::Int32(1), Value::Int32(2)]);
    let mut interp = load("void grow(int32[] a) { push(a, 3); }");
    interp
        .invoke("grow", &[Value::Array(arr.clone())])
        .expect("invoke failed");
    assert_eq!(arr.len(), 3);
    assert_eq!(arr.get(2), Some(Value::Int32(3)));
}

#[test]
fn push_then_pop_restores_the_array() {
    let src = "int32 f() {
        int32[] a = [1, 2];
        push(a, 7.2);
        int32 back = pop(a);
        return back * 100 + len(a) * 10 + a[1];
    }";
    // pop returns the converted 7, the array is back to [1, 2].
    assert_eq!(call(src, "f", &[]), Value::Int32(722));
}

// ---------------------------------------------------------------------------
// External bindings on the bare interpreter
// ---------------------------------------------------------------------------

#[test]
fn external_function_is_called_with_evaluated_args() {
    let mut interp = load("int32 f() { return triple(5) + 1; }");
    interp.register_external_fn("triple", |args| {
        let n = ops::to_i64(&args[0]).map_err(|e| e.to_string())?;
        Ok(Value::Int64(n * 3))
    });
    assert_eq!(interp.invoke("f", &[]).unwrap(), Value::Int32(16));
}

#[test]
fn external_function_error_becomes_runtime_error() {
    let mut interp = load("int32 f() { return fail(); }");
    interp.register_external_fn("fail", |_args| Err("backend unavailable".to_string()));
    let err = interp.invoke("f", &[]).unwrap_err();
    assert!(err.message.contains("backend unavailable"));
    assert_eq!(err.procedure, "f");
}

#[test]
fn procedures_take_precedence_over_external_functions() {
    let mut interp = load("int32 twice(int32 x) { return x * 2; } int32 f() { return twice(4); }");
    interp.register_external_fn("twice", |_args| Ok(Value::Int32(999)));
    assert_eq!(interp.invoke("f", &[]).unwrap(), Value::Int32(8));
}

#[test]
fn builtins_shadow_external_functions() {
    let mut interp = load("int32 f() { return len([1, 2]); }");
    interp.register_external_fn("len", |_args| Ok(Value::Int32(999)));
    assert_eq!(interp.invoke("f", &[]).unwrap(), Value::Int32(2));
}

#[test]
fn external_variable_read_and_write() {
    let cell = Rc::new(RefCell::new(Value::Int32(10)));
    let get_cell = cell.clone();
    let set_cell = cell.clone();

    let mut interp = load("int32 bump() { x = x + 5; return x; }");
    interp.register_external_var(
        "x",
        move || get_cell.borrow().clone(),
        Some(Box::new(move |v| *set_cell.borrow_mut() = v)),
    );

    assert_eq!(interp.invoke("bump", &[]).unwrap(), Value::Int32(15));
    assert_eq!(*cell.borrow(), Value::Int32(15));
}

#[test]
fn locals_shadow_external_variables() {
    let mut interp = load("int32 f() { int32 x = 1; return x; }");
    interp.register_external_var("x", || Value::Int32(100), None);
    assert_eq!(interp.invoke("f", &[]).unwrap(), Value::Int32(1));
}

// ---------------------------------------------------------------------------
// Conversion properties
// ---------------------------------------------------------------------------

#[test]
fn conversion_is_idempotent() {
    let values = [
        Value::Int8(-5),
        Value::UInt8(200),
        Value::Int32(-1),
        Value::UInt64(u64::MAX),
        Value::Double(3.7),
        Value::Str("12ab".to_string()),
        Value::Bool(true),
        int_array(&[1, 2, 3]),
    ];
    let targets = [
        TypeInfo::scalar(BaseType::Int8),
        TypeInfo::scalar(BaseType::UInt8),
        TypeInfo::scalar(BaseType::Int16),
        TypeInfo::scalar(BaseType::UInt16),
        TypeInfo::scalar(BaseType::Int32),
        TypeInfo::scalar(BaseType::UInt32),
        TypeInfo::scalar(BaseType::Int64),
        TypeInfo::scalar(BaseType::UInt64),
        TypeInfo::scalar(BaseType::Double),
        TypeInfo::scalar(BaseType::Str),
        TypeInfo::scalar(BaseType::Bool),
        TypeInfo::array(BaseType::Int64),
    ];

    for value in &values {
        for target in &targets {
            if let Ok(once) = ops::convert(value, *target) {
                let twice = ops::convert(&once, *target).expect("second conversion failed");
                assert_eq!(once, twice, "convert not idempotent for {:?} -> {}", value, target);
            }
        }
    }
}

#[test]
fn scalar_to_array_conversion_fails() {
    assert!(ops::convert(&Value::Int32(1), TypeInfo::array(BaseType::Int32)).is_err());
    assert!(ops::convert(&int_array(&[1]), TypeInfo::scalar(BaseType::Int32)).is_err());
}

#[test]
fn array_conversion_to_same_element_type_shares_the_buffer() {
    let original = int_array(&[1, 2]);
    let converted = ops::convert(&original, TypeInfo::array(BaseType::Int32)).unwrap();
    if let (Value::Array(a), Value::Array(b)) = (&original, &converted) {
        a.push(Value::Int32(3));
        assert_eq!(b.len(), 3);
    } else {
        panic!("expected arrays");
    }
}

#[test]
fn array_conversion_to_other_element_type_copies() {
    let original = int_array(&[1, 2]);
    let converted = ops::convert(&original, TypeInfo::array(BaseType::Int64)).unwrap();
    if let (Value::Array(a), Value::Array(b)) = (&original, &converted) {
        a.push(Value::Int32(3));
        assert_eq!(b.len(), 2);
        assert_eq!(b.get(0), Some(Value::Int64(1)));
    } else {
        panic!("expected arrays");
    }
}

#[test]
fn truthiness_matrix() {
    assert!(ops::truthy(&Value::Int32(-1)));
    assert!(!ops::truthy(&Value::Int32(0)));
    assert!(ops::truthy(&Value::Str("x".to_string())));
    assert!(!ops::truthy(&Value::Str(String::new())));
    assert!(ops::truthy(&int_array(&[])));
    assert!(!ops::truthy(&Value::Void));
}

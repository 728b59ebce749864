//! Tests for the standard library functions.
//!
//! These tests open every library with its defaults and call functions
//! the way a script would, through the state.

extern crate libgate;

use libgate::runner::ds::error::ScriptError;
use libgate::runner::ds::value::Value;
use libgate::runner::plugin::registry::LibraryRegistry;
use libgate::runner::plugin::types::ScriptState;

fn opened_state() -> ScriptState {
    let registry = LibraryRegistry::standard().unwrap();
    let mut state = ScriptState::new();
    registry.open_all(&mut state).unwrap();
    state
}

fn call(state: &mut ScriptState, library: &str, function: &str, args: Vec<Value>) -> Value {
    state
        .call(library, function, args)
        .unwrap_or_else(|e| panic!("{}.{} should succeed: {}", library, function, e))
}

fn list(items: &[i64]) -> Value {
    Value::List(items.iter().map(|i| Value::Integer(*i)).collect())
}

// ============================================================================
// Math tests
// ============================================================================

mod math_tests {
    use super::*;

    #[test]
    fn test_math_abs_negative() {
        let mut state = opened_state();
        assert_eq!(call(&mut state, "math", "abs", vec![Value::Integer(-5)]), Value::Integer(5));
    }

    #[test]
    fn test_math_floor_and_ceil() {
        let mut state = opened_state();
        assert_eq!(call(&mut state, "math", "floor", vec![Value::Float(3.7)]), Value::Integer(3));
        assert_eq!(call(&mut state, "math", "ceil", vec![Value::Float(3.2)]), Value::Integer(4));
    }

    #[test]
    fn test_math_max_min() {
        let mut state = opened_state();
        let args = vec![Value::Integer(3), Value::Float(7.5), Value::Integer(-2)];
        assert_eq!(call(&mut state, "math", "max", args.clone()), Value::Float(7.5));
        assert_eq!(call(&mut state, "math", "min", args), Value::Integer(-2));
    }

    #[test]
    fn test_math_sqrt_string_coercion() {
        let mut state = opened_state();
        assert_eq!(call(&mut state, "math", "sqrt", vec![Value::from("25")]), Value::Integer(5));
    }

    #[test]
    fn test_math_bad_argument() {
        let mut state = opened_state();
        let err = state.call("math", "sqrt", vec![Value::Boolean(true)]).unwrap_err();
        assert_eq!(
            err,
            ScriptError::TypeError("bad argument #1 to 'sqrt' (number expected, got boolean)".to_string())
        );
    }

    #[test]
    fn test_math_random_range() {
        let mut state = opened_state();
        for _ in 0..50 {
            match call(&mut state, "math", "random", vec![Value::Integer(3), Value::Integer(5)]) {
                Value::Integer(n) => assert!((3..=5).contains(&n)),
                other => panic!("expected integer, got {:?}", other),
            }
        }
        assert!(state.call("math", "random", vec![Value::Integer(0)]).is_err());
    }

    #[test]
    fn test_math_tointeger() {
        let mut state = opened_state();
        assert_eq!(call(&mut state, "math", "tointeger", vec![Value::Float(8.0)]), Value::Integer(8));
        assert_eq!(call(&mut state, "math", "tointeger", vec![Value::Float(8.5)]), Value::Nil);
    }
}

// ============================================================================
// Base tests
// ============================================================================

mod base_tests {
    use super::*;

    #[test]
    fn test_type_names() {
        let mut state = opened_state();
        let handle = state.results()[0].clone();
        assert_eq!(call(&mut state, "", "type", vec![Value::Nil]), Value::from("nil"));
        assert_eq!(call(&mut state, "", "type", vec![list(&[1])]), Value::from("list"));
        assert_eq!(call(&mut state, "", "type", vec![handle]), Value::from("library"));
    }

    #[test]
    fn test_tonumber() {
        let mut state = opened_state();
        assert_eq!(call(&mut state, "", "tonumber", vec![Value::from(" 42 ")]), Value::Integer(42));
        assert_eq!(call(&mut state, "", "tonumber", vec![Value::from("1.5")]), Value::Float(1.5));
        assert_eq!(call(&mut state, "", "tonumber", vec![Value::from("abc")]), Value::Nil);
    }

    #[test]
    fn test_assert_and_error() {
        let mut state = opened_state();
        assert_eq!(call(&mut state, "", "assert", vec![Value::Integer(1)]), Value::Integer(1));
        let err = state.call("", "assert", vec![Value::Boolean(false), Value::from("boom")]).unwrap_err();
        assert_eq!(err, ScriptError::RuntimeError("boom".to_string()));
        assert!(state.call("", "error", vec![Value::from("x")]).is_err());
    }

    #[test]
    fn test_select() {
        let mut state = opened_state();
        let args = vec![Value::from("#"), Value::Integer(7), Value::Integer(8)];
        assert_eq!(call(&mut state, "", "select", args), Value::Integer(2));
        let args = vec![Value::Integer(-1), Value::Integer(7), Value::Integer(8)];
        assert_eq!(call(&mut state, "", "select", args), Value::Integer(8));
    }
}

// ============================================================================
// String tests
// ============================================================================

mod string_tests {
    use super::*;

    #[test]
    fn test_upper_lower_len() {
        let mut state = opened_state();
        assert_eq!(call(&mut state, "string", "upper", vec![Value::from("abc")]), Value::from("ABC"));
        assert_eq!(call(&mut state, "string", "lower", vec![Value::from("AbC")]), Value::from("abc"));
        assert_eq!(call(&mut state, "string", "len", vec![Value::from("hello")]), Value::Integer(5));
    }

    #[test]
    fn test_reverse_and_sub() {
        let mut state = opened_state();
        assert_eq!(call(&mut state, "string", "reverse", vec![Value::from("abc")]), Value::from("cba"));
        let args = vec![Value::from("libgate"), Value::Integer(4)];
        assert_eq!(call(&mut state, "string", "sub", args), Value::from("gate"));
    }

    #[test]
    fn test_rep_huge_count_is_error() {
        let mut state = opened_state();
        let err = state
            .call("string", "rep", vec![Value::from("ab"), Value::Integer(i64::MAX)])
            .unwrap_err();
        assert_eq!(err, ScriptError::RuntimeError("resulting string too large".to_string()));
        assert_eq!(
            call(&mut state, "string", "rep", vec![Value::from("ab"), Value::Integer(2), Value::from(",")]),
            Value::from("ab,ab")
        );
    }
}

// ============================================================================
// Table tests
// ============================================================================

mod table_tests {
    use super::*;

    #[test]
    fn test_insert_and_remove() {
        let mut state = opened_state();
        let inserted = call(&mut state, "table", "insert", vec![list(&[1, 3]), Value::Integer(2), Value::Integer(2)]);
        assert_eq!(inserted, list(&[1, 2, 3]));
        let removed = call(&mut state, "table", "remove", vec![inserted, Value::Integer(1)]);
        assert_eq!(removed, list(&[2, 3]));
    }

    #[test]
    fn test_sort_and_concat() {
        let mut state = opened_state();
        let sorted = call(&mut state, "table", "sort", vec![list(&[3, 1, 2])]);
        assert_eq!(sorted, list(&[1, 2, 3]));
        assert_eq!(
            call(&mut state, "table", "concat", vec![sorted, Value::from(",")]),
            Value::from("1,2,3")
        );
        let mixed = Value::List(vec![Value::Integer(1), Value::from("a")]);
        assert!(state.call("table", "sort", vec![mixed]).is_err());
    }

    #[test]
    fn test_unpack_range() {
        let mut state = opened_state();
        let args = vec![list(&[5, 6, 7]), Value::Integer(2), Value::Integer(4)];
        assert_eq!(
            call(&mut state, "table", "unpack", args),
            Value::List(vec![Value::Integer(6), Value::Integer(7), Value::Nil])
        );
    }

    #[test]
    fn test_unpack_below_one_yields_nil() {
        let mut state = opened_state();
        let args = vec![list(&[5, 6]), Value::Integer(0), Value::Integer(2)];
        assert_eq!(
            call(&mut state, "table", "unpack", args),
            Value::List(vec![Value::Nil, Value::Integer(5), Value::Integer(6)])
        );
        let args = vec![list(&[5]), Value::Integer(3), Value::Integer(1)];
        assert_eq!(call(&mut state, "table", "unpack", args), Value::List(vec![]));
    }

    #[test]
    fn test_unpack_too_many_results() {
        let mut state = opened_state();
        let args = vec![list(&[1]), Value::Integer(1), Value::Integer(1 << 40)];
        let err = state.call("table", "unpack", args).unwrap_err();
        assert_eq!(err, ScriptError::RuntimeError("too many results to unpack".to_string()));

        let args = vec![list(&[1]), Value::Integer(i64::MIN), Value::Integer(i64::MAX)];
        assert!(state.call("table", "unpack", args).is_err());

        let args = vec![list(&[1]), Value::Integer(i64::MIN), Value::Integer(i64::MIN + 1)];
        assert_eq!(
            call(&mut state, "table", "unpack", args),
            Value::List(vec![Value::Nil, Value::Nil])
        );
    }
}

// ============================================================================
// Package, debug and channel tests
// ============================================================================

mod runtime_tests {
    use super::*;

    #[test]
    fn test_package_loaded_and_require() {
        let mut state = opened_state();
        match call(&mut state, "package", "loaded", vec![]) {
            Value::List(items) => {
                assert_eq!(items.len(), 10);
                assert_eq!(items[0], Value::from("package"));
            }
            other => panic!("expected list, got {:?}", other),
        }
        assert_eq!(
            call(&mut state, "package", "require", vec![Value::from("math")]),
            Value::Library("math".to_string())
        );
        assert!(state.call("package", "require", vec![Value::from("sockets")]).is_err());
    }

    #[test]
    fn test_debug_traceback_mentions_message() {
        let mut state = opened_state();
        match call(&mut state, "debug", "traceback", vec![Value::from("oops")]) {
            Value::String(s) => {
                assert!(s.starts_with("oops\nstack traceback:"));
                assert!(s.contains("library: coroutine"));
            }
            other => panic!("expected string, got {:?}", other),
        }
    }

    #[test]
    fn test_channel_through_state() {
        let mut state = opened_state();
        let ch = call(&mut state, "channel", "make", vec![Value::Integer(1)]);
        assert_eq!(call(&mut state, "channel", "send", vec![ch.clone(), Value::from("a")]), Value::Boolean(true));
        assert_eq!(call(&mut state, "channel", "send", vec![ch.clone(), Value::from("b")]), Value::Boolean(false));
        assert_eq!(call(&mut state, "channel", "receive", vec![ch]), Value::from("a"));
    }

    #[test]
    fn test_coroutine_outside_coroutine() {
        let mut state = opened_state();
        assert_eq!(call(&mut state, "coroutine", "running", vec![]), Value::Nil);
        assert_eq!(call(&mut state, "coroutine", "isyieldable", vec![]), Value::Boolean(false));
    }

    #[test]
    fn test_os_exit_status_out_of_range() {
        let mut state = opened_state();
        let err = state.call("os", "exit", vec![Value::Integer(4_294_967_296)]).unwrap_err();
        assert_eq!(
            err,
            ScriptError::TypeError(
                "bad argument #1 to 'exit' (exit status expected, got integer out of range)".to_string()
            )
        );
    }

    #[test]
    fn test_os_date_utc() {
        let mut state = opened_state();
        let args = vec![Value::from("!%Y-%m-%d"), Value::Integer(0)];
        assert_eq!(call(&mut state, "os", "date", args), Value::from("1970-01-01"));
        assert!(state.call("os", "date", vec![Value::from("%Q")]).is_err());
    }
}

//! Base library.
//!
//! Registered without a namespace: its functions become globals.

use crate::runner::ds::error::ScriptError;
use crate::runner::ds::value::Value;
use crate::runner::plugin::types::{FunctionTable, ScriptState};

use super::{arg, check_integer, BASE_LIB_NAME};

lazy_static! {
    static ref BASE_FUNCS: FunctionTable = FunctionTable::new()
        .add_native("assert", base_assert)
        .add_native("error", base_error)
        .add_native("print", base_print)
        .add_native("rawequal", base_rawequal)
        .add_native("select", base_select)
        .add_native("tonumber", base_tonumber)
        .add_native("tostring", base_tostring)
        .add_native("type", base_type);
}

/// Compiled-in base functions.
pub fn defaults() -> &'static FunctionTable {
    &BASE_FUNCS
}

/// Register `live` as the global function set. Pushes nothing.
pub fn open(state: &mut ScriptState, live: &FunctionTable) -> Result<usize, ScriptError> {
    state.register_globals(BASE_LIB_NAME, live);
    Ok(0)
}

/// Format all arguments the way `print` shows them.
pub(crate) fn format_args(args: &[Value]) -> String {
    args.iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join("\t")
}

/// assert(v [, message]) returns `v` when truthy.
fn base_assert(_state: &mut ScriptState, args: Vec<Value>) -> Result<Value, ScriptError> {
    let v = arg(&args, 0);
    if v.is_truthy() {
        return Ok(v.clone());
    }
    let message = match arg(&args, 1) {
        Value::Nil => "assertion failed!".to_string(),
        m => m.to_string(),
    };
    Err(ScriptError::RuntimeError(message))
}

fn base_error(_state: &mut ScriptState, args: Vec<Value>) -> Result<Value, ScriptError> {
    Err(ScriptError::RuntimeError(arg(&args, 0).to_string()))
}

fn base_print(_state: &mut ScriptState, args: Vec<Value>) -> Result<Value, ScriptError> {
    println!("{}", format_args(&args));
    Ok(Value::Nil)
}

fn base_rawequal(_state: &mut ScriptState, args: Vec<Value>) -> Result<Value, ScriptError> {
    Ok(Value::Boolean(arg(&args, 0) == arg(&args, 1)))
}

/// select(n, ...) returns the n-th extra argument; select('#', ...) counts them.
fn base_select(_state: &mut ScriptState, args: Vec<Value>) -> Result<Value, ScriptError> {
    let rest = args.len().saturating_sub(1);
    if arg(&args, 0).as_str() == Some("#") {
        return Ok(Value::Integer(rest as i64));
    }
    let n = check_integer("select", &args, 0)?;
    let index = if n < 0 { rest as i64 + n + 1 } else { n };
    if index < 1 {
        return Err(ScriptError::RuntimeError(
            "bad argument #1 to 'select' (index out of range)".to_string(),
        ));
    }
    Ok(args.get(index as usize).cloned().unwrap_or(Value::Nil))
}

fn base_tonumber(_state: &mut ScriptState, args: Vec<Value>) -> Result<Value, ScriptError> {
    Ok(match arg(&args, 0) {
        v @ (Value::Integer(_) | Value::Float(_)) => v.clone(),
        Value::String(s) => {
            let s = s.trim();
            if let Ok(i) = s.parse::<i64>() {
                Value::Integer(i)
            } else {
                s.parse::<f64>().map(Value::Float).unwrap_or(Value::Nil)
            }
        }
        _ => Value::Nil,
    })
}

fn base_tostring(_state: &mut ScriptState, args: Vec<Value>) -> Result<Value, ScriptError> {
    Ok(Value::String(arg(&args, 0).to_string()))
}

fn base_type(_state: &mut ScriptState, args: Vec<Value>) -> Result<Value, ScriptError> {
    Ok(Value::String(arg(&args, 0).type_name().to_string()))
}

//! String library.
//!
//! Positions are 1-based and count bytes. Negative positions count from
//! the end of the string.

use crate::runner::ds::error::ScriptError;
use crate::runner::ds::value::Value;
use crate::runner::plugin::types::{FunctionTable, ScriptState};

use super::{arg, check_integer, check_string, open_namespace, STRING_LIB_NAME};

/// Largest string `string.rep` will build, in bytes.
pub const MAX_STRING_LEN: usize = 1 << 30;

lazy_static! {
    static ref STRING_FUNCS: FunctionTable = FunctionTable::new()
        .add_native("byte", string_byte)
        .add_native("char", string_char)
        .add_native("len", string_len)
        .add_native("lower", string_lower)
        .add_native("rep", string_rep)
        .add_native("reverse", string_reverse)
        .add_native("sub", string_sub)
        .add_native("upper", string_upper);
}

/// Compiled-in string functions.
pub fn defaults() -> &'static FunctionTable {
    &STRING_FUNCS
}

/// Register `live` as the `string` namespace.
pub fn open(state: &mut ScriptState, live: &FunctionTable) -> Result<usize, ScriptError> {
    Ok(open_namespace(state, STRING_LIB_NAME, live))
}

/// Translate a relative position into a 1-based index clamped at 0.
fn relative(pos: i64, len: usize) -> i64 {
    if pos >= 0 {
        pos
    } else if pos.unsigned_abs() as usize > len {
        0
    } else {
        len as i64 + pos + 1
    }
}

/// Resolve `[i, j]` against a string of `len` bytes. `None` when empty.
fn byte_range(i: i64, j: i64, len: usize) -> Option<(usize, usize)> {
    let start = relative(i, len).max(1);
    let end = relative(j, len).min(len as i64);
    if start > end {
        None
    } else {
        Some((start as usize - 1, end as usize))
    }
}

fn optional_integer(function: &str, args: &[Value], index: usize, default: i64) -> Result<i64, ScriptError> {
    match arg(args, index) {
        Value::Nil => Ok(default),
        _ => check_integer(function, args, index),
    }
}

/// string.byte(s [, i [, j]]) returns the byte codes as a list.
fn string_byte(_state: &mut ScriptState, args: Vec<Value>) -> Result<Value, ScriptError> {
    let s = check_string("byte", &args, 0)?;
    let i = optional_integer("byte", &args, 1, 1)?;
    let j = optional_integer("byte", &args, 2, i)?;
    let codes = match byte_range(i, j, s.len()) {
        Some((from, to)) => s.as_bytes()[from..to]
            .iter()
            .map(|b| Value::Integer(i64::from(*b)))
            .collect(),
        None => Vec::new(),
    };
    Ok(Value::List(codes))
}

/// string.char(...) builds a string from byte codes.
fn string_char(_state: &mut ScriptState, args: Vec<Value>) -> Result<Value, ScriptError> {
    let mut bytes = Vec::with_capacity(args.len());
    for index in 0..args.len() {
        let code = check_integer("char", &args, index)?;
        let byte = u8::try_from(code).map_err(|_| {
            ScriptError::RuntimeError(format!("bad argument #{} to 'char' (value out of range)", index + 1))
        })?;
        bytes.push(byte);
    }
    Ok(Value::String(String::from_utf8_lossy(&bytes).into_owned()))
}

fn string_len(_state: &mut ScriptState, args: Vec<Value>) -> Result<Value, ScriptError> {
    let s = check_string("len", &args, 0)?;
    Ok(Value::Integer(s.len() as i64))
}

fn string_lower(_state: &mut ScriptState, args: Vec<Value>) -> Result<Value, ScriptError> {
    Ok(Value::String(check_string("lower", &args, 0)?.to_lowercase()))
}

/// string.rep(s, n [, sep])
fn string_rep(_state: &mut ScriptState, args: Vec<Value>) -> Result<Value, ScriptError> {
    let s = check_string("rep", &args, 0)?;
    let n = check_integer("rep", &args, 1)?;
    let sep = match arg(&args, 2) {
        Value::Nil => "",
        _ => check_string("rep", &args, 2)?,
    };
    if n <= 0 {
        return Ok(Value::String(String::new()));
    }
    let count = usize::try_from(n).map_err(|_| too_large())?;
    let size = s
        .len()
        .checked_mul(count)
        .and_then(|body| sep.len().checked_mul(count - 1)?.checked_add(body))
        .filter(|size| *size <= MAX_STRING_LEN)
        .ok_or_else(too_large)?;
    let mut out = String::with_capacity(size);
    for k in 0..count {
        if k > 0 {
            out.push_str(sep);
        }
        out.push_str(s);
    }
    Ok(Value::String(out))
}

fn too_large() -> ScriptError {
    ScriptError::RuntimeError("resulting string too large".to_string())
}

fn string_reverse(_state: &mut ScriptState, args: Vec<Value>) -> Result<Value, ScriptError> {
    Ok(Value::String(check_string("reverse", &args, 0)?.chars().rev().collect()))
}

/// string.sub(s, i [, j])
fn string_sub(_state: &mut ScriptState, args: Vec<Value>) -> Result<Value, ScriptError> {
    let s = check_string("sub", &args, 0)?;
    let i = optional_integer("sub", &args, 1, 1)?;
    let j = optional_integer("sub", &args, 2, -1)?;
    let out = match byte_range(i, j, s.len()) {
        Some((from, to)) => String::from_utf8_lossy(&s.as_bytes()[from..to]).into_owned(),
        None => String::new(),
    };
    Ok(Value::String(out))
}

fn string_upper(_state: &mut ScriptState, args: Vec<Value>) -> Result<Value, ScriptError> {
    Ok(Value::String(check_string("upper", &args, 0)?.to_uppercase()))
}

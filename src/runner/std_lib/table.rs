//! Table library over list values.
//!
//! Lists are values, so every "mutating" function returns the new list.

use std::cmp::Ordering;

use crate::runner::ds::error::ScriptError;
use crate::runner::ds::value::Value;
use crate::runner::plugin::types::{FunctionTable, ScriptState};

use super::{arg, check_integer, check_list, open_namespace, TAB_LIB_NAME};

/// Most values `table.unpack` returns in one call.
pub const MAX_UNPACK: usize = 1 << 20;

lazy_static! {
    static ref TABLE_FUNCS: FunctionTable = FunctionTable::new()
        .add_native("concat", table_concat)
        .add_native("insert", table_insert)
        .add_native("pack", table_pack)
        .add_native("remove", table_remove)
        .add_native("sort", table_sort)
        .add_native("unpack", table_unpack);
}

/// Compiled-in table functions.
pub fn defaults() -> &'static FunctionTable {
    &TABLE_FUNCS
}

/// Register `live` as the `table` namespace.
pub fn open(state: &mut ScriptState, live: &FunctionTable) -> Result<usize, ScriptError> {
    Ok(open_namespace(state, TAB_LIB_NAME, live))
}

/// table.concat(list [, sep])
fn table_concat(_state: &mut ScriptState, args: Vec<Value>) -> Result<Value, ScriptError> {
    let items = check_list("concat", &args, 0)?;
    let sep = match arg(&args, 1) {
        Value::Nil => String::new(),
        v => v.to_string(),
    };
    let mut parts = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        match item {
            Value::String(_) | Value::Integer(_) | Value::Float(_) => parts.push(item.to_string()),
            other => {
                return Err(ScriptError::TypeError(format!(
                    "invalid value (at index {}) in list for 'concat' ({})",
                    i + 1,
                    other.type_name()
                )))
            }
        }
    }
    Ok(Value::String(parts.join(&sep)))
}

/// table.insert(list, value) or table.insert(list, pos, value)
fn table_insert(_state: &mut ScriptState, args: Vec<Value>) -> Result<Value, ScriptError> {
    let mut items = check_list("insert", &args, 0)?.to_vec();
    match args.len() {
        2 => items.push(args[1].clone()),
        3 => {
            let pos = check_integer("insert", &args, 1)?;
            if pos < 1 || pos as usize > items.len() + 1 {
                return Err(ScriptError::RuntimeError(
                    "bad argument #2 to 'insert' (position out of bounds)".to_string(),
                ));
            }
            items.insert(pos as usize - 1, args[2].clone());
        }
        _ => {
            return Err(ScriptError::RuntimeError(
                "wrong number of arguments to 'insert'".to_string(),
            ))
        }
    }
    Ok(Value::List(items))
}

fn table_pack(_state: &mut ScriptState, args: Vec<Value>) -> Result<Value, ScriptError> {
    Ok(Value::List(args))
}

/// table.remove(list [, pos]) returns the list without the element.
fn table_remove(_state: &mut ScriptState, args: Vec<Value>) -> Result<Value, ScriptError> {
    let mut items = check_list("remove", &args, 0)?.to_vec();
    if items.is_empty() {
        return Ok(Value::List(items));
    }
    let pos = match arg(&args, 1) {
        Value::Nil => items.len() as i64,
        _ => check_integer("remove", &args, 1)?,
    };
    if pos < 1 || pos as usize > items.len() {
        return Err(ScriptError::RuntimeError(
            "bad argument #2 to 'remove' (position out of bounds)".to_string(),
        ));
    }
    items.remove(pos as usize - 1);
    Ok(Value::List(items))
}

/// table.sort(list) for lists of numbers or lists of strings.
fn table_sort(_state: &mut ScriptState, args: Vec<Value>) -> Result<Value, ScriptError> {
    let mut items = check_list("sort", &args, 0)?.to_vec();
    let mut mixed = false;
    items.sort_by(|a, b| match (a, b) {
        (Value::String(x), Value::String(y)) => x.cmp(y),
        _ => match (a.as_f64(), b.as_f64()) {
            (Some(x), Some(y)) if !matches!(a, Value::String(_)) && !matches!(b, Value::String(_)) => {
                x.partial_cmp(&y).unwrap_or(Ordering::Equal)
            }
            _ => {
                mixed = true;
                Ordering::Equal
            }
        },
    });
    if mixed {
        return Err(ScriptError::TypeError("attempt to compare incompatible values".to_string()));
    }
    Ok(Value::List(items))
}

/// table.unpack(list [, i [, j]]) returns positions i..=j as a list.
fn table_unpack(_state: &mut ScriptState, args: Vec<Value>) -> Result<Value, ScriptError> {
    let items = check_list("unpack", &args, 0)?;
    let i = match arg(&args, 1) {
        Value::Nil => 1,
        _ => check_integer("unpack", &args, 1)?,
    };
    let j = match arg(&args, 2) {
        Value::Nil => items.len() as i64,
        _ => check_integer("unpack", &args, 2)?,
    };
    if i > j {
        return Ok(Value::List(Vec::new()));
    }
    let count = (j as i128) - (i as i128) + 1;
    if count > MAX_UNPACK as i128 {
        return Err(ScriptError::RuntimeError("too many results to unpack".to_string()));
    }
    // positions outside the list, including those below 1, unpack as nil
    let out = (i..=j)
        .map(|k| {
            k.checked_sub(1)
                .and_then(|pos| usize::try_from(pos).ok())
                .and_then(|index| items.get(index))
                .cloned()
                .unwrap_or(Value::Nil)
        })
        .collect();
    Ok(Value::List(out))
}

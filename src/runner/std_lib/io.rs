//! IO library over the process's standard streams.

use std::io::{self, BufRead, Write};

use crate::runner::ds::error::ScriptError;
use crate::runner::ds::value::Value;
use crate::runner::plugin::types::{FunctionTable, ScriptState};

use super::{open_namespace, IO_LIB_NAME};

lazy_static! {
    static ref IO_FUNCS: FunctionTable = FunctionTable::new()
        .add_native("read", io_read)
        .add_native("write", io_write);
}

/// Compiled-in io functions.
pub fn defaults() -> &'static FunctionTable {
    &IO_FUNCS
}

/// Register `live` as the `io` namespace.
pub fn open(state: &mut ScriptState, live: &FunctionTable) -> Result<usize, ScriptError> {
    Ok(open_namespace(state, IO_LIB_NAME, live))
}

fn io_error(e: io::Error) -> ScriptError {
    ScriptError::RuntimeError(e.to_string())
}

/// io.read() reads one line from stdin without its terminator; nil at EOF.
fn io_read(_state: &mut ScriptState, _args: Vec<Value>) -> Result<Value, ScriptError> {
    let mut line = String::new();
    let n = io::stdin().lock().read_line(&mut line).map_err(io_error)?;
    if n == 0 {
        return Ok(Value::Nil);
    }
    let trimmed = line.trim_end_matches(&['\r', '\n'][..]).to_string();
    Ok(Value::String(trimmed))
}

/// io.write(...) writes its arguments to stdout with no separator.
fn io_write(_state: &mut ScriptState, args: Vec<Value>) -> Result<Value, ScriptError> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for value in &args {
        match value {
            Value::String(_) | Value::Integer(_) | Value::Float(_) => {
                write!(out, "{}", value).map_err(io_error)?
            }
            other => {
                return Err(ScriptError::bad_argument("write", 1, "string", other.type_name()));
            }
        }
    }
    out.flush().map_err(io_error)?;
    Ok(Value::Boolean(true))
}

//! Debug library.

use crate::runner::ds::error::ScriptError;
use crate::runner::ds::value::Value;
use crate::runner::plugin::types::{FunctionTable, ScriptState};

use super::{arg, open_namespace, DEBUG_LIB_NAME};

lazy_static! {
    static ref DEBUG_FUNCS: FunctionTable = FunctionTable::new()
        .add_native("getinfo", debug_getinfo)
        .add_native("traceback", debug_traceback);
}

/// Compiled-in debug functions.
pub fn defaults() -> &'static FunctionTable {
    &DEBUG_FUNCS
}

/// Register `live` as the `debug` namespace.
pub fn open(state: &mut ScriptState, live: &FunctionTable) -> Result<usize, ScriptError> {
    Ok(open_namespace(state, DEBUG_LIB_NAME, live))
}

/// debug.getinfo() describes the running state: its id followed by the
/// loaded libraries.
fn debug_getinfo(state: &mut ScriptState, _args: Vec<Value>) -> Result<Value, ScriptError> {
    let mut info = vec![Value::String(state.id().to_string())];
    info.extend(state.loaded_libraries().iter().map(|name| Value::Library(name.clone())));
    Ok(Value::List(info))
}

/// debug.traceback([message]) shows the pending results, newest first.
fn debug_traceback(state: &mut ScriptState, args: Vec<Value>) -> Result<Value, ScriptError> {
    let mut out = match arg(&args, 0) {
        Value::Nil => String::new(),
        m => format!("{}\n", m),
    };
    out.push_str("stack traceback:");
    for (depth, value) in state.results().iter().rev().enumerate() {
        out.push_str(&format!("\n\t[{}] {}", depth, value));
    }
    Ok(Value::String(out))
}

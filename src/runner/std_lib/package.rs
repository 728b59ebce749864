//! Package library: what has been loaded into the state.

use crate::runner::ds::error::ScriptError;
use crate::runner::ds::value::Value;
use crate::runner::plugin::types::{FunctionTable, ScriptState};

use super::{check_string, open_namespace, LOAD_LIB_NAME};

lazy_static! {
    static ref PACKAGE_FUNCS: FunctionTable = FunctionTable::new()
        .add_native("loaded", package_loaded)
        .add_native("require", package_require);
}

/// Compiled-in package functions.
pub fn defaults() -> &'static FunctionTable {
    &PACKAGE_FUNCS
}

/// Register `live` as the `package` namespace.
pub fn open(state: &mut ScriptState, live: &FunctionTable) -> Result<usize, ScriptError> {
    Ok(open_namespace(state, LOAD_LIB_NAME, live))
}

/// package.loaded() lists the loaded libraries in load order.
fn package_loaded(state: &mut ScriptState, _args: Vec<Value>) -> Result<Value, ScriptError> {
    Ok(Value::List(
        state
            .loaded_libraries()
            .iter()
            .map(|name| Value::String(name.clone()))
            .collect(),
    ))
}

/// package.require(name) returns the handle of an already loaded library.
fn package_require(state: &mut ScriptState, args: Vec<Value>) -> Result<Value, ScriptError> {
    let name = check_string("require", &args, 0)?;
    if state.is_loaded(name) {
        Ok(Value::Library(name.to_string()))
    } else {
        Err(ScriptError::RuntimeError(format!("module '{}' not found", name)))
    }
}

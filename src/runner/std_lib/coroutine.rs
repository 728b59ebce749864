//! Coroutine library.
//!
//! The stand-in state never runs inside a coroutine, so these only report
//! that fact.

use crate::runner::ds::error::ScriptError;
use crate::runner::ds::value::Value;
use crate::runner::plugin::types::{FunctionTable, ScriptState};

use super::{open_namespace, COROUTINE_LIB_NAME};

lazy_static! {
    static ref COROUTINE_FUNCS: FunctionTable = FunctionTable::new()
        .add_native("isyieldable", coroutine_isyieldable)
        .add_native("running", coroutine_running);
}

/// Compiled-in coroutine functions.
pub fn defaults() -> &'static FunctionTable {
    &COROUTINE_FUNCS
}

/// Register `live` as the `coroutine` namespace.
pub fn open(state: &mut ScriptState, live: &FunctionTable) -> Result<usize, ScriptError> {
    Ok(open_namespace(state, COROUTINE_LIB_NAME, live))
}

fn coroutine_isyieldable(_state: &mut ScriptState, _args: Vec<Value>) -> Result<Value, ScriptError> {
    Ok(Value::Boolean(false))
}

fn coroutine_running(_state: &mut ScriptState, _args: Vec<Value>) -> Result<Value, ScriptError> {
    Ok(Value::Nil)
}

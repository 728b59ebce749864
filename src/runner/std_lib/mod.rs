//! Standard libraries.
//!
//! Each library exposes its compiled-in default table (`defaults`) and its
//! Open hook (`open`). The hook registers whatever live table it is given,
//! so the same hook serves both the default path and customized opens.

pub mod base;
pub mod channel;
pub mod core;
pub mod coroutine;
pub mod debug;
pub mod io;
pub mod math;
pub mod os;
pub mod package;
pub mod string;
pub mod table;

pub use self::core::standard_descriptors;

use crate::runner::ds::error::ScriptError;
use crate::runner::ds::value::Value;
use crate::runner::plugin::types::{FunctionTable, ScriptState};

/// The base functions have no namespace.
pub const BASE_LIB_NAME: &str = "";
/// Module loading facilities.
pub const LOAD_LIB_NAME: &str = "package";
pub const TAB_LIB_NAME: &str = "table";
pub const IO_LIB_NAME: &str = "io";
pub const OS_LIB_NAME: &str = "os";
pub const STRING_LIB_NAME: &str = "string";
pub const MATH_LIB_NAME: &str = "math";
pub const DEBUG_LIB_NAME: &str = "debug";
pub const CHANNEL_LIB_NAME: &str = "channel";
pub const COROUTINE_LIB_NAME: &str = "coroutine";

/// Register `live` under `library` and push its handle. Returns 1.
pub(crate) fn open_namespace(state: &mut ScriptState, library: &str, live: &FunctionTable) -> usize {
    state.register_namespace(library, live);
    state.push(Value::Library(library.to_string()));
    1
}

pub(crate) fn arg(args: &[Value], index: usize) -> &Value {
    args.get(index).unwrap_or(&Value::Nil)
}

pub(crate) fn check_number(function: &str, args: &[Value], index: usize) -> Result<f64, ScriptError> {
    let value = arg(args, index);
    value
        .as_f64()
        .ok_or_else(|| ScriptError::bad_argument(function, index + 1, "number", value.type_name()))
}

pub(crate) fn check_integer(function: &str, args: &[Value], index: usize) -> Result<i64, ScriptError> {
    let value = arg(args, index);
    value
        .as_i64()
        .ok_or_else(|| ScriptError::bad_argument(function, index + 1, "integer", value.type_name()))
}

pub(crate) fn check_string<'a>(
    function: &str,
    args: &'a [Value],
    index: usize,
) -> Result<&'a str, ScriptError> {
    let value = arg(args, index);
    value
        .as_str()
        .ok_or_else(|| ScriptError::bad_argument(function, index + 1, "string", value.type_name()))
}

pub(crate) fn check_list<'a>(
    function: &str,
    args: &'a [Value],
    index: usize,
) -> Result<&'a [Value], ScriptError> {
    match arg(args, index) {
        Value::List(items) => Ok(items),
        other => Err(ScriptError::bad_argument(function, index + 1, "list", other.type_name())),
    }
}

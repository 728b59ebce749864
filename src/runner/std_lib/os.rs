//! OS library.
//!
//! The usual candidate for narrowing: `exit`, `remove` and `rename` act
//! on the host process and file system.

use std::env;
use std::fs;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use chrono::format::{Item, StrftimeItems};
use chrono::{Local, TimeZone, Utc};
use uuid::Uuid;

use crate::runner::ds::error::ScriptError;
use crate::runner::ds::value::Value;
use crate::runner::plugin::types::{FunctionTable, ScriptState};

use super::{arg, check_integer, check_number, check_string, open_namespace, OS_LIB_NAME};

lazy_static! {
    static ref OS_FUNCS: FunctionTable = FunctionTable::new()
        .add_native("clock", os_clock)
        .add_native("date", os_date)
        .add_native("difftime", os_difftime)
        .add_native("exit", os_exit)
        .add_native("getenv", os_getenv)
        .add_native("remove", os_remove)
        .add_native("rename", os_rename)
        .add_native("time", os_time)
        .add_native("tmpname", os_tmpname);
    static ref PROCESS_START: Instant = Instant::now();
}

/// Compiled-in os functions.
pub fn defaults() -> &'static FunctionTable {
    &OS_FUNCS
}

/// Register `live` as the `os` namespace.
pub fn open(state: &mut ScriptState, live: &FunctionTable) -> Result<usize, ScriptError> {
    lazy_static::initialize(&PROCESS_START);
    Ok(open_namespace(state, OS_LIB_NAME, live))
}

/// os.clock() seconds since the os library was first opened.
fn os_clock(_state: &mut ScriptState, _args: Vec<Value>) -> Result<Value, ScriptError> {
    Ok(Value::Float(PROCESS_START.elapsed().as_secs_f64()))
}

/// os.date([format [, time]]). A leading `!` formats in UTC.
fn os_date(_state: &mut ScriptState, args: Vec<Value>) -> Result<Value, ScriptError> {
    let format = match arg(&args, 0) {
        Value::Nil => "%c",
        _ => check_string("date", &args, 0)?,
    };
    let secs = match arg(&args, 1) {
        Value::Nil => unix_now(),
        _ => check_integer("date", &args, 1)?,
    };
    let (utc, fmt) = match format.strip_prefix('!') {
        Some(fmt) => (true, fmt),
        None => (false, format),
    };
    if StrftimeItems::new(fmt).any(|item| matches!(item, Item::Error)) {
        return Err(ScriptError::RuntimeError(format!(
            "bad argument #1 to 'date' (invalid conversion specifier '{}')",
            fmt
        )));
    }
    let out = match utc {
        true => Utc
            .timestamp_opt(secs, 0)
            .single()
            .map(|t| t.format(fmt).to_string()),
        false => Local
            .timestamp_opt(secs, 0)
            .single()
            .map(|t| t.format(fmt).to_string()),
    };
    out.map(Value::String)
        .ok_or_else(|| ScriptError::RuntimeError("time out of range".to_string()))
}

fn os_difftime(_state: &mut ScriptState, args: Vec<Value>) -> Result<Value, ScriptError> {
    let t2 = check_number("difftime", &args, 0)?;
    let t1 = match arg(&args, 1) {
        Value::Nil => 0.0,
        _ => check_number("difftime", &args, 1)?,
    };
    Ok(Value::Float(t2 - t1))
}

/// os.exit([code]) terminates the host process.
fn os_exit(_state: &mut ScriptState, args: Vec<Value>) -> Result<Value, ScriptError> {
    let code = match arg(&args, 0) {
        Value::Nil | Value::Boolean(true) => 0,
        Value::Boolean(false) => 1,
        _ => i32::try_from(check_integer("exit", &args, 0)?).map_err(|_| {
            ScriptError::bad_argument("exit", 1, "exit status", "integer out of range")
        })?,
    };
    tracing::info!(code, "script requested process exit");
    std::process::exit(code)
}

fn os_getenv(_state: &mut ScriptState, args: Vec<Value>) -> Result<Value, ScriptError> {
    let name = check_string("getenv", &args, 0)?;
    Ok(env::var(name).map(Value::String).unwrap_or(Value::Nil))
}

fn os_remove(_state: &mut ScriptState, args: Vec<Value>) -> Result<Value, ScriptError> {
    let path = check_string("remove", &args, 0)?;
    let result = match fs::metadata(path) {
        Ok(meta) if meta.is_dir() => fs::remove_dir(path),
        _ => fs::remove_file(path),
    };
    result
        .map(|_| Value::Boolean(true))
        .map_err(|e| ScriptError::RuntimeError(format!("{}: {}", path, e)))
}

fn os_rename(_state: &mut ScriptState, args: Vec<Value>) -> Result<Value, ScriptError> {
    let from = check_string("rename", &args, 0)?;
    let to = check_string("rename", &args, 1)?;
    fs::rename(from, to)
        .map(|_| Value::Boolean(true))
        .map_err(|e| ScriptError::RuntimeError(format!("{}: {}", from, e)))
}

fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

fn os_time(_state: &mut ScriptState, _args: Vec<Value>) -> Result<Value, ScriptError> {
    Ok(Value::Integer(unix_now()))
}

/// os.tmpname() a fresh path under the system temp directory. Nothing is created.
fn os_tmpname(_state: &mut ScriptState, _args: Vec<Value>) -> Result<Value, ScriptError> {
    let path = env::temp_dir().join(format!("libgate-{}", Uuid::new_v4()));
    Ok(Value::String(path.display().to_string()))
}

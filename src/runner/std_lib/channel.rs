//! Channel library: bounded FIFO queues shared between holders of a handle.

use crate::runner::ds::error::ScriptError;
use crate::runner::ds::value::{ChannelHandle, Value};
use crate::runner::plugin::types::{FunctionTable, ScriptState};

use super::{arg, check_integer, open_namespace, CHANNEL_LIB_NAME};

/// Capacity used by `channel.make()` without an argument.
pub const DEFAULT_CAPACITY: usize = 16;

lazy_static! {
    static ref CHANNEL_FUNCS: FunctionTable = FunctionTable::new()
        .add_native("len", channel_len)
        .add_native("make", channel_make)
        .add_native("receive", channel_receive)
        .add_native("send", channel_send);
}

/// Compiled-in channel functions.
pub fn defaults() -> &'static FunctionTable {
    &CHANNEL_FUNCS
}

/// Register `live` as the `channel` namespace.
pub fn open(state: &mut ScriptState, live: &FunctionTable) -> Result<usize, ScriptError> {
    Ok(open_namespace(state, CHANNEL_LIB_NAME, live))
}

fn check_channel<'a>(function: &str, args: &'a [Value]) -> Result<&'a ChannelHandle, ScriptError> {
    match arg(args, 0) {
        Value::Channel(handle) => Ok(handle),
        other => Err(ScriptError::bad_argument(function, 1, "channel", other.type_name())),
    }
}

/// channel.make([capacity])
fn channel_make(_state: &mut ScriptState, args: Vec<Value>) -> Result<Value, ScriptError> {
    let capacity = match arg(&args, 0) {
        Value::Nil => DEFAULT_CAPACITY,
        _ => {
            let n = check_integer("make", &args, 0)?;
            if n < 1 {
                return Err(ScriptError::RuntimeError(
                    "bad argument #1 to 'make' (capacity must be positive)".to_string(),
                ));
            }
            n as usize
        }
    };
    Ok(Value::Channel(ChannelHandle::new(capacity)))
}

/// channel.send(ch, value) returns false when the channel is full.
fn channel_send(_state: &mut ScriptState, args: Vec<Value>) -> Result<Value, ScriptError> {
    let handle = check_channel("send", &args)?;
    Ok(Value::Boolean(handle.send(arg(&args, 1).clone())))
}

/// channel.receive(ch) returns nil when the channel is empty.
fn channel_receive(_state: &mut ScriptState, args: Vec<Value>) -> Result<Value, ScriptError> {
    let handle = check_channel("receive", &args)?;
    Ok(handle.receive().unwrap_or(Value::Nil))
}

fn channel_len(_state: &mut ScriptState, args: Vec<Value>) -> Result<Value, ScriptError> {
    let handle = check_channel("len", &args)?;
    Ok(Value::Integer(handle.len() as i64))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounded_fifo() {
        let mut state = ScriptState::new();
        let ch = channel_make(&mut state, vec![Value::Integer(2)]).unwrap();
        for v in 1..=3 {
            let sent = channel_send(&mut state, vec![ch.clone(), Value::Integer(v)]).unwrap();
            assert_eq!(sent, Value::Boolean(v <= 2));
        }
        assert_eq!(channel_len(&mut state, vec![ch.clone()]).unwrap(), Value::Integer(2));
        assert_eq!(channel_receive(&mut state, vec![ch.clone()]).unwrap(), Value::Integer(1));
        assert_eq!(channel_receive(&mut state, vec![ch.clone()]).unwrap(), Value::Integer(2));
        assert_eq!(channel_receive(&mut state, vec![ch]).unwrap(), Value::Nil);
    }

    #[test]
    fn test_make_rejects_zero_capacity() {
        assert!(channel_make(&mut ScriptState::new(), vec![Value::Integer(0)]).is_err());
    }
}

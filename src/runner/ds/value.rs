use std::collections::VecDeque;
use std::fmt;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

use parking_lot::Mutex;

pub const TYPE_STR_NIL: &str = "nil";
pub const TYPE_STR_BOOLEAN: &str = "boolean";
pub const TYPE_STR_NUMBER: &str = "number";
pub const TYPE_STR_STRING: &str = "string";
pub const TYPE_STR_LIST: &str = "list";
pub const TYPE_STR_CHANNEL: &str = "channel";
pub const TYPE_STR_LIBRARY: &str = "library";

/// A value passed to and returned from library functions.
#[derive(Clone)]
pub enum Value {
    Nil,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
    List(Vec<Value>),
    Channel(ChannelHandle),
    /// Handle to a registered library namespace, pushed by Open hooks.
    Library(String),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => TYPE_STR_NIL,
            Value::Boolean(_) => TYPE_STR_BOOLEAN,
            Value::Integer(_) | Value::Float(_) => TYPE_STR_NUMBER,
            Value::String(_) => TYPE_STR_STRING,
            Value::List(_) => TYPE_STR_LIST,
            Value::Channel(_) => TYPE_STR_CHANNEL,
            Value::Library(_) => TYPE_STR_LIBRARY,
        }
    }

    /// Only `nil` and `false` are falsy.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Nil | Value::Boolean(false))
    }

    /// Numeric view of the value. Strings are coerced when they parse.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            Value::Float(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => Some(*f as i64),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Collapse an integral float into an integer so results compare naturally.
    pub fn from_f64(f: f64) -> Value {
        if f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
            Value::Integer(f as i64)
        } else {
            Value::Float(f)
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "nil"),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Float(nf) => {
                if nf.is_nan() {
                    write!(f, "nan")
                } else if nf.is_infinite() {
                    write!(f, "{}inf", if *nf < 0.0 { "-" } else { "" })
                } else {
                    write!(f, "{}", nf)
                }
            }
            Value::String(s) => write!(f, "{}", s),
            Value::List(items) => {
                write!(f, "{{")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "}}")
            }
            Value::Channel(ch) => write!(f, "channel: {:p}", Arc::as_ptr(&ch.inner)),
            Value::Library(name) if name.is_empty() => write!(f, "library: _G"),
            Value::Library(name) => write!(f, "library: {}", name),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "Value::Nil"),
            Value::Boolean(b) => write!(f, "Value::Boolean({})", b),
            Value::Integer(i) => write!(f, "Value::Integer({})", i),
            Value::Float(nf) => write!(f, "Value::Float({:?})", nf),
            Value::String(s) => write!(f, "Value::String({:?})", s),
            Value::List(items) => write!(f, "Value::List({:?})", items),
            Value::Channel(ch) => write!(f, "Value::Channel(len={})", ch.len()),
            Value::Library(name) => write!(f, "Value::Library({:?})", name),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Integer(a), Value::Float(b)) | (Value::Float(b), Value::Integer(a)) => {
                (*a as f64) == *b
            }
            (Value::String(a), Value::String(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Channel(a), Value::Channel(b)) => a == b,
            (Value::Library(a), Value::Library(b)) => a == b,
            _ => false,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

/// Shared, bounded FIFO used by the channel library.
///
/// Clones share the same buffer; equality is identity.
#[derive(Clone, Debug)]
pub struct ChannelHandle {
    inner: Arc<Mutex<VecDeque<Value>>>,
    capacity: usize,
}

impl ChannelHandle {
    pub fn new(capacity: usize) -> Self {
        ChannelHandle {
            inner: Arc::new(Mutex::new(VecDeque::with_capacity(capacity.min(64)))),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns false when the buffer is full.
    pub fn send(&self, value: Value) -> bool {
        let mut buf = self.inner.lock();
        if buf.len() >= self.capacity {
            return false;
        }
        buf.push_back(value);
        true
    }

    pub fn receive(&self) -> Option<Value> {
        self.inner.lock().pop_front()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl PartialEq for ChannelHandle {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

//! Math library.
//!
//! Provides numeric functions over integers and floats.

use crate::runner::ds::error::ScriptError;
use crate::runner::ds::value::Value;
use crate::runner::plugin::types::{FunctionTable, ScriptState};

use super::{arg, check_number, open_namespace, MATH_LIB_NAME};

lazy_static! {
    static ref MATH_FUNCS: FunctionTable = FunctionTable::new()
        .add_native("abs", math_abs)
        .add_native("acos", math_acos)
        .add_native("asin", math_asin)
        .add_native("atan", math_atan)
        .add_native("ceil", math_ceil)
        .add_native("cos", math_cos)
        .add_native("exp", math_exp)
        .add_native("floor", math_floor)
        .add_native("fmod", math_fmod)
        .add_native("log", math_log)
        .add_native("max", math_max)
        .add_native("min", math_min)
        .add_native("pow", math_pow)
        .add_native("random", math_random)
        .add_native("sin", math_sin)
        .add_native("sqrt", math_sqrt)
        .add_native("tan", math_tan)
        .add_native("tointeger", math_tointeger);
}

/// Compiled-in math functions.
pub fn defaults() -> &'static FunctionTable {
    &MATH_FUNCS
}

/// Register `live` as the `math` namespace.
pub fn open(state: &mut ScriptState, live: &FunctionTable) -> Result<usize, ScriptError> {
    Ok(open_namespace(state, MATH_LIB_NAME, live))
}

fn unary(name: &str, args: &[Value], f: fn(f64) -> f64) -> Result<Value, ScriptError> {
    Ok(Value::from_f64(f(check_number(name, args, 0)?)))
}

/// math.abs keeps integers integral.
fn math_abs(_state: &mut ScriptState, args: Vec<Value>) -> Result<Value, ScriptError> {
    match arg(&args, 0) {
        Value::Integer(i) => Ok(Value::Integer(i.wrapping_abs())),
        _ => unary("abs", &args, f64::abs),
    }
}

fn math_acos(_state: &mut ScriptState, args: Vec<Value>) -> Result<Value, ScriptError> {
    unary("acos", &args, f64::acos)
}

fn math_asin(_state: &mut ScriptState, args: Vec<Value>) -> Result<Value, ScriptError> {
    unary("asin", &args, f64::asin)
}

/// math.atan(y [, x])
fn math_atan(_state: &mut ScriptState, args: Vec<Value>) -> Result<Value, ScriptError> {
    let y = check_number("atan", &args, 0)?;
    let x = match arg(&args, 1) {
        Value::Nil => 1.0,
        _ => check_number("atan", &args, 1)?,
    };
    Ok(Value::from_f64(y.atan2(x)))
}

fn math_ceil(_state: &mut ScriptState, args: Vec<Value>) -> Result<Value, ScriptError> {
    unary("ceil", &args, f64::ceil)
}

fn math_cos(_state: &mut ScriptState, args: Vec<Value>) -> Result<Value, ScriptError> {
    unary("cos", &args, f64::cos)
}

fn math_exp(_state: &mut ScriptState, args: Vec<Value>) -> Result<Value, ScriptError> {
    unary("exp", &args, f64::exp)
}

fn math_floor(_state: &mut ScriptState, args: Vec<Value>) -> Result<Value, ScriptError> {
    unary("floor", &args, f64::floor)
}

fn math_fmod(_state: &mut ScriptState, args: Vec<Value>) -> Result<Value, ScriptError> {
    let a = check_number("fmod", &args, 0)?;
    let b = check_number("fmod", &args, 1)?;
    if b == 0.0 && matches!((arg(&args, 0), arg(&args, 1)), (Value::Integer(_), Value::Integer(_))) {
        return Err(ScriptError::RuntimeError("bad argument #2 to 'fmod' (zero)".to_string()));
    }
    Ok(Value::from_f64(a % b))
}

/// math.log(x [, base])
fn math_log(_state: &mut ScriptState, args: Vec<Value>) -> Result<Value, ScriptError> {
    let x = check_number("log", &args, 0)?;
    let result = match arg(&args, 1) {
        Value::Nil => x.ln(),
        _ => {
            let base = check_number("log", &args, 1)?;
            if base == 2.0 {
                x.log2()
            } else if base == 10.0 {
                x.log10()
            } else {
                x.ln() / base.ln()
            }
        }
    };
    Ok(Value::from_f64(result))
}

fn fold_extreme(name: &str, args: &[Value], pick_new: fn(f64, f64) -> bool) -> Result<Value, ScriptError> {
    let mut best = check_number(name, args, 0)?;
    let mut best_value = args[0].clone();
    for i in 1..args.len() {
        let x = check_number(name, args, i)?;
        if pick_new(x, best) {
            best = x;
            best_value = args[i].clone();
        }
    }
    match best_value {
        Value::String(_) => Ok(Value::from_f64(best)),
        v => Ok(v),
    }
}

fn math_max(_state: &mut ScriptState, args: Vec<Value>) -> Result<Value, ScriptError> {
    fold_extreme("max", &args, |x, best| x > best)
}

fn math_min(_state: &mut ScriptState, args: Vec<Value>) -> Result<Value, ScriptError> {
    fold_extreme("min", &args, |x, best| x < best)
}

fn math_pow(_state: &mut ScriptState, args: Vec<Value>) -> Result<Value, ScriptError> {
    let x = check_number("pow", &args, 0)?;
    let y = check_number("pow", &args, 1)?;
    Ok(Value::Float(x.powf(y)))
}

/// math.random([m [, n]]): float in [0, 1), or integer in [1, m] / [m, n].
fn math_random(_state: &mut ScriptState, args: Vec<Value>) -> Result<Value, ScriptError> {
    use rand::Rng;

    let mut rng = rand::thread_rng();
    let (low, high) = match (arg(&args, 0), arg(&args, 1)) {
        (Value::Nil, _) => return Ok(Value::Float(rng.gen::<f64>())),
        (_, Value::Nil) => (1, super::check_integer("random", &args, 0)?),
        _ => (
            super::check_integer("random", &args, 0)?,
            super::check_integer("random", &args, 1)?,
        ),
    };
    if low > high {
        return Err(ScriptError::RuntimeError(
            "bad argument to 'random' (interval is empty)".to_string(),
        ));
    }
    Ok(Value::Integer(rng.gen_range(low..=high)))
}

fn math_sin(_state: &mut ScriptState, args: Vec<Value>) -> Result<Value, ScriptError> {
    unary("sin", &args, f64::sin)
}

fn math_sqrt(_state: &mut ScriptState, args: Vec<Value>) -> Result<Value, ScriptError> {
    unary("sqrt", &args, f64::sqrt)
}

fn math_tan(_state: &mut ScriptState, args: Vec<Value>) -> Result<Value, ScriptError> {
    unary("tan", &args, f64::tan)
}

/// math.tointeger: nil unless the value has an exact integer representation.
fn math_tointeger(_state: &mut ScriptState, args: Vec<Value>) -> Result<Value, ScriptError> {
    Ok(match arg(&args, 0) {
        Value::Integer(i) => Value::Integer(*i),
        Value::Float(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => Value::Integer(*f as i64),
        _ => Value::Nil,
    })
}

//! Core types shared by the registry, the loader and the standard libraries.

use std::collections::hash_map;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use uuid::Uuid;

use crate::runner::ds::error::ScriptError;
use crate::runner::ds::value::Value;

/// Function signature for compiled-in library functions.
pub type NativeFn = fn(state: &mut ScriptState, args: Vec<Value>) -> Result<Value, ScriptError>;

/// Closure signature for embedder-supplied functions.
pub type HostFn = dyn Fn(&mut ScriptState, Vec<Value>) -> Result<Value, ScriptError> + Send + Sync;

/// Open hook: registers the given live table into `state` and returns the
/// number of values it pushed onto the state's result stack.
pub type OpenFn = fn(state: &mut ScriptState, live: &FunctionTable) -> Result<usize, ScriptError>;

/// A library function - either compiled-in or supplied by the host.
#[derive(Clone)]
pub enum LibFunction {
    /// Direct function pointer for compiled-in functions.
    Native(NativeFn),

    /// Shared closure for functions injected by the embedder.
    Host(Arc<HostFn>),
}

impl LibFunction {
    pub fn host<F>(f: F) -> Self
    where
        F: Fn(&mut ScriptState, Vec<Value>) -> Result<Value, ScriptError> + Send + Sync + 'static,
    {
        LibFunction::Host(Arc::new(f))
    }

    pub fn call(&self, state: &mut ScriptState, args: Vec<Value>) -> Result<Value, ScriptError> {
        match self {
            LibFunction::Native(f) => f(state, args),
            LibFunction::Host(f) => f(state, args),
        }
    }

    /// Identity comparison: same function pointer or same closure allocation.
    pub fn same_as(&self, other: &LibFunction) -> bool {
        match (self, other) {
            (LibFunction::Native(a), LibFunction::Native(b)) => std::ptr::fn_addr_eq(*a, *b),
            (LibFunction::Host(a), LibFunction::Host(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<NativeFn> for LibFunction {
    fn from(f: NativeFn) -> Self {
        LibFunction::Native(f)
    }
}

impl fmt::Debug for LibFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LibFunction::Native(p) => write!(f, "LibFunction::Native({:p})", *p as *const ()),
            LibFunction::Host(c) => write!(f, "LibFunction::Host({:p})", Arc::as_ptr(c) as *const ()),
        }
    }
}

/// Name to function mapping. Last write for a name wins.
#[derive(Clone, Default)]
pub struct FunctionTable {
    entries: HashMap<String, LibFunction>,
}

impl FunctionTable {
    pub fn new() -> Self {
        FunctionTable {
            entries: HashMap::new(),
        }
    }

    /// Add a compiled-in function (builder style).
    pub fn add_native(mut self, name: impl Into<String>, func: NativeFn) -> Self {
        self.entries.insert(name.into(), LibFunction::Native(func));
        self
    }

    /// Insert or overwrite; returns the previous function for `name`.
    pub fn insert(&mut self, name: impl Into<String>, func: LibFunction) -> Option<LibFunction> {
        self.entries.insert(name.into(), func)
    }

    pub fn remove(&mut self, name: &str) -> Option<LibFunction> {
        self.entries.remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&LibFunction> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Function names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn iter(&self) -> hash_map::Iter<'_, String, LibFunction> {
        self.entries.iter()
    }

    /// Copy every entry of `other` into this table, overwriting on conflict.
    pub fn extend_from(&mut self, other: &FunctionTable) {
        for (name, f) in other.iter() {
            self.entries.insert(name.clone(), f.clone());
        }
    }

    /// Same key set and, for every key, the same function identity.
    pub fn same_entries(&self, other: &FunctionTable) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(name, f)| other.get(name).map_or(false, |g| f.same_as(g)))
    }
}

impl fmt::Debug for FunctionTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.names()).finish()
    }
}

/// The runtime state libraries are registered into.
///
/// Holds the unnamespaced globals (base library), one namespace per opened
/// library, the result stack Open hooks push onto, and the order in which
/// libraries were first loaded.
pub struct ScriptState {
    id: Uuid,
    globals: FunctionTable,
    namespaces: HashMap<String, FunctionTable>,
    loaded: Vec<String>,
    results: Vec<Value>,
}

impl ScriptState {
    pub fn new() -> Self {
        ScriptState {
            id: Uuid::new_v4(),
            globals: FunctionTable::new(),
            namespaces: HashMap::new(),
            loaded: Vec::new(),
            results: Vec::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Replace the namespace for `library` with a copy of `table`.
    pub fn register_namespace(&mut self, library: &str, table: &FunctionTable) {
        self.namespaces.insert(library.to_string(), table.clone());
        self.mark_loaded(library);
    }

    /// Replace the global (unnamespaced) function set with a copy of `table`.
    pub fn register_globals(&mut self, library: &str, table: &FunctionTable) {
        self.globals = table.clone();
        self.mark_loaded(library);
    }

    fn mark_loaded(&mut self, library: &str) {
        if !self.is_loaded(library) {
            self.loaded.push(library.to_string());
        }
    }

    pub fn is_loaded(&self, library: &str) -> bool {
        self.loaded.iter().any(|l| l == library)
    }

    /// Libraries in the order they were first registered.
    pub fn loaded_libraries(&self) -> &[String] {
        &self.loaded
    }

    pub fn globals(&self) -> &FunctionTable {
        &self.globals
    }

    pub fn namespace(&self, library: &str) -> Option<&FunctionTable> {
        self.namespaces.get(library)
    }

    /// Sorted function names visible under `library` (`""` is the globals).
    pub fn function_names(&self, library: &str) -> Vec<String> {
        let table = if library.is_empty() {
            Some(&self.globals)
        } else {
            self.namespaces.get(library)
        };
        table
            .map(|t| t.names().into_iter().map(str::to_string).collect())
            .unwrap_or_default()
    }

    /// Look up a registered function the way a call site would.
    pub fn resolve(&self, library: &str, name: &str) -> Option<LibFunction> {
        if library.is_empty() {
            self.globals.get(name).cloned()
        } else {
            self.namespaces.get(library)?.get(name).cloned()
        }
    }

    pub fn call(&mut self, library: &str, name: &str, args: Vec<Value>) -> Result<Value, ScriptError> {
        let func = self.resolve(library, name).ok_or_else(|| {
            if library.is_empty() {
                ScriptError::ReferenceError(format!("{} is not defined", name))
            } else {
                ScriptError::ReferenceError(format!("{}.{} is not defined", library, name))
            }
        })?;
        func.call(self, args)
    }

    pub fn push(&mut self, value: Value) {
        self.results.push(value);
    }

    pub fn pop(&mut self) -> Option<Value> {
        self.results.pop()
    }

    pub fn results(&self) -> &[Value] {
        &self.results
    }
}

impl Default for ScriptState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn one(_state: &mut ScriptState, _args: Vec<Value>) -> Result<Value, ScriptError> {
        Ok(Value::Integer(1))
    }

    fn two(_state: &mut ScriptState, _args: Vec<Value>) -> Result<Value, ScriptError> {
        Ok(Value::Integer(2))
    }

    #[test]
    fn test_last_write_wins() {
        let mut table = FunctionTable::new();
        table.insert("f", LibFunction::Native(one));
        let previous = table.insert("f", LibFunction::Native(two));
        assert!(previous.is_some());
        assert_eq!(table.len(), 1);
        let mut state = ScriptState::new();
        let out = table.get("f").unwrap().call(&mut state, vec![]).unwrap();
        assert_eq!(out, Value::Integer(2));
    }

    #[test]
    fn test_identity() {
        let a = LibFunction::Native(one);
        assert!(a.same_as(&LibFunction::Native(one)));
        assert!(!a.same_as(&LibFunction::Native(two)));

        let h = LibFunction::host(|_, _| Ok(Value::Nil));
        assert!(h.same_as(&h.clone()));
        assert!(!h.same_as(&LibFunction::host(|_, _| Ok(Value::Nil))));
    }

    #[test]
    fn test_names_sorted() {
        let table = FunctionTable::new()
            .add_native("b", one)
            .add_native("a", two)
            .add_native("c", one);
        assert_eq!(table.names(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_call_unknown_is_reference_error() {
        let mut state = ScriptState::new();
        let err = state.call("math", "sqrt", vec![]).unwrap_err();
        assert_eq!(err, ScriptError::ReferenceError("math.sqrt is not defined".to_string()));
    }

    #[test]
    fn test_loaded_order_keeps_first_position() {
        let mut state = ScriptState::new();
        let table = FunctionTable::new();
        state.register_namespace("package", &table);
        state.register_globals("", &table);
        state.register_namespace("package", &table);
        assert_eq!(state.loaded_libraries(), &["package".to_string(), String::new()]);
    }
}

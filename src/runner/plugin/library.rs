//! Per-library staging object for customizing what a script can call.

use std::sync::Arc;

use super::registry::{display_name, LibError, LibraryRegistry};
use super::types::{FunctionTable, LibFunction, ScriptState};

/// Sentinel accepted by [`ConfigurableLibrary::select_functions`] as the
/// sole argument: select every function of the snapshot.
pub const ALL_FUNCTIONS: &str = "all";

/// What to do with names that are not in a library's snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionPolicy {
    /// Log a warning and skip the name.
    #[default]
    Lenient,
    /// Fail the whole call and leave the selection untouched.
    Strict,
}

/// A private function selection for one library.
///
/// Starts empty. Selections and additions only touch the private table;
/// [`open`](Self::open) copies it into the library's live table and runs
/// the Open hook under the library's guard. The object stays usable after
/// opening and may be reconfigured and opened again.
pub struct ConfigurableLibrary<'r> {
    registry: &'r LibraryRegistry,
    name: &'static str,
    policy: SelectionPolicy,
    selection: FunctionTable,
}

impl<'r> ConfigurableLibrary<'r> {
    pub(crate) fn new(
        registry: &'r LibraryRegistry,
        name: &'static str,
        policy: SelectionPolicy,
    ) -> Self {
        ConfigurableLibrary {
            registry,
            name,
            policy,
            selection: FunctionTable::new(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn policy(&self) -> SelectionPolicy {
        self.policy
    }

    pub fn set_policy(&mut self, policy: SelectionPolicy) -> &mut Self {
        self.policy = policy;
        self
    }

    pub fn selection(&self) -> &FunctionTable {
        &self.selection
    }

    /// Sorted names currently in the private table.
    pub fn function_names(&self) -> Vec<&str> {
        self.selection.names()
    }

    fn snapshot_table(&self) -> Result<&'r FunctionTable, LibError> {
        Ok(self.registry.snapshot(self.name)?.table())
    }

    fn reject_unknown(&self, unknown: Vec<String>) -> Result<(), LibError> {
        if unknown.is_empty() {
            return Ok(());
        }
        match self.policy {
            SelectionPolicy::Strict => Err(LibError::FunctionNotFound {
                library: self.name.to_string(),
                names: unknown,
            }),
            SelectionPolicy::Lenient => {
                tracing::warn!(
                    library = display_name(self.name),
                    unknown = ?unknown,
                    "ignoring functions not provided by library"
                );
                Ok(())
            }
        }
    }

    /// Copy the named snapshot functions into the selection.
    ///
    /// A single `"all"` selects the whole snapshot. Anywhere else `"all"` is
    /// an ordinary function name.
    pub fn select_functions<I, S>(&mut self, names: I) -> Result<(), LibError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names: Vec<S> = names.into_iter().collect();
        let snapshot = self.snapshot_table()?;

        if names.len() == 1 && names[0].as_ref() == ALL_FUNCTIONS {
            self.selection.extend_from(snapshot);
            return Ok(());
        }

        let unknown: Vec<String> = names
            .iter()
            .map(AsRef::as_ref)
            .filter(|name| !snapshot.contains(name))
            .map(str::to_string)
            .collect();
        self.reject_unknown(unknown)?;

        for name in &names {
            if let Some(f) = snapshot.get(name.as_ref()) {
                self.selection.insert(name.as_ref(), f.clone());
            }
        }
        Ok(())
    }

    /// Insert or overwrite `name` regardless of the snapshot.
    pub fn add_function(&mut self, name: impl Into<String>, func: LibFunction) -> &mut Self {
        self.selection.insert(name, func);
        self
    }

    /// Expose the snapshot function `original` under `alias` as well.
    pub fn alias_function(&mut self, alias: &str, original: &str) -> Result<(), LibError> {
        let snapshot = self.snapshot_table()?;
        match snapshot.get(original) {
            Some(f) => {
                self.selection.insert(alias, f.clone());
                Ok(())
            }
            None => self.reject_unknown(vec![original.to_string()]),
        }
    }

    pub fn remove_function(&mut self, name: &str) -> Option<LibFunction> {
        self.selection.remove(name)
    }

    pub fn clear(&mut self) -> &mut Self {
        self.selection.clear();
        self
    }

    /// Reset the selection to exactly the snapshot.
    pub fn restore_defaults(&mut self) -> Result<(), LibError> {
        self.selection.clear();
        self.select_functions([ALL_FUNCTIONS])
    }

    /// Install a copy of the selection as the live table and register it
    /// into `state`. Returns the Open hook's result count.
    pub fn open(&self, state: &mut ScriptState) -> Result<usize, LibError> {
        let table = Arc::new(self.selection.clone());
        self.registry.install_and_open(self.name, table, state)
    }
}

//! Library registry: descriptors, snapshots, live tables and guards.
//!
//! One [`LibraryRegistry`] is the runtime context every operation goes
//! through. It owns, per library:
//!
//! - the [`LibraryDescriptor`] (name, Open hook, compiled-in defaults)
//! - the [`OriginalSnapshot`] captured when the registry was built
//! - the live function table the Open hook reads
//! - the guard serializing install-then-register
//!
//! Nothing here is process-global; two registries never share state.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use arc_swap::ArcSwap;
use parking_lot::Mutex;
use thiserror::Error;

use super::config::ConfigError;
use super::library::{ConfigurableLibrary, SelectionPolicy};
use super::snapshot::OriginalSnapshot;
use super::types::{FunctionTable, OpenFn, ScriptState};
use crate::runner::ds::error::ScriptError;
use crate::runner::std_lib::standard_descriptors;

/// Error type for registry, selection and loading operations.
#[derive(Debug, Error)]
pub enum LibError {
    /// No descriptor with this name.
    #[error("library not found: {0:?}")]
    LibraryNotFound(String),

    /// Requested functions missing from the library's snapshot.
    #[error("unknown function(s) in library {library:?}: {}", .names.join(", "))]
    FunctionNotFound { library: String, names: Vec<String> },

    /// The snapshot did not come out as a complete copy of the defaults.
    #[error("snapshot of library {library:?} is corrupt: captured {captured} of {expected} functions")]
    SnapshotCorrupt {
        library: String,
        expected: usize,
        captured: usize,
    },

    /// Two descriptors share a name.
    #[error("duplicate library descriptor: {0:?}")]
    DuplicateLibrary(String),

    /// The Open hook itself failed.
    #[error("registration of library {library:?} failed: {source}")]
    Registration {
        library: String,
        #[source]
        source: ScriptError,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Fixed pairing of a library name with its Open hook and defaults.
#[derive(Clone, Copy)]
pub struct LibraryDescriptor {
    pub name: &'static str,
    pub open: OpenFn,
    pub defaults: fn() -> &'static FunctionTable,
}

impl LibraryDescriptor {
    pub const fn new(
        name: &'static str,
        open: OpenFn,
        defaults: fn() -> &'static FunctionTable,
    ) -> Self {
        LibraryDescriptor {
            name,
            open,
            defaults,
        }
    }
}

impl fmt::Debug for LibraryDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LibraryDescriptor")
            .field("name", &self.name)
            .finish()
    }
}

/// Printable form of a library name; the base library has none.
pub fn display_name(name: &str) -> &str {
    if name.is_empty() {
        "_G"
    } else {
        name
    }
}

struct LibrarySlot {
    descriptor: LibraryDescriptor,
    snapshot: OriginalSnapshot,
    /// Replaced wholesale under `guard`; lock-free readers see whole tables.
    live: ArcSwap<FunctionTable>,
    guard: Mutex<()>,
}

/// Registry for all known libraries.
pub struct LibraryRegistry {
    slots: Vec<LibrarySlot>,
    index: HashMap<&'static str, usize>,
}

impl LibraryRegistry {
    /// Registry over the ten standard libraries.
    pub fn standard() -> Result<Self, LibError> {
        Self::with_descriptors(standard_descriptors())
    }

    /// Build a registry from an explicit, ordered descriptor list.
    ///
    /// Snapshots of every library are captured here, before the registry
    /// can be used to open anything. Live tables start as the snapshots.
    pub fn with_descriptors<I>(descriptors: I) -> Result<Self, LibError>
    where
        I: IntoIterator<Item = LibraryDescriptor>,
    {
        let mut slots = Vec::new();
        let mut index = HashMap::new();

        for descriptor in descriptors {
            if index.contains_key(descriptor.name) {
                return Err(LibError::DuplicateLibrary(descriptor.name.to_string()));
            }
            let snapshot = OriginalSnapshot::capture(descriptor.name, (descriptor.defaults)())?;
            index.insert(descriptor.name, slots.len());
            slots.push(LibrarySlot {
                descriptor,
                live: ArcSwap::new(snapshot.shared()),
                snapshot,
                guard: Mutex::new(()),
            });
        }

        tracing::debug!(libraries = slots.len(), "captured library snapshots");
        Ok(LibraryRegistry { slots, index })
    }

    fn slot(&self, name: &str) -> Result<&LibrarySlot, LibError> {
        self.index
            .get(name)
            .map(|&i| &self.slots[i])
            .ok_or_else(|| LibError::LibraryNotFound(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Library names in descriptor order.
    pub fn library_names(&self) -> Vec<&'static str> {
        self.slots.iter().map(|s| s.descriptor.name).collect()
    }

    pub fn descriptor(&self, name: &str) -> Result<&LibraryDescriptor, LibError> {
        Ok(&self.slot(name)?.descriptor)
    }

    pub fn snapshot(&self, name: &str) -> Result<&OriginalSnapshot, LibError> {
        Ok(&self.slot(name)?.snapshot)
    }

    /// The table the Open hook currently reads. Does not take the guard.
    pub fn live_table(&self, name: &str) -> Result<Arc<FunctionTable>, LibError> {
        Ok(self.slot(name)?.live.load_full())
    }

    /// Staging object for customizing `name`, lenient about unknown functions.
    pub fn configure(&self, name: &str) -> Result<ConfigurableLibrary<'_>, LibError> {
        self.configure_with_policy(name, SelectionPolicy::default())
    }

    pub fn configure_with_policy(
        &self,
        name: &str,
        policy: SelectionPolicy,
    ) -> Result<ConfigurableLibrary<'_>, LibError> {
        let slot = self.slot(name)?;
        Ok(ConfigurableLibrary::new(
            self,
            slot.descriptor.name,
            policy,
        ))
    }

    /// Install `table` as the live table of `name` and run its Open hook,
    /// holding the library's guard for both steps.
    ///
    /// A hook that never returns keeps the guard held; every later open of
    /// the same library blocks behind it.
    pub(crate) fn install_and_open(
        &self,
        name: &str,
        table: Arc<FunctionTable>,
        state: &mut ScriptState,
    ) -> Result<usize, LibError> {
        let slot = self.slot(name)?;
        let _guard = slot.guard.lock();

        slot.live.store(table);
        let live = slot.live.load_full();
        tracing::debug!(
            library = display_name(slot.descriptor.name),
            state = %state.id(),
            functions = live.len(),
            "opening library"
        );

        (slot.descriptor.open)(state, &live).map_err(|source| LibError::Registration {
            library: slot.descriptor.name.to_string(),
            source,
        })
    }

    /// Install the snapshot as the live table of `name` and open it.
    pub(crate) fn install_defaults_and_open(
        &self,
        name: &str,
        state: &mut ScriptState,
    ) -> Result<usize, LibError> {
        let defaults = self.slot(name)?.snapshot.shared();
        self.install_and_open(name, defaults, state)
    }
}

impl fmt::Debug for LibraryRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LibraryRegistry")
            .field("libraries", &self.library_names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::ds::value::Value;

    fn nil(_state: &mut ScriptState, _args: Vec<Value>) -> Result<Value, ScriptError> {
        Ok(Value::Nil)
    }

    fn open_ns(state: &mut ScriptState, live: &FunctionTable) -> Result<usize, ScriptError> {
        state.register_namespace("t", live);
        Ok(1)
    }

    fn failing_open(_state: &mut ScriptState, _live: &FunctionTable) -> Result<usize, ScriptError> {
        Err(ScriptError::RuntimeError("boom".to_string()))
    }

    lazy_static! {
        static ref T_FUNCS: FunctionTable = FunctionTable::new().add_native("x", nil).add_native("y", nil);
    }

    fn t_defaults() -> &'static FunctionTable {
        &T_FUNCS
    }

    #[test]
    fn test_duplicate_descriptor_rejected() {
        let d = LibraryDescriptor::new("t", open_ns, t_defaults);
        let err = LibraryRegistry::with_descriptors(vec![d, d]).unwrap_err();
        assert!(matches!(err, LibError::DuplicateLibrary(name) if name == "t"));
    }

    #[test]
    fn test_live_table_starts_as_snapshot() {
        let registry =
            LibraryRegistry::with_descriptors(vec![LibraryDescriptor::new("t", open_ns, t_defaults)])
                .unwrap();
        let live = registry.live_table("t").unwrap();
        assert!(live.same_entries(registry.snapshot("t").unwrap().table()));
    }

    #[test]
    fn test_hook_error_passes_through() {
        let registry = LibraryRegistry::with_descriptors(vec![LibraryDescriptor::new(
            "t",
            failing_open,
            t_defaults,
        )])
        .unwrap();
        let mut state = ScriptState::new();
        let err = registry.install_defaults_and_open("t", &mut state).unwrap_err();
        match err {
            LibError::Registration { library, source } => {
                assert_eq!(library, "t");
                assert_eq!(source, ScriptError::RuntimeError("boom".to_string()));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_unknown_library() {
        let registry = LibraryRegistry::standard().unwrap();
        assert!(matches!(
            registry.configure("nonexistent"),
            Err(LibError::LibraryNotFound(_))
        ));
        assert!(registry.live_table("Math").is_err());
    }

    #[test]
    fn test_display_name() {
        assert_eq!(display_name(""), "_G");
        assert_eq!(display_name("os"), "os");
    }
}

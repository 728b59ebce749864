//! Ordered opening of libraries with their default tables.
//!
//! Load order is always driven by the registry's explicit descriptor list,
//! never by map iteration. [`LibraryRegistry::open_all`] additionally puts
//! `package` and the base library in front, since every other library may
//! assume their facilities are already registered.

use super::registry::{display_name, LibError, LibraryRegistry};
use super::types::ScriptState;
use crate::runner::std_lib::{BASE_LIB_NAME, LOAD_LIB_NAME};

/// What to do with unknown names passed to [`LibraryRegistry::open_many`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OpenPolicy {
    /// Skip unknown names, open the rest, and report what was skipped.
    #[default]
    Lenient,
    /// Fail before opening anything if any name is unknown.
    Strict,
}

/// Outcome of a bulk open.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OpenReport {
    /// Libraries opened, in the order they were opened.
    pub opened: Vec<String>,
    /// Names that matched no library (lenient mode only).
    pub skipped: Vec<String>,
    /// Sum of the result counts returned by the Open hooks.
    pub results: usize,
}

impl LibraryRegistry {
    /// Order used by [`open_all`](Self::open_all): `package`, then the base
    /// library, then every other descriptor in registration order.
    pub fn load_order(&self) -> Vec<&'static str> {
        let mut order = Vec::new();
        for first in [LOAD_LIB_NAME, BASE_LIB_NAME] {
            if self.contains(first) {
                order.push(first);
            }
        }
        order.extend(
            self.library_names()
                .into_iter()
                .filter(|name| *name != LOAD_LIB_NAME && *name != BASE_LIB_NAME),
        );
        order
    }

    /// Open every library with its defaults. Returns the summed result count.
    pub fn open_all(&self, state: &mut ScriptState) -> Result<usize, LibError> {
        let mut results = 0;
        for name in self.load_order() {
            results += self.install_defaults_and_open(name, state)?;
        }
        Ok(results)
    }

    /// Open one library with its defaults.
    ///
    /// An unknown name is logged and returned as
    /// [`LibError::LibraryNotFound`]; no hook runs and `state` is untouched.
    pub fn open_one(&self, state: &mut ScriptState, name: &str) -> Result<usize, LibError> {
        if !self.contains(name) {
            tracing::warn!(library = display_name(name), "library not available");
            return Err(LibError::LibraryNotFound(name.to_string()));
        }
        self.install_defaults_and_open(name, state)
    }

    /// Open the named libraries with their defaults, in the given order.
    pub fn open_many<I, S>(
        &self,
        state: &mut ScriptState,
        names: I,
        policy: OpenPolicy,
    ) -> Result<OpenReport, LibError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names: Vec<S> = names.into_iter().collect();

        if policy == OpenPolicy::Strict {
            if let Some(unknown) = names.iter().find(|n| !self.contains(n.as_ref())) {
                tracing::warn!(library = display_name(unknown.as_ref()), "library not available");
                return Err(LibError::LibraryNotFound(unknown.as_ref().to_string()));
            }
        }

        let mut report = OpenReport::default();
        for name in &names {
            let name = name.as_ref();
            match self.open_one(state, name) {
                Ok(count) => {
                    report.results += count;
                    report.opened.push(name.to_string());
                }
                Err(LibError::LibraryNotFound(missing)) => report.skipped.push(missing),
                Err(e) => return Err(e),
            }
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_load_order() {
        let registry = LibraryRegistry::standard().unwrap();
        assert_eq!(
            registry.load_order(),
            vec![
                "package",
                "",
                "table",
                "io",
                "os",
                "string",
                "math",
                "debug",
                "channel",
                "coroutine"
            ]
        );
    }

    #[test]
    fn test_open_many_lenient_reports_skipped() {
        let registry = LibraryRegistry::standard().unwrap();
        let mut state = ScriptState::new();
        let report = registry
            .open_many(&mut state, ["math", "nonexistent", "os"], OpenPolicy::Lenient)
            .unwrap();
        assert_eq!(report.opened, vec!["math".to_string(), "os".to_string()]);
        assert_eq!(report.skipped, vec!["nonexistent".to_string()]);
        assert_eq!(report.results, 2);
    }

    #[test]
    fn test_open_many_strict_opens_nothing() {
        let registry = LibraryRegistry::standard().unwrap();
        let mut state = ScriptState::new();
        let err = registry
            .open_many(&mut state, ["math", "nonexistent"], OpenPolicy::Strict)
            .unwrap_err();
        assert!(matches!(err, LibError::LibraryNotFound(name) if name == "nonexistent"));
        assert!(state.loaded_libraries().is_empty());
    }
}

//! Immutable copies of each library's compiled-in function table.

use std::sync::Arc;

use super::registry::LibError;
use super::types::FunctionTable;

/// The default function set of one library, captured when its registry is
/// built. The table is shared behind an `Arc` and never mutated afterwards.
#[derive(Clone, Debug)]
pub struct OriginalSnapshot {
    library: &'static str,
    table: Arc<FunctionTable>,
}

impl OriginalSnapshot {
    /// Deep-copy `defaults` into a new snapshot and verify the copy.
    pub fn capture(library: &'static str, defaults: &FunctionTable) -> Result<Self, LibError> {
        let mut table = FunctionTable::new();
        table.extend_from(defaults);

        let snapshot = OriginalSnapshot {
            library,
            table: Arc::new(table),
        };
        snapshot.verify(defaults)?;
        Ok(snapshot)
    }

    /// Every compiled-in name must be present in the snapshot and nothing else.
    fn verify(&self, defaults: &FunctionTable) -> Result<(), LibError> {
        let complete = self.table.len() == defaults.len()
            && defaults.iter().all(|(name, _)| self.table.contains(name));
        if complete {
            Ok(())
        } else {
            Err(LibError::SnapshotCorrupt {
                library: self.library.to_string(),
                expected: defaults.len(),
                captured: self.table.len(),
            })
        }
    }

    pub fn library(&self) -> &'static str {
        self.library
    }

    pub fn table(&self) -> &FunctionTable {
        &self.table
    }

    pub(crate) fn shared(&self) -> Arc<FunctionTable> {
        Arc::clone(&self.table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::ds::error::ScriptError;
    use crate::runner::ds::value::Value;
    use crate::runner::plugin::types::{LibFunction, ScriptState};

    fn nil(_state: &mut ScriptState, _args: Vec<Value>) -> Result<Value, ScriptError> {
        Ok(Value::Nil)
    }

    #[test]
    fn test_capture_is_independent_copy() {
        let mut defaults = FunctionTable::new().add_native("a", nil).add_native("b", nil);
        let snapshot = OriginalSnapshot::capture("lib", &defaults).unwrap();

        defaults.insert("c", LibFunction::Native(nil));
        defaults.remove("a");

        assert_eq!(snapshot.table().names(), vec!["a", "b"]);
    }

    #[test]
    fn test_capture_empty_defaults() {
        let snapshot = OriginalSnapshot::capture("empty", &FunctionTable::new()).unwrap();
        assert!(snapshot.table().is_empty());
        assert_eq!(snapshot.library(), "empty");
    }
}

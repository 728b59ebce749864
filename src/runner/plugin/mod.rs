//! Library registry and safe-swap installation.
//!
//! This module decides which standard-library functions a script can call.
//!
//! ## Key Components
//!
//! - **[`LibraryRegistry`]**: Runtime context holding every library's descriptor,
//!   snapshot, live table and guard
//! - **[`OriginalSnapshot`]**: Immutable copy of a library's compiled-in table
//! - **[`ConfigurableLibrary`]**: Private selection for one library, opened on demand
//! - **[`RuntimeConfig`]**: TOML description of what to open and expose
//! - **[`ScriptState`]**: The state libraries register into
//!
//! ## Opening a Library
//!
//! ```text
//! ConfigurableLibrary::open(state)
//!      ↓
//! 1. Take the library's guard
//! 2. Store a copy of the selection as the live table
//! 3. Run the Open hook with the live table
//!      → hook registers the table into the state's namespace
//! 4. Release the guard
//! ```
//!
//! The guard covers the hook call as well as the swap, so a hook always
//! registers exactly the table its own caller installed, even with many
//! threads opening the same library at once. Readers that only need the
//! current table ([`LibraryRegistry::live_table`]) never take the guard.
//!
//! ## Example
//!
//! ```
//! use libgate::runner::plugin::{LibraryRegistry, OpenPolicy, ScriptState};
//!
//! let registry = LibraryRegistry::standard().unwrap();
//! let mut state = ScriptState::new();
//!
//! let report = registry
//!     .open_many(&mut state, ["package", "", "string", "bogus"], OpenPolicy::Lenient)
//!     .unwrap();
//! assert_eq!(report.skipped, vec!["bogus".to_string()]);
//! assert!(state.is_loaded("string"));
//! ```

pub mod config;
pub mod library;
pub mod loader;
pub mod registry;
pub mod snapshot;
pub mod types;

pub use config::{ConfigError, LibrarySelection, RuntimeConfig};
pub use library::{ConfigurableLibrary, SelectionPolicy, ALL_FUNCTIONS};
pub use loader::{OpenPolicy, OpenReport};
pub use registry::{LibError, LibraryDescriptor, LibraryRegistry};
pub use snapshot::OriginalSnapshot;
pub use types::{FunctionTable, HostFn, LibFunction, NativeFn, OpenFn, ScriptState};

//! # libgate - standard-library gating for an embeddable script runtime
//!
//! Decides which built-in library functions a running script can see, and
//! lets the embedding application narrow, extend, or override that set
//! before a library is registered:
//! - Immutable snapshots of every library's compiled-in function table
//! - Per-library staging objects for selecting and adding functions
//! - Guarded swap-then-register installation of the live function table
//! - Ordered bulk opening of the fixed library set
//! - TOML runtime configuration driving all of the above
//!
//! ## Quick Start
//!
//! ### Opening every library with its defaults
//!
//! ```
//! use libgate::runner::plugin::registry::LibraryRegistry;
//! use libgate::runner::plugin::types::ScriptState;
//! use libgate::runner::ds::value::Value;
//!
//! let registry = LibraryRegistry::standard().unwrap();
//! let mut state = ScriptState::new();
//! registry.open_all(&mut state).unwrap();
//!
//! let root = state.call("math", "sqrt", vec![Value::Integer(16)]).unwrap();
//! assert_eq!(root, Value::Integer(4));
//! ```
//!
//! ### Exposing only part of a library
//!
//! ```
//! use libgate::runner::plugin::registry::LibraryRegistry;
//! use libgate::runner::plugin::types::ScriptState;
//!
//! let registry = LibraryRegistry::standard().unwrap();
//! let mut state = ScriptState::new();
//!
//! let mut math = registry.configure("math").unwrap();
//! math.select_functions(["sqrt", "abs"]).unwrap();
//! math.open(&mut state).unwrap();
//!
//! assert_eq!(state.function_names("math"), vec!["abs", "sqrt"]);
//! assert!(state.resolve("math", "sin").is_none());
//! ```
//!
//! ### Injecting a host function
//!
//! ```
//! use libgate::runner::plugin::registry::LibraryRegistry;
//! use libgate::runner::plugin::types::{LibFunction, ScriptState};
//! use libgate::runner::ds::value::Value;
//!
//! let registry = LibraryRegistry::standard().unwrap();
//! let mut state = ScriptState::new();
//!
//! let mut os = registry.configure("os").unwrap();
//! os.select_functions(["clock", "time"]).unwrap();
//! os.add_function("hostname", LibFunction::host(|_state, _args| {
//!     Ok(Value::String("sandbox".to_string()))
//! }));
//! os.open(&mut state).unwrap();
//!
//! let name = state.call("os", "hostname", vec![]).unwrap();
//! assert_eq!(name, Value::String("sandbox".to_string()));
//! ```
//!
//! ## Architecture
//!
//! - **[`runner`]** - Everything the host links against
//!   - **[`runner::plugin`]** - Registry, snapshots, configurable libraries, loader, config
//!   - **[`runner::std_lib`]** - The ten standard libraries and their Open hooks
//!   - **[`runner::ds`]** - Values and script-level errors

#[macro_use]
extern crate lazy_static;

pub mod runner;

//! The standard descriptor list.

use crate::runner::plugin::registry::LibraryDescriptor;

use super::{base, channel, coroutine, debug, io, math, os, package, string, table};
use super::{
    BASE_LIB_NAME, CHANNEL_LIB_NAME, COROUTINE_LIB_NAME, DEBUG_LIB_NAME, IO_LIB_NAME,
    LOAD_LIB_NAME, MATH_LIB_NAME, OS_LIB_NAME, STRING_LIB_NAME, TAB_LIB_NAME,
};

/// All standard libraries, in load order.
///
/// `package` and the base library come first; the rest may rely on them.
pub fn standard_descriptors() -> Vec<LibraryDescriptor> {
    vec![
        LibraryDescriptor::new(LOAD_LIB_NAME, package::open, package::defaults),
        LibraryDescriptor::new(BASE_LIB_NAME, base::open, base::defaults),
        LibraryDescriptor::new(TAB_LIB_NAME, table::open, table::defaults),
        LibraryDescriptor::new(IO_LIB_NAME, io::open, io::defaults),
        LibraryDescriptor::new(OS_LIB_NAME, os::open, os::defaults),
        LibraryDescriptor::new(STRING_LIB_NAME, string::open, string::defaults),
        LibraryDescriptor::new(MATH_LIB_NAME, math::open, math::defaults),
        LibraryDescriptor::new(DEBUG_LIB_NAME, debug::open, debug::defaults),
        LibraryDescriptor::new(CHANNEL_LIB_NAME, channel::open, channel::defaults),
        LibraryDescriptor::new(COROUTINE_LIB_NAME, coroutine::open, coroutine::defaults),
    ]
}

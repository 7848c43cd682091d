//! Satellite source descriptors
//!
//! Every satellite listing is described entirely by data: where to search,
//! which elements hold results and dates, how to page, and how to estimate
//! its result count. Adding a source means adding a `[[source]]` table to the
//! configuration, never new code.

mod descriptor;
mod selector;

pub use descriptor::{CountingMode, DateSpec, QueryParam, SourceDescriptor};
pub use selector::SelectorSpec;

#[cfg(test)]
pub(crate) use descriptor::test_descriptor;

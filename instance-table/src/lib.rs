//! View model for the assessment instance table.
//!
//! Given the instances of an assessment and the selected test step, this
//! crate derives what a list renderer needs: the relevant rows, the column
//! set the step defines, and the predicates that drive the bulk controls.
//! User actions become commands for an external store.
//!
//! - **[`core`]**: Pure derivation (filtering, rows, columns, predicates) and
//!   the store-side state transitions. No I/O.
//! - **[`view`]**: The façade combining core pieces into one snapshot and
//!   forwarding commands through [`handler`].
//! - **[`io`]**: The reference file-backed store and TOML configuration.
//!
//! Steps are described by [`step`] and looked up through [`steps`].

pub mod core;
pub mod exit_codes;
pub mod handler;
pub mod instance;
pub mod io;
pub mod logging;
pub mod render;
pub mod step;
pub mod steps;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
pub mod view;

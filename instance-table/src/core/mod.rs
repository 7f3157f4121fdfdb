//! Deterministic, pure logic behind the instance table.
//!
//! Core modules must be free of I/O side effects. They read an instances
//! snapshot plus the selected step and return fresh values on every call.

pub mod columns;
pub mod filter;
pub mod invariants;
pub mod predicates;
pub mod rows;
pub mod state_update;
pub mod types;

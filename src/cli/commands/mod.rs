//! Command implementations.
//!
//! Each submodule implements `execute` for one of the argument structs
//! declared in [`crate::cli`].

pub mod chat;
pub mod completions;
pub mod search;
pub mod sections;
pub mod settings;

//! Domains module containing business logic organized by bounded contexts.
//!
//! The gateway has a single bounded context: the tools domain, covering
//! registration, validation, dispatch, and the tool implementations.

pub mod tools;

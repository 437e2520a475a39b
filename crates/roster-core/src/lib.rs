//! Core types and trait definitions for the student roster.
//!
//! Identities, student profiles, and the storage traits over them. No HTTP or
//! database code lives here; the auth, store and API crates build on it.

pub mod error;
pub mod identity;
pub mod store;
pub mod student;

pub use error::{Error, Result};

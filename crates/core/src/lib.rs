//! Preferred-Identifier Resolution for Registered Naming Systems
//!
//! A naming-system record carries several equivalent identifier
//! representations (a URI form, an OID form, ...). This crate resolves the
//! "preferred identifier": given an internal identifier and a requested
//! scheme, it looks up the matching record through an injected search
//! collaborator and returns the identifier value in that scheme.
//!
//! The record store itself is opaque; it is consumed only through the
//! one-method [`RecordSearch`] trait.

pub mod errors;
pub mod outcome;
pub mod resolver;
pub mod search;
pub mod types;

pub use errors::*;
pub use outcome::*;
pub use resolver::PreferredIdResolver;
pub use search::*;
pub use types::*;

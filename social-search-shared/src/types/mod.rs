//! This module defines the core data structures used across the social search crates.
//! It re-exports the identifier and document types.

pub mod configuration;
pub mod container;
pub mod identifier;
pub mod search_document;

pub use identifier::Identifier;
pub use search_document::SearchDocument;

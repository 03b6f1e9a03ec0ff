//! Error types for the social search repository.
//!
//! This module provides a unified error type for index resolution, queries,
//! re-indexing and configuration access.

mod social_search_error;

pub use social_search_error::SocialSearchError;

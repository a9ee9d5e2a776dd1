//! # Quill Core
//!
//! The domain layer of the Quill blogging backend.
//! This crate contains pure business rules with zero infrastructure dependencies:
//! entities, ports, slug policy, identity resolution and post visibility.

pub mod domain;
pub mod error;
pub mod lookup;
pub mod pagination;
pub mod ports;
pub mod slug;

pub use error::{DomainError, RepoError, SlugError};

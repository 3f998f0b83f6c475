//! # Catalog Crate
//!
//! Domain types for moving the IMDB catalog from a relational store into
//! a document store.
//!
//! ## Main Components
//!
//! - **types**: ids, relational row types, and the `Members`/`Movies` document types
//! - **document**: shaping rows into documents and grouping actor roles
//! - **error**: Error types for encoding and decoding documents
//!
//! ## Example Usage
//!
//! ```ignore
//! use catalog::{CatalogDocument, MemberDocument, MemberRow};
//!
//! let row = MemberRow {
//!     id: 1,
//!     name: "Fred Astaire".into(),
//!     birthyear: Some(1899),
//!     deathyear: Some(1987),
//! };
//! let document = MemberDocument::from(row).to_document()?;
//! ```

pub mod document;
pub mod error;
pub mod types;

pub use document::{CatalogDocument, group_actor_roles};
pub use error::{CatalogError, Result};
pub use types::{
    // Type aliases
    MemberId,
    MovieId,
    // Relational rows
    ActorRoleRow,
    MemberRow,
    MovieRow,
    // Documents
    ActorRoles,
    MemberDocument,
    MovieDocument,
    // Names
    DEFAULT_DATABASE,
    MEMBERS,
    MOVIES,
};

//! # Rollbook
//!
//! Course-scoped access control for school records, usable both as a
//! standalone server binary and as a library.
//!
//! Teachers hold homeroom or subject assignments to courses. Every request
//! for attendance, grades, materials or rosters is narrowed to the courses
//! the caller is assigned to (or, for guardians and students, to their own
//! students).
//!
//! ## Library Usage
//!
//! ```toml
//! [dependencies]
//! rollbook = { version = "0.0.1", default-features = false }
//! ```
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use rollbook::access::{AssignmentRegistry, ScopeResolver, authorize_scoped_access};
//! use rollbook::server::{AppState, create_router};
//! use rollbook::store::{SqliteStore, Store};
//! use rollbook::types::AssignmentKind;
//!
//! let store = SqliteStore::new("./data/rollbook.db").unwrap();
//! store.initialize().unwrap();
//!
//! AssignmentRegistry::new(&store)
//!     .create("teacher-id", "3B", AssignmentKind::Subject, Some("Math"))
//!     .unwrap();
//! let scope = ScopeResolver::new(&store).resolve("teacher-id").unwrap();
//! assert!(scope.contains("3B"));
//!
//! let router = create_router(Arc::new(AppState::new(Arc::new(store))));
//! // Serve with axum...
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` (default): Builds the `rollbook` binary. Disable with `default-features = false`.

pub mod access;
pub mod auth;
pub mod config;
pub mod error;
pub mod server;
pub mod store;
pub mod types;

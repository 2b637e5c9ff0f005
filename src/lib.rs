//! Core library surface for the publication browser TUI application.
//!
//! The public modules exposed here provide an intentionally small API so the
//! `bin` target as well as potential external tooling can reuse the same pieces.
//! Keeping the glue logic documented makes it easy to recall why each re-export
//! exists when revisiting the project.
pub mod actions;
pub mod catalog;
pub mod clipboard;
pub mod collection;
pub mod models;
pub mod notify;
pub mod pagination;
pub mod ui;

/// Catalog loading, used by `main.rs` to resolve the startup data source.
pub use catalog::{load, Catalog};

/// The primary domain type that other layers manipulate.
pub use models::Publication;

/// Filtering state shared by the interactive surface and its tests.
pub use collection::{CollectionView, FacetSelection, ViewMode, VisibilityFilter};

/// Card actions and the notifications they produce.
pub use actions::CardAction;
pub use notify::{Severity, Toast};

/// The interactive application entry point and state container.
pub use ui::{run_app, App};

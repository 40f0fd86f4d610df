//! `stockroom-console`
//!
//! **Responsibility:** presentation layer for the inventory store.
//!
//! This crate provides:
//! - The presentation surface boundary ([`PresentationSurface`])
//! - The view binder (form ⇄ store, edit mode)
//! - A line-oriented terminal surface and its command loop
//!
//! The `stockroom` binary is a **thin shell** wiring these to a configured
//! storage backend.

pub mod app;
pub mod binder;
pub mod surface;
pub mod terminal;

pub use binder::{DeleteOutcome, EditState, SubmitOutcome, ViewBinder};
pub use surface::PresentationSurface;
pub use terminal::TerminalSurface;

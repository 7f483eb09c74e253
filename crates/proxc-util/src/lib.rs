//! proxc-util - Foundation types shared by every compiler stage.
//!
//! This crate provides:
//! - [`Span`] / [`FileId`] for source location tracking
//! - [`Diagnostic`] / [`Handler`] for error and warning collection
//! - [`Symbol`] for interned identifier strings

pub mod diagnostic;
pub mod span;
pub mod symbol;

pub use diagnostic::{Diagnostic, Handler, Level};
pub use span::{FileId, Span};
pub use symbol::Symbol;

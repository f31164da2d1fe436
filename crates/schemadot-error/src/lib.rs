//! # schemadot-error
//!
//! Unified error handling for schemadot.
//!
//! ## Design Philosophy
//!
//! - **ErrorKind**: Know what error occurred (e.g., HandleNotFound, ProviderUnavailable)
//! - **ErrorStatus**: Decide how to handle it (Permanent, Temporary, Persistent)
//! - **Error Context**: Assist in locating the cause with rich context
//! - **Error Source**: Wrap underlying errors without leaking raw types
//!
//! ## Usage
//!
//! ```rust
//! use schemadot_error::{Error, ErrorKind};
//!
//! fn example() -> Result<(), Error> {
//!     Err(Error::new(ErrorKind::HandleNotFound, "no such section")
//!         .with_operation("selection::resolve")
//!         .with_context("kind", "section")
//!         .with_context("handle", "news"))
//! }
//! ```
//!
//! ## Principles
//!
//! - All fallible functions return `Result<T, schemadot_error::Error>`
//! - External errors are wrapped with `set_source(err)`
//! - Same error handled once, subsequent ops only append context

mod error;
mod kind;
mod status;

pub use error::Error;
pub use kind::ErrorKind;
pub use status::ErrorStatus;

/// Result type alias using schemadot Error
pub type Result<T> = std::result::Result<T, Error>;

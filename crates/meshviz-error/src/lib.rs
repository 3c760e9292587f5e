//! # meshviz-error
//!
//! Unified error handling for the meshviz crates.
//!
//! - **ErrorKind**: what went wrong (e.g. MissingMetadataField, MalformedEntity)
//! - **ErrorStatus**: whether the same input could succeed later (Permanent, Temporary)
//! - **Context**: key/value pairs naming the entity, key or file involved
//! - **Source**: the wrapped lower-level error, if any
//!
//! ## Usage
//!
//! ```rust
//! use meshviz_error::{Error, ErrorKind};
//!
//! fn example() -> Result<(), Error> {
//!     Err(Error::new(ErrorKind::MissingMetadataField, "rate_5xx is missing")
//!         .with_operation("topology::from_raw")
//!         .with_context("entity", "reviews (v2)")
//!         .with_context("key", "rate_5xx"))
//! }
//! ```
//!
//! All library functions return `meshviz_error::Result<T>`. Lower-level errors
//! are wrapped with `set_source(err)` rather than leaked as raw types.

mod error;
mod kind;
mod status;

pub use error::Error;
pub use kind::ErrorKind;
pub use status::ErrorStatus;

/// Result type alias using the meshviz Error
pub type Result<T> = std::result::Result<T, Error>;

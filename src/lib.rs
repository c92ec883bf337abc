//! Generic reader for line-oriented configuration files.
//!
//! # Overview
//! This crate exposes:
//! - [`scan`] — reads a file whose comments start with a single prefix,
//!   classifies each line and hands value lines to a callback.
//! - [`fields`] — resolves configuration keys onto annotated fields of a
//!   destination record, checking value kinds before assignment.
//! - [`value`] — the value kinds a field may hold.
//!
//! A dialect-specific loader combines the two: its callback tokenises each
//! value line and assigns the result with [`fields::set_field`].
//!
//! # Examples
//! ```rust,no_run
//! use lineconf::scan::{Flow, scan};
//!
//! let file = scan("/etc/chrony/chrony.conf", "#", |line| {
//!     tracing::info!(text = line.text(), "directive");
//!     Ok::<_, std::io::Error>(Flow::Continue)
//! })
//! .expect("file must be readable");
//! println!("{} lines", file.len());
//! ```
pub mod fields;
pub mod scan;
pub mod value;

pub use fields::{
    Annotated, FieldBinding, FieldError, FieldRegistry, find_field, get_field, set_field,
};
pub use scan::{Flow, Line, LineKind, ScanError, ScannedFile};
pub use value::{FieldKind, FieldType, FieldValue, ParseValueError};

//! # valextract
//!
//! Typed value extraction from key/value sources with aggregated errors.
//!
//! This crate pulls string values out of a [`Source`] by key, converts each
//! into a strongly-typed destination, and collects every failure instead of
//! stopping at the first one. No reflection is involved: the destination
//! type is fixed by the converter chosen at each call site.
//!
//! ## Pieces
//!
//! | Item | Role |
//! |------|------|
//! | [`Source`] | Looks up a raw string by key |
//! | [`MapSource`] | Owned in-memory source (`HashMap`/`BTreeMap` also work) |
//! | [`Converter`] | Parses a raw string into a destination |
//! | [`Extractor`] | Runs lookups, applies the optional-key policy, collects errors |
//! | [`result`] | Helpers returning the converted value directly |
//!
//! Sources backed by URL query strings and HTTP form bodies are provided by
//! the `valextract-http` crate.
//!
//! ## Example
//!
//! ```rust
//! use valextract::convert::{as_string, as_u64};
//! use valextract::{ErrorKind, Extractor, MapSource};
//!
//! let source = MapSource::new().with("name", "John").with("age", "abc");
//!
//! let mut name = String::new();
//! let mut age = 0;
//! let mut id = 0;
//!
//! let mut ex = Extractor::using(&source);
//! ex.with("name", as_string(&mut name));
//! ex.with("age", as_u64(&mut age));
//! ex.with("id", as_u64(&mut id));
//!
//! assert_eq!(name, "John");
//! let kinds: Vec<_> = ex.errors().iter().map(|e| e.kind()).collect();
//! assert_eq!(kinds, [ErrorKind::Conversion, ErrorKind::NotFound]);
//! ```
//!
//! ## Error Handling
//!
//! Each failure is an [`ExtractionError`] tagged with its key. Absence is
//! [`ErrorKind::NotFound`] and is the only failure an optional key
//! suppresses; source faults ([`ErrorKind::Source`]) and parse failures
//! ([`ErrorKind::Conversion`]) are always recorded. [`Extractor::finish`]
//! folds everything into one [`ExtractionErrors`] for `?` propagation.

#![doc(html_root_url = "https://docs.rs/valextract/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod convert;
mod error;
mod extractor;
pub mod result;
mod source;

pub use convert::Converter;
pub use error::{
    ConversionError, ErrorKind, ExtractionError, ExtractionErrors, SharedError, SourceError,
};
pub use extractor::Extractor;
pub use source::{MapSource, Source};

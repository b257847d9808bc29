//! # valextract-http
//!
//! HTTP-backed [`Source`](valextract::Source) implementations for
//! `valextract`.
//!
//! | Source | Reads from | Parsing |
//! |--------|-----------|---------|
//! | [`QuerySource`] | URL query string | Eager, at construction |
//! | [`FormSource`] | Request body + query string | Lazy, at most once on success |
//!
//! Both report an empty first value the same way as an absent key.
//!
//! ## Example
//!
//! ```rust
//! use bytes::Bytes;
//! use http::Request;
//! use valextract::convert::{as_bool, as_string};
//! use valextract::{ErrorKind, Extractor};
//! use valextract_http::{FormConfig, FormSource};
//!
//! let request = Request::post("/signup?ref=mail")
//!     .header("content-type", "application/x-www-form-urlencoded")
//!     .body(Bytes::from_static(b"email=a%40b.c&newsletter=maybe"))
//!     .unwrap();
//!
//! let form = FormSource::with_config(request, FormConfig::new().max_fields(20));
//! let mut email = String::new();
//! let mut referrer = String::new();
//! let mut newsletter = false;
//!
//! let mut ex = Extractor::using(&form);
//! ex.with("email", as_string(&mut email));
//! ex.with("ref", as_string(&mut referrer));
//! ex.with("newsletter", as_bool(&mut newsletter));
//!
//! assert_eq!(email, "a@b.c");
//! assert_eq!(referrer, "mail");
//! assert_eq!(ex.errors()[0].kind(), ErrorKind::Conversion);
//! ```
//!
//! ## Configuration
//!
//! Form limits can be loaded with [`ConfigLoader`] from TOML or JSON and
//! overridden from the environment (`PREFIX__FORM__MAX_BODY_SIZE`, ...).

#![doc(html_root_url = "https://docs.rs/valextract-http/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod config;
mod error;
mod form;
mod loader;
mod query;

pub use config::{FormConfig, SourceConfig};
pub use error::{ConfigError, HttpSourceError};
pub use form::FormSource;
pub use loader::ConfigLoader;
pub use query::QuerySource;

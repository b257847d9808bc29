//! Built-in converters.
//!
//! A [`Converter`] turns the raw string produced by a [`Source`](crate::Source)
//! into a typed value written through a destination reference captured at
//! the call site. The destination type is fixed when the converter is built,
//! so the [`Extractor`] never needs to know it.
//!
//! All parsers are total: the whole string must parse, and no whitespace is
//! trimmed.

use std::any::type_name;
use std::error::Error as StdError;
use std::num::ParseIntError;
use std::str::FromStr;
use thiserror::Error;

use crate::{ConversionError, Extractor};

/// A boxed conversion step bound to a destination with lifetime `'a`.
///
/// The converter receives the owning [`Extractor`] so that compound
/// conversions can extract further keys. Avoiding cycles is the caller's
/// responsibility.
pub type Converter<'a> =
    Box<dyn FnOnce(&mut Extractor<'_>, &str) -> Result<(), ConversionError> + 'a>;

/// Builds a [`Converter`] from a closure.
///
/// # Example
///
/// ```rust
/// use valextract::{convert, ConversionError, Extractor, MapSource};
///
/// let source = MapSource::new().with("port", "80");
/// let mut port = 0u16;
///
/// let mut ex = Extractor::using(&source);
/// ex.with(
///     "port",
///     convert::from_fn(|_, raw| {
///         port = raw.parse().map_err(|e| ConversionError::new("port", e))?;
///         Ok(())
///     }),
/// );
///
/// assert_eq!(port, 80);
/// assert!(ex.errors().is_empty());
/// ```
pub fn from_fn<'a, F>(f: F) -> Converter<'a>
where
    F: FnOnce(&mut Extractor<'_>, &str) -> Result<(), ConversionError> + 'a,
{
    Box::new(f)
}

/// Copies the raw value unchanged. Never fails.
pub fn as_string(dest: &mut String) -> Converter<'_> {
    from_fn(move |_, raw| {
        raw.clone_into(dest);
        Ok(())
    })
}

/// Parses a base-10 unsigned 64-bit integer. No sign is accepted.
pub fn as_u64(dest: &mut u64) -> Converter<'_> {
    parse_unsigned(dest, "uint64")
}

/// Parses a base-10 signed 64-bit integer.
pub fn as_i64(dest: &mut i64) -> Converter<'_> {
    parse_into(dest, "int64")
}

/// Parses a base-10 unsigned 32-bit integer. No sign is accepted.
pub fn as_u32(dest: &mut u32) -> Converter<'_> {
    parse_unsigned(dest, "uint32")
}

/// Parses a base-10 signed 32-bit integer.
pub fn as_i32(dest: &mut i32) -> Converter<'_> {
    parse_into(dest, "int32")
}

/// Parses a 64-bit float.
pub fn as_f64(dest: &mut f64) -> Converter<'_> {
    parse_into(dest, "float64")
}

/// Parses a boolean literal.
///
/// Accepts `1 t T TRUE true True` and `0 f F FALSE false False`.
pub fn as_bool(dest: &mut bool) -> Converter<'_> {
    from_fn(move |_, raw| {
        *dest = parse_bool(raw).map_err(|e| ConversionError::new("bool", e))?;
        Ok(())
    })
}

/// Parses any [`FromStr`] type.
///
/// The error names the target type by its last path segment.
///
/// ```rust
/// use std::net::Ipv4Addr;
/// use valextract::{convert::as_parsed, Extractor, MapSource};
///
/// let source = MapSource::new().with("addr", "10.0.0.1");
/// let mut addr = Ipv4Addr::UNSPECIFIED;
///
/// let mut ex = Extractor::using(&source);
/// ex.with("addr", as_parsed(&mut addr));
///
/// assert_eq!(addr, Ipv4Addr::new(10, 0, 0, 1));
/// ```
pub fn as_parsed<T>(dest: &mut T) -> Converter<'_>
where
    T: FromStr,
    T::Err: StdError + Send + Sync + 'static,
{
    parse_into(dest, short_type_name::<T>())
}

fn parse_into<'a, T>(dest: &'a mut T, expected: &'static str) -> Converter<'a>
where
    T: FromStr,
    T::Err: StdError + Send + Sync + 'static,
{
    from_fn(move |_, raw| {
        *dest = raw
            .parse::<T>()
            .map_err(|e| ConversionError::new(expected, e))?;
        Ok(())
    })
}

// `FromStr` for unsigned integers takes a leading `+`; unsigned input must
// be digits only.
fn parse_unsigned<'a, T>(dest: &'a mut T, expected: &'static str) -> Converter<'a>
where
    T: FromStr<Err = ParseIntError>,
{
    from_fn(move |_, raw| {
        if raw.starts_with('+') {
            return Err(ConversionError::new(expected, InvalidSyntax::new(raw)));
        }
        *dest = raw
            .parse::<T>()
            .map_err(|e| ConversionError::new(expected, e))?;
        Ok(())
    })
}

fn short_type_name<T>() -> &'static str {
    let full = type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

/// Error returned when a string is not in a form the converter accepts,
/// such as an unknown boolean literal or a signed unsigned integer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid syntax: {literal:?}")]
pub struct InvalidSyntax {
    literal: String,
}

impl InvalidSyntax {
    fn new(literal: &str) -> Self {
        Self {
            literal: literal.to_string(),
        }
    }

    /// Returns the rejected input.
    #[must_use]
    pub fn literal(&self) -> &str {
        &self.literal
    }
}

fn parse_bool(raw: &str) -> Result<bool, InvalidSyntax> {
    match raw {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
        _ => Err(InvalidSyntax::new(raw)),
    }
}

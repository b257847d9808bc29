//! Form body source.
//!
//! [`FormSource`] serves values from a request's form body, parsing the body
//! lazily on the first lookup and at most once after that.

use std::cell::{Cell, OnceCell};
use std::io;

use bytes::Bytes;
use http::{header, Method, Request};
use tracing::debug;
use valextract::{Source, SourceError};

use crate::{FormConfig, HttpSourceError, QuerySource};

/// Source backed by the form data of an HTTP request.
///
/// On the first [`get`](Source::get) the body is parsed according to the
/// request's Content-Type:
///
/// - `multipart/form-data`: parsed as multipart; file parts are skipped.
/// - `application/x-www-form-urlencoded` on `POST`, `PUT` or `PATCH`:
///   parsed as a url-encoded body.
/// - anything else contributes no body values.
///
/// A Content-Type starting with `multipart/form-data` but lacking a usable
/// boundary, or a malformed Content-Type on a form-body method, fails the
/// parse rather than yielding an empty form.
///
/// Values from the URI query string are served after body values, so a key
/// present in both resolves to the body value. A successful parse is
/// memoised; a failed parse is not, and the next lookup tries again.
///
/// Like every source here, an empty first value is reported as
/// [`SourceError::NotFound`].
///
/// # Example
///
/// ```rust
/// use bytes::Bytes;
/// use http::Request;
/// use valextract::convert::{as_string, as_u64};
/// use valextract::Extractor;
/// use valextract_http::FormSource;
///
/// let request = Request::post("/users")
///     .header("content-type", "application/x-www-form-urlencoded")
///     .body(Bytes::from_static(b"name=John&age=30"))
///     .unwrap();
///
/// let form = FormSource::new(request);
/// let mut name = String::new();
/// let mut age = 0;
///
/// let mut ex = Extractor::using(&form);
/// ex.with("name", as_string(&mut name));
/// ex.with("age", as_u64(&mut age));
///
/// assert_eq!(name, "John");
/// assert_eq!(age, 30);
/// assert_eq!(form.parse_count(), 1);
/// ```
#[derive(Debug)]
pub struct FormSource {
    request: Option<Request<Bytes>>,
    config: FormConfig,
    values: OnceCell<QuerySource>,
    parse_count: Cell<usize>,
}

impl FormSource {
    /// Creates a source over `request` with default limits.
    #[must_use]
    pub fn new(request: Request<Bytes>) -> Self {
        Self::with_config(request, FormConfig::default())
    }

    /// Creates a source over `request` with custom limits.
    #[must_use]
    pub fn with_config(request: Request<Bytes>, config: FormConfig) -> Self {
        Self {
            request: Some(request),
            config,
            values: OnceCell::new(),
            parse_count: Cell::new(0),
        }
    }

    /// Creates a source with no request; every lookup fails with
    /// [`SourceError::MissingRequest`].
    #[must_use]
    pub fn missing() -> Self {
        Self {
            request: None,
            config: FormConfig::default(),
            values: OnceCell::new(),
            parse_count: Cell::new(0),
        }
    }

    /// Returns the wrapped request, if any.
    #[must_use]
    pub fn request(&self) -> Option<&Request<Bytes>> {
        self.request.as_ref()
    }

    /// Returns the limits in effect.
    #[must_use]
    pub fn config(&self) -> &FormConfig {
        &self.config
    }

    /// Returns `true` once the body has been parsed successfully.
    #[must_use]
    pub fn is_parsed(&self) -> bool {
        self.values.get().is_some()
    }

    /// Returns how many parse attempts have been made.
    #[must_use]
    pub fn parse_count(&self) -> usize {
        self.parse_count.get()
    }

    /// Returns every value for `key`, parsing the body if needed.
    pub fn get_all(&self, key: &str) -> Result<&[String], SourceError> {
        Ok(self.values()?.get_all(key))
    }

    fn values(&self) -> Result<&QuerySource, SourceError> {
        let request = self.request.as_ref().ok_or(SourceError::MissingRequest)?;

        if let Some(values) = self.values.get() {
            return Ok(values);
        }

        self.parse_count.set(self.parse_count.get() + 1);
        let parsed = parse_request(request, &self.config).map_err(|err| {
            debug!(error = %err, "form parse failed");
            SourceError::form_parse(err)
        })?;

        Ok(self.values.get_or_init(|| parsed))
    }
}

impl Default for FormSource {
    fn default() -> Self {
        Self::missing()
    }
}

impl Source for FormSource {
    fn get(&self, key: &str) -> Result<&str, SourceError> {
        self.values()?.get(key)
    }
}

enum Encoding<'a> {
    Multipart(&'a str),
    UrlEncoded,
    None,
}

const MULTIPART_FORM_DATA: &str = "multipart/form-data";

fn encoding(request: &Request<Bytes>) -> Result<Encoding<'_>, HttpSourceError> {
    let Some(value) = request.headers().get(header::CONTENT_TYPE) else {
        return Ok(Encoding::None);
    };
    let content_type = value
        .to_str()
        .map_err(|e| HttpSourceError::InvalidContentType(e.to_string()))?;

    // Prefix match: a malformed multipart header still goes to the multipart
    // parser so the boundary error surfaces.
    if content_type.starts_with(MULTIPART_FORM_DATA) {
        return Ok(Encoding::Multipart(content_type));
    }
    if !has_form_body(request.method()) {
        return Ok(Encoding::None);
    }

    let media_type = content_type
        .parse::<mime::Mime>()
        .map_err(|e| HttpSourceError::InvalidContentType(e.to_string()))?;
    if media_type.essence_str() == mime::APPLICATION_WWW_FORM_URLENCODED.essence_str() {
        Ok(Encoding::UrlEncoded)
    } else {
        Ok(Encoding::None)
    }
}

fn has_form_body(method: &Method) -> bool {
    *method == Method::POST || *method == Method::PUT || *method == Method::PATCH
}

fn parse_request(
    request: &Request<Bytes>,
    config: &FormConfig,
) -> Result<QuerySource, HttpSourceError> {
    let body = request.body();
    let body_pairs = match encoding(request)? {
        Encoding::Multipart(content_type) => {
            debug!(bytes = body.len(), "parsing multipart form body");
            parse_multipart(content_type, body.clone(), config)?
        }
        Encoding::UrlEncoded => {
            debug!(bytes = body.len(), "parsing url-encoded form body");
            parse_urlencoded(body, config)?
        }
        Encoding::None => Vec::new(),
    };

    let query_pairs = match request.uri().query() {
        Some(query) => serde_urlencoded::from_str::<Vec<(String, String)>>(query)?,
        None => Vec::new(),
    };

    Ok(body_pairs.into_iter().chain(query_pairs).collect())
}

fn parse_urlencoded(
    body: &Bytes,
    config: &FormConfig,
) -> Result<Vec<(String, String)>, HttpSourceError> {
    if body.len() > config.max_body_size {
        return Err(HttpSourceError::payload_too_large(config.max_body_size, body.len()));
    }

    let pairs: Vec<(String, String)> =
        serde_urlencoded::from_bytes(body).map_err(HttpSourceError::InvalidFormBody)?;

    if pairs.len() > config.max_fields {
        return Err(HttpSourceError::TooManyFields {
            max: config.max_fields,
        });
    }
    if let Some((name, _)) = pairs.iter().find(|(_, v)| v.len() > config.max_field_size) {
        return Err(HttpSourceError::field_too_large(name.as_str(), config.max_field_size));
    }

    Ok(pairs)
}

fn parse_multipart(
    content_type: &str,
    body: Bytes,
    config: &FormConfig,
) -> Result<Vec<(String, String)>, HttpSourceError> {
    let boundary =
        multer::parse_boundary(content_type).map_err(|_| HttpSourceError::InvalidBoundary)?;

    if body.len() > config.max_body_size {
        return Err(HttpSourceError::payload_too_large(config.max_body_size, body.len()));
    }

    let stream = futures::stream::once(async move { Ok::<_, io::Error>(body) });
    let constraints = multer::Constraints::new().size_limit(
        multer::SizeLimit::new()
            .whole_stream(config.max_body_size as u64)
            .per_field(config.max_field_size as u64),
    );
    let mut multipart = multer::Multipart::with_constraints(stream, boundary, constraints);

    // The body is already in memory, so every poll completes immediately.
    futures::executor::block_on(collect_fields(&mut multipart, config))
}

async fn collect_fields(
    multipart: &mut multer::Multipart<'_>,
    config: &FormConfig,
) -> Result<Vec<(String, String)>, HttpSourceError> {
    let mut pairs = Vec::new();
    let mut field_count = 0;

    while let Some(field) = multipart.next_field().await? {
        field_count += 1;
        if field_count > config.max_fields {
            return Err(HttpSourceError::TooManyFields {
                max: config.max_fields,
            });
        }

        if field.file_name().is_some() {
            continue;
        }
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };

        let value = field.text().await.map_err(|e| match e {
            multer::Error::FieldSizeExceeded { .. } => {
                HttpSourceError::field_too_large(name.as_str(), config.max_field_size)
            }
            other => HttpSourceError::Multipart(other),
        })?;
        pairs.push((name, value));
    }

    Ok(pairs)
}

//! Prepared requests
//!
//! A [`PreparedRequest`] is the concrete request derived from a descriptor
//! plus call arguments. It lives for one attempt: the binder rebuilds it from
//! scratch on every retry, so path substitution and validation re-run against
//! the original arguments rather than a stale rendering.

use super::args::{CallArgs, MediaPayload};
use crate::descriptor::{EndpointDescriptor, UploadSpec};
use crate::error::{Error, Result};
use crate::types::Method;
use regex::Regex;
use std::sync::LazyLock;

/// Fixed boundary token for multipart upload bodies
pub const MULTIPART_BOUNDARY: &str = "Rb7nD4ry";

/// Regex for matching path placeholders: {name}
static PLACEHOLDER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([a-zA-Z_][a-zA-Z0-9_]*)\}").unwrap());

/// A concrete request, ready for dispatch
#[derive(Debug, Clone)]
pub struct PreparedRequest {
    /// Fully substituted request path (relative to the configured host/root)
    pub path: String,
    /// HTTP method
    pub method: Method,
    /// Query string parameters, in argument order
    pub query: Vec<(String, String)>,
    /// Form body fields, in argument order (write-style methods)
    pub form: Vec<(String, String)>,
    /// Extra headers (multipart content headers, when a body is attached)
    pub headers: Vec<(String, String)>,
    /// Raw multipart body, for upload calls
    pub body: Option<Vec<u8>>,
}

impl PreparedRequest {
    /// Build a prepared request from a descriptor and call arguments.
    ///
    /// Substitutes `{name}` placeholders from the arguments, partitions the
    /// remaining arguments into query string (read-style methods) or form
    /// body (write-style methods), and packs any attached file payload into a
    /// multipart body. When a multipart body is present the remaining
    /// arguments always travel in the query string, since the body is taken
    /// by the upload.
    pub fn build(descriptor: &EndpointDescriptor, args: &CallArgs) -> Result<Self> {
        let (path, consumed) = substitute_path(descriptor.path, args)?;

        let mut prepared = Self {
            path,
            method: descriptor.method,
            query: Vec::new(),
            form: Vec::new(),
            headers: Vec::new(),
            body: None,
        };

        if let Some(spec) = &descriptor.upload {
            let media = args
                .media_payload()
                .ok_or_else(|| Error::validation(format!(
                    "endpoint '{}' requires a file upload",
                    descriptor.name
                )))?;
            prepared.attach_media(media, spec)?;
        } else if args.media_payload().is_some() {
            return Err(Error::validation(format!(
                "endpoint '{}' does not accept a file upload",
                descriptor.name
            )));
        }

        let into_query = descriptor.method.is_read() || prepared.body.is_some();
        for (name, value) in args.iter() {
            if consumed.contains(&name.to_string()) {
                continue;
            }
            let pair = (name.to_string(), value.render());
            if into_query {
                prepared.query.push(pair);
            } else {
                prepared.form.push(pair);
            }
        }

        Ok(prepared)
    }

    /// Validate and pack a file payload into a multipart body
    fn attach_media(&mut self, media: &MediaPayload, spec: &UploadSpec) -> Result<()> {
        if media.bytes.len() > spec.max_bytes {
            return Err(Error::validation(format!(
                "file is too big: {} bytes, must be at most {} bytes",
                media.bytes.len(),
                spec.max_bytes
            )));
        }

        let mime = guess_mime_type(&media.filename)
            .ok_or_else(|| Error::validation(format!(
                "could not determine file type of '{}'",
                media.filename
            )))?;
        if !spec.allowed_types.contains(&mime) {
            return Err(Error::validation(format!(
                "invalid file type '{mime}', accepted: {}",
                spec.allowed_types.join(", ")
            )));
        }

        let filename = media
            .filename
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(&media.filename);

        let mut body = Vec::with_capacity(media.bytes.len() + 256);
        body.extend_from_slice(format!("--{MULTIPART_BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{filename}\"\r\n",
                spec.form_field
            )
            .as_bytes(),
        );
        body.extend_from_slice(format!("Content-Type: {mime}\r\n\r\n").as_bytes());
        body.extend_from_slice(&media.bytes);
        body.extend_from_slice(format!("\r\n--{MULTIPART_BOUNDARY}--\r\n").as_bytes());

        self.headers.push((
            "Content-Type".to_string(),
            format!("multipart/form-data; boundary={MULTIPART_BOUNDARY}"),
        ));
        self.headers
            .push(("Content-Length".to_string(), body.len().to_string()));
        self.body = Some(body);

        Ok(())
    }
}

/// Substitute `{name}` placeholders in a path template from call arguments.
///
/// Returns the concrete path and the names consumed by substitution, which
/// must not reappear as query or body fields. Any placeholder without a
/// matching argument is a construction error.
fn substitute_path(template: &str, args: &CallArgs) -> Result<(String, Vec<String>)> {
    let mut consumed = Vec::new();
    let mut missing = None;

    let path = PLACEHOLDER_REGEX
        .replace_all(template, |caps: &regex::Captures<'_>| {
            let name = &caps[1];
            match args.get(name) {
                Some(value) => {
                    consumed.push(name.to_string());
                    value.render()
                }
                None => {
                    missing.get_or_insert_with(|| name.to_string());
                    String::new()
                }
            }
        })
        .into_owned();

    if let Some(name) = missing {
        return Err(Error::UnresolvedPlaceholder { name });
    }

    Ok((path, consumed))
}

/// Guess a MIME type from a filename extension
pub fn guess_mime_type(filename: &str) -> Option<&'static str> {
    let extension = filename.rsplit('.').next()?.to_ascii_lowercase();
    match extension.as_str() {
        "gif" => Some("image/gif"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "bmp" => Some("image/bmp"),
        "webp" => Some("image/webp"),
        "json" => Some("application/json"),
        "txt" => Some("text/plain"),
        _ => None,
    }
}

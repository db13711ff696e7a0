//! Endpoint descriptors
//!
//! An [`EndpointDescriptor`] is the static, declarative record of one remote
//! operation: its path template, HTTP method, closed set of accepted
//! parameters, and the auth/caching/pagination flags the binder consults.
//! Descriptors are built once at startup and shared read-only by every call;
//! the binder never mutates them.

use crate::decode::PayloadKind;
use crate::types::Method;

/// Constraints for endpoints that accept a file upload
#[derive(Debug, Clone)]
pub struct UploadSpec {
    /// Multipart form field name (e.g. "media[]")
    pub form_field: &'static str,
    /// Maximum payload size in bytes
    pub max_bytes: usize,
    /// Accepted MIME types
    pub allowed_types: &'static [&'static str],
}

impl UploadSpec {
    /// Image upload constraints: GIF/JPEG/PNG with the given size ceiling
    pub fn image(form_field: &'static str, max_bytes: usize) -> Self {
        Self {
            form_field,
            max_bytes,
            allowed_types: &["image/gif", "image/jpeg", "image/png"],
        }
    }
}

/// Static metadata describing one remote operation.
///
/// The parameter set is closed: any call-time argument whose name is not in
/// `allowed_params` is rejected before any network I/O.
#[derive(Debug, Clone)]
pub struct EndpointDescriptor {
    /// Endpoint identity; used for cache keys and as the rate-limit family
    pub name: &'static str,
    /// Path template with `{name}` placeholders resolved from arguments
    pub path: &'static str,
    /// HTTP method
    pub method: Method,
    /// Closed set of accepted parameter names
    pub allowed_params: &'static [&'static str],
    /// Whether the call must be signed by an authenticator
    pub require_auth: bool,
    /// Declared response payload shape
    pub payload: PayloadKind,
    /// Whether the payload is an ordered sequence of model objects
    pub payload_list: bool,
    /// Whether cursor pagination applies to this endpoint
    pub supports_cursor: bool,
    /// Whether decoded results may be cached (idempotent reads only)
    pub use_cache: bool,
    /// Upload constraints, for file-bearing endpoints
    pub upload: Option<UploadSpec>,
}

impl EndpointDescriptor {
    /// Start building a descriptor for the given endpoint name and path
    pub fn builder(name: &'static str, path: &'static str) -> EndpointDescriptorBuilder {
        EndpointDescriptorBuilder {
            descriptor: EndpointDescriptor {
                name,
                path,
                method: Method::GET,
                allowed_params: &[],
                require_auth: false,
                payload: PayloadKind::Json,
                payload_list: false,
                supports_cursor: false,
                use_cache: false,
                upload: None,
            },
        }
    }

    /// Whether the given argument name is accepted by this endpoint
    pub fn accepts(&self, name: &str) -> bool {
        self.allowed_params.contains(&name)
    }

    /// Whether results of this endpoint may be served from cache
    pub fn cacheable(&self) -> bool {
        self.use_cache && self.method == Method::GET
    }
}

/// Builder for endpoint descriptors
#[derive(Debug)]
pub struct EndpointDescriptorBuilder {
    descriptor: EndpointDescriptor,
}

impl EndpointDescriptorBuilder {
    /// Set the HTTP method (default: GET)
    pub fn method(mut self, method: Method) -> Self {
        self.descriptor.method = method;
        self
    }

    /// Set the closed set of accepted parameter names
    pub fn allowed_params(mut self, params: &'static [&'static str]) -> Self {
        self.descriptor.allowed_params = params;
        self
    }

    /// Require the call to be signed
    pub fn require_auth(mut self) -> Self {
        self.descriptor.require_auth = true;
        self
    }

    /// Declare the response payload shape (default: raw JSON)
    pub fn payload(mut self, kind: PayloadKind) -> Self {
        self.descriptor.payload = kind;
        self
    }

    /// Declare the payload as an ordered sequence of model objects
    pub fn payload_list(mut self) -> Self {
        self.descriptor.payload_list = true;
        self
    }

    /// Declare cursor pagination support
    pub fn supports_cursor(mut self) -> Self {
        self.descriptor.supports_cursor = true;
        self
    }

    /// Permit caching of decoded results
    pub fn use_cache(mut self) -> Self {
        self.descriptor.use_cache = true;
        self
    }

    /// Attach upload constraints
    pub fn upload(mut self, spec: UploadSpec) -> Self {
        self.descriptor.upload = Some(spec);
        self
    }

    /// Build the descriptor
    pub fn build(self) -> EndpointDescriptor {
        self.descriptor
    }
}

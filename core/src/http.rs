//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! These types describe HTTP requests and responses as plain data. The core
//! crate builds `HttpRequest` values and parses `HttpResponse` values without
//! ever touching the network. Whoever implements [`Transport`] executes the
//! actual I/O.
//!
//! Request bodies are an explicit sum type. A multipart upload is carried as
//! the raw file plus its field name; the transport's multipart encoder owns
//! the boundary, so no `content-type` header is ever set for it here.

use crate::error::ApiError;

/// Header carrying the per-request correlation token.
pub const CORRELATION_ID_HEADER: &str = "X-Correlation-ID";

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

/// A single file sent as one multipart form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultipartFile {
    pub field: String,
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Body of an outbound request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestBody {
    Empty,
    Json(String),
    Multipart(MultipartFile),
}

impl RequestBody {
    pub fn is_empty(&self) -> bool {
        matches!(self, RequestBody::Empty)
    }
}

/// An HTTP request described as plain data.
///
/// Built by `ChemVisionClient::build_*` methods and executed by a
/// [`Transport`].
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: RequestBody,
}

impl HttpRequest {
    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
}

/// Executes one `HttpRequest` and hands back whatever came back.
///
/// Implementations make exactly one attempt and must return non-2xx responses
/// as `Ok`; only failures that never produced a response are `Err`, and those
/// should use [`ApiError::Transport`].
pub trait Transport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        (**self).send(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16) -> HttpResponse {
        HttpResponse {
            status,
            headers: vec![("x-correlation-id".to_string(), "abc".to_string())],
            body: String::new(),
        }
    }

    #[test]
    fn success_range_is_2xx_only() {
        assert!(response(200).is_success());
        assert!(response(204).is_success());
        assert!(!response(199).is_success());
        assert!(!response(300).is_success());
        assert!(!response(422).is_success());
    }

    #[test]
    fn header_lookup_ignores_case() {
        let resp = response(500);
        assert_eq!(resp.header(CORRELATION_ID_HEADER), Some("abc"));
        assert_eq!(resp.header("X-CORRELATION-ID"), Some("abc"));
        assert_eq!(resp.header("content-type"), None);
    }
}

//! HTTP transport types and the `Transport` seam.
//!
//! # Design
//! Requests and responses are plain data. The client builds `HttpRequest`
//! values and parses `HttpResponse` values; moving bytes over the network is
//! the job of whatever implements `Transport`. Connection handling, TLS,
//! timeouts and retries all live behind that trait.
//!
//! Transports report non-2xx statuses as `TransportError` rather than as a
//! successful `HttpResponse`, so a 4xx is distinguishable from a 2xx without
//! the caller inspecting the status. `TransportError::check` does that
//! classification for implementors that receive raw responses.

use thiserror::Error;

/// HTTP method for a request. The KYC API only accepts POST.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Post,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Post => "POST",
        }
    }
}

/// An HTTP request described as plain data.
///
/// `path` is relative to the service root (for example `/kyc/get-data`);
/// the transport resolves it against its base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

/// Failure reported by a `Transport`.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The server answered with a 4xx status.
    #[error("client error: HTTP {status}")]
    Client { status: u16, response: HttpResponse },

    /// The server answered with a 5xx (or otherwise unexpected) status.
    #[error("server error: HTTP {status}")]
    Server { status: u16, response: HttpResponse },

    /// No response was received.
    #[error("connection failed: {0}")]
    Connection(String),
}

impl TransportError {
    /// Pass 2xx responses through; turn everything else into the matching
    /// error variant.
    pub fn check(response: HttpResponse) -> Result<HttpResponse, TransportError> {
        match response.status {
            200..=299 => Ok(response),
            400..=499 => Err(TransportError::Client {
                status: response.status,
                response,
            }),
            status => Err(TransportError::Server { status, response }),
        }
    }

    /// Status code of the response behind this error, if one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Client { status, .. } | TransportError::Server { status, .. } => {
                Some(*status)
            }
            TransportError::Connection(_) => None,
        }
    }
}

/// Executes `HttpRequest`s on behalf of `KycApiClient`.
///
/// Implementations must report 4xx responses as `TransportError::Client`
/// carrying the full response, so the client can decode validation errors.
pub trait Transport {
    fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).send(request)
    }
}

impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).send(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16) -> HttpResponse {
        HttpResponse {
            status,
            headers: Vec::new(),
            body: "{}".to_string(),
        }
    }

    #[test]
    fn check_passes_success_statuses() {
        assert_eq!(TransportError::check(response(200)).unwrap().status, 200);
        assert_eq!(TransportError::check(response(204)).unwrap().status, 204);
    }

    #[test]
    fn check_classifies_client_errors() {
        let err = TransportError::check(response(400)).unwrap_err();
        assert!(matches!(err, TransportError::Client { status: 400, .. }));
        assert_eq!(err.status(), Some(400));

        let err = TransportError::check(response(404)).unwrap_err();
        assert!(matches!(err, TransportError::Client { status: 404, .. }));
    }

    #[test]
    fn check_classifies_server_errors() {
        let err = TransportError::check(response(503)).unwrap_err();
        assert!(matches!(err, TransportError::Server { status: 503, .. }));

        let err = TransportError::check(response(302)).unwrap_err();
        assert!(matches!(err, TransportError::Server { status: 302, .. }));
    }

    #[test]
    fn connection_error_has_no_status() {
        let err = TransportError::Connection("refused".to_string());
        assert_eq!(err.status(), None);
        assert_eq!(err.to_string(), "connection failed: refused");
    }

    #[test]
    fn method_renders_uppercase() {
        assert_eq!(HttpMethod::Post.as_str(), "POST");
    }
}

//! Raw HTTP contract for the endpoints the plugin calls outside the storage SDK.

use std::{
    cell::RefCell,
    collections::{BTreeMap, HashMap},
    future::Future,
    pin::Pin,
    rc::Rc,
};

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;

/// Object-safe boxed future used by [`HttpTransport`].
pub type HttpFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
/// HTTP methods used by the plugin.
pub enum HttpMethod {
    /// `GET`
    Get,
    /// `POST`
    Post,
    /// `DELETE`
    Delete,
}

impl HttpMethod {
    /// Returns the method token.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Delete => "DELETE",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Fully composed request handed to the transport.
pub struct HttpRequest {
    /// Request method.
    pub method: HttpMethod,
    /// Absolute URL including the query string.
    pub url: String,
    /// Request headers.
    pub headers: BTreeMap<String, String>,
    /// Optional text body.
    pub body: Option<String>,
}

impl HttpRequest {
    fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: BTreeMap::new(),
            body: None,
        }
    }

    /// Creates a `GET` request.
    pub fn get(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, url)
    }

    /// Creates a `DELETE` request.
    pub fn delete(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, url)
    }

    /// Creates a `POST` request with a text body.
    pub fn post(url: impl Into<String>, body: impl Into<String>) -> Self {
        let mut request = Self::new(HttpMethod::Post, url);
        request.body = Some(body.into());
        request
    }

    /// Merges `headers` into the request.
    pub fn with_headers(mut self, headers: &BTreeMap<String, String>) -> Self {
        self.headers
            .extend(headers.iter().map(|(k, v)| (k.clone(), v.clone())));
        self
    }

    /// Sets a single header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Response shape shared by downloads and raw requests.
pub struct RawResponse {
    /// `true` for 2xx statuses.
    pub ok: bool,
    /// HTTP status code.
    pub status: u16,
    /// HTTP reason phrase.
    #[serde(default)]
    pub status_text: String,
    /// Body decoded as text.
    #[serde(default)]
    pub body: String,
}

impl RawResponse {
    /// Creates a response; `ok` is derived from the status.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            ok: (200..300).contains(&status),
            status,
            status_text: reason_phrase(status).to_string(),
            body: body.into(),
        }
    }

    /// Creates a `200 OK` response.
    pub fn ok(body: impl Into<String>) -> Self {
        Self::new(200, body)
    }

    /// Parses the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns the parser error when the body is not valid JSON for `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_str(&self.body)
    }
}

fn reason_phrase(status: u16) -> &'static str {
    match status {
        200 => "OK",
        201 => "Created",
        204 => "No Content",
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        409 => "Conflict",
        500 => "Internal Server Error",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        _ => "",
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Failure reported by the host SDK or the network layer.
pub enum HostError {
    /// The host rejected the call with an HTTP response.
    #[error("{} {}", .0.status, .0.status_text)]
    Response(RawResponse),
    /// The call failed without a response (network error, SDK exception).
    #[error("{0}")]
    Failure(String),
}

impl HostError {
    /// Creates a response failure with the given status and body.
    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Self::Response(RawResponse::new(status, body))
    }

    /// Creates a failure without a response.
    pub fn failure(message: impl Into<String>) -> Self {
        Self::Failure(message.into())
    }

    /// Returns the response when the host rejected with one.
    pub fn response(&self) -> Option<&RawResponse> {
        match self {
            Self::Response(response) => Some(response),
            Self::Failure(_) => None,
        }
    }
}

/// Transport for raw requests composed by the plugin itself.
pub trait HttpTransport {
    /// Sends `request` and resolves with the response, whatever its status.
    ///
    /// Only transport-level failures (no response at all) resolve to `Err`.
    fn send<'a>(&'a self, request: HttpRequest) -> HttpFuture<'a, Result<RawResponse, HostError>>;
}

#[derive(Debug, Clone, Copy, Default)]
/// Transport for targets without network access.
pub struct NoopHttpTransport;

impl HttpTransport for NoopHttpTransport {
    fn send<'a>(&'a self, request: HttpRequest) -> HttpFuture<'a, Result<RawResponse, HostError>> {
        Box::pin(async move {
            Err(HostError::failure(format!(
                "http transport unavailable: {} {}",
                request.method.as_str(),
                request.url
            )))
        })
    }
}

#[derive(Debug, Default)]
struct MemoryHttpInner {
    routes: HashMap<(HttpMethod, String), Result<RawResponse, HostError>>,
    requests: Vec<HttpRequest>,
}

/// Scripted transport answering by exact method and URL; unknown routes answer `404`.
#[derive(Debug, Clone, Default)]
pub struct MemoryHttpTransport {
    inner: Rc<RefCell<MemoryHttpInner>>,
}

impl MemoryHttpTransport {
    /// Answers `method url` with `response`.
    pub fn route(&self, method: HttpMethod, url: impl Into<String>, response: RawResponse) {
        self.inner
            .borrow_mut()
            .routes
            .insert((method, url.into()), Ok(response));
    }

    /// Fails `method url` at the transport level.
    pub fn fail(&self, method: HttpMethod, url: impl Into<String>, error: HostError) {
        self.inner
            .borrow_mut()
            .routes
            .insert((method, url.into()), Err(error));
    }

    /// Returns every request sent so far, in order.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.inner.borrow().requests.clone()
    }
}

impl HttpTransport for MemoryHttpTransport {
    fn send<'a>(&'a self, request: HttpRequest) -> HttpFuture<'a, Result<RawResponse, HostError>> {
        Box::pin(async move {
            let mut inner = self.inner.borrow_mut();
            let answer = inner
                .routes
                .get(&(request.method, request.url.clone()))
                .cloned()
                .unwrap_or_else(|| Ok(RawResponse::new(404, "Not Found")));
            inner.requests.push(request);
            answer
        })
    }
}

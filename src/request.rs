//! Incoming HTTP request type.

use std::net::SocketAddr;

use bytes::Bytes;
use http::{HeaderMap, Method, Uri};
use serde_json::Value;

use crate::context::RequestContext;

/// An incoming HTTP request with its body fully read.
pub struct Request {
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
    params: Vec<(String, String)>,
    remote_addr: SocketAddr,
}

impl Request {
    pub(crate) fn from_parts(parts: http::request::Parts, body: Bytes, remote_addr: SocketAddr) -> Self {
        Self {
            method: parts.method,
            uri: parts.uri,
            headers: parts.headers,
            body,
            params: Vec::new(),
            remote_addr,
        }
    }

    pub(crate) fn with_params(mut self, params: Vec<(String, String)>) -> Self {
        self.params = params;
        self
    }

    pub fn method(&self) -> &Method { &self.method }
    pub fn uri(&self) -> &Uri { &self.uri }
    pub fn path(&self) -> &str { self.uri.path() }
    pub fn headers(&self) -> &HeaderMap { &self.headers }
    pub fn body(&self) -> &[u8] { &self.body }
    pub fn remote_addr(&self) -> SocketAddr { self.remote_addr }

    /// Header value as text. Names are case-insensitive; non-ASCII values are
    /// treated as absent.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Returns a named path parameter.
    ///
    /// For a route `/users/{id}`, `req.param("id")` on `/users/42` returns `Some("42")`.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    /// Absolute request URL without the query string, as the client addressed it.
    ///
    /// The scheme comes from `x-forwarded-proto` (set by the proxy in front of
    /// us) and defaults to `http`.
    pub fn url(&self) -> String {
        let scheme = self.header("x-forwarded-proto").unwrap_or("http");
        let host = self
            .header("host")
            .or_else(|| self.uri.authority().map(|a| a.as_str()))
            .unwrap_or("localhost");
        format!("{scheme}://{host}{}", self.path())
    }

    /// The fields of this request the logging interceptor records.
    pub fn context(&self) -> RequestContext {
        RequestContext {
            url: self.url(),
            method: self.method.to_string(),
            remote_addr: self.remote_addr.ip().to_string(),
        }
    }

    /// Argument list for a handler declared with `arity` parameters.
    ///
    /// Slots are filled with path parameters in route order, then the body,
    /// then `null`. Surplus path parameters are dropped.
    pub(crate) fn arguments(&self, arity: usize) -> Vec<Value> {
        let mut args: Vec<Value> = self
            .params
            .iter()
            .take(arity)
            .map(|(_, v)| path_value(v))
            .collect();

        if args.len() < arity && !self.body.is_empty() {
            args.push(body_value(&self.body));
        }
        args.resize(arity, Value::Null);
        args
    }
}

/// `42` and `true` become JSON scalars, anything else stays a string.
fn path_value(raw: &str) -> Value {
    match serde_json::from_str::<Value>(raw) {
        Ok(v @ (Value::Number(_) | Value::Bool(_))) => v,
        _ => Value::String(raw.to_owned()),
    }
}

fn body_value(body: &[u8]) -> Value {
    serde_json::from_slice(body)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(body).into_owned()))
}

#[cfg(test)]
pub(crate) fn test_request(method: Method, uri: &str, body: &'static [u8]) -> Request {
    let (parts, ()) = http::Request::builder()
        .method(method)
        .uri(uri)
        .header("host", "localhost:3000")
        .body(())
        .unwrap()
        .into_parts();
    let peer: SocketAddr = "127.0.0.1:51234".parse().unwrap();
    Request::from_parts(parts, Bytes::from_static(body), peer)
}

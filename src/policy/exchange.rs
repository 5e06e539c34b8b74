//! Inbound and outbound request views the policy engine and proxy rewriter operate on.
//!
//! [`InboundRequest`] is what the gateway received: method, absolute URL as seen by the gateway,
//! and headers. [`OutboundRequest`] is the request under construction for the upstream target;
//! forwarding rules write onto it and [`crate::proxy::rewrite`] finally points it at the target.

// std
use std::borrow::Cow;
// crates.io
use http::header::{self, IntoHeaderName};
// self
use crate::{_prelude::*, resource::UrlError};

// Connection-scoped headers a proxy must not forward.
const HOP_BY_HOP: [&str; 9] = [
	"connection",
	"keep-alive",
	"proxy-authenticate",
	"proxy-authorization",
	"proxy-connection",
	"te",
	"trailer",
	"transfer-encoding",
	"upgrade",
];

/// Read-only view of a request received by the gateway.
#[derive(Clone, Debug)]
pub struct InboundRequest {
	/// Request method.
	pub method: Method,
	/// Absolute URL the request was addressed to.
	pub url: Url,
	/// Request headers.
	pub headers: HeaderMap,
}
impl InboundRequest {
	/// Creates a request without headers.
	pub fn new(method: Method, url: Url) -> Self {
		Self { method, url, headers: HeaderMap::new() }
	}

	/// Builds a view from an [`http::Request`], resolving its URI against `base`.
	pub fn from_http<B>(request: &http::Request<B>, base: &Url) -> Result<Self, UrlError> {
		let target = request.uri().path_and_query().map(|pq| pq.as_str()).unwrap_or("/");
		let url = base
			.join(target)
			.map_err(|source| UrlError::Unparseable { url: target.to_owned(), source })?;

		Ok(Self { method: request.method().clone(), url, headers: request.headers().clone() })
	}

	/// Adds or replaces a header.
	pub fn with_header<K>(mut self, name: K, value: HeaderValue) -> Self
	where
		K: IntoHeaderName,
	{
		self.headers.insert(name, value);

		self
	}

	/// First value of `name` as text; non-UTF-8 values read as absent.
	pub fn header(&self, name: &str) -> Option<&str> {
		self.headers.get(name).and_then(|value| value.to_str().ok())
	}

	/// Raw query string, if any.
	pub fn query(&self) -> Option<&str> {
		self.url.query()
	}

	/// First decoded value of query parameter `name`.
	pub fn query_param(&self, name: &str) -> Option<Cow<'_, str>> {
		self.url.query_pairs().find(|(key, _)| key == name).map(|(_, value)| value)
	}
}

/// Request under construction for the upstream target.
#[derive(Clone, Debug)]
pub struct OutboundRequest {
	/// Request method.
	pub method: Method,
	/// Destination; points at the gateway until [`crate::proxy::rewrite`] runs.
	pub url: Url,
	/// Headers sent upstream.
	pub headers: HeaderMap,
	/// Request body.
	pub body: Vec<u8>,
}
impl OutboundRequest {
	/// Copies the whole inbound request, minus connection-scoped headers.
	pub fn passthrough(inbound: &InboundRequest, body: Vec<u8>) -> Self {
		let mut headers = inbound.headers.clone();

		for name in HOP_BY_HOP {
			headers.remove(name);
		}

		Self { method: inbound.method.clone(), url: inbound.url.clone(), headers, body }
	}

	/// Explicit `Host` override, if one is set.
	pub fn host_override(&self) -> Option<&HeaderValue> {
		self.headers.get(header::HOST)
	}
}

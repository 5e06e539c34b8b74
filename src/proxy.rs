//! Outbound request rewriting and the transport seam used to dispatch it.
//!
//! [`rewrite`] points an [`OutboundRequest`] at the resolved target: scheme, host, port, and path
//! come from the target, query strings are merged target-first, and any explicit `Host` header
//! is cleared so the transport addresses the target host. Userinfo in the target is dropped. [`ProxyTransport`] is the gateway's
//! only dependency on an HTTP stack; the reqwest-backed [`ReqwestProxyClient`] is the default.
//!
//! Dispatch futures are lazy: a future that is dropped before it is polled never sends the
//! request, and dropping it mid-flight aborts the upstream call.

// crates.io
use http::header::HOST;
#[cfg(feature = "reqwest")] use reqwest::redirect::Policy as RedirectPolicy;
// self
use crate::{_prelude::*, error::TransportError, policy::OutboundRequest};

/// Boxed future returned by [`ProxyTransport::dispatch`].
pub type TransportFuture<'a, T> =
	Pin<Box<dyn Future<Output = Result<T, TransportError>> + 'a + Send>>;

/// HTTP transport capable of sending a rewritten request and handing back the upstream response
/// for streaming.
///
/// Implementations must not retry: a failed call is reported once.
pub trait ProxyTransport
where
	Self: 'static + Send + Sync,
{
	/// Upstream response handed back to the caller unmodified.
	type Response: Send;

	/// Sends `request` upstream.
	fn dispatch(&self, request: OutboundRequest) -> TransportFuture<'_, Self::Response>;
}

/// Joins two raw query strings with `&`, target first; an empty side yields the other as is.
pub fn merge_query(target: Option<&str>, inbound: Option<&str>) -> Option<String> {
	let target = target.filter(|query| !query.is_empty());
	let inbound = inbound.filter(|query| !query.is_empty());

	match (target, inbound) {
		(Some(target), Some(inbound)) => Some(format!("{target}&{inbound}")),
		(Some(query), None) | (None, Some(query)) => Some(query.to_owned()),
		(None, None) => None,
	}
}

/// Readdresses `outbound` to `target`, keeping the outbound query after the target's.
pub fn rewrite(outbound: &mut OutboundRequest, target: &Url) {
	let merged = merge_query(target.query(), outbound.url.query());
	let mut url = target.clone();

	url.set_query(merged.as_deref());
	url.set_fragment(None);
	// Userinfo never reaches the transport. The setters only fail for host-less URLs.
	let _ = url.set_username("");
	let _ = url.set_password(None);

	outbound.url = url;
	outbound.headers.remove(HOST);
}

/// Thin wrapper around [`ReqwestClient`] used as the default proxy transport.
///
/// Redirects are handed back to the caller instead of being followed, as a reverse proxy would.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug)]
pub struct ReqwestProxyClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestProxyClient {
	/// Builds a client that does not follow redirects.
	pub fn new() -> Result<Self, crate::error::ConfigError> {
		let client = ReqwestClient::builder().redirect(RedirectPolicy::none()).build()?;

		Ok(Self(client))
	}

	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestProxyClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl ProxyTransport for ReqwestProxyClient {
	type Response = reqwest::Response;

	fn dispatch(&self, request: OutboundRequest) -> TransportFuture<'_, Self::Response> {
		let client = self.0.clone();

		Box::pin(async move {
			let OutboundRequest { method, url, headers, body } = request;
			let mut builder = client.request(method, url).headers(headers);

			if !body.is_empty() {
				builder = builder.body(body);
			}

			Ok::<_, TransportError>(builder.send().await?)
		})
	}
}

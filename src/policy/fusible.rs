//! Fusible policy: consumption-time checks plus header/query forwarding.

// std
use std::collections::HashSet;
// crates.io
use http::HeaderName;
// self
use crate::{
	_prelude::*,
	policy::{
		InboundRequest, OutboundRequest, PolicyCategory, PolicyViolation, RequestPolicy,
		allow_listed, ensure,
	},
	proxy,
};

/// Checks enforced when a token is spent, and the forwarding rules applied when they pass.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FusiblePolicy {
	/// Request checks re-evaluated against the consuming request.
	#[serde(rename = "request_rule_set", default, skip_serializing_if = "Option::is_none")]
	pub request: Option<RequestPolicy>,
	/// Accepted methods (exact match); empty allows any method.
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub allowed_methods: Vec<String>,
	/// Inbound headers copied onto the outbound request.
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub forward_headers: Vec<String>,
	/// Merges the inbound query string into the outbound one.
	#[serde(default, skip_serializing_if = "std::ops::Not::not")]
	pub forward_query_params: bool,
}
impl FusiblePolicy {
	/// Runs the checks without touching any outbound request.
	pub fn evaluate(&self, request: &InboundRequest) -> Result<(), PolicyViolation> {
		if let Some(policy) = &self.request {
			policy.evaluate(request)?;
		}

		ensure(
			allow_listed(&self.allowed_methods, Some(request.method.as_str())),
			PolicyCategory::AllowedMethods,
		)
	}

	/// Runs the checks and, only once they pass, applies forwarding onto `outbound`.
	///
	/// Forwarding is idempotent: it tops up `outbound` with what it lacks and never duplicates
	/// what a passthrough copy already carries.
	pub fn apply(
		&self,
		inbound: &InboundRequest,
		outbound: &mut OutboundRequest,
	) -> Result<(), PolicyViolation> {
		self.evaluate(inbound)?;
		self.forward_headers(inbound, outbound);

		if self.forward_query_params {
			Self::forward_query(inbound, outbound);
		}

		Ok(())
	}

	// Appends inbound `name=value` pairs missing from the outbound query, outbound pairs first.
	fn forward_query(inbound: &InboundRequest, outbound: &mut OutboundRequest) {
		let Some(query) = inbound.query() else {
			return;
		};
		let missing = {
			let present =
				outbound.url.query().unwrap_or_default().split('&').collect::<HashSet<_>>();

			query
				.split('&')
				.filter(|pair| !pair.is_empty() && !present.contains(pair))
				.collect::<Vec<_>>()
				.join("&")
		};
		let merged = proxy::merge_query(outbound.url.query(), Some(missing.as_str()));

		outbound.url.set_query(merged.as_deref());
	}

	// Re-sets rather than appends so running twice never duplicates values.
	fn forward_headers(&self, inbound: &InboundRequest, outbound: &mut OutboundRequest) {
		for name in &self.forward_headers {
			let Ok(name) = HeaderName::from_bytes(name.as_bytes()) else {
				continue;
			};

			outbound.headers.remove(&name);

			for value in inbound.headers.get_all(&name) {
				outbound.headers.append(name.clone(), value.clone());
			}
		}
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::policy::BasicAuthCredentials;

	fn inbound(method: Method) -> InboundRequest {
		let url = Url::parse("http://gw.local/fuse/abc?b=2").expect("URL fixture should parse.");

		InboundRequest::new(method, url)
			.with_header("x-trace", HeaderValue::from_static("t-1"))
			.with_header("x-secret", HeaderValue::from_static("s"))
	}

	#[test]
	fn method_allow_list_fails_closed() {
		let policy = FusiblePolicy { allowed_methods: vec!["POST".into()], ..Default::default() };

		policy.evaluate(&inbound(Method::POST)).expect("Listed method should pass.");

		let err = policy.evaluate(&inbound(Method::GET)).expect_err("Unlisted method must fail.");

		assert_eq!(err.category, PolicyCategory::AllowedMethods);
	}

	#[test]
	fn embedded_request_policy_is_enforced() {
		let policy = FusiblePolicy {
			request: Some(RequestPolicy {
				basic_auth: Some(BasicAuthCredentials::new("admin", "password")),
				..Default::default()
			}),
			..Default::default()
		};
		let err = policy.evaluate(&inbound(Method::GET)).expect_err("Missing credentials fail.");

		assert_eq!(err.category, PolicyCategory::BasicAuth);
	}

	fn bare_outbound() -> OutboundRequest {
		OutboundRequest {
			method: Method::GET,
			url: Url::parse("https://up.example/anything").expect("URL fixture should parse."),
			headers: HeaderMap::new(),
			body: Vec::new(),
		}
	}

	#[test]
	fn forwarding_tops_up_a_bare_outbound_request() {
		let policy = FusiblePolicy {
			forward_headers: vec!["x-trace".into(), "not a header".into()],
			forward_query_params: true,
			..Default::default()
		};
		let request = inbound(Method::GET);
		let mut outbound = bare_outbound();

		policy.apply(&request, &mut outbound).expect("Policy without checks should pass.");

		assert_eq!(outbound.headers.get("x-trace"), Some(&HeaderValue::from_static("t-1")));
		assert!(outbound.headers.get("x-secret").is_none());
		assert_eq!(outbound.url.query(), Some("b=2"));
	}

	#[test]
	fn forwarding_onto_a_passthrough_copy_does_not_duplicate() {
		let policy = FusiblePolicy {
			forward_headers: vec!["x-trace".into()],
			forward_query_params: true,
			..Default::default()
		};
		let request = inbound(Method::GET);
		let mut outbound = OutboundRequest::passthrough(&request, Vec::new());

		policy.apply(&request, &mut outbound).expect("Policy without checks should pass.");
		policy.apply(&request, &mut outbound).expect("Reapplying should pass.");

		assert_eq!(outbound.headers.get_all("x-trace").iter().count(), 1);
		assert_eq!(outbound.headers.get("x-secret"), Some(&HeaderValue::from_static("s")));
		assert_eq!(outbound.url.query(), Some("b=2"));
	}

	#[test]
	fn failed_checks_leave_outbound_untouched() {
		let policy = FusiblePolicy {
			allowed_methods: vec!["POST".into()],
			forward_headers: vec!["x-trace".into()],
			forward_query_params: true,
			..Default::default()
		};
		let request = inbound(Method::GET);
		let mut outbound = bare_outbound();

		policy.apply(&request, &mut outbound).expect_err("GET is not allowed.");

		assert!(outbound.headers.is_empty());
		assert_eq!(outbound.url.query(), None);
	}
}

//! Remote resource identity: typed identifiers, URL handles, and the values the registry hands out.

pub mod id;
pub mod locator;

pub use id::*;
pub use locator::*;

// self
use crate::{
	_prelude::*,
	policy::{FusiblePolicy, RemoteResourcePolicy},
};

/// Registry entry announcing a proxyable URL, keyed by the content hash of its raw string.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteResource {
	/// Content hash of the raw URL string.
	pub id: ResourceId,
	/// Opaque handle for the raw URL string.
	pub url: SafeUrl,
	/// Policy enforced when tokens are issued from and consumed for this entry.
	#[serde(rename = "rule_set", default, skip_serializing_if = "Option::is_none")]
	pub policy: Option<RemoteResourcePolicy>,
}
impl RemoteResource {
	/// Builds an entry for `raw`, which must be an absolute URL.
	pub fn new(raw: &str, policy: Option<RemoteResourcePolicy>) -> Result<Self, UrlError> {
		require_absolute(raw)?;

		Ok(Self { id: identity(raw), url: SafeUrl::normalize(raw)?, policy })
	}
}

/// Resolved `{url, id, policy}` value returned by registry and token operations.
///
/// Proxy resources are never stored by reference: a token keeps its own copy, so later registry
/// overrides do not reach tokens that were already minted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyResource {
	/// Content hash of the raw URL string.
	pub id: ResourceId,
	/// Opaque handle for the raw URL string.
	pub url: SafeUrl,
	/// Policy carried along with the resource, if any.
	#[serde(rename = "rule_set", default, skip_serializing_if = "Option::is_none")]
	pub policy: Option<RemoteResourcePolicy>,
}
impl ProxyResource {
	/// Builds a registry-less proxy resource for an ad hoc absolute URL.
	pub fn ad_hoc(raw: &str, policy: Option<RemoteResourcePolicy>) -> Result<Self, UrlError> {
		RemoteResource::new(raw, policy).map(Self::from)
	}

	/// Copies out the consumption-stage half of the policy.
	pub fn fusible_policy(&self) -> Option<FusiblePolicy> {
		self.policy.as_ref().and_then(|policy| policy.fusible.clone())
	}

	/// Drops the attached policy, keeping only the target.
	pub fn without_policy(mut self) -> Self {
		self.policy = None;

		self
	}
}
impl From<RemoteResource> for ProxyResource {
	fn from(value: RemoteResource) -> Self {
		Self { id: value.id, url: value.url, policy: value.policy }
	}
}

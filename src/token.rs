//! Single-use fusible tokens bound to a proxy target and a consumption-time policy.

// crates.io
use rand::{Rng, distr::Alphanumeric};
// self
use crate::{
	_prelude::*,
	policy::FusiblePolicy,
	resource::{FuseId, ProxyResource, ResourceId},
};

// 32 alphanumeric characters carry ~190 bits of entropy.
const FUSE_ID_LEN: usize = 32;

/// How a token came to exist.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenOrigin {
	/// Minted from a registry entry after issuance checks passed.
	Registered,
	/// Minted straight from an ad hoc URL, bypassing the registry.
	Disposable,
}
impl TokenOrigin {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			TokenOrigin::Registered => "registered",
			TokenOrigin::Disposable => "disposable",
		}
	}
}

/// One-time credential resolving to a proxy target.
///
/// The target and policy are value copies taken at mint time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FusibleToken {
	/// Unguessable token identifier.
	pub id: FuseId,
	/// Resolved target, without its policy.
	pub target: ProxyResource,
	/// Consumption-time policy, if any.
	#[serde(rename = "rule_set", default, skip_serializing_if = "Option::is_none")]
	pub policy: Option<FusiblePolicy>,
	/// Registry path or disposable path.
	pub origin: TokenOrigin,
	/// Instant the token was minted.
	#[serde(with = "time::serde::rfc3339")]
	pub minted_at: OffsetDateTime,
}
impl FusibleToken {
	/// Binds a fresh identifier to `target` and the fusible half of its policy.
	pub fn mint(target: ProxyResource, origin: TokenOrigin) -> Self {
		let policy = target.fusible_policy();

		Self {
			id: generate_fuse_id(),
			target: target.without_policy(),
			policy,
			origin,
			minted_at: OffsetDateTime::now_utc(),
		}
	}

	/// Identifier of the resource the token resolves to.
	pub fn resource_id(&self) -> &ResourceId {
		&self.target.id
	}
}

/// Generates a random alphanumeric token identifier.
pub fn generate_fuse_id() -> FuseId {
	FuseId(rand::rng().sample_iter(Alphanumeric).take(FUSE_ID_LEN).map(char::from).collect())
}

#[cfg(test)]
mod tests {
	// std
	use std::collections::HashSet;
	// self
	use super::*;
	use crate::policy::RemoteResourcePolicy;

	#[test]
	fn mint_copies_only_the_fusible_half() {
		let policy = RemoteResourcePolicy {
			request: Some(Default::default()),
			fusible: Some(FusiblePolicy {
				allowed_methods: vec!["POST".into()],
				..Default::default()
			}),
		};
		let target = ProxyResource::ad_hoc("https://example.com/a", Some(policy))
			.expect("Target fixture should build.");
		let token = FusibleToken::mint(target.clone(), TokenOrigin::Disposable);

		assert!(token.target.policy.is_none());
		assert_eq!(token.policy, target.fusible_policy());
		assert_eq!(token.resource_id(), &target.id);
		assert_eq!(token.id.len(), FUSE_ID_LEN);
	}

	#[test]
	fn generated_ids_are_distinct_and_valid() {
		let ids: HashSet<FuseId> = (0..256).map(|_| generate_fuse_id()).collect();

		assert_eq!(ids.len(), 256);
		assert!(ids.iter().all(|id| FuseId::new(id.as_ref()).is_ok()));
	}
}

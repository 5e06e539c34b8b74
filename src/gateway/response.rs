//! JSON envelopes returned to gateway callers.

// self
use crate::{_prelude::*, config::GatewayConfig, resource::ProxyResource, token::FusibleToken};

/// Identifier plus the route that acts on it next.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceInfo {
	/// Resource or token identifier.
	pub id: String,
	/// Link to the next gateway route for `id`.
	pub url: String,
}

/// Reply to a registration: where to ask for tokens.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteResourceResponse {
	/// Human-readable summary.
	pub message: String,
	/// Registry identifier and its issuance link.
	pub proxy_ressource_infos: ResourceInfo,
}
impl RemoteResourceResponse {
	/// Builds the envelope for `resource`, linking to the issuance route.
	pub fn new(config: &GatewayConfig, resource: &ProxyResource) -> Self {
		Self {
			message: "Proxy ressource created".into(),
			proxy_ressource_infos: ResourceInfo {
				id: resource.id.to_string(),
				url: config.link(&config.routes.proxy, &resource.id),
			},
		}
	}
}

/// Reply to a token issuance: where to spend the token.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FuseResourceResponse {
	/// Human-readable summary.
	pub message: String,
	/// Token identifier and its consumption link.
	pub fuse_ressource_infos: ResourceInfo,
}
impl FuseResourceResponse {
	/// Builds the envelope for `token`, linking to the consumption route.
	pub fn new(config: &GatewayConfig, token: &FusibleToken) -> Self {
		Self {
			message: "Fusible ressource created".into(),
			fuse_ressource_infos: ResourceInfo {
				id: token.id.to_string(),
				url: config.link(&config.routes.fuse, &token.id),
			},
		}
	}
}

/// Rejection body derived from an [`Error`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
	/// Status reason phrase.
	pub message: String,
	/// Error rendered for the caller.
	pub error: String,
	/// HTTP status code.
	pub status: u16,
}
impl From<&Error> for ErrorResponse {
	fn from(error: &Error) -> Self {
		let status = error.status();

		Self {
			message: status.canonical_reason().unwrap_or("Error").into(),
			error: error.to_string(),
			status: status.as_u16(),
		}
	}
}

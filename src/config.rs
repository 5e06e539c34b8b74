//! Gateway configuration: route prefixes, link base, and URLs registered at bootstrap.

// self
use crate::{_prelude::*, error::ConfigError};

/// Path prefixes of the four gateway routes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutePrefixes {
	/// Register or fetch a remote resource.
	pub remote: String,
	/// Issue a token for a registered resource.
	pub proxy: String,
	/// Issue a disposable token for an ad hoc URL.
	pub disposable: String,
	/// Consume a token and proxy the request.
	pub fuse: String,
}
impl RoutePrefixes {
	fn validate(&self) -> Result<(), ConfigError> {
		let routes = [
			("remote", &self.remote),
			("proxy", &self.proxy),
			("disposable", &self.disposable),
			("fuse", &self.fuse),
		];

		for (route, prefix) in routes {
			if !prefix.starts_with('/') || prefix.len() < 2 || prefix.ends_with('/') {
				return Err(ConfigError::InvalidRoutePrefix { route, prefix: prefix.clone() });
			}
		}
		for (idx, (_, prefix)) in routes.iter().enumerate() {
			if routes[idx + 1..].iter().any(|(_, other)| other == prefix) {
				return Err(ConfigError::DuplicateRoutePrefix { prefix: (*prefix).clone() });
			}
		}

		Ok(())
	}
}
impl Default for RoutePrefixes {
	fn default() -> Self {
		Self {
			remote: "/remote".into(),
			proxy: "/proxy".into(),
			disposable: "/disposable".into(),
			fuse: "/fuse".into(),
		}
	}
}

/// Validated gateway configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
	/// Route prefixes used when building response links.
	pub routes: RoutePrefixes,
	/// Makes response links absolute when set.
	pub public_base_url: Option<Url>,
	/// URLs registered without policy when the gateway bootstraps.
	pub seed_urls: Vec<String>,
}
impl GatewayConfig {
	/// Creates a builder seeded with the default routes.
	pub fn builder() -> GatewayConfigBuilder {
		GatewayConfigBuilder::default()
	}

	/// Decodes a JSON configuration document and validates it.
	pub fn from_json(bytes: &[u8]) -> Result<Self> {
		let mut de = serde_json::Deserializer::from_slice(bytes);
		let config: Self = serde_path_to_error::deserialize(&mut de).map_err(|e| {
			ConfigError::Malformed { path: e.path().to_string(), message: e.inner().to_string() }
		})?;

		config.validate()?;

		Ok(config)
	}

	/// Checks route prefixes and the public base URL.
	pub fn validate(&self) -> Result<(), ConfigError> {
		self.routes.validate()?;

		if let Some(base) = self.public_base_url.as_ref().filter(|base| base.cannot_be_a_base()) {
			return Err(ConfigError::InvalidPublicBaseUrl { url: base.to_string() });
		}

		Ok(())
	}

	/// Link to `{prefix}/{id}`, absolute when a public base URL is configured.
	pub fn link(&self, prefix: &str, id: &str) -> String {
		match &self.public_base_url {
			Some(base) => format!("{}{prefix}/{id}", base.as_str().trim_end_matches('/')),
			None => format!("{prefix}/{id}"),
		}
	}
}

/// Builder for [`GatewayConfig`] values.
#[derive(Debug, Default)]
pub struct GatewayConfigBuilder {
	config: GatewayConfig,
}
impl GatewayConfigBuilder {
	/// Sets the remote-registration route prefix.
	pub fn remote_prefix(mut self, prefix: impl Into<String>) -> Self {
		self.config.routes.remote = prefix.into();

		self
	}

	/// Sets the token-issuance route prefix.
	pub fn proxy_prefix(mut self, prefix: impl Into<String>) -> Self {
		self.config.routes.proxy = prefix.into();

		self
	}

	/// Sets the disposable-token route prefix.
	pub fn disposable_prefix(mut self, prefix: impl Into<String>) -> Self {
		self.config.routes.disposable = prefix.into();

		self
	}

	/// Sets the token-consumption route prefix.
	pub fn fuse_prefix(mut self, prefix: impl Into<String>) -> Self {
		self.config.routes.fuse = prefix.into();

		self
	}

	/// Makes response links absolute.
	pub fn public_base_url(mut self, url: Url) -> Self {
		self.config.public_base_url = Some(url);

		self
	}

	/// Adds a URL registered at bootstrap.
	pub fn seed_url(mut self, url: impl Into<String>) -> Self {
		self.config.seed_urls.push(url.into());

		self
	}

	/// Validates and returns the configuration.
	pub fn build(self) -> Result<GatewayConfig, ConfigError> {
		self.config.validate()?;

		Ok(self.config)
	}
}

//! Gateway-level error types shared across the registry, policy engine, token store, and proxy.

// self
use crate::{_prelude::*, policy::PolicyViolation, resource::UrlError};

/// Gateway-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical gateway error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Storage-layer failure.
	#[error("{0}")]
	Storage(
		#[from]
		#[source]
		crate::store::StoreError,
	),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// The proxied call failed or the target could not be reached.
	#[error(transparent)]
	Upstream(#[from] TransportError),

	/// Malformed or non-absolute URL.
	#[error(transparent)]
	InvalidUrl(#[from] UrlError),
	/// Policy body could not be decoded.
	#[error("Policy is malformed at `{path}`: {message}.")]
	InvalidPolicy {
		/// JSON path of the offending field.
		path: String,
		/// Decoder message.
		message: String,
	},
	/// No registry entry exists for the identifier.
	#[error("Remote resource `{id}` was not found.")]
	ResourceNotFound {
		/// Identifier that was looked up.
		id: String,
	},
	/// Token is unknown or has already been consumed.
	#[error("Fusible token was not found or has already melted.")]
	TokenNotFound,
	/// One configured policy check rejected the request.
	#[error(transparent)]
	PolicyValidationFailed(#[from] PolicyViolation),
}
impl Error {
	/// Returns `true` when the failure was caused by the caller rather than the gateway or the
	/// upstream target.
	pub fn is_client_error(&self) -> bool {
		matches!(
			self,
			Self::InvalidUrl(_)
				| Self::InvalidPolicy { .. }
				| Self::ResourceNotFound { .. }
				| Self::TokenNotFound
				| Self::PolicyValidationFailed(_)
		)
	}

	/// HTTP status a front end should answer with for this error.
	pub fn status(&self) -> StatusCode {
		match self {
			Self::InvalidUrl(_) | Self::InvalidPolicy { .. } => StatusCode::BAD_REQUEST,
			Self::ResourceNotFound { .. } | Self::TokenNotFound => StatusCode::NOT_FOUND,
			Self::PolicyValidationFailed(_) => StatusCode::FORBIDDEN,
			Self::Upstream(_) => StatusCode::BAD_GATEWAY,
			Self::Storage(_) | Self::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}
}
impl<E> From<serde_path_to_error::Error<E>> for Error
where
	E: Display,
{
	fn from(e: serde_path_to_error::Error<E>) -> Self {
		Self::InvalidPolicy { path: e.path().to_string(), message: e.inner().to_string() }
	}
}

/// Configuration and validation failures raised by the gateway.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Route prefix is empty, lacks a leading slash, or ends with a slash.
	#[error("The {route} route prefix `{prefix}` must start with `/` and must not end with `/`.")]
	InvalidRoutePrefix {
		/// Which route failed validation.
		route: &'static str,
		/// Prefix that was supplied.
		prefix: String,
	},
	/// Two routes share the same prefix.
	#[error("Route prefix `{prefix}` is used by more than one route.")]
	DuplicateRoutePrefix {
		/// Prefix that was supplied twice.
		prefix: String,
	},
	/// Configuration document could not be decoded.
	#[error("Configuration is malformed at `{path}`: {message}.")]
	Malformed {
		/// JSON path of the offending field.
		path: String,
		/// Decoder message.
		message: String,
	},
	/// Public base URL cannot carry links.
	#[error("Public base URL `{url}` cannot be a base.")]
	InvalidPublicBaseUrl {
		/// URL that failed validation.
		url: String,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Transport-level failures (network, IO) raised while dispatching a proxied request.
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the upstream target.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the upstream target.")]
	Io(#[from] std::io::Error),
	/// Stored target no longer parses as an absolute URL.
	#[error("Upstream target `{url}` cannot be parsed.")]
	InvalidTarget {
		/// Target string that failed to parse.
		url: String,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::policy::PolicyCategory;

	#[test]
	fn client_errors_are_told_apart_from_upstream_failures() {
		let denied: Error = PolicyViolation::new(PolicyCategory::AllowedMethods).into();
		let upstream: Error =
			TransportError::InvalidTarget { url: "http//broken".into() }.into();

		assert!(denied.is_client_error());
		assert_eq!(denied.status(), StatusCode::FORBIDDEN);
		assert!(!upstream.is_client_error());
		assert_eq!(upstream.status(), StatusCode::BAD_GATEWAY);
		assert_eq!(Error::TokenNotFound.status(), StatusCode::NOT_FOUND);
		assert_eq!(
			Error::ResourceNotFound { id: "missing".into() }.status(),
			StatusCode::NOT_FOUND
		);
	}

	#[test]
	fn policy_violation_names_the_failing_category() {
		let err: Error = PolicyViolation::new(PolicyCategory::BasicAuth).into();

		assert!(err.to_string().contains("basic_auth"));
	}

	#[test]
	fn path_errors_surface_as_invalid_policy() {
		let mut de = serde_json::Deserializer::from_str("{\"allowed_methods\": 7}");
		let err = serde_path_to_error::deserialize::<_, crate::policy::FusiblePolicy>(&mut de)
			.expect_err("A numeric method list should be rejected.");
		let err = Error::from(err);

		assert!(matches!(&err, Error::InvalidPolicy { path, .. } if path == "allowed_methods"));
		assert_eq!(err.status(), StatusCode::BAD_REQUEST);
	}
}

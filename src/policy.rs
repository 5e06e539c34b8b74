//! Rule evaluation engine for the two token lifecycle stages.
//!
//! [`RequestPolicy`] checks run when a URL is turned into a token (issuance) and, embedded in a
//! [`FusiblePolicy`], again when the token is spent (consumption). Every configured category must
//! pass; categories left empty are vacuously satisfied. Evaluation reads the inbound request only
//! and never applies forwarding to the outbound request before every governing check passed.

pub mod exchange;
pub mod fusible;
pub mod remote;
pub mod request;
pub mod secret;

pub use exchange::*;
pub use fusible::*;
pub use remote::*;
pub use request::*;
pub use secret::*;

// self
use crate::_prelude::*;

/// Point in the token lifecycle at which a policy is evaluated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
	/// A URL or registry entry is being turned into a token.
	Issuance,
	/// A token is being spent.
	Consumption,
}
impl Stage {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Stage::Issuance => "issuance",
			Stage::Consumption => "consumption",
		}
	}
}
impl Display for Stage {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Named policy check.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyCategory {
	/// `Authorization: Basic` credentials.
	BasicAuth,
	/// Header presence.
	RequiredHeaders,
	/// Header presence plus exact value.
	ValidatedHeaders,
	/// Query parameter presence.
	RequiredQueryParams,
	/// Query parameter presence plus exact value.
	ValidatedQueryParams,
	/// `Origin` allow-list.
	AllowedOrigins,
	/// Method allow-list.
	AllowedMethods,
}
impl PolicyCategory {
	/// Returns a stable label suitable for logs and error payloads.
	pub const fn as_str(self) -> &'static str {
		match self {
			PolicyCategory::BasicAuth => "basic_auth",
			PolicyCategory::RequiredHeaders => "required_headers",
			PolicyCategory::ValidatedHeaders => "validated_headers",
			PolicyCategory::RequiredQueryParams => "required_query_params",
			PolicyCategory::ValidatedQueryParams => "validated_query_params",
			PolicyCategory::AllowedOrigins => "allowed_origins",
			PolicyCategory::AllowedMethods => "allowed_methods",
		}
	}
}
impl Display for PolicyCategory {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// A request failed one configured policy check.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
#[error("Request failed the {category} policy check.")]
pub struct PolicyViolation {
	/// Category of the failing check.
	pub category: PolicyCategory,
}
impl PolicyViolation {
	/// Creates a violation for the provided category.
	pub const fn new(category: PolicyCategory) -> Self {
		Self { category }
	}
}

/// Short-circuits with a violation of `category` unless `passed` holds.
pub(crate) fn ensure(passed: bool, category: PolicyCategory) -> Result<(), PolicyViolation> {
	if passed { Ok(()) } else { Err(PolicyViolation::new(category)) }
}

/// Exact-match allow-list check; an empty list allows everything.
pub(crate) fn allow_listed(allowed: &[String], candidate: Option<&str>) -> bool {
	allowed.is_empty() || candidate.is_some_and(|value| allowed.iter().any(|entry| entry == value))
}

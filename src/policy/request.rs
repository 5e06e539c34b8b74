//! Request policy: credentials, header, query, and origin checks.

// crates.io
use base64::{Engine as _, engine::general_purpose::STANDARD};
use http::header::{AUTHORIZATION, ORIGIN};
use serde::Deserializer;
// self
use crate::{
	_prelude::*,
	policy::{InboundRequest, PolicyCategory, PolicyViolation, Secret, allow_listed, ensure},
};

/// Username/password pair expected in an `Authorization: Basic` header.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasicAuthCredentials {
	/// Expected username.
	pub username: String,
	/// Expected password.
	pub password: Secret,
}
impl BasicAuthCredentials {
	/// Creates a credential pair.
	pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
		Self { username: username.into(), password: Secret::new(password) }
	}

	/// Header value a client has to present, `Basic <base64(username:password)>`.
	pub fn header_value(&self) -> String {
		format!("Basic {}", self.encoded())
	}

	/// Returns `true` when `request` carries exactly these credentials.
	pub fn matches(&self, request: &InboundRequest) -> bool {
		let Some(authorization) = request.header(AUTHORIZATION.as_str()) else {
			return false;
		};
		let mut parts = authorization.split(' ');

		match (parts.next(), parts.next(), parts.next()) {
			(Some("Basic"), Some(presented), None) => presented == self.encoded(),
			_ => false,
		}
	}

	fn encoded(&self) -> String {
		STANDARD.encode(format!("{}:{}", self.username, self.password.expose()))
	}
}

/// Query parameter that must be present with an exact value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryParam {
	/// Parameter name.
	pub name: String,
	/// Expected value.
	pub value: String,
}
impl QueryParam {
	/// Creates a name/value pair.
	pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
		Self { name: name.into(), value: value.into() }
	}
}

/// Checks enforced when turning a URL into a token, and again at consumption when embedded in a
/// fusible policy.
///
/// Each category is optional. An empty list or map is treated as not configured.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestPolicy {
	/// Headers that must be present with a non-empty value.
	///
	/// Accepts a list of names or a `{name: [values]}` map whose keys are used.
	#[serde(
		default,
		skip_serializing_if = "Vec::is_empty",
		deserialize_with = "deserialize_header_names"
	)]
	pub required_headers: Vec<String>,
	/// Headers that must be present and equal to the configured value.
	///
	/// Accepts `{name: value}` or `{name: [value, ...]}`; the first value governs.
	#[serde(
		rename = "validate_headers_values",
		default,
		skip_serializing_if = "BTreeMap::is_empty",
		deserialize_with = "deserialize_header_values"
	)]
	pub validated_headers: BTreeMap<String, String>,
	/// Query parameters that must be present with a non-empty value.
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub required_query_params: Vec<String>,
	/// Query parameters that must be present and equal to the configured value.
	#[serde(rename = "validate_query_params", default, skip_serializing_if = "Vec::is_empty")]
	pub validated_query_params: Vec<QueryParam>,
	/// Accepted `Origin` values; empty allows any origin.
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub allowed_origins: Vec<String>,
	/// Credentials expected in an `Authorization: Basic` header.
	#[serde(rename = "basic_auth_credentials", default, skip_serializing_if = "Option::is_none")]
	pub basic_auth: Option<BasicAuthCredentials>,
}
impl RequestPolicy {
	/// Evaluates every configured category, reporting the first that fails.
	pub fn evaluate(&self, request: &InboundRequest) -> Result<(), PolicyViolation> {
		ensure(
			self.basic_auth.as_ref().is_none_or(|credentials| credentials.matches(request)),
			PolicyCategory::BasicAuth,
		)?;
		ensure(
			self.required_headers.iter().all(|name| non_empty(request.header(name))),
			PolicyCategory::RequiredHeaders,
		)?;
		ensure(
			self.validated_headers.iter().all(|(name, expected)| {
				request
					.header(name)
					.is_some_and(|value| !value.is_empty() && value == expected.as_str())
			}),
			PolicyCategory::ValidatedHeaders,
		)?;
		ensure(
			self.required_query_params
				.iter()
				.all(|name| non_empty(request.query_param(name).as_deref())),
			PolicyCategory::RequiredQueryParams,
		)?;
		ensure(
			self.validated_query_params.iter().all(|param| {
				request
					.query_param(&param.name)
					.is_some_and(|value| !value.is_empty() && value == param.value)
			}),
			PolicyCategory::ValidatedQueryParams,
		)?;
		ensure(
			allow_listed(&self.allowed_origins, request.header(ORIGIN.as_str())),
			PolicyCategory::AllowedOrigins,
		)
	}

	/// Boolean form of [`evaluate`](Self::evaluate).
	pub fn is_satisfied_by(&self, request: &InboundRequest) -> bool {
		self.evaluate(request).is_ok()
	}
}

#[derive(Deserialize)]
#[serde(untagged)]
enum HeaderValuesRepr {
	One(String),
	Many(Vec<String>),
}
impl HeaderValuesRepr {
	fn into_first(self) -> String {
		match self {
			Self::One(value) => value,
			Self::Many(values) => values.into_iter().next().unwrap_or_default(),
		}
	}
}

#[derive(Deserialize)]
#[serde(untagged)]
enum HeaderNamesRepr {
	List(Vec<String>),
	Map(BTreeMap<String, HeaderValuesRepr>),
}

fn non_empty(value: Option<&str>) -> bool {
	value.is_some_and(|value| !value.is_empty())
}

fn deserialize_header_names<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
	D: Deserializer<'de>,
{
	Ok(match Option::<HeaderNamesRepr>::deserialize(deserializer)? {
		Some(HeaderNamesRepr::List(names)) => names,
		Some(HeaderNamesRepr::Map(map)) => map.into_keys().collect(),
		None => Vec::new(),
	})
}

fn deserialize_header_values<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
	D: Deserializer<'de>,
{
	Ok(Option::<BTreeMap<String, HeaderValuesRepr>>::deserialize(deserializer)?
		.unwrap_or_default()
		.into_iter()
		.map(|(name, values)| (name, values.into_first()))
		.collect())
}

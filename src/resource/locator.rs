//! URL identity: opaque reversible handles, absolute-URL validation, and content hashing.

// crates.io
use base64::{Engine as _, engine::general_purpose::STANDARD};
use sha2::{Digest, Sha256};
use url::ParseError;
// self
use crate::{_prelude::*, resource::ResourceId};

// Anchor used only to check that relative references are well formed.
const RELATIVE_JOIN_BASE: &str = "http://relative.invalid/";

/// Errors emitted while validating or decoding URLs.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum UrlError {
	/// The string is not a syntactically valid URL reference.
	#[error("URL `{url}` cannot be parsed: {source}.")]
	Unparseable {
		/// Offending input.
		url: String,
		/// Parser failure.
		#[source]
		source: ParseError,
	},
	/// The URL parsed but lacks a scheme or host.
	#[error("URL `{url}` must carry both a scheme and a host.")]
	NotAbsolute {
		/// Offending input.
		url: String,
	},
	/// An encoded handle is not valid base64 text.
	#[error("Encoded URL handle is not valid base64 UTF-8.")]
	Encoding,
}

/// Opaque, reversible URL handle that is safe to embed in identifiers and JSON.
///
/// The handle keeps the original string next to its base64 form. Construction only checks that
/// the input parses as a URL reference; use [`require_absolute`] before creating registry or
/// token entries.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SafeUrl {
	raw: String,
	encoded: String,
}
impl SafeUrl {
	/// Wraps `raw` after checking that it parses as a URL reference.
	pub fn normalize(raw: impl Into<String>) -> Result<Self, UrlError> {
		let raw = raw.into();

		parse_reference(&raw).map_err(|source| UrlError::Unparseable { url: raw.clone(), source })?;

		let encoded = STANDARD.encode(raw.as_bytes());

		Ok(Self { raw, encoded })
	}

	/// Rebuilds a handle from its encoded form.
	pub fn from_encoded(encoded: &str) -> Result<Self, UrlError> {
		let bytes = STANDARD.decode(encoded).map_err(|_| UrlError::Encoding)?;
		let raw = String::from_utf8(bytes).map_err(|_| UrlError::Encoding)?;

		Self::normalize(raw)
	}

	/// Returns the original URL string.
	pub fn decode(&self) -> &str {
		&self.raw
	}

	/// Returns the base64 form.
	pub fn encoded(&self) -> &str {
		&self.encoded
	}

	/// Parses the wrapped string as an absolute URL.
	pub fn to_absolute(&self) -> Result<Url, UrlError> {
		require_absolute(&self.raw)
	}
}
impl Debug for SafeUrl {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("SafeUrl").field(&self.raw).finish()
	}
}
impl Display for SafeUrl {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.raw)
	}
}
impl From<SafeUrl> for String {
	fn from(value: SafeUrl) -> Self {
		value.encoded
	}
}
impl TryFrom<String> for SafeUrl {
	type Error = UrlError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		Self::from_encoded(&value)
	}
}

/// Parses `raw` and fails unless it carries both a scheme and a non-empty host.
pub fn require_absolute(raw: &str) -> Result<Url, UrlError> {
	let url =
		Url::parse(raw).map_err(|source| UrlError::Unparseable { url: raw.to_owned(), source })?;

	if url.scheme().is_empty() || url.host_str().is_none_or(str::is_empty) {
		return Err(UrlError::NotAbsolute { url: raw.to_owned() });
	}

	Ok(url)
}

/// Hex-encoded SHA-256 digest of the exact input string.
///
/// No URL normalization happens first, so `https://a.test/?x=1` and `https://a.test?x=1` hash
/// to different identities.
pub fn identity(raw: &str) -> ResourceId {
	let digest = Sha256::digest(raw.as_bytes());

	ResourceId(format!("{digest:x}"))
}

fn parse_reference(raw: &str) -> Result<(), ParseError> {
	match Url::parse(raw) {
		Ok(_) => Ok(()),
		Err(ParseError::RelativeUrlWithoutBase) =>
			Url::parse(RELATIVE_JOIN_BASE)?.join(raw).map(|_| ()),
		Err(e) => Err(e),
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn normalize_round_trips_the_original_string() {
		for raw in ["https://example.com/a?x=1", "/relative/path?q=2", "mailto:ops@example.com"] {
			let handle = SafeUrl::normalize(raw).expect("Fixture should parse as a URL reference.");

			assert_eq!(handle.decode(), raw);
			assert_eq!(
				SafeUrl::from_encoded(handle.encoded())
					.expect("Encoded form should decode back into a handle.")
					.decode(),
				raw
			);
		}
	}

	#[test]
	fn normalize_rejects_unparseable_input() {
		assert!(matches!(
			SafeUrl::normalize("http://[::1"),
			Err(UrlError::Unparseable { .. })
		));
	}

	#[test]
	fn require_absolute_demands_scheme_and_host() {
		require_absolute("https://example.com/a?x=1").expect("Absolute URL should pass.");

		assert!(matches!(require_absolute("/only/path"), Err(UrlError::Unparseable { .. })));
		assert!(matches!(
			require_absolute("mailto:ops@example.com"),
			Err(UrlError::NotAbsolute { .. })
		));
	}

	#[test]
	fn identity_is_string_exact() {
		let a = identity("https://example.com/a?x=1");
		let b = identity("https://example.com/a?x=1");
		let c = identity("https://example.com/a/?x=1");

		assert_eq!(a, b);
		assert_ne!(a, c);
		assert_eq!(a.len(), 64);
		assert!(a.chars().all(|ch| ch.is_ascii_hexdigit()));
	}

	#[test]
	fn serde_uses_the_encoded_form() {
		let handle =
			SafeUrl::normalize("https://example.com/?a=1").expect("Fixture should be valid.");
		let payload = serde_json::to_string(&handle).expect("Handle should serialize.");

		assert_eq!(payload, format!("\"{}\"", handle.encoded()));

		let back: SafeUrl = serde_json::from_str(&payload).expect("Handle should deserialize.");

		assert_eq!(back, handle);
		assert!(serde_json::from_str::<SafeUrl>("\"%%%\"").is_err());
	}
}

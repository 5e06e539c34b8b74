//! Strongly typed identifiers for registry entries and fusible tokens.

// std
use std::{borrow::Borrow, ops::Deref};
// self
use crate::_prelude::*;

macro_rules! def_id {
	($name:ident, $doc:literal, $kind:literal) => {
		#[doc = $doc]
		#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
		#[serde(try_from = "String", into = "String")]
		pub struct $name(pub(crate) String);
		impl $name {
			/// Creates a new identifier after validation.
			pub fn new(value: impl AsRef<str>) -> Result<Self, IdentifierError> {
				let view = value.as_ref();

				validate_view($kind, view)?;

				Ok(Self(view.to_owned()))
			}
		}
		impl Deref for $name {
			type Target = str;

			fn deref(&self) -> &Self::Target {
				&self.0
			}
		}
		impl AsRef<str> for $name {
			fn as_ref(&self) -> &str {
				&self.0
			}
		}
		impl From<$name> for String {
			fn from(value: $name) -> Self {
				value.0
			}
		}
		impl TryFrom<String> for $name {
			type Error = IdentifierError;

			fn try_from(value: String) -> Result<Self, Self::Error> {
				validate_view($kind, &value)?;

				Ok(Self(value))
			}
		}
		impl Borrow<str> for $name {
			fn borrow(&self) -> &str {
				&self.0
			}
		}
		impl Display for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				f.write_str(&self.0)
			}
		}
		impl FromStr for $name {
			type Err = IdentifierError;

			fn from_str(s: &str) -> Result<Self, Self::Err> {
				Self::new(s)
			}
		}
	};
}

const IDENTIFIER_MAX_LEN: usize = 128;
const FUSE_ID_VISIBLE_PREFIX: usize = 4;

/// Error returned when identifier validation fails.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum IdentifierError {
	/// The identifier was empty.
	#[error("{kind} identifier cannot be empty.")]
	Empty {
		/// Kind of identifier (resource, fuse).
		kind: &'static str,
	},
	/// The identifier contains characters outside `[A-Za-z0-9_-]`.
	#[error("{kind} identifier contains unsupported characters.")]
	UnsupportedCharacters {
		/// Kind of identifier (resource, fuse).
		kind: &'static str,
	},
	/// The identifier exceeded the allowed character count.
	#[error("{kind} identifier exceeds {max} characters.")]
	TooLong {
		/// Kind of identifier (resource, fuse).
		kind: &'static str,
		/// Maximum permitted character count.
		max: usize,
	},
}

def_id! { ResourceId, "Content hash identifying a registered remote resource.", "Resource" }
def_id! { FuseId, "Unguessable identifier of a single-use fusible token.", "Fuse" }

impl Debug for ResourceId {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "Resource({})", self.0)
	}
}
// Fuse identifiers are bearer credentials, keep them out of debug output.
impl Debug for FuseId {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		let visible = self.0.get(..FUSE_ID_VISIBLE_PREFIX).unwrap_or_default();

		write!(f, "Fuse({visible}…)")
	}
}

fn validate_view(kind: &'static str, view: &str) -> Result<(), IdentifierError> {
	if view.is_empty() {
		return Err(IdentifierError::Empty { kind });
	}
	if !view.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
		return Err(IdentifierError::UnsupportedCharacters { kind });
	}
	if view.len() > IDENTIFIER_MAX_LEN {
		return Err(IdentifierError::TooLong { kind, max: IDENTIFIER_MAX_LEN });
	}

	Ok(())
}

//! Storage contracts and in-memory backends for the resource registry and the fusible token
//! store.
//!
//! Backends expose only atomic operations: get-or-insert for registry entries and
//! test-and-remove for tokens. Callers never see the underlying maps, so a lookup can never be
//! split from the removal that spends a token.

pub mod memory;

pub use memory::{MemoryFuseStore, MemoryRegistry};

// self
use crate::{_prelude::*, resource::RemoteResource, token::FusibleToken};

/// Boxed future returned by store operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + 'a + Send>>;

/// Storage backend for announced remote resources.
pub trait RegistryStore
where
	Self: Send + Sync,
{
	/// Fetches the entry stored under `id`, if present.
	fn fetch<'a>(&'a self, id: &'a str) -> StoreFuture<'a, Option<RemoteResource>>;

	/// Atomically inserts `candidate` unless an entry with the same id exists; with `replace`
	/// the existing entry is overwritten in place.
	///
	/// Returns the entry that is stored once the call completes.
	fn upsert(
		&self,
		candidate: RemoteResource,
		replace: bool,
	) -> StoreFuture<'_, (RemoteResource, UpsertOutcome)>;
}

/// Storage backend for issued fusible tokens.
pub trait FuseStore
where
	Self: Send + Sync,
{
	/// Stores a freshly minted token.
	fn save(&self, token: FusibleToken) -> StoreFuture<'_, ()>;

	/// Removes and returns the token stored under `id` in one indivisible step.
	///
	/// Of any number of concurrent calls for the same id, at most one observes `Some`.
	fn take<'a>(&'a self, id: &'a str) -> StoreFuture<'a, Option<FusibleToken>>;
}

/// Result of a registry get-or-insert.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum UpsertOutcome {
	/// An entry already existed and was returned unchanged.
	Existing,
	/// No entry existed; the candidate was inserted.
	Inserted,
	/// An entry existed and was replaced by the candidate.
	Replaced,
}

/// Error type produced by store implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}

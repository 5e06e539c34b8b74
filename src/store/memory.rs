//! Thread-safe in-memory registry and token store; state lives for the process lifetime.

// std
use std::collections::hash_map::Entry;
// self
use crate::{
	_prelude::*,
	resource::{FuseId, RemoteResource, ResourceId},
	store::{FuseStore, RegistryStore, StoreFuture, UpsertOutcome},
	token::FusibleToken,
};

type RegistryMap = Arc<RwLock<HashMap<ResourceId, RemoteResource>>>;
type FuseMap = Arc<Mutex<HashMap<FuseId, FusibleToken>>>;

/// In-process registry; lookups share a read lock, mutations take the write lock.
#[derive(Clone, Debug, Default)]
pub struct MemoryRegistry(RegistryMap);
impl MemoryRegistry {
	/// Number of registered entries.
	pub fn len(&self) -> usize {
		self.0.read().len()
	}

	/// Returns `true` when nothing has been registered.
	pub fn is_empty(&self) -> bool {
		self.0.read().is_empty()
	}

	fn fetch_now(map: RegistryMap, id: &str) -> Option<RemoteResource> {
		map.read().get(id).cloned()
	}

	fn upsert_now(
		map: RegistryMap,
		candidate: RemoteResource,
		replace: bool,
	) -> (RemoteResource, UpsertOutcome) {
		let mut guard = map.write();

		match guard.entry(candidate.id.clone()) {
			Entry::Occupied(mut slot) if replace => {
				slot.insert(candidate.clone());

				(candidate, UpsertOutcome::Replaced)
			},
			Entry::Occupied(slot) => (slot.get().clone(), UpsertOutcome::Existing),
			Entry::Vacant(slot) => {
				slot.insert(candidate.clone());

				(candidate, UpsertOutcome::Inserted)
			},
		}
	}
}
impl RegistryStore for MemoryRegistry {
	fn fetch<'a>(&'a self, id: &'a str) -> StoreFuture<'a, Option<RemoteResource>> {
		let map = self.0.clone();

		Box::pin(async move { Ok(Self::fetch_now(map, id)) })
	}

	fn upsert(
		&self,
		candidate: RemoteResource,
		replace: bool,
	) -> StoreFuture<'_, (RemoteResource, UpsertOutcome)> {
		let map = self.0.clone();

		Box::pin(async move { Ok(Self::upsert_now(map, candidate, replace)) })
	}
}

/// In-process token store; every operation takes one exclusive lock.
#[derive(Clone, Debug, Default)]
pub struct MemoryFuseStore(FuseMap);
impl MemoryFuseStore {
	/// Number of unspent tokens.
	pub fn len(&self) -> usize {
		self.0.lock().len()
	}

	/// Returns `true` when no unspent token remains.
	pub fn is_empty(&self) -> bool {
		self.0.lock().is_empty()
	}

	fn save_now(map: FuseMap, token: FusibleToken) {
		map.lock().insert(token.id.clone(), token);
	}

	// Lookup and removal share one critical section.
	fn take_now(map: FuseMap, id: &str) -> Option<FusibleToken> {
		map.lock().remove(id)
	}
}
impl FuseStore for MemoryFuseStore {
	fn save(&self, token: FusibleToken) -> StoreFuture<'_, ()> {
		let map = self.0.clone();

		Box::pin(async move {
			Self::save_now(map, token);

			Ok(())
		})
	}

	fn take<'a>(&'a self, id: &'a str) -> StoreFuture<'a, Option<FusibleToken>> {
		let map = self.0.clone();

		Box::pin(async move { Ok(Self::take_now(map, id)) })
	}
}

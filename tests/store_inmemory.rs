// std
use std::sync::Arc;
// self
use fusoxy::{
	resource::{self, ProxyResource, RemoteResource},
	store::{FuseStore, MemoryFuseStore, MemoryRegistry, RegistryStore, UpsertOutcome},
	token::{FusibleToken, TokenOrigin},
};

const TARGET: &str = "https://example.com/a?x=1";

fn build_token() -> FusibleToken {
	let target =
		ProxyResource::ad_hoc(TARGET, None).expect("Token target fixture should be absolute.");

	FusibleToken::mint(target, TokenOrigin::Disposable)
}

#[tokio::test]
async fn registry_keeps_existing_entry_unless_replaced() {
	let registry = MemoryRegistry::default();
	let first = RemoteResource::new(TARGET, None).expect("Registry fixture should build.");
	let (stored, outcome) = registry
		.upsert(first.clone(), false)
		.await
		.expect("Inserting into the memory registry should succeed.");

	assert_eq!(outcome, UpsertOutcome::Inserted);
	assert_eq!(stored, first);

	let mut second = first.clone();

	second.policy = Some(Default::default());

	let (kept, outcome) = registry
		.upsert(second.clone(), false)
		.await
		.expect("Repeated insert should succeed.");

	assert_eq!(outcome, UpsertOutcome::Existing);
	assert_eq!(kept, first);

	let (replaced, outcome) =
		registry.upsert(second.clone(), true).await.expect("Replacing an entry should succeed.");

	assert_eq!(outcome, UpsertOutcome::Replaced);
	assert_eq!(replaced, second);
	assert_eq!(registry.len(), 1);

	let fetched = registry
		.fetch(&first.id)
		.await
		.expect("Fetching from the memory registry should succeed.")
		.expect("Replaced entry should remain present.");

	assert_eq!(fetched, second);
}

#[tokio::test]
async fn registry_identity_is_string_exact() {
	let registry = MemoryRegistry::default();
	let with_slash =
		RemoteResource::new("https://a.test/?x=1", None).expect("Slashed fixture should build.");
	let without_slash =
		RemoteResource::new("https://a.test?x=1", None).expect("Bare fixture should build.");

	assert_eq!(with_slash.id, resource::identity("https://a.test/?x=1"));
	assert_ne!(with_slash.id, without_slash.id);

	registry.upsert(with_slash, false).await.expect("First insert should succeed.");
	registry.upsert(without_slash, false).await.expect("Second insert should succeed.");

	assert_eq!(registry.len(), 2);
}

#[tokio::test]
async fn token_take_is_exactly_once() {
	let store = MemoryFuseStore::default();
	let token = build_token();

	store.save(token.clone()).await.expect("Saving a token should succeed.");

	let taken = store
		.take(&token.id)
		.await
		.expect("Taking a token should succeed.")
		.expect("Saved token should be present.");

	assert_eq!(taken, token);
	assert!(store.take(&token.id).await.expect("Repeated take should succeed.").is_none());
	assert!(store.is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_takes_yield_a_single_winner() {
	const CONTENDERS: usize = 32;

	let store = Arc::new(MemoryFuseStore::default());
	let token = build_token();
	let id = token.id.to_string();

	store.save(token).await.expect("Saving a token should succeed.");

	let handles = (0..CONTENDERS)
		.map(|_| {
			let store = store.clone();
			let id = id.clone();

			tokio::spawn(async move { store.take(&id).await })
		})
		.collect::<Vec<_>>();
	let mut winners = 0;

	for handle in handles {
		let taken = handle
			.await
			.expect("Contending task should not panic.")
			.expect("Concurrent take should not fail.");

		if taken.is_some() {
			winners += 1;
		}
	}

	assert_eq!(winners, 1);
	assert!(store.is_empty());
}

//! Remote resource registration: the deduplicating get-or-register entry point.

// self
use crate::{
	_prelude::*,
	gateway::{self, Gateway},
	obs::{self, OperationKind, OperationOutcome, OperationSpan},
	policy::RemoteResourcePolicy,
	proxy::ProxyTransport,
	resource::{ProxyResource, RemoteResource},
	store::{RegistryStore, UpsertOutcome},
};

impl<C> Gateway<C>
where
	C: ?Sized + ProxyTransport,
{
	/// Returns the entry announced for `raw`, registering it first when it is unseen.
	///
	/// `raw` may also be the identifier of an existing entry. Unless `replace` is set, an
	/// existing entry wins and the supplied `policy` is discarded; with `replace` the entry is
	/// overwritten in place under the same identifier. Tokens minted earlier keep their own
	/// copies and are not affected.
	pub async fn register(
		&self,
		raw: &str,
		policy: Option<RemoteResourcePolicy>,
		replace: bool,
	) -> Result<ProxyResource> {
		const KIND: OperationKind = OperationKind::Register;

		let span = OperationSpan::new(KIND, "register");

		obs::record_operation_outcome(KIND, OperationOutcome::Attempt);

		let result = span
			.instrument(async move {
				let known = if replace {
					None
				} else {
					<dyn RegistryStore>::fetch(self.registry.as_ref(), raw)
						.await
						.map_err(Error::from)?
				};

				if let Some(existing) = known {
					return Ok(ProxyResource::from(existing));
				}

				let candidate = RemoteResource::new(raw, policy)?;
				let (stored, outcome) =
					<dyn RegistryStore>::upsert(self.registry.as_ref(), candidate, replace)
						.await
						.map_err(Error::from)?;

				obs::record_step(
					KIND,
					match outcome {
						UpsertOutcome::Existing => "existing",
						UpsertOutcome::Inserted => "inserted",
						UpsertOutcome::Replaced => "replaced",
					},
					&stored.id,
				);

				Ok(ProxyResource::from(stored))
			})
			.await;

		gateway::settle(KIND, result)
	}
}

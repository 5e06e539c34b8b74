//! Token issuance: from a registry entry (issuance-stage checks) or from an ad hoc URL.

// self
use crate::{
	_prelude::*,
	gateway::{self, Gateway},
	obs::{self, OperationKind, OperationOutcome, OperationSpan},
	policy::{self, InboundRequest, RemoteResourcePolicy, Stage},
	proxy::ProxyTransport,
	resource::ProxyResource,
	store::{FuseStore, RegistryStore},
	token::{FusibleToken, TokenOrigin},
};

impl<C> Gateway<C>
where
	C: ?Sized + ProxyTransport,
{
	/// Mints a token bound to `target` and the fusible half of its policy, then stores it.
	pub async fn mint(&self, target: ProxyResource, origin: TokenOrigin) -> Result<FusibleToken> {
		let token = FusibleToken::mint(target, origin);

		<dyn FuseStore>::save(self.fuses.as_ref(), token.clone()).await?;

		obs::record_step(
			match origin {
				TokenOrigin::Registered => OperationKind::Issue,
				TokenOrigin::Disposable => OperationKind::Disposable,
			},
			"minted",
			token.resource_id(),
		);

		Ok(token)
	}

	/// Issues a token for registry entry `resource_id` once `request` passes the entry's
	/// issuance-stage policy.
	pub async fn issue(&self, resource_id: &str, request: &InboundRequest) -> Result<FusibleToken> {
		const KIND: OperationKind = OperationKind::Issue;

		let span = OperationSpan::new(KIND, "issue");

		obs::record_operation_outcome(KIND, OperationOutcome::Attempt);

		let result = span
			.instrument(async move {
				let resource = <dyn RegistryStore>::fetch(self.registry.as_ref(), resource_id)
					.await
					.map_err(Error::from)?
					.ok_or_else(|| Error::ResourceNotFound { id: resource_id.to_owned() })?;

				policy::evaluate_stage(resource.policy.as_ref(), request, Stage::Issuance)?;

				self.mint(resource.into(), TokenOrigin::Registered).await
			})
			.await;

		gateway::settle(KIND, result)
	}

	/// Issues a single-shot token straight from `raw`, bypassing the registry.
	///
	/// No issuance-stage check runs on this path; only the fusible half of `policy` matters, at
	/// consumption.
	pub async fn issue_disposable(
		&self,
		raw: &str,
		policy: Option<RemoteResourcePolicy>,
	) -> Result<FusibleToken> {
		const KIND: OperationKind = OperationKind::Disposable;

		let span = OperationSpan::new(KIND, "issue_disposable");

		obs::record_operation_outcome(KIND, OperationOutcome::Attempt);

		let result = span
			.instrument(async move {
				let target = ProxyResource::ad_hoc(raw, policy)?;

				self.mint(target, TokenOrigin::Disposable).await
			})
			.await;

		gateway::settle(KIND, result)
	}
}

//! Token consumption: exactly-once removal, consumption-stage checks, rewrite, and dispatch.

// self
use crate::{
	_prelude::*,
	error::TransportError,
	gateway::{self, Gateway},
	obs::{self, OperationKind, OperationOutcome, OperationSpan},
	policy::{InboundRequest, OutboundRequest},
	proxy::{self, ProxyTransport},
	store::FuseStore,
	token::FusibleToken,
};

impl<C> Gateway<C>
where
	C: ?Sized + ProxyTransport,
{
	/// Removes token `id` and returns what it resolved to.
	///
	/// Exactly one caller can succeed per token; every other call, concurrent or later, fails
	/// with [`Error::TokenNotFound`].
	pub async fn consume(&self, id: &str) -> Result<FusibleToken> {
		<dyn FuseStore>::take(self.fuses.as_ref(), id).await?.ok_or(Error::TokenNotFound)
	}

	/// Spends token `id` and proxies `inbound` to its target.
	///
	/// The token is burnt before the consumption-stage policy runs, so a rejected request still
	/// spends it. The inbound request is forwarded transparently, minus hop-by-hop headers;
	/// forwarding rules top it up only after every check passed. The upstream response is
	/// returned unmodified for the caller to stream.
	///
	/// Nothing is sent upstream until the returned future is polled past the checks; dropping it
	/// earlier leaves the upstream untouched, and dropping it mid-dispatch aborts the call.
	pub async fn fuse(
		&self,
		id: &str,
		inbound: InboundRequest,
		body: Vec<u8>,
	) -> Result<C::Response> {
		const KIND: OperationKind = OperationKind::Fuse;

		let span = OperationSpan::new(KIND, "fuse");

		obs::record_operation_outcome(KIND, OperationOutcome::Attempt);

		let result = span
			.instrument(async move {
				let token = self.consume(id).await?;
				let mut outbound = OutboundRequest::passthrough(&inbound, body);

				if let Some(policy) = &token.policy {
					policy.apply(&inbound, &mut outbound)?;
				}

				let target = token.target.url.to_absolute().map_err(|_| {
					TransportError::InvalidTarget { url: token.target.url.decode().to_owned() }
				})?;

				proxy::rewrite(&mut outbound, &target);
				obs::record_step(KIND, "dispatch", token.resource_id());

				Ok(self.transport.dispatch(outbound).await?)
			})
			.await;

		gateway::settle(KIND, result)
	}
}

//! Gateway orchestrator wiring the registry, policy engine, token store, and proxy transport.

pub mod response;
pub mod route;

mod fuse;
mod issue;
mod remote;

pub use response::*;
pub use route::*;

// self
use crate::{
	_prelude::*,
	config::GatewayConfig,
	obs::{self, OperationKind, OperationOutcome},
	proxy::ProxyTransport,
	store::{FuseStore, RegistryStore},
};
#[cfg(feature = "reqwest")]
use crate::{
	proxy::ReqwestProxyClient,
	store::{MemoryFuseStore, MemoryRegistry},
};

#[cfg(feature = "reqwest")]
/// Gateway specialized for the crate's default reqwest transport.
pub type ReqwestGateway = Gateway<ReqwestProxyClient>;

/// Issues and spends single-use proxy tokens.
///
/// The gateway owns explicitly constructed store instances instead of process-wide globals, so
/// every test or tenant can run against isolated state. Stores and transport sit behind `Arc`
/// and the gateway is cheap to clone into request handlers.
#[derive(Clone)]
pub struct Gateway<C>
where
	C: ?Sized + ProxyTransport,
{
	/// Transport used for every proxied request.
	pub transport: Arc<C>,
	/// Directory of announced remote resources.
	pub registry: Arc<dyn RegistryStore>,
	/// Unspent fusible tokens.
	pub fuses: Arc<dyn FuseStore>,
	/// Route and link configuration.
	pub config: GatewayConfig,
}
impl<C> Gateway<C>
where
	C: ?Sized + ProxyTransport,
{
	/// Creates a gateway over caller-provided stores and transport.
	pub fn with_transport(
		registry: Arc<dyn RegistryStore>,
		fuses: Arc<dyn FuseStore>,
		transport: impl Into<Arc<C>>,
		config: GatewayConfig,
	) -> Self {
		Self { transport: transport.into(), registry, fuses, config }
	}

	/// Registers every configured seed URL without policy.
	pub async fn bootstrap(self) -> Result<Self> {
		for raw in &self.config.seed_urls {
			self.register(raw, None, false).await?;
		}

		Ok(self)
	}
}
#[cfg(feature = "reqwest")]
impl Gateway<ReqwestProxyClient> {
	/// Creates a gateway with in-memory stores and a reqwest transport.
	pub fn new(config: GatewayConfig) -> Result<Self> {
		Ok(Self::with_transport(
			Arc::new(MemoryRegistry::default()),
			Arc::new(MemoryFuseStore::default()),
			ReqwestProxyClient::new()?,
			config,
		))
	}
}
impl<C> Debug for Gateway<C>
where
	C: ?Sized + ProxyTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Gateway").field("config", &self.config).finish()
	}
}

/// Records the final outcome of an operation and passes the result through.
pub(crate) fn settle<T>(kind: OperationKind, result: Result<T>) -> Result<T> {
	match &result {
		Ok(_) => obs::record_operation_outcome(kind, OperationOutcome::Success),
		Err(e) => {
			obs::record_operation_outcome(kind, OperationOutcome::Failure);
			obs::record_failure(kind, e);

			if let Error::PolicyValidationFailed(violation) = e {
				obs::record_policy_rejection(kind, violation.category);
			}
		},
	}

	result
}

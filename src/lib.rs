//! Single-use proxy tokens for remote URLs: a deduplicating resource registry, a two-stage
//! policy engine, and an exactly-once fusible token store behind one gateway type.
//!
//! A remote URL is registered once under a content-derived identifier
//! ([`gateway::Gateway::register`]). It is turned into an unguessable one-time token after its
//! issuance checks pass ([`gateway::Gateway::issue`]), or straight from the URL without the
//! registry ([`gateway::Gateway::issue_disposable`]). The token is spent by a single proxied
//! request ([`gateway::Gateway::fuse`]) that must pass the consumption checks before it is
//! rewritten and dispatched upstream.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod config;
pub mod error;
pub mod gateway;
pub mod obs;
pub mod policy;
pub mod proxy;
pub mod resource;
pub mod store;
pub mod token;
#[cfg(all(any(test, feature = "test"), feature = "reqwest"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for tests; enabled via `cfg(test)` or the `test` crate
	//! feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		config::GatewayConfig,
		gateway::Gateway,
		policy::InboundRequest,
		proxy::ReqwestProxyClient,
		store::{FuseStore, MemoryFuseStore, MemoryRegistry, RegistryStore},
	};

	/// Gateway type alias used by reqwest-backed tests.
	pub type ReqwestTestGateway = Gateway<ReqwestProxyClient>;

	/// Constructs a [`Gateway`] over fresh in-memory stores and the reqwest transport, returning
	/// the concrete stores for inspection.
	pub fn build_reqwest_test_gateway()
	-> (ReqwestTestGateway, Arc<MemoryRegistry>, Arc<MemoryFuseStore>) {
		let registry_backend = Arc::new(MemoryRegistry::default());
		let fuses_backend = Arc::new(MemoryFuseStore::default());
		let registry: Arc<dyn RegistryStore> = registry_backend.clone();
		let fuses: Arc<dyn FuseStore> = fuses_backend.clone();
		let transport =
			ReqwestProxyClient::new().expect("Failed to build Reqwest proxy client for tests.");
		let gateway = ReqwestTestGateway::with_transport(
			registry,
			fuses,
			transport,
			GatewayConfig::default(),
		);

		(gateway, registry_backend, fuses_backend)
	}

	/// Builds an inbound request addressed to the test gateway host.
	pub fn inbound_request(method: Method, path_and_query: &str) -> InboundRequest {
		let url = Url::parse("http://gateway.test/")
			.and_then(|base| base.join(path_and_query))
			.expect("Inbound request fixture should parse.");

		InboundRequest::new(method, url)
	}
}

mod _prelude {
	pub use std::{
		collections::{BTreeMap, HashMap},
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use http::{HeaderMap, HeaderValue, Method, StatusCode};
	pub use parking_lot::{Mutex, RwLock};
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::OffsetDateTime;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use http;
#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(all(test, feature = "reqwest"))] use {color_eyre as _, httpmock as _};

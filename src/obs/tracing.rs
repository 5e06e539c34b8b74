// self
use crate::{_prelude::*, obs::OperationKind};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedOperation<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedOperation<F> = F;

/// A span builder used by gateway operations.
#[derive(Clone, Debug)]
pub struct OperationSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl OperationSpan {
	/// Creates a new span tagged with the provided operation kind + stage.
	pub fn new(kind: OperationKind, stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!("fusoxy.operation", operation = kind.as_str(), stage);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (kind, stage);

			Self {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedOperation<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

/// Emits a debug event for a completed operation step (when tracing is enabled).
pub fn record_step(kind: OperationKind, step: &'static str, resource: &str) {
	#[cfg(feature = "tracing")]
	{
		tracing::debug!(operation = kind.as_str(), step, resource, "gateway step completed");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (kind, step, resource);
	}
}

/// Emits an event for a failed operation: `info` for caller faults, `warn` otherwise.
pub fn record_failure(kind: OperationKind, error: &Error) {
	#[cfg(feature = "tracing")]
	{
		if error.is_client_error() {
			tracing::info!(
				operation = kind.as_str(),
				status = error.status().as_u16(),
				%error,
				"gateway request rejected"
			);
		} else {
			tracing::warn!(
				operation = kind.as_str(),
				status = error.status().as_u16(),
				%error,
				"gateway request failed"
			);
		}
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (kind, error);
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn failure_events_noop_without_tracing() {
		record_failure(OperationKind::Issue, &Error::TokenNotFound);
		record_step(OperationKind::Register, "inserted", "abc");
	}

	#[tokio::test]
	async fn instrument_wraps_future() {
		let span = OperationSpan::new(OperationKind::Fuse, "instrument_wraps_future");
		let value = span.instrument(async { 42 }).await;

		assert_eq!(value, 42);
	}
}

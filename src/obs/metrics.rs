// self
use crate::{
	obs::{OperationKind, OperationOutcome},
	policy::PolicyCategory,
};

/// Records an operation outcome via the global metrics recorder (when enabled).
pub fn record_operation_outcome(kind: OperationKind, outcome: OperationOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"fusoxy_operation_total",
			"operation" => kind.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (kind, outcome);
	}
}

/// Counts a request rejected by a policy check, labeled by the failing category.
///
/// Issuance rejections carry `operation="issue"`; consumption rejections `operation="fuse"`.
pub fn record_policy_rejection(kind: OperationKind, category: PolicyCategory) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"fusoxy_policy_rejection_total",
			"operation" => kind.as_str(),
			"category" => category.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (kind, category);
	}
}

//! Remote resource policy: pairs the issuance-stage and consumption-stage halves.

// self
use crate::{
	_prelude::*,
	policy::{FusiblePolicy, InboundRequest, PolicyViolation, RequestPolicy, Stage},
};

/// Policy attached to a registry entry or a disposable token request.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteResourcePolicy {
	/// Enforced when a token is issued.
	#[serde(rename = "request_rule_set", default, skip_serializing_if = "Option::is_none")]
	pub request: Option<RequestPolicy>,
	/// Enforced when a token is consumed; inherited by tokens minted from the entry.
	#[serde(
		rename = "fusible_ressource_rule_set",
		default,
		skip_serializing_if = "Option::is_none"
	)]
	pub fusible: Option<FusiblePolicy>,
}
impl RemoteResourcePolicy {
	/// Decodes a JSON policy body, reporting the path of the first offending field.
	pub fn from_json(bytes: &[u8]) -> Result<Self> {
		let mut de = serde_json::Deserializer::from_slice(bytes);

		Ok(serde_path_to_error::deserialize(&mut de)?)
	}

	/// Evaluates the half that governs `stage`; an absent half always passes.
	pub fn evaluate(&self, request: &InboundRequest, stage: Stage) -> Result<(), PolicyViolation> {
		match stage {
			Stage::Issuance => self.request.as_ref().map_or(Ok(()), |p| p.evaluate(request)),
			Stage::Consumption => self.fusible.as_ref().map_or(Ok(()), |p| p.evaluate(request)),
		}
	}
}

/// Evaluates an optional policy; no policy means every stage passes.
pub fn evaluate_stage(
	policy: Option<&RemoteResourcePolicy>,
	request: &InboundRequest,
	stage: Stage,
) -> Result<(), PolicyViolation> {
	policy.map_or(Ok(()), |policy| policy.evaluate(request, stage))
}

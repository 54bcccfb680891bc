// self
use crate::obs::{FlowKind, FlowOutcome, TokenDecision};

/// Records a flow outcome via the global metrics recorder (when enabled).
pub fn record_flow_outcome(kind: FlowKind, outcome: FlowOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"oauth2_client_flow_total",
			"flow" => kind.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (kind, outcome);
	}
}

/// Counts the repository branch taken for a lookup (when enabled).
pub fn record_token_decision(kind: FlowKind, decision: TokenDecision) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"oauth2_client_token_decision_total",
			"flow" => kind.as_str(),
			"decision" => decision.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (kind, decision);
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn recorders_are_noops_without_backends() {
		record_flow_outcome(FlowKind::AuthorizationCode, FlowOutcome::Failure);
		record_token_decision(FlowKind::ClientCredentials, TokenDecision::Fresh);
	}
}

// self
use crate::obs::CallOutcome;

/// Records a call outcome via the global metrics recorder (when enabled).
pub fn record_call_outcome(operation: &str, outcome: CallOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"tradera_gateway_call_total",
			"operation" => operation.to_owned(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (operation, outcome);
	}
}

/// Counts a read that returned its documented default.
pub fn record_fallback_metric(operation: &'static str) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!("tradera_gateway_fallback_total", "operation" => operation).increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = operation;
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn recorders_are_noops_without_a_global_recorder() {
		record_call_outcome("GetCategories", CallOutcome::Throttled);
		record_fallback_metric("GetCategories");
	}
}

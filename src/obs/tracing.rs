// self
use crate::{_prelude::*, obs::record_fallback_metric};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedCall<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedCall<F> = F;

/// Span wrapping one gateway call.
#[derive(Clone, Debug)]
pub struct CallSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl CallSpan {
	/// Creates a span tagged with the operation name and call site.
	pub fn new(operation: &str, stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!("tradera_gateway.call", operation, stage);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (operation, stage);

			Self {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedCall<Fut>
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

/// Reports that `operation` answered without `field` and its default was returned instead.
pub fn record_fallback(operation: &'static str, field: &'static str) {
	#[cfg(feature = "tracing")]
	{
		tracing::warn!(operation, field, "Response lacks its result field; returning default.");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = field;
	}

	record_fallback_metric(operation);
}

/// Logs a budget refusal at debug level.
pub fn record_throttle(operation: &str, retry_after: Duration) {
	#[cfg(feature = "tracing")]
	{
		tracing::debug!(
			operation,
			retry_after_secs = retry_after.whole_seconds(),
			"Call budget exhausted."
		);
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (operation, retry_after);
	}
}

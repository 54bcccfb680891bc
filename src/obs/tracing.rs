// self
use crate::{
	_prelude::*,
	obs::{FlowKind, TokenDecision},
};

/// Future returned by [`FlowSpan::instrument`]; instrumented only with the `tracing` feature.
#[cfg(feature = "tracing")]
pub type InstrumentedFlow<F> = tracing::instrument::Instrumented<F>;
/// Future returned by [`FlowSpan::instrument`]; instrumented only with the `tracing` feature.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedFlow<F> = F;

/// `oauth2_client.flow` span covering one token lookup.
///
/// Carries `flow` and `stage` from creation; `decision` is filled once the repository knows
/// whether the cached token is reused, refreshed, or replaced.
#[derive(Clone, Debug)]
pub struct FlowSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl FlowSpan {
	/// Opens a span for `kind` at `stage`.
	pub fn new(kind: FlowKind, stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!(
				"oauth2_client.flow",
				flow = kind.as_str(),
				stage,
				decision = tracing::field::Empty
			);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (kind, stage);

			Self {}
		}
	}

	/// Records the cache decision on the span and emits a debug event inside it.
	pub fn record_decision(&self, decision: TokenDecision) {
		#[cfg(feature = "tracing")]
		{
			self.span.record("decision", decision.as_str());

			tracing::debug!(parent: &self.span, decision = decision.as_str(), "token cache decision");
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = decision;
		}
	}

	/// Runs `fut` inside the span without holding an entered guard across `.await`.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedFlow<Fut>
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

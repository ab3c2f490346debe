// crates.io
use tracing::{Span, instrument::Instrumented, span::EnteredSpan};
// self
use crate::{_prelude::*, obs::Stage};

/// A span builder used by pipeline stages.
#[derive(Clone, Debug)]
pub struct StageSpan(Span);
impl StageSpan {
	/// Creates a new span tagged with the provided stage + call site.
	pub fn new(stage: Stage, call: &'static str) -> Self {
		Self(tracing::info_span!("lineworks_bot.stage", stage = stage.as_str(), call))
	}

	/// Enters the span for synchronous sections.
	pub fn entered(self) -> StageSpanGuard {
		StageSpanGuard(self.0.entered())
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> Instrumented<Fut>
	where
		Fut: Future,
	{
		tracing::Instrument::instrument(fut, self.0.clone())
	}
}

/// RAII guard returned by [`StageSpan::entered`].
pub struct StageSpanGuard(#[allow(dead_code)] EnteredSpan);
impl Debug for StageSpanGuard {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("StageSpanGuard(..)")
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn entered_guard_keeps_the_span_current() {
		let _guard = StageSpan::new(Stage::Credential, "test").entered();
	}

	#[tokio::test]
	async fn instrument_wraps_future() {
		let span = StageSpan::new(Stage::Message, "instrument_wraps_future");
		let value = span.instrument(async { 42 }).await;

		assert_eq!(value, 42);
	}
}

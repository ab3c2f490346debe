// self
use crate::obs::{Stage, StageOutcome};

const STAGE_TOTAL: &str = "lineworks_bot_stage_total";

/// Bumps the per-stage counter; a no-op unless the `metrics` feature is enabled and a
/// recorder is installed.
#[cfg(feature = "metrics")]
pub fn record_stage_outcome(stage: Stage, outcome: StageOutcome) {
	metrics::counter!(STAGE_TOTAL, "stage" => stage.as_str(), "outcome" => outcome.as_str())
		.increment(1);
}

/// Bumps the per-stage counter; a no-op unless the `metrics` feature is enabled and a
/// recorder is installed.
#[cfg(not(feature = "metrics"))]
pub fn record_stage_outcome(stage: Stage, outcome: StageOutcome) {
	let _ = (STAGE_TOTAL, stage, outcome);
}

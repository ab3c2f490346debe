//! Stage-level observability for the delivery pipeline.
//!
//! Every stage call runs inside a `lineworks_bot.stage` span tagged with `stage` and `call`,
//! so the failure logs of a delivery can be told apart by where they happened. With the
//! `metrics` feature, each call also bumps `lineworks_bot_stage_total{stage, outcome}`.

mod metrics;
mod span;

pub use metrics::*;
pub use span::*;

// self
use crate::_prelude::*;

/// Pipeline stage, in execution order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Stage {
	/// Signing key load.
	Credential,
	/// Assertion signing and token exchange.
	Token,
	/// Messaging API call.
	Message,
}
impl Stage {
	/// All stages in the order a delivery runs them.
	pub const ALL: [Self; 3] = [Self::Credential, Self::Token, Self::Message];

	/// Label used in span fields, metric labels, and failure logs.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Credential => "credential",
			Self::Token => "token",
			Self::Message => "message",
		}
	}
}
impl Display for Stage {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// What happened to one stage call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StageOutcome {
	/// The call started.
	Attempt,
	/// The call returned a value.
	Success,
	/// The call returned an error.
	Failure,
}
impl StageOutcome {
	/// Metric label.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Attempt => "attempt",
			Self::Success => "success",
			Self::Failure => "failure",
		}
	}

	/// Maps a finished call onto its outcome.
	pub fn of<T, E>(result: &Result<T, E>) -> Self {
		if result.is_ok() { Self::Success } else { Self::Failure }
	}
}
impl Display for StageOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

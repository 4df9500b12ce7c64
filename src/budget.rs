//! Fixed-window call budget mirroring the provider's per-application ceiling.
//!
//! The budget admits at most `limit` calls per window. Every admitted attempt is charged, whether
//! the upstream call later succeeds or fails. An expired window is detected lazily: the first
//! access after `window_start + window` starts a fresh window at that instant.

// self
use crate::{_prelude::*, error::ConfigError};

/// Calls the provider admits per window.
pub const DEFAULT_CALL_LIMIT: u32 = 100;
/// Length of the provider's budget window.
pub const DEFAULT_WINDOW: Duration = Duration::hours(24);

/// Budget limits applied by a [`CallBudget`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitConfig {
	/// Maximum admitted calls per window.
	pub calls_per_window: u32,
	/// Window length.
	pub window: Duration,
}
impl RateLimitConfig {
	/// Validates that the limits admit at least one call in a positive window.
	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.calls_per_window == 0 || !self.window.is_positive() {
			return Err(ConfigError::InvalidRateLimit);
		}

		Ok(())
	}
}
impl Default for RateLimitConfig {
	fn default() -> Self {
		Self { calls_per_window: DEFAULT_CALL_LIMIT, window: DEFAULT_WINDOW }
	}
}

/// Result emitted by [`CallBudget::try_acquire`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RateLimitDecision {
	/// The call was admitted and charged.
	Allow,
	/// The budget is exhausted; no charge was recorded.
	Delay(RetryDirective),
}

/// Advises callers when to retry after a [`RateLimitDecision::Delay`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RetryDirective {
	/// Instant when the current window resets.
	pub earliest_retry_at: OffsetDateTime,
	/// Time remaining until the reset.
	pub retry_after: Duration,
}

/// Point-in-time view of the budget.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitInfo {
	/// Calls charged in the current window.
	pub calls_made: u32,
	/// Calls still admitted in the current window.
	pub calls_remaining: u32,
	/// Instant the current window opened.
	#[serde(with = "time::serde::rfc3339")]
	pub window_start: OffsetDateTime,
	/// Whole seconds until the window resets, never negative.
	pub seconds_until_reset: i64,
}

/// Fixed-window counter of outbound calls.
#[derive(Clone, Debug)]
pub struct CallBudget {
	config: RateLimitConfig,
	calls_made: u32,
	window_start: OffsetDateTime,
}
impl CallBudget {
	/// Opens an empty window at `now`.
	pub fn new(config: RateLimitConfig, now: OffsetDateTime) -> Self {
		Self { config, calls_made: 0, window_start: now }
	}

	/// Limits applied by this budget.
	pub fn config(&self) -> RateLimitConfig {
		self.config
	}

	/// Admits and charges one call, or reports how long to wait.
	///
	/// Rollover and the check-then-increment happen in one `&mut self` step, so callers that
	/// hold the budget behind a lock can never admit more than `limit` calls per window.
	pub fn try_acquire(&mut self, now: OffsetDateTime) -> RateLimitDecision {
		self.roll(now);

		if self.calls_made >= self.config.calls_per_window {
			let earliest_retry_at = self.resets_at();

			return RateLimitDecision::Delay(RetryDirective {
				earliest_retry_at,
				retry_after: clamp_non_negative(earliest_retry_at - now),
			});
		}

		self.calls_made += 1;

		RateLimitDecision::Allow
	}

	/// Returns a snapshot at `now`, starting a new window first if the current one expired.
	pub fn snapshot(&mut self, now: OffsetDateTime) -> RateLimitInfo {
		self.roll(now);

		RateLimitInfo {
			calls_made: self.calls_made,
			calls_remaining: self.config.calls_per_window.saturating_sub(self.calls_made),
			window_start: self.window_start,
			seconds_until_reset: clamp_non_negative(self.resets_at() - now).whole_seconds(),
		}
	}

	fn roll(&mut self, now: OffsetDateTime) {
		if now - self.window_start >= self.config.window {
			self.calls_made = 0;
			self.window_start = now;
		}
	}

	fn resets_at(&self) -> OffsetDateTime {
		self.window_start + self.config.window
	}
}

fn clamp_non_negative(delta: Duration) -> Duration {
	if delta.is_negative() { Duration::ZERO } else { delta }
}

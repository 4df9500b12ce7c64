//! Immutable user token record and lifecycle helpers.

// self
use crate::{
	_prelude::*,
	auth::{UserId, token::secret::TokenSecret},
};

/// Lifetime assumed when the token exchange omits an expiry instant.
pub const DEFAULT_TOKEN_LIFETIME: Duration = Duration::hours(24);

/// Lifecycle view of the gateway's token slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenStatus {
	/// No token has been acquired (or it was invalidated).
	Unset,
	/// Token is currently valid.
	Active,
	/// Token reached its expiry instant; a fresh exchange is required.
	Expired,
}

/// User authorization issued by a successful token exchange.
#[derive(Clone, Serialize, Deserialize)]
pub struct Token {
	/// Member the token acts for.
	pub user_id: UserId,
	/// Token secret; callers must avoid logging it.
	pub secret: TokenSecret,
	/// Instant the exchange completed.
	#[serde(with = "time::serde::rfc3339")]
	pub issued_at: OffsetDateTime,
	/// Instant from which the token is no longer accepted.
	#[serde(with = "time::serde::rfc3339")]
	pub expires_at: OffsetDateTime,
}
impl Token {
	/// Creates a record, falling back to [`DEFAULT_TOKEN_LIFETIME`] when `expires_at` is absent.
	pub fn new(
		user_id: UserId,
		secret: impl Into<String>,
		issued_at: OffsetDateTime,
		expires_at: Option<OffsetDateTime>,
	) -> Self {
		Self {
			user_id,
			secret: TokenSecret::new(secret),
			issued_at,
			expires_at: expires_at.unwrap_or(issued_at + DEFAULT_TOKEN_LIFETIME),
		}
	}

	/// Computes the lifecycle status at a given instant.
	pub fn status_at(&self, instant: OffsetDateTime) -> TokenStatus {
		if instant >= self.expires_at { TokenStatus::Expired } else { TokenStatus::Active }
	}

	/// Returns `true` if the token has expired at the provided instant.
	pub fn is_expired_at(&self, instant: OffsetDateTime) -> bool {
		matches!(self.status_at(instant), TokenStatus::Expired)
	}

	/// Time left before expiry, clamped at zero.
	pub fn remaining_at(&self, instant: OffsetDateTime) -> Duration {
		let remaining = self.expires_at - instant;

		if remaining.is_negative() { Duration::ZERO } else { remaining }
	}
}
impl Debug for Token {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Token")
			.field("user_id", &self.user_id)
			.field("secret", &"<redacted>")
			.field("issued_at", &self.issued_at)
			.field("expires_at", &self.expires_at)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros;
	// self
	use super::*;

	fn user() -> UserId {
		UserId::new("5986811").expect("User fixture should be valid.")
	}

	#[test]
	fn status_flips_at_expiry_instant() {
		let issued = macros::datetime!(2025-08-26 08:00 UTC);
		let token =
			Token::new(user(), "token", issued, Some(macros::datetime!(2025-08-26 09:00 UTC)));

		assert_eq!(token.status_at(macros::datetime!(2025-08-26 08:59 UTC)), TokenStatus::Active);
		assert_eq!(token.status_at(macros::datetime!(2025-08-26 09:00 UTC)), TokenStatus::Expired);
		assert_eq!(token.remaining_at(macros::datetime!(2025-08-26 08:30 UTC)), Duration::minutes(30));
		assert_eq!(token.remaining_at(macros::datetime!(2025-08-27 00:00 UTC)), Duration::ZERO);
	}

	#[test]
	fn missing_expiry_defaults_to_one_day() {
		let issued = macros::datetime!(2025-08-26 08:00 UTC);
		let token = Token::new(user(), "token", issued, None);

		assert_eq!(token.expires_at, macros::datetime!(2025-08-27 08:00 UTC));
	}

	#[test]
	fn debug_output_redacts_secret() {
		let token = Token::new(user(), "super-secret", OffsetDateTime::UNIX_EPOCH, None);

		assert!(!format!("{token:?}").contains("super-secret"));
	}
}

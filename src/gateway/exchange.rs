//! Token acquisition through `FetchToken`.

// self
use crate::{
	_prelude::*,
	auth::{AuthorizationCallback, Token, UserId},
	error::ConfigError,
	gateway::Gateway,
	http::SoapTransport,
	obs::CallSpan,
	soap::{SoapCall, SoapResponse, parse_xsd_datetime},
};

const FETCH_TOKEN: &str = "FetchToken";

/// Reasons a `FetchToken` answer cannot become a [`Token`].
///
/// Surfaced as the source of [`Error::AuthenticationFailed`].
#[derive(Debug, ThisError)]
pub enum TokenExchangeError {
	/// The answer carried no `AuthToken`.
	#[error("FetchToken response is missing the AuthToken field.")]
	MissingAuthToken,
	/// `HardExpirationTime` is present but unreadable.
	#[error("FetchToken returned an unreadable expiry `{value}`.")]
	InvalidExpiry {
		/// Raw expiry text.
		value: String,
	},
}

impl<T> Gateway<T>
where
	T: SoapTransport,
{
	/// Exchanges the member's secret key for a user token and makes it the active token.
	///
	/// The exchange is an ordinary public call and is charged to the budget. Any failure is
	/// reported as [`Error::AuthenticationFailed`] with the cause attached, except
	/// [`Error::RateLimitExceeded`], which is returned unchanged so callers can wait for the
	/// window to reset. Concurrent exchanges are serialized.
	pub async fn acquire_token(&self, user_id: UserId, secret_key: &str) -> Result<Token> {
		let span = CallSpan::new(FETCH_TOKEN, "acquire_token");

		span.instrument(async move {
			let _guard = self.exchange_guard.lock().await;
			let call = SoapCall::public(FETCH_TOKEN)
				.arg("userId", user_id.as_ref())
				.arg("secretKey", secret_key);
			let response = match self.call(call).await {
				Ok(response) => response,
				Err(e @ Error::RateLimitExceeded { .. }) => return Err(e),
				Err(e) => return Err(Error::authentication_failed(e)),
			};
			let token = self
				.token_from_response(user_id, &response)
				.map_err(Error::authentication_failed)?;

			self.store_token(token.clone());

			Ok(token)
		})
		.await
	}

	/// Installs the token delivered with an authorization redirect, without a network call.
	///
	/// An `exp` value that cannot be read falls back to the default token lifetime counted from
	/// the redirect's receive instant.
	pub fn adopt_callback(&self, callback: &AuthorizationCallback) -> Result<Token> {
		let secret = callback.token.as_deref().ok_or_else(|| ConfigError::MissingSecret {
			source_label: "the authorization callback token".into(),
		})?;
		let expires_at = callback.expires.as_deref().and_then(parse_xsd_datetime);
		let token = Token::new(callback.user_id.clone(), secret, callback.received_at, expires_at);

		self.store_token(token.clone());

		Ok(token)
	}

	fn token_from_response(
		&self,
		user_id: UserId,
		response: &SoapResponse,
	) -> Result<Token, TokenExchangeError> {
		let result = response.result().ok_or(TokenExchangeError::MissingAuthToken)?;
		let secret = result.child_text("AuthToken").ok_or(TokenExchangeError::MissingAuthToken)?;
		let expires_at = match result.child_text("HardExpirationTime") {
			Some(raw) => Some(
				parse_xsd_datetime(raw)
					.ok_or_else(|| TokenExchangeError::InvalidExpiry { value: raw.to_owned() })?,
			),
			None => None,
		};

		Ok(Token::new(user_id, secret, self.now(), expires_at))
	}
}

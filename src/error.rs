//! Gateway-level error types shared across configuration, authentication, budgeting, and
//! transport.

// self
use crate::_prelude::*;

/// Gateway-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical gateway error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS, timeout, HTTP status).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Authorization callback record could not be persisted or loaded.
	#[error(transparent)]
	Callback(#[from] crate::auth::CallbackError),

	/// Token exchange was rejected or returned an unusable payload.
	#[error("Token exchange failed.")]
	AuthenticationFailed {
		/// Underlying cause of the failed exchange.
		#[source]
		source: BoxError,
	},
	/// A privileged call was attempted before any token was acquired.
	#[error("No user token is held; acquire one before calling the restricted service.")]
	MissingToken,
	/// The held token is past its expiry instant.
	#[error("User token expired at {expired_at}.")]
	TokenExpired {
		/// Expiry instant of the stale token.
		expired_at: OffsetDateTime,
	},
	/// The call budget for the current window is exhausted.
	#[error("Call budget exhausted; retry in {} seconds.", .retry_after.whole_seconds())]
	RateLimitExceeded {
		/// Time remaining until the current window resets.
		retry_after: Duration,
	},
	/// The remote service answered with a well-formed SOAP fault.
	#[error("Remote service fault {code}: {message}.")]
	RemoteFault {
		/// Fault code supplied by the provider.
		code: String,
		/// Fault message supplied by the provider.
		message: String,
	},
	/// A write-style call returned a response without its expected result field.
	#[error("Response to {operation} is missing the {field} field.")]
	MalformedResponse {
		/// Operation name that produced the response.
		operation: &'static str,
		/// Missing field name.
		field: &'static str,
	},
}
impl Error {
	/// Wraps any failure observed during a token exchange.
	pub fn authentication_failed(src: impl Into<BoxError>) -> Self {
		Self::AuthenticationFailed { source: src.into() }
	}
}

/// Configuration and validation failures raised before any network access.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// A required credential value is empty.
	#[error("Required credential `{field}` is missing.")]
	MissingCredential {
		/// Credential field name.
		field: &'static str,
	},
	/// A secret or callback value could not be found in its configured source.
	#[error("Secret is not available from {source_label}.")]
	MissingSecret {
		/// Human-readable description of the source that was consulted.
		source_label: String,
	},
	/// Base URL cannot be parsed or is not HTTP(S).
	#[error("Base URL `{value}` is invalid.")]
	InvalidBaseUrl {
		/// Offending value.
		value: String,
	},
	/// Per-call timeout must be positive.
	#[error("Call timeout must be positive.")]
	InvalidTimeout,
	/// Rate budget must allow at least one call within a positive window.
	#[error("Rate limit must allow at least one call per positive window.")]
	InvalidRateLimit,
	/// A numeric environment value could not be parsed.
	#[error("Environment variable `{name}` holds an invalid value.")]
	InvalidEnvValue {
		/// Environment variable name.
		name: &'static str,
	},
	/// An identifier failed validation.
	#[error(transparent)]
	InvalidIdentifier(#[from] crate::auth::IdentifierError),
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Transport-level failures (network, timeout, unexpected HTTP status, unreadable body).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// The call did not complete within the configured timeout.
	#[error("Call to {operation} timed out.")]
	Timeout {
		/// Operation that timed out.
		operation: String,
	},
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the SOAP service.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// The service answered with a non-success status and no SOAP fault.
	#[error("SOAP service returned HTTP {status}.")]
	Status {
		/// HTTP status code.
		status: u16,
	},
	/// The response body is not a readable SOAP envelope.
	#[error("SOAP response body could not be parsed.")]
	InvalidBody {
		/// Structured parsing failure.
		#[source]
		source: crate::soap::XmlError,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}

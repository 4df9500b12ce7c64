//! Gateway configuration: credentials, endpoints, timeouts, and budget limits.
//!
//! Every value is validated eagerly by [`GatewayConfigBuilder::build`], so a constructed
//! [`GatewayConfig`] never triggers a configuration failure once network calls begin.

// std
use std::env;
// self
use crate::{_prelude::*, auth::Credentials, budget::RateLimitConfig, error::ConfigError};

/// Production SOAP base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.tradera.com/v3";
/// Per-call timeout applied when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::seconds(30);
/// Maximum cached result age requested from the restricted service, in seconds.
pub const DEFAULT_MAX_RESULT_AGE: u32 = 3_600;

/// Environment variable holding the application id.
pub const ENV_APP_ID: &str = "TRADERA_APP_ID";
/// Environment variable holding the service key.
pub const ENV_SERVICE_KEY: &str = "TRADERA_SERVICE_KEY";
/// Environment variable holding the public key.
pub const ENV_PUBLIC_KEY: &str = "TRADERA_PUBLIC_KEY";
/// Environment variable overriding the SOAP base URL.
pub const ENV_BASE_URL: &str = "TRADERA_BASE_URL";
/// Environment variable overriding the per-call timeout, in seconds.
pub const ENV_TIMEOUT: &str = "TRADERA_TIMEOUT";
/// Environment variable toggling sandbox mode (`1`/`true`).
pub const ENV_SANDBOX: &str = "TRADERA_SANDBOX";

/// Validated gateway configuration.
#[derive(Clone, Debug)]
pub struct GatewayConfig {
	/// Application credentials.
	pub credentials: Credentials,
	/// SOAP base URL; service paths are appended to it.
	pub base_url: Url,
	/// Token-login page used to build authorization URLs.
	pub login_page: Url,
	/// Per-call timeout.
	pub timeout: Duration,
	/// Call budget limits.
	pub rate_limit: RateLimitConfig,
	/// Whether restricted calls run against the sandbox.
	pub sandbox: bool,
	/// Maximum cached result age requested from the restricted service, in seconds.
	pub max_result_age: u32,
}
impl GatewayConfig {
	/// Creates a builder seeded with the provided credentials.
	pub fn builder(credentials: Credentials) -> GatewayConfigBuilder {
		GatewayConfigBuilder::new(credentials)
	}

	/// Loads configuration from the `TRADERA_*` environment variables.
	pub fn from_env() -> Result<Self, ConfigError> {
		let credentials = Credentials::new(
			env::var(ENV_APP_ID).unwrap_or_default(),
			env::var(ENV_SERVICE_KEY).unwrap_or_default(),
			env::var(ENV_PUBLIC_KEY).unwrap_or_default(),
		)?;
		let mut builder = Self::builder(credentials);

		if let Some(raw) = non_empty_env(ENV_BASE_URL) {
			builder = builder.base_url(parse_base_url(&raw)?);
		}
		if let Some(raw) = non_empty_env(ENV_TIMEOUT) {
			let secs = raw
				.parse::<i64>()
				.map_err(|_| ConfigError::InvalidEnvValue { name: ENV_TIMEOUT })?;

			builder = builder.timeout(Duration::seconds(secs));
		}
		if let Some(raw) = non_empty_env(ENV_SANDBOX) {
			let sandbox = match raw.to_ascii_lowercase().as_str() {
				"1" | "true" | "yes" => true,
				"0" | "false" | "no" => false,
				_ => return Err(ConfigError::InvalidEnvValue { name: ENV_SANDBOX }),
			};

			builder = builder.sandbox(sandbox);
		}

		builder.build()
	}

	/// Endpoint of the public service.
	pub fn public_endpoint(&self) -> Url {
		self.service_endpoint("publicservice.asmx")
	}

	/// Endpoint of the restricted service.
	pub fn restricted_endpoint(&self) -> Url {
		self.service_endpoint("restrictedservice.asmx")
	}

	fn service_endpoint(&self, path: &str) -> Url {
		let mut url = self.base_url.clone();

		if let Ok(mut segments) = url.path_segments_mut() {
			segments.pop_if_empty().push(path);
		}

		url
	}
}

/// Builder for [`GatewayConfig`] values.
#[derive(Debug)]
pub struct GatewayConfigBuilder {
	credentials: Credentials,
	base_url: Option<Url>,
	login_page: Option<Url>,
	timeout: Duration,
	rate_limit: RateLimitConfig,
	sandbox: bool,
	max_result_age: u32,
}
impl GatewayConfigBuilder {
	fn new(credentials: Credentials) -> Self {
		Self {
			credentials,
			base_url: None,
			login_page: None,
			timeout: DEFAULT_TIMEOUT,
			rate_limit: RateLimitConfig::default(),
			sandbox: false,
			max_result_age: DEFAULT_MAX_RESULT_AGE,
		}
	}

	/// Overrides the SOAP base URL.
	pub fn base_url(mut self, url: Url) -> Self {
		self.base_url = Some(url);

		self
	}

	/// Overrides the token-login page.
	pub fn login_page(mut self, url: Url) -> Self {
		self.login_page = Some(url);

		self
	}

	/// Overrides the per-call timeout.
	pub fn timeout(mut self, timeout: Duration) -> Self {
		self.timeout = timeout;

		self
	}

	/// Overrides the call budget limits.
	pub fn rate_limit(mut self, rate_limit: RateLimitConfig) -> Self {
		self.rate_limit = rate_limit;

		self
	}

	/// Toggles sandbox mode for restricted calls.
	pub fn sandbox(mut self, sandbox: bool) -> Self {
		self.sandbox = sandbox;

		self
	}

	/// Overrides the maximum cached result age, in seconds.
	pub fn max_result_age(mut self, seconds: u32) -> Self {
		self.max_result_age = seconds;

		self
	}

	/// Consumes the builder and validates the resulting configuration.
	pub fn build(self) -> Result<GatewayConfig, ConfigError> {
		let base_url = match self.base_url {
			Some(url) => url,
			None => parse_base_url(DEFAULT_BASE_URL)?,
		};
		let login_page = match self.login_page {
			Some(url) => url,
			None => parse_base_url(crate::auth::TOKEN_LOGIN_URL)?,
		};

		validate_http_url(&base_url)?;
		validate_http_url(&login_page)?;

		if !self.timeout.is_positive() {
			return Err(ConfigError::InvalidTimeout);
		}

		self.rate_limit.validate()?;

		Ok(GatewayConfig {
			credentials: self.credentials,
			base_url,
			login_page,
			timeout: self.timeout,
			rate_limit: self.rate_limit,
			sandbox: self.sandbox,
			max_result_age: self.max_result_age,
		})
	}
}

fn non_empty_env(name: &str) -> Option<String> {
	env::var(name).ok().map(|value| value.trim().to_owned()).filter(|value| !value.is_empty())
}

fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
	Url::parse(raw.trim()).map_err(|_| ConfigError::InvalidBaseUrl { value: raw.to_owned() })
}

fn validate_http_url(url: &Url) -> Result<(), ConfigError> {
	if matches!(url.scheme(), "http" | "https") && !url.cannot_be_a_base() {
		Ok(())
	} else {
		Err(ConfigError::InvalidBaseUrl { value: url.to_string() })
	}
}

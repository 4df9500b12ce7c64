//! The gateway: one owned value that mediates every outbound marketplace call.
//!
//! A [`Gateway`] holds the user token, the call budget, and the transport. Every call flows
//! through [`Gateway::call`], which checks the token (restricted calls only), charges the budget,
//! dispatches the envelope, and classifies the answer into the crate's error taxonomy. State is
//! evaluated lazily; there is no background timer.

mod call;
mod exchange;

pub use exchange::*;

// self
use crate::{
	_prelude::*,
	auth::{LoginRequest, Token, TokenStatus},
	budget::{CallBudget, RateLimitInfo},
	clock::Clock,
	config::GatewayConfig,
	http::SoapTransport,
};
#[cfg(feature = "reqwest")]
use crate::{clock::SystemClock, http::ReqwestSoapTransport};

#[cfg(feature = "reqwest")]
/// Gateway specialized for the crate's default reqwest transport.
pub type ReqwestGateway = Gateway<ReqwestSoapTransport>;

/// Rate-budgeted, token-aware client for the marketplace SOAP services.
///
/// Clones share the same token slot, budget, and transport, so a gateway can be handed to many
/// tasks while the 100-calls-per-window ceiling still holds across all of them.
pub struct Gateway<T>
where
	T: SoapTransport,
{
	config: Arc<GatewayConfig>,
	transport: Arc<T>,
	clock: Arc<dyn Clock>,
	token: Arc<RwLock<Option<Token>>>,
	budget: Arc<Mutex<CallBudget>>,
	exchange_guard: Arc<AsyncMutex<()>>,
}
impl<T> Gateway<T>
where
	T: SoapTransport,
{
	/// Creates a gateway over a caller-provided transport and clock.
	///
	/// The budget window opens at the clock's current instant.
	pub fn with_transport(
		config: GatewayConfig,
		transport: impl Into<Arc<T>>,
		clock: Arc<dyn Clock>,
	) -> Self {
		let budget = CallBudget::new(config.rate_limit, clock.now());

		Self {
			config: Arc::new(config),
			transport: transport.into(),
			clock,
			token: Default::default(),
			budget: Arc::new(Mutex::new(budget)),
			exchange_guard: Default::default(),
		}
	}

	/// Validated configuration the gateway was built with.
	pub fn config(&self) -> &GatewayConfig {
		&self.config
	}

	/// Snapshot of the call budget, opening a new window first if the current one elapsed.
	pub fn get_rate_limit_info(&self) -> RateLimitInfo {
		let now = self.now();

		self.budget.lock().snapshot(now)
	}

	/// Lifecycle view of the held token.
	pub fn token_status(&self) -> TokenStatus {
		let now = self.now();

		self.token.read().as_ref().map_or(TokenStatus::Unset, |token| token.status_at(now))
	}

	/// Returns the held token while it is still valid.
	///
	/// Expiry is terminal: an expired token is never refreshed here, the caller must run
	/// [`acquire_token`](Self::acquire_token) with a fresh secret key.
	pub fn ensure_valid_token(&self) -> Result<Token> {
		let now = self.now();

		match self.token.read().as_ref() {
			None => Err(Error::MissingToken),
			Some(token) if token.is_expired_at(now) =>
				Err(Error::TokenExpired { expired_at: token.expires_at }),
			Some(token) => Ok(token.clone()),
		}
	}

	/// Drops the held token; restricted calls fail with [`Error::MissingToken`] afterwards.
	pub fn invalidate_token(&self) {
		self.token.write().take();
	}

	/// Generates a secret key and the token-login URL the member should open.
	pub fn login_request(&self) -> LoginRequest {
		LoginRequest::generate(&self.config.login_page, &self.config.credentials)
	}

	fn now(&self) -> OffsetDateTime {
		self.clock.now()
	}

	fn store_token(&self, token: Token) {
		*self.token.write() = Some(token);
	}
}
#[cfg(feature = "reqwest")]
impl Gateway<ReqwestSoapTransport> {
	/// Creates a gateway with the default reqwest transport and the system clock.
	pub fn new(config: GatewayConfig) -> Result<Self> {
		let transport = ReqwestSoapTransport::from_config(&config)?;

		Ok(Self::with_transport(config, transport, Arc::new(SystemClock)))
	}

	/// Loads configuration from the environment and creates a gateway.
	pub fn from_env() -> Result<Self> {
		Self::new(GatewayConfig::from_env()?)
	}
}
impl<T> Clone for Gateway<T>
where
	T: SoapTransport,
{
	fn clone(&self) -> Self {
		Self {
			config: self.config.clone(),
			transport: self.transport.clone(),
			clock: self.clock.clone(),
			token: self.token.clone(),
			budget: self.budget.clone(),
			exchange_guard: self.exchange_guard.clone(),
		}
	}
}
impl<T> Debug for Gateway<T>
where
	T: SoapTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Gateway")
			.field("base_url", &self.config.base_url.as_str())
			.field("app_id", &self.config.credentials.app_id())
			.field("token_status", &self.token_status())
			.finish()
	}
}

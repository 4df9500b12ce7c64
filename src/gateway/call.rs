//! The rate-limited call path.

// self
use crate::{
	_prelude::*,
	auth::Token,
	budget::RateLimitDecision,
	error::TransportError,
	gateway::Gateway,
	http::{SoapHttpRequest, SoapHttpResponse, SoapTransport},
	obs::{self, CallOutcome, CallSpan},
	soap::{self, ConfigurationHeader, Service, SoapCall, SoapHeaders, SoapOutcome, SoapResponse},
};

impl<T> Gateway<T>
where
	T: SoapTransport,
{
	/// Sends one operation to its service.
	///
	/// Restricted calls first require a valid token ([`Error::MissingToken`] or
	/// [`Error::TokenExpired`] otherwise, with no budget charge). The budget is then charged
	/// before dispatch; an exhausted window fails with [`Error::RateLimitExceeded`] and no network
	/// I/O. A dispatched call stays charged whatever its outcome. Answers are classified as:
	/// SOAP fault → [`Error::RemoteFault`]; timeout, network failure, non-2xx status without a
	/// fault, or an unreadable body → [`Error::Transport`]. There is no retry.
	pub async fn call(&self, call: SoapCall) -> Result<SoapResponse> {
		let operation = call.operation.clone();
		let span = CallSpan::new(&operation, "call");

		obs::record_call_outcome(&operation, CallOutcome::Attempt);

		let result = span.instrument(self.dispatch(call)).await;
		let outcome = match &result {
			Ok(_) => CallOutcome::Success,
			Err(Error::RateLimitExceeded { .. }) => CallOutcome::Throttled,
			Err(_) => CallOutcome::Failure,
		};

		obs::record_call_outcome(&operation, outcome);

		result
	}

	async fn dispatch(&self, call: SoapCall) -> Result<SoapResponse> {
		let token = if call.requires_auth() { Some(self.ensure_valid_token()?) } else { None };

		self.charge(&call.operation)?;

		let request = self.render(&call, token.as_ref());
		let answer = self.transport.send(request).await?;

		classify(&call.operation, answer)
	}

	fn charge(&self, operation: &str) -> Result<()> {
		let now = self.now();
		let decision = self.budget.lock().try_acquire(now);

		match decision {
			RateLimitDecision::Allow => Ok(()),
			RateLimitDecision::Delay(directive) => {
				obs::record_throttle(operation, directive.retry_after);

				Err(Error::RateLimitExceeded { retry_after: directive.retry_after })
			},
		}
	}

	fn render(&self, call: &SoapCall, token: Option<&Token>) -> SoapHttpRequest {
		let config = &self.config;
		let credentials = &config.credentials;
		let (endpoint, configuration) = match call.service {
			Service::Public => (
				config.public_endpoint(),
				ConfigurationHeader::Public { public_key: credentials.public_key() },
			),
			Service::Restricted => (
				config.restricted_endpoint(),
				ConfigurationHeader::Restricted {
					sandbox: config.sandbox,
					max_result_age: config.max_result_age,
				},
			),
		};
		let headers = SoapHeaders {
			app_id: credentials.app_id(),
			app_key: credentials.service_key().expose(),
			configuration,
			authorization: token.map(|token| (token.user_id.as_ref(), token.secret.expose())),
		};

		SoapHttpRequest {
			operation: call.operation.clone(),
			endpoint,
			soap_action: call.soap_action(),
			body: soap::render(call, &headers),
			timeout: config.timeout,
		}
	}
}

fn classify(operation: &str, answer: SoapHttpResponse) -> Result<SoapResponse> {
	match soap::decode(operation, &answer.body) {
		Ok(SoapOutcome::Fault(fault)) =>
			Err(Error::RemoteFault { code: fault.code, message: fault.message }),
		_ if !answer.is_success() => Err(TransportError::Status { status: answer.status }.into()),
		Ok(SoapOutcome::Response(response)) => Ok(response),
		Err(source) => Err(TransportError::InvalidBody { source }.into()),
	}
}

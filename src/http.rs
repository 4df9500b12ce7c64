//! Transport primitives for SOAP calls.
//!
//! [`SoapTransport`] is the gateway's only dependency on an HTTP stack. The default
//! [`ReqwestSoapTransport`] posts envelopes with reqwest; tests and embedders can supply their
//! own implementation through [`Gateway::with_transport`](crate::gateway::Gateway::with_transport).

// crates.io
#[cfg(feature = "reqwest")]
use reqwest::{
	header::{CONTENT_TYPE, HeaderValue},
	redirect::Policy,
};
// self
use crate::{_prelude::*, error::TransportError};
#[cfg(feature = "reqwest")] use crate::{config::GatewayConfig, error::ConfigError};

/// Content type of every SOAP 1.1 request.
pub const SOAP_CONTENT_TYPE: &str = "text/xml; charset=utf-8";

/// Boxed future returned by [`SoapTransport::send`].
pub type TransportFuture<'a> =
	Pin<Box<dyn Future<Output = Result<SoapHttpResponse, TransportError>> + 'a + Send>>;

/// Fully rendered request handed to a transport.
#[derive(Clone, Debug)]
pub struct SoapHttpRequest {
	/// Operation name, used for error context.
	pub operation: String,
	/// Service endpoint (`publicservice.asmx` or `restrictedservice.asmx`).
	pub endpoint: Url,
	/// Quoted `SOAPAction` header value.
	pub soap_action: String,
	/// Envelope XML.
	pub body: String,
	/// Deadline for the whole exchange.
	pub timeout: Duration,
}

/// Raw HTTP answer: status code plus body text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SoapHttpResponse {
	/// HTTP status code.
	pub status: u16,
	/// Body text.
	pub body: String,
}
impl SoapHttpResponse {
	/// Whether the status is in the 2xx range.
	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.status)
	}
}

/// Abstraction over HTTP stacks able to post SOAP envelopes.
///
/// Implementations must be `Send + Sync + 'static` so one gateway can be shared across tasks,
/// and must report a deadline overrun as [`TransportError::Timeout`]. Any HTTP status is a
/// successful transport outcome; the gateway classifies statuses after decoding the body.
pub trait SoapTransport
where
	Self: 'static + Send + Sync,
{
	/// Posts `request` and returns the raw answer.
	fn send(&self, request: SoapHttpRequest) -> TransportFuture<'_>;
}

/// reqwest-backed [`SoapTransport`].
///
/// Redirects are not followed; the services answer directly.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug)]
pub struct ReqwestSoapTransport(ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestSoapTransport {
	/// Builds a client honouring the configured per-call timeout.
	pub fn from_config(config: &GatewayConfig) -> Result<Self, ConfigError> {
		let timeout =
			std::time::Duration::try_from(config.timeout).map_err(|_| ConfigError::InvalidTimeout)?;
		let client = ReqwestClient::builder().timeout(timeout).redirect(Policy::none()).build()?;

		Ok(Self(client))
	}

	/// Wraps an existing reqwest client; configure it not to follow redirects.
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl SoapTransport for ReqwestSoapTransport {
	fn send(&self, request: SoapHttpRequest) -> TransportFuture<'_> {
		Box::pin(async move {
			let SoapHttpRequest { operation, endpoint, soap_action, body, timeout } = request;
			let mut builder = self
				.0
				.post(endpoint)
				.header(CONTENT_TYPE, HeaderValue::from_static(SOAP_CONTENT_TYPE))
				.header("SOAPAction", soap_action)
				.body(body);

			if let Ok(timeout) = std::time::Duration::try_from(timeout) {
				builder = builder.timeout(timeout);
			}

			let response = builder.send().await.map_err(|e| map_reqwest_error(&operation, e))?;
			let status = response.status().as_u16();
			let body = response.text().await.map_err(|e| map_reqwest_error(&operation, e))?;

			Ok(SoapHttpResponse { status, body })
		})
	}
}

#[cfg(feature = "reqwest")]
fn map_reqwest_error(operation: &str, e: ReqwestError) -> TransportError {
	if e.is_timeout() {
		TransportError::Timeout { operation: operation.to_owned() }
	} else {
		TransportError::network(e)
	}
}

//! Rate-budgeted, token-aware gateway for the Tradera SOAP API: one owned [`gateway::Gateway`]
//! mediates every outbound call, keeps the per-user token fresh, and degrades read-style calls to
//! documented defaults instead of failing.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod budget;
pub mod clock;
pub mod config;
pub mod error;
pub mod gateway;
pub mod http;
pub mod marketplace;
pub mod obs;
pub mod soap;
#[cfg(all(any(test, feature = "test"), feature = "reqwest"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		auth::Credentials,
		clock::{Clock, ManualClock},
		config::GatewayConfig,
		gateway::Gateway,
		http::ReqwestSoapTransport,
	};

	/// Application id used by every test fixture.
	pub const TEST_APP_ID: &str = "1234";
	/// Service key used by every test fixture.
	pub const TEST_SERVICE_KEY: &str = "service-key-fixture";
	/// Public key used by every test fixture.
	pub const TEST_PUBLIC_KEY: &str = "public-key-fixture";

	/// Builds a validated configuration pointing at `base_url` with the fixture credentials.
	pub fn test_config(base_url: &str) -> GatewayConfig {
		let credentials = Credentials::new(TEST_APP_ID, TEST_SERVICE_KEY, TEST_PUBLIC_KEY)
			.expect("Fixture credentials should be valid.");
		let base_url = Url::parse(base_url).expect("Mock server URL should parse.");

		GatewayConfig::builder(credentials)
			.base_url(base_url)
			.timeout(Duration::seconds(5))
			.build()
			.expect("Fixture configuration should validate.")
	}

	/// Constructs a reqwest-backed [`Gateway`] driven by a manual clock pinned at `start`.
	pub fn build_test_gateway(
		base_url: &str,
		start: OffsetDateTime,
	) -> (Gateway<ReqwestSoapTransport>, Arc<ManualClock>) {
		let clock = Arc::new(ManualClock::new(start));
		let config = test_config(base_url);
		let transport = ReqwestSoapTransport::from_config(&config)
			.expect("Reqwest transport should build for tests.");
		let gateway =
			Gateway::with_transport(config, transport, clock.clone() as Arc<dyn Clock>);

		(gateway, clock)
	}

	/// Wraps a SOAP body fragment in a response envelope.
	pub fn soap_envelope(body: &str) -> String {
		format!(
			"<?xml version=\"1.0\" encoding=\"utf-8\"?>\
			<soap:Envelope xmlns:soap=\"http://schemas.xmlsoap.org/soap/envelope/\" \
			xmlns:xsi=\"http://www.w3.org/2001/XMLSchema-instance\">\
			<soap:Body>{body}</soap:Body></soap:Envelope>"
		)
	}

	/// Builds a successful `FetchToken` response body expiring at `expires_at`.
	pub fn fetch_token_envelope(token: &str, expires_at: &str) -> String {
		soap_envelope(&format!(
			"<FetchTokenResponse xmlns=\"http://api.tradera.com\"><FetchTokenResult>\
			<AuthToken>{token}</AuthToken><HardExpirationTime>{expires_at}</HardExpirationTime>\
			</FetchTokenResult></FetchTokenResponse>"
		))
	}
}

mod _prelude {
	pub use std::{
		collections::{BTreeMap, HashMap},
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::{Mutex, RwLock};
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _};

//! Application credentials issued by the marketplace developer program.

// self
use crate::{_prelude::*, auth::TokenSecret, error::ConfigError};

/// Immutable application identity attached to every SOAP call.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
	app_id: String,
	service_key: TokenSecret,
	public_key: String,
}
impl Credentials {
	/// Validates and captures the application credentials.
	///
	/// Values are trimmed; an empty value fails with [`ConfigError::MissingCredential`].
	pub fn new(
		app_id: impl AsRef<str>,
		service_key: impl AsRef<str>,
		public_key: impl AsRef<str>,
	) -> Result<Self, ConfigError> {
		let app_id = required("app_id", app_id.as_ref())?;
		let service_key = required("service_key", service_key.as_ref())?;
		let public_key = required("public_key", public_key.as_ref())?;

		Ok(Self { app_id, service_key: TokenSecret::new(service_key), public_key })
	}

	/// Application identifier.
	pub fn app_id(&self) -> &str {
		&self.app_id
	}

	/// Service key; callers must avoid logging it.
	pub fn service_key(&self) -> &TokenSecret {
		&self.service_key
	}

	/// Public key used by the public service and the login page.
	pub fn public_key(&self) -> &str {
		&self.public_key
	}
}
impl Debug for Credentials {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Credentials")
			.field("app_id", &self.app_id)
			.field("service_key", &"<redacted>")
			.field("public_key", &self.public_key)
			.finish()
	}
}

fn required(field: &'static str, value: &str) -> Result<String, ConfigError> {
	let value = value.trim();

	if value.is_empty() {
		return Err(ConfigError::MissingCredential { field });
	}

	Ok(value.to_owned())
}

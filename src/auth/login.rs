//! Token-login page helpers for the out-of-band authorization step.
//!
//! The member opens the login URL, approves the application, and is redirected to the accept
//! URL registered for the application. The secret key embedded in the URL is what
//! [`Gateway::acquire_token`](crate::gateway::Gateway::acquire_token) later exchanges together
//! with the member's user id.

// crates.io
use uuid::Uuid;
// self
use crate::{_prelude::*, auth::Credentials};

/// Token-login page hosted by the marketplace.
pub const TOKEN_LOGIN_URL: &str = "https://api.tradera.com/tokenlogin.aspx";

/// Generates a random secret key formatted as an upper-case version 4 UUID.
pub fn generate_secret_key() -> String {
	Uuid::new_v4().hyphenated().to_string().to_uppercase()
}

/// Builds the token-login URL on `login_page` for `secret_key`.
pub fn login_url(login_page: &Url, credentials: &Credentials, secret_key: &str) -> Url {
	let mut url = login_page.clone();

	url.query_pairs_mut()
		.append_pair("appId", credentials.app_id())
		.append_pair("pkey", credentials.public_key())
		.append_pair("skey", secret_key);

	url
}

/// Login URL paired with the secret key it embeds.
#[derive(Clone)]
pub struct LoginRequest {
	/// URL the member should open.
	pub url: Url,
	/// Secret key to exchange after the redirect; keep it out of logs.
	pub secret_key: String,
}
impl LoginRequest {
	/// Generates a fresh secret key and its login URL on `login_page`.
	pub fn generate(login_page: &Url, credentials: &Credentials) -> Self {
		let secret_key = generate_secret_key();

		Self { url: login_url(login_page, credentials, &secret_key), secret_key }
	}
}
impl Debug for LoginRequest {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("LoginRequest").field("url", &"<contains secret>").finish()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn secret_key_is_uppercase_uuid_v4() {
		let key = generate_secret_key();
		let groups: Vec<_> = key.split('-').map(str::len).collect();

		assert_eq!(groups, [8, 4, 4, 4, 12]);
		assert_eq!(
			Uuid::parse_str(&key).expect("Secret key should parse as a UUID.").get_version_num(),
			4
		);
		assert!(!key.chars().any(|c| c.is_ascii_lowercase()));
		assert_ne!(key, generate_secret_key());
	}

	#[test]
	fn login_url_carries_app_public_and_secret_keys() {
		let credentials =
			Credentials::new("1234", "service", "pub-key").expect("Credentials should be valid.");
		let page = Url::parse(TOKEN_LOGIN_URL).expect("Login page constant should parse.");
		let url = login_url(&page, &credentials, "SKEY");

		assert_eq!(
			url.as_str(),
			"https://api.tradera.com/tokenlogin.aspx?appId=1234&pkey=pub-key&skey=SKEY"
		);

		let request = LoginRequest::generate(&page, &credentials);
		let skey = request
			.url
			.query_pairs()
			.find(|(k, _)| k == "skey")
			.map(|(_, v)| v.into_owned())
			.expect("Generated URL should carry skey.");

		assert_eq!(skey, request.secret_key);
	}
}

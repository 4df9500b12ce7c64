//! Authorization redirect record shared between the local callback listener and the gateway.
//!
//! The listener parses the accept redirect with [`AuthorizationCallback::from_redirect`] and
//! persists it with [`AuthorizationCallback::save`]; the gateway side loads it at startup with
//! [`AuthorizationCallback::load`], failing fast when nothing was persisted.

// std
use std::{
	fs::{self, File},
	io::Write,
	path::{Path, PathBuf},
};
// self
use crate::{
	_prelude::*,
	auth::{IdentifierError, UserId},
	error::ConfigError,
};

/// Failures raised while parsing or persisting an [`AuthorizationCallback`].
#[derive(Debug, ThisError)]
pub enum CallbackError {
	/// The redirect lacked the `userId` parameter.
	#[error("Authorization redirect is missing the userId parameter.")]
	MissingUserId,
	/// The `userId` parameter failed validation.
	#[error("Authorization redirect carries an invalid userId.")]
	InvalidUserId(#[from] IdentifierError),
	/// The persisted record could not be parsed.
	#[error("Failed to parse {}.", .path.display())]
	Parse {
		/// File that failed to parse.
		path: PathBuf,
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// The record could not be encoded as JSON.
	#[error("Failed to encode the authorization callback record.")]
	Encode(#[source] serde_json::Error),
	/// Filesystem failure while reading or writing the record.
	#[error("Failed to {action} {}.", .path.display())]
	Io {
		/// Operation that failed.
		action: &'static str,
		/// File involved.
		path: PathBuf,
		/// Underlying IO failure.
		#[source]
		source: std::io::Error,
	},
}

/// Parameters delivered to the accept URL after the member approved the application.
#[derive(Clone, Serialize, Deserialize)]
pub struct AuthorizationCallback {
	/// Member who approved the application.
	pub user_id: UserId,
	/// Token shown in the redirect when the application opted into it.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub token: Option<String>,
	/// Raw expiry hint from the `exp` parameter.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub expires: Option<String>,
	/// Instant the redirect was received.
	#[serde(with = "time::serde::rfc3339")]
	pub received_at: OffsetDateTime,
}
impl AuthorizationCallback {
	/// Parses the accept redirect (`userId`, `token`, `exp` query parameters).
	pub fn from_redirect(url: &Url, received_at: OffsetDateTime) -> Result<Self, CallbackError> {
		let mut user_id = None;
		let mut token = None;
		let mut expires = None;

		for (key, value) in url.query_pairs() {
			let value = value.trim();

			if value.is_empty() {
				continue;
			}

			match key.as_ref() {
				"userId" => user_id = Some(UserId::new(value)?),
				"token" => token = Some(value.to_owned()),
				"exp" => expires = Some(value.to_owned()),
				_ => {},
			}
		}

		let user_id = user_id.ok_or(CallbackError::MissingUserId)?;

		Ok(Self { user_id, token, expires, received_at })
	}

	/// Writes the record as JSON through a temporary file and an atomic rename.
	pub fn save(&self, path: impl AsRef<Path>) -> Result<(), CallbackError> {
		let path = path.as_ref();

		if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
			fs::create_dir_all(parent).map_err(|source| CallbackError::Io {
				action: "create directory for",
				path: path.to_owned(),
				source,
			})?;
		}

		let serialized = serde_json::to_vec_pretty(self).map_err(CallbackError::Encode)?;
		let tmp_path = path.with_extension("tmp");
		let written = write_synced(&tmp_path, &serialized).and_then(|()| {
			fs::rename(&tmp_path, path).map_err(|source| CallbackError::Io {
				action: "replace",
				path: path.to_owned(),
				source,
			})
		});

		if written.is_err() {
			let _ = fs::remove_file(&tmp_path);
		}

		written
	}

	/// Loads a persisted record.
	///
	/// A missing or empty file is a configuration problem, not an IO failure: the authorization
	/// step has simply not happened yet.
	pub fn load(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref();

		if !path.exists() {
			return Err(ConfigError::MissingSecret {
				source_label: format!("callback file {}", path.display()),
			}
			.into());
		}

		let bytes = fs::read(path).map_err(|source| CallbackError::Io {
			action: "read",
			path: path.to_owned(),
			source,
		})?;

		if bytes.iter().all(u8::is_ascii_whitespace) {
			return Err(ConfigError::MissingSecret {
				source_label: format!("callback file {}", path.display()),
			}
			.into());
		}

		let de = &mut serde_json::Deserializer::from_slice(&bytes);
		let record = serde_path_to_error::deserialize(de)
			.map_err(|source| CallbackError::Parse { path: path.to_owned(), source })?;

		Ok(record)
	}
}
impl Debug for AuthorizationCallback {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AuthorizationCallback")
			.field("user_id", &self.user_id)
			.field("token", &self.token.as_ref().map(|_| "<redacted>"))
			.field("expires", &self.expires)
			.field("received_at", &self.received_at)
			.finish()
	}
}

fn write_synced(path: &Path, bytes: &[u8]) -> Result<(), CallbackError> {
	let io = |action: &'static str| {
		move |source: std::io::Error| CallbackError::Io { action, path: path.to_owned(), source }
	};
	let mut file = File::create(path).map_err(io("create"))?;

	file.write_all(bytes).map_err(io("write"))?;
	file.sync_all().map_err(io("sync"))
}

#[cfg(test)]
mod tests {
	// std
	use std::env;
	// crates.io
	use time::macros;
	// self
	use super::*;

	fn scratch_path(name: &str) -> PathBuf {
		env::temp_dir()
			.join(format!("tradera-gateway-callback-{}-{name}", std::process::id()))
			.join("auth.json")
	}

	#[test]
	fn redirect_parameters_are_captured() {
		let url = Url::parse(
			"http://localhost:8000/auth/success?userId=5986811&token=abc&exp=2025-08-27T08:00:00",
		)
		.expect("Redirect fixture should parse.");
		let received = macros::datetime!(2025-08-26 08:00 UTC);
		let callback =
			AuthorizationCallback::from_redirect(&url, received).expect("Redirect should parse.");

		assert_eq!(callback.user_id.as_ref(), "5986811");
		assert_eq!(callback.token.as_deref(), Some("abc"));
		assert_eq!(callback.expires.as_deref(), Some("2025-08-27T08:00:00"));
		assert!(!format!("{callback:?}").contains("abc"));
	}

	#[test]
	fn redirect_without_user_is_rejected() {
		let url = Url::parse("http://localhost:8000/auth/success?userId=&exp=1")
			.expect("Redirect fixture should parse.");
		let err = AuthorizationCallback::from_redirect(&url, OffsetDateTime::UNIX_EPOCH)
			.expect_err("A redirect without userId must fail.");

		assert!(matches!(err, CallbackError::MissingUserId));
	}

	#[test]
	fn save_then_load_restores_record() {
		let path = scratch_path("round-trip");
		let url = Url::parse("http://localhost:8000/auth/success?userId=42&exp=soon")
			.expect("Redirect fixture should parse.");
		let received = macros::datetime!(2025-08-26 08:00 UTC);
		let callback =
			AuthorizationCallback::from_redirect(&url, received).expect("Redirect should parse.");

		callback.save(&path).expect("Saving the callback record should succeed.");

		let loaded = AuthorizationCallback::load(&path).expect("Loading should succeed.");

		assert_eq!(loaded.user_id, callback.user_id);
		assert_eq!(loaded.token, None);
		assert_eq!(loaded.expires.as_deref(), Some("soon"));
		assert_eq!(loaded.received_at, received);

		let _ = fs::remove_dir_all(path.parent().expect("Scratch path should have a parent."));
	}

	#[test]
	fn failed_save_leaves_no_temporary_file() {
		let path = scratch_path("blocked");

		// A directory at the target makes the final rename fail.
		fs::create_dir_all(&path).expect("Blocking directory should be creatable.");

		let url = Url::parse("http://localhost:8000/auth/success?userId=42")
			.expect("Redirect fixture should parse.");
		let callback = AuthorizationCallback::from_redirect(&url, OffsetDateTime::UNIX_EPOCH)
			.expect("Redirect should parse.");
		let err = callback.save(&path).expect_err("Replacing a directory must fail.");

		assert!(matches!(err, CallbackError::Io { action: "replace", .. }));
		assert!(!path.with_extension("tmp").exists());

		let _ = fs::remove_dir_all(path.parent().expect("Scratch path should have a parent."));
	}

	#[test]
	fn missing_file_is_a_configuration_error() {
		let err = AuthorizationCallback::load(scratch_path("absent"))
			.expect_err("Loading an absent record must fail.");

		assert!(matches!(err, Error::Config(ConfigError::MissingSecret { .. })));
	}

	#[test]
	fn malformed_file_reports_parse_path() {
		let path = scratch_path("malformed");

		fs::create_dir_all(path.parent().expect("Scratch path should have a parent."))
			.expect("Scratch directory should be creatable.");
		fs::write(&path, "{\"user_id\":\"bad id\",\"received_at\":\"2025-08-26T08:00:00Z\"}")
			.expect("Writing the malformed fixture should succeed.");

		let err = AuthorizationCallback::load(&path).expect_err("Malformed records must fail.");

		match err {
			Error::Callback(CallbackError::Parse { source, .. }) =>
				assert_eq!(source.path().to_string(), "user_id"),
			other => panic!("Unexpected error: {other:?}"),
		}

		let _ = fs::remove_dir_all(path.parent().expect("Scratch path should have a parent."));
	}
}

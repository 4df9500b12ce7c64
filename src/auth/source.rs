//! Where the gateway reads out-of-band secrets from.

// std
use std::{env, fs, path::PathBuf};
// self
use crate::{_prelude::*, error::ConfigError};

/// Location of a secret key or token supplied outside the process.
#[derive(Clone, PartialEq, Eq)]
pub enum SecretSource {
	/// Literal value supplied by the caller.
	Value(String),
	/// Environment variable name.
	Env(String),
	/// File whose first non-blank, non-`#` line holds the value.
	File(PathBuf),
}
impl SecretSource {
	/// Resolves the secret, failing with [`ConfigError::MissingSecret`] when nothing usable is
	/// found.
	pub fn resolve(&self) -> Result<String, ConfigError> {
		let value = match self {
			Self::Value(value) => Some(value.trim().to_owned()),
			Self::Env(name) => env::var(name).ok().map(|value| value.trim().to_owned()),
			Self::File(path) => fs::read_to_string(path).ok().and_then(|contents| {
				contents
					.lines()
					.map(str::trim)
					.find(|line| !line.is_empty() && !line.starts_with('#'))
					.map(str::to_owned)
			}),
		};

		value.filter(|value| !value.is_empty()).ok_or_else(|| ConfigError::MissingSecret {
			source_label: self.label(),
		})
	}

	fn label(&self) -> String {
		match self {
			Self::Value(_) => "the supplied value".into(),
			Self::Env(name) => format!("environment variable {name}"),
			Self::File(path) => format!("file {}", path.display()),
		}
	}
}
impl Debug for SecretSource {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		match self {
			Self::Value(_) => f.debug_tuple("SecretSource::Value").field(&"<redacted>").finish(),
			Self::Env(name) => f.debug_tuple("SecretSource::Env").field(name).finish(),
			Self::File(path) => f.debug_tuple("SecretSource::File").field(path).finish(),
		}
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn file_source_skips_comments_and_blank_lines() {
		let path = env::temp_dir().join(format!("tradera-gateway-secret-{}.txt", std::process::id()));

		fs::write(&path, "# Tradera secret\n# generated for tests\n\n  SKEY-123  \n")
			.expect("Writing the secret fixture should succeed.");

		let secret = SecretSource::File(path.clone()).resolve().expect("Secret should resolve.");

		assert_eq!(secret, "SKEY-123");

		let _ = fs::remove_file(path);
	}

	#[test]
	fn absent_sources_fail_fast() {
		let err = SecretSource::Env("TRADERA_GATEWAY_TEST_UNSET_SECRET".into())
			.resolve()
			.expect_err("Unset variables must fail.");

		assert!(matches!(err, ConfigError::MissingSecret { .. }));
		assert!(err.to_string().contains("TRADERA_GATEWAY_TEST_UNSET_SECRET"));
		assert!(SecretSource::Value("   ".into()).resolve().is_err());
		assert!(SecretSource::File("/nonexistent/tradera/secret".into()).resolve().is_err());
	}

	#[test]
	fn debug_redacts_literal_values() {
		assert!(!format!("{:?}", SecretSource::Value("hidden".into())).contains("hidden"));
	}
}

//! Numeric identifiers exchanged with the marketplace.
//!
//! The service types member, item, request and transaction ids as integers but echoes them back as text, so
//! they are kept in their decimal form and validated on the way in.

// std
use std::ops::Deref;
// self
use crate::_prelude::*;

/// Longest decimal form accepted; the service uses 32-bit ids.
const MAX_DIGITS: usize = 10;

/// Reasons a value cannot be used as a marketplace identifier.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum IdentifierError {
	/// Nothing was supplied.
	#[error("{kind} id cannot be empty.")]
	Empty {
		/// Identifier kind (user, item, request, transaction).
		kind: &'static str,
	},
	/// The value is not a plain decimal number.
	#[error("{kind} id `{value}` is not a decimal number.")]
	NotNumeric {
		/// Identifier kind (user, item, request, transaction).
		kind: &'static str,
		/// Offending value.
		value: String,
	},
	/// The value has more digits than the service accepts.
	#[error("{kind} id exceeds 10 digits.")]
	TooLong {
		/// Identifier kind (user, item, request, transaction).
		kind: &'static str,
	},
}

macro_rules! numeric_id {
	($(#[$meta:meta])* $name:ident => $kind:literal) => {
		$(#[$meta])*
		#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
		#[serde(try_from = "String", into = "String")]
		pub struct $name(String);
		impl $name {
			/// Validates `value` as a decimal id.
			pub fn new(value: impl AsRef<str>) -> Result<Self, IdentifierError> {
				digits($kind, value.as_ref()).map(|id| Self(id.to_owned()))
			}
		}
		impl From<u32> for $name {
			fn from(value: u32) -> Self {
				Self(value.to_string())
			}
		}
		impl TryFrom<String> for $name {
			type Error = IdentifierError;

			fn try_from(value: String) -> Result<Self, Self::Error> {
				Self::new(value)
			}
		}
		impl From<$name> for String {
			fn from(value: $name) -> Self {
				value.0
			}
		}
		impl FromStr for $name {
			type Err = IdentifierError;

			fn from_str(s: &str) -> Result<Self, Self::Err> {
				Self::new(s)
			}
		}
		impl Deref for $name {
			type Target = str;

			fn deref(&self) -> &str {
				&self.0
			}
		}
		impl AsRef<str> for $name {
			fn as_ref(&self) -> &str {
				&self.0
			}
		}
		impl Display for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				f.write_str(&self.0)
			}
		}
		impl Debug for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				write!(f, "{}#{}", $kind, self.0)
			}
		}
	};
}

numeric_id! {
	/// Member who authorized the application, or whose listings are read.
	UserId => "User"
}
numeric_id! {
	/// Listed or reserved marketplace item.
	ItemId => "Item"
}
numeric_id! {
	/// Ticket of a queued write, resolved by `GetRequestResults`.
	RequestId => "Request"
}
numeric_id! {
	/// Completed sale between a seller and a buyer.
	TransactionId => "Transaction"
}

/// Trims surrounding blanks and checks the remainder is a short run of ASCII digits.
fn digits<'a>(kind: &'static str, raw: &'a str) -> Result<&'a str, IdentifierError> {
	let id = raw.trim();

	if id.is_empty() {
		Err(IdentifierError::Empty { kind })
	} else if !id.bytes().all(|b| b.is_ascii_digit()) {
		Err(IdentifierError::NotNumeric { kind, value: id.to_owned() })
	} else if id.len() > MAX_DIGITS {
		Err(IdentifierError::TooLong { kind })
	} else {
		Ok(id)
	}
}

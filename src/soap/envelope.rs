//! Outbound SOAP 1.1 envelopes.

// std
use std::fmt::Write as _;
// crates.io
use quick_xml::escape::escape;
use time::format_description::well_known::Rfc3339;
// self
use crate::_prelude::*;

/// Target namespace of every marketplace operation and header.
pub const NAMESPACE: &str = "http://api.tradera.com";

/// Marketplace service an operation belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Service {
	/// Application-level operations (AppId + AppKey + PublicKey).
	Public,
	/// Member-level operations that additionally need a user token.
	Restricted,
}
impl Service {
	/// Whether calls to this service need a valid user token.
	pub const fn requires_auth(self) -> bool {
		matches!(self, Self::Restricted)
	}

	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Public => "public",
			Self::Restricted => "restricted",
		}
	}
}

/// Argument value rendered inside an operation element.
#[derive(Clone, Debug, PartialEq)]
pub enum SoapValue {
	/// Escaped text content.
	Text(String),
	/// Integer content.
	Integer(i64),
	/// Decimal content.
	Decimal(f64),
	/// `true`/`false` content.
	Boolean(bool),
	/// `xsi:nil="true"` element.
	Nil,
	/// Nested elements in order; repeat a name to build arrays.
	Element(Vec<(String, SoapValue)>),
}
impl SoapValue {
	/// Renders the value as a standalone element named `name`.
	pub fn to_xml(&self, name: &str) -> String {
		let mut out = String::new();

		self.render(name, &mut out);

		out
	}

	fn render(&self, name: &str, out: &mut String) {
		let name = escape(name);

		match self {
			Self::Text(text) => {
				let _ = write!(out, "<{name}>{}</{name}>", escape(text.as_str()));
			},
			Self::Integer(value) => {
				let _ = write!(out, "<{name}>{value}</{name}>");
			},
			Self::Decimal(value) => {
				let _ = write!(out, "<{name}>{value}</{name}>");
			},
			Self::Boolean(value) => {
				let _ = write!(out, "<{name}>{value}</{name}>");
			},
			Self::Nil => {
				let _ = write!(out, "<{name} xsi:nil=\"true\" />");
			},
			Self::Element(children) => {
				let _ = write!(out, "<{name}>");

				for (child, value) in children {
					value.render(child, out);
				}

				let _ = write!(out, "</{name}>");
			},
		}
	}
}
impl From<&str> for SoapValue {
	fn from(value: &str) -> Self {
		Self::Text(value.to_owned())
	}
}
impl From<String> for SoapValue {
	fn from(value: String) -> Self {
		Self::Text(value)
	}
}
impl From<i64> for SoapValue {
	fn from(value: i64) -> Self {
		Self::Integer(value)
	}
}
impl From<i32> for SoapValue {
	fn from(value: i32) -> Self {
		Self::Integer(value.into())
	}
}
impl From<u32> for SoapValue {
	fn from(value: u32) -> Self {
		Self::Integer(value.into())
	}
}
impl From<f64> for SoapValue {
	fn from(value: f64) -> Self {
		Self::Decimal(value)
	}
}
impl From<bool> for SoapValue {
	fn from(value: bool) -> Self {
		Self::Boolean(value)
	}
}
impl From<OffsetDateTime> for SoapValue {
	/// Renders an `xsd:dateTime`; instants RFC 3339 cannot express become nil.
	fn from(value: OffsetDateTime) -> Self {
		value.format(&Rfc3339).map(Self::Text).unwrap_or(Self::Nil)
	}
}
impl<T> From<Option<T>> for SoapValue
where
	T: Into<SoapValue>,
{
	fn from(value: Option<T>) -> Self {
		value.map(Into::into).unwrap_or(Self::Nil)
	}
}

/// One outbound operation: name, target service, and ordered arguments.
#[derive(Clone, Debug, PartialEq)]
pub struct SoapCall {
	/// Operation name as published by the service (e.g. `GetCategories`).
	pub operation: String,
	/// Service hosting the operation.
	pub service: Service,
	/// Arguments rendered in order inside the operation element.
	pub arguments: Vec<(String, SoapValue)>,
}
impl SoapCall {
	/// Creates a call to a public-service operation.
	pub fn public(operation: impl Into<String>) -> Self {
		Self { operation: operation.into(), service: Service::Public, arguments: Vec::new() }
	}

	/// Creates a call to a restricted-service operation.
	pub fn restricted(operation: impl Into<String>) -> Self {
		Self { operation: operation.into(), service: Service::Restricted, arguments: Vec::new() }
	}

	/// Appends an argument.
	pub fn arg(mut self, name: impl Into<String>, value: impl Into<SoapValue>) -> Self {
		self.arguments.push((name.into(), value.into()));

		self
	}

	/// Whether this call needs a valid user token.
	pub fn requires_auth(&self) -> bool {
		self.service.requires_auth()
	}

	/// `SOAPAction` header value.
	pub fn soap_action(&self) -> String {
		format!("\"{NAMESPACE}/{}\"", self.operation)
	}
}

/// Header values attached to an envelope.
#[derive(Clone, Copy)]
pub struct SoapHeaders<'a> {
	/// Application id (`AuthenticationHeader/AppId`).
	pub app_id: &'a str,
	/// Service key (`AuthenticationHeader/AppKey`).
	pub app_key: &'a str,
	/// `ConfigurationHeader` contents.
	pub configuration: ConfigurationHeader<'a>,
	/// `AuthorizationHeader` as `(user id, token)` for restricted calls.
	pub authorization: Option<(&'a str, &'a str)>,
}
impl Debug for SoapHeaders<'_> {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("SoapHeaders")
			.field("app_id", &self.app_id)
			.field("app_key", &"<redacted>")
			.field("configuration", &self.configuration)
			.field("authorization", &self.authorization.map(|(user, _)| (user, "<redacted>")))
			.finish()
	}
}

/// `ConfigurationHeader` variants; the two services expect different shapes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigurationHeader<'a> {
	/// Public service: the application's public key.
	Public {
		/// Public key.
		public_key: &'a str,
	},
	/// Restricted service: sandbox flag and maximum cached result age.
	Restricted {
		/// Whether to run against the sandbox.
		sandbox: bool,
		/// Maximum cached result age in seconds.
		max_result_age: u32,
	},
}

/// Renders the full envelope for `call`.
pub fn render(call: &SoapCall, headers: &SoapHeaders) -> String {
	let mut out = String::with_capacity(1024);

	out.push_str(
		"<?xml version=\"1.0\" encoding=\"utf-8\"?>\
		<soap:Envelope xmlns:xsi=\"http://www.w3.org/2001/XMLSchema-instance\" \
		xmlns:xsd=\"http://www.w3.org/2001/XMLSchema\" \
		xmlns:soap=\"http://schemas.xmlsoap.org/soap/envelope/\"><soap:Header>",
	);

	let _ = write!(
		out,
		"<AuthenticationHeader xmlns=\"{NAMESPACE}\"><AppId>{}</AppId><AppKey>{}</AppKey>\
		</AuthenticationHeader>",
		escape(headers.app_id),
		escape(headers.app_key),
	);

	if let Some((user_id, token)) = headers.authorization {
		let _ = write!(
			out,
			"<AuthorizationHeader xmlns=\"{NAMESPACE}\"><UserId>{}</UserId><Token>{}</Token>\
			</AuthorizationHeader>",
			escape(user_id),
			escape(token),
		);
	}

	match headers.configuration {
		ConfigurationHeader::Public { public_key } => {
			let _ = write!(
				out,
				"<ConfigurationHeader xmlns=\"{NAMESPACE}\"><PublicKey>{}</PublicKey>\
				</ConfigurationHeader>",
				escape(public_key),
			);
		},
		ConfigurationHeader::Restricted { sandbox, max_result_age } => {
			let _ = write!(
				out,
				"<ConfigurationHeader xmlns=\"{NAMESPACE}\"><Sandbox>{}</Sandbox>\
				<MaxResultAge>{max_result_age}</MaxResultAge></ConfigurationHeader>",
				u8::from(sandbox),
			);
		},
	}

	let operation = escape(call.operation.as_str());
	let _ = write!(out, "</soap:Header><soap:Body><{operation} xmlns=\"{NAMESPACE}\">");

	for (name, value) in &call.arguments {
		value.render(name, &mut out);
	}

	let _ = write!(out, "</{operation}></soap:Body></soap:Envelope>");

	out
}

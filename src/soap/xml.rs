//! Minimal owned XML element tree for reading SOAP responses.

// crates.io
use quick_xml::{
	Reader,
	events::{BytesStart, Event},
};
use time::{
	PrimitiveDateTime,
	format_description::{BorrowedFormatItem, well_known::Rfc3339},
	macros::format_description,
};
// self
use crate::_prelude::*;

const XSD_LOCAL_DATETIME: &[BorrowedFormatItem<'static>] =
	format_description!("[year]-[month]-[day]T[hour]:[minute]:[second][optional [.[subsecond]]]");

/// Parses an `xsd:dateTime`; values without an offset are taken as UTC.
pub fn parse_xsd_datetime(raw: &str) -> Option<OffsetDateTime> {
	let raw = raw.trim();

	if let Ok(instant) = OffsetDateTime::parse(raw, &Rfc3339) {
		return Some(instant);
	}

	PrimitiveDateTime::parse(raw, XSD_LOCAL_DATETIME).ok().map(PrimitiveDateTime::assume_utc)
}

/// Failures raised while reading an XML document.
#[derive(Debug, ThisError)]
pub enum XmlError {
	/// The document is not well-formed.
	#[error("XML is malformed.")]
	Syntax(#[from] quick_xml::Error),
	/// Start and end tags do not balance.
	#[error("XML elements are not balanced.")]
	Unbalanced,
	/// The document contains no element.
	#[error("XML document has no root element.")]
	Empty,
	/// The document is not a SOAP envelope with a body.
	#[error("SOAP envelope has no Body element.")]
	MissingBody,
}

/// Element with its local name, concatenated text, and child elements.
///
/// Namespace prefixes are dropped; SOAP payloads from the marketplace use one namespace per
/// document, so local names are unambiguous.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct XmlElement {
	/// Local name (prefix stripped).
	pub name: String,
	/// Unescaped text content, trimmed.
	pub text: String,
	/// Whether the element carried `xsi:nil="true"`.
	pub nil: bool,
	/// Attributes as `(local name, unescaped value)`, namespace declarations excluded.
	pub attributes: Vec<(String, String)>,
	/// Child elements in document order.
	pub children: Vec<XmlElement>,
}
impl XmlElement {
	/// Parses a document and returns its root element.
	pub fn parse(input: &str) -> Result<Self, XmlError> {
		let mut reader = Reader::from_str(input);

		reader.config_mut().trim_text(true);

		let mut stack: Vec<XmlElement> = Vec::new();
		let mut root = None;

		loop {
			match reader.read_event()? {
				Event::Start(start) => stack.push(Self::open(&start)?),
				Event::Empty(start) => {
					let element = Self::open(&start)?;

					attach(&mut stack, &mut root, element);
				},
				Event::End(_) => {
					let element = stack.pop().ok_or(XmlError::Unbalanced)?;

					attach(&mut stack, &mut root, element);
				},
				Event::Text(text) =>
					if let Some(current) = stack.last_mut() {
						current.text.push_str(&text.unescape()?);
					},
				Event::CData(data) =>
					if let Some(current) = stack.last_mut() {
						current.text.push_str(&String::from_utf8_lossy(&data));
					},
				Event::Eof => break,
				_ => {},
			}
		}

		if !stack.is_empty() {
			return Err(XmlError::Unbalanced);
		}

		root.ok_or(XmlError::Empty)
	}

	fn open(start: &BytesStart) -> Result<Self, XmlError> {
		let mut nil = false;
		let mut attributes = Vec::new();

		for attribute in start.attributes() {
			let attribute = attribute.map_err(quick_xml::Error::from)?;

			if attribute.key.as_namespace_binding().is_some() {
				continue;
			}

			let name = String::from_utf8_lossy(attribute.key.local_name().as_ref()).into_owned();
			let value = attribute.unescape_value()?.into_owned();

			if name == "nil" {
				nil = value == "true";
			} else {
				attributes.push((name, value));
			}
		}

		Ok(Self {
			name: String::from_utf8_lossy(start.local_name().as_ref()).into_owned(),
			nil,
			attributes,
			..Default::default()
		})
	}

	/// First direct child named `name`.
	pub fn child(&self, name: &str) -> Option<&XmlElement> {
		self.children.iter().find(|child| child.name == name)
	}

	/// All direct children named `name`.
	pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> {
		self.children.iter().filter(move |child| child.name == name)
	}

	/// First element named `name` in depth-first order, including `self`.
	pub fn find(&self, name: &str) -> Option<&XmlElement> {
		if self.name == name {
			return Some(self);
		}

		self.children.iter().find_map(|child| child.find(name))
	}

	/// Text of the direct child `name`; `None` when absent, nil, or empty.
	pub fn child_text(&self, name: &str) -> Option<&str> {
		self.child(name).filter(|child| !child.nil && !child.text.is_empty()).map(|c| c.text.as_str())
	}

	/// Value of the attribute `name`.
	pub fn attr(&self, name: &str) -> Option<&str> {
		self.attributes.iter().find(|(key, _)| key == name).map(|(_, value)| value.as_str())
	}

	/// Text of the child `name`, or else the attribute `name`.
	///
	/// Record fields arrive either way depending on the operation.
	pub fn field(&self, name: &str) -> Option<&str> {
		self.child_text(name).or_else(|| self.attr(name).filter(|value| !value.is_empty()))
	}

	/// Parses [`field`](Self::field); `None` when absent or unparseable.
	pub fn field_parse<T>(&self, name: &str) -> Option<T>
	where
		T: FromStr,
	{
		self.field(name).and_then(|text| text.trim().parse().ok())
	}

	/// Parses the text of the direct child `name`; `None` when absent or unparseable.
	pub fn child_parse<T>(&self, name: &str) -> Option<T>
	where
		T: FromStr,
	{
		self.child_text(name).and_then(|text| text.parse().ok())
	}

	/// `xsd:dateTime` text of the direct child `name`.
	pub fn child_datetime(&self, name: &str) -> Option<OffsetDateTime> {
		self.child_text(name).and_then(parse_xsd_datetime)
	}

	/// Boolean text (`true`/`1`) of the direct child `name`.
	pub fn child_bool(&self, name: &str) -> Option<bool> {
		match self.child_text(name)? {
			"true" | "1" => Some(true),
			"false" | "0" => Some(false),
			_ => None,
		}
	}
}

fn attach(stack: &mut [XmlElement], root: &mut Option<XmlElement>, element: XmlElement) {
	if let Some(parent) = stack.last_mut() {
		parent.children.push(element);
	} else if root.is_none() {
		*root = Some(element);
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn parses_nested_elements_and_strips_prefixes() {
		let root = XmlElement::parse(
			"<?xml version=\"1.0\"?><soap:Envelope xmlns:soap=\"urn:s\"><soap:Body>\
			<Item><Title>Lamp &amp; shade</Title><Notes><![CDATA[<raw>]]></Notes>\
			<Empty/><Missing xsi:nil=\"true\" xmlns:xsi=\"urn:x\"/></Item></soap:Body></soap:Envelope>",
		)
		.expect("Fixture should parse.");

		assert_eq!(root.name, "Envelope");

		let item = root.find("Item").expect("Item should be found depth-first.");

		assert_eq!(item.child_text("Title"), Some("Lamp & shade"));
		assert_eq!(item.child_text("Notes"), Some("<raw>"));
		assert_eq!(item.child_text("Empty"), None);
		assert!(item.child("Missing").expect("Nil element should be present.").nil);
		assert_eq!(item.child_text("Missing"), None);
	}

	#[test]
	fn typed_accessors_fall_back_to_none() {
		let root = XmlElement::parse("<a><n>42</n><b>true</b><x>forty</x></a>")
			.expect("Fixture should parse.");

		assert_eq!(root.child_parse::<i64>("n"), Some(42));
		assert_eq!(root.child_parse::<i64>("x"), None);
		assert_eq!(root.child_bool("b"), Some(true));
		assert_eq!(root.child_bool("x"), None);
		assert_eq!(root.children_named("n").count(), 1);
	}

	#[test]
	fn attributes_back_missing_children() {
		let root = XmlElement::parse(
			"<r xmlns=\"urn:t\"><Category Id=\"12\" Name=\"A &amp; B\"><Id>13</Id></Category></r>",
		)
		.expect("Fixture should parse.");
		let category = root.child("Category").expect("Category expected.");

		assert!(root.attributes.is_empty());
		assert_eq!(category.attr("Name"), Some("A & B"));
		assert_eq!(category.field("Name"), Some("A & B"));
		assert_eq!(category.field_parse::<i64>("Id"), Some(13));
		assert_eq!(category.field("Missing"), None);
	}

	#[test]
	fn xsd_datetimes_accept_offsets_and_local_values() {
		assert_eq!(
			parse_xsd_datetime("2025-08-27T08:00:00+02:00"),
			Some(time::macros::datetime!(2025-08-27 06:00 UTC))
		);
		assert_eq!(
			parse_xsd_datetime("2025-08-27T08:00:00.123"),
			Some(time::macros::datetime!(2025-08-27 08:00:00.123 UTC))
		);
		assert_eq!(parse_xsd_datetime("tomorrow"), None);
	}

	#[test]
	fn malformed_documents_are_rejected() {
		assert!(XmlElement::parse("<a><b></a>").is_err());
		assert!(XmlElement::parse("<a>").is_err());
		assert!(matches!(XmlElement::parse("   "), Err(XmlError::Empty)));
	}
}

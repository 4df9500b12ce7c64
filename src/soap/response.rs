//! Inbound envelope decoding and fault detection.

// self
use crate::{
	_prelude::*,
	soap::{XmlElement, XmlError},
};

/// Fault reported by the remote service.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SoapFault {
	/// Fault code (`faultcode` or `Code/Value`).
	pub code: String,
	/// Human-readable reason (`faultstring` or `Reason/Text`).
	pub message: String,
}
impl SoapFault {
	fn from_element(fault: &XmlElement) -> Self {
		let code = fault
			.child_text("faultcode")
			.or_else(|| fault.child("Code").and_then(|code| code.child_text("Value")))
			.unwrap_or("soap:Server");
		let message = fault
			.child_text("faultstring")
			.or_else(|| fault.child("Reason").and_then(|reason| reason.child_text("Text")))
			.unwrap_or_default();

		Self { code: code.to_owned(), message: message.to_owned() }
	}
}

/// Successful response body for one operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SoapResponse {
	operation: String,
	payload: XmlElement,
}
impl SoapResponse {
	/// Operation the response belongs to.
	pub fn operation(&self) -> &str {
		&self.operation
	}

	/// First element inside `soap:Body` (normally `{Operation}Response`); an unnamed empty
	/// element when the body was empty.
	pub fn payload(&self) -> &XmlElement {
		&self.payload
	}

	/// The `{Operation}Result` element, if the service returned one.
	pub fn result(&self) -> Option<&XmlElement> {
		let name = format!("{}Result", self.operation);

		self.payload.child(&name).filter(|result| !result.nil)
	}
}

/// Decoded envelope: either a response payload or a fault.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SoapOutcome {
	/// The service returned a payload.
	Response(SoapResponse),
	/// The service returned a SOAP fault.
	Fault(SoapFault),
}

/// Decodes an envelope returned for `operation`.
pub fn decode(operation: &str, body: &str) -> Result<SoapOutcome, XmlError> {
	let envelope = XmlElement::parse(body)?;
	let body = envelope.child("Body").ok_or(XmlError::MissingBody)?;

	if let Some(fault) = body.child("Fault") {
		return Ok(SoapOutcome::Fault(SoapFault::from_element(fault)));
	}

	let payload = body.children.first().cloned().unwrap_or_default();

	Ok(SoapOutcome::Response(SoapResponse { operation: operation.to_owned(), payload }))
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn soap_envelope(body: &str) -> String {
		format!(
			"<soap:Envelope xmlns:soap=\"http://schemas.xmlsoap.org/soap/envelope/\">\
			<soap:Body>{body}</soap:Body></soap:Envelope>"
		)
	}

	#[test]
	fn response_result_is_located_by_operation_name() {
		let body = soap_envelope(
			"<GetOfficalTimeResponse xmlns=\"http://api.tradera.com\">\
			<GetOfficalTimeResult>2025-08-26T08:00:00</GetOfficalTimeResult></GetOfficalTimeResponse>",
		);
		let SoapOutcome::Response(response) =
			decode("GetOfficalTime", &body).expect("Envelope should decode.")
		else {
			panic!("Expected a response payload.");
		};

		assert_eq!(response.operation(), "GetOfficalTime");
		assert_eq!(
			response.result().map(|e| e.text.as_str()),
			Some("2025-08-26T08:00:00")
		);
	}

	#[test]
	fn soap11_and_soap12_faults_are_detected() {
		let soap11 = soap_envelope(
			"<soap:Fault><faultcode>soap:Client</faultcode>\
			<faultstring>Invalid AppId</faultstring></soap:Fault>",
		);

		assert_eq!(
			decode("GetCategories", &soap11).expect("Fault should decode."),
			SoapOutcome::Fault(SoapFault {
				code: "soap:Client".into(),
				message: "Invalid AppId".into()
			})
		);

		let soap12 = soap_envelope(
			"<soap:Fault><soap:Code><soap:Value>soap:Receiver</soap:Value></soap:Code>\
			<soap:Reason><soap:Text>Boom</soap:Text></soap:Reason></soap:Fault>",
		);

		assert_eq!(
			decode("GetCategories", &soap12).expect("Fault should decode."),
			SoapOutcome::Fault(SoapFault { code: "soap:Receiver".into(), message: "Boom".into() })
		);
	}

	#[test]
	fn empty_body_yields_response_without_result() {
		let SoapOutcome::Response(response) =
			decode("GetCategories", &soap_envelope("")).expect("Empty body should decode.")
		else {
			panic!("Expected a response payload.");
		};

		assert!(response.result().is_none());
		assert!(response.payload().name.is_empty());
	}

	#[test]
	fn non_envelopes_are_rejected() {
		assert!(matches!(decode("X", "<html><p>busy</p></html>"), Err(XmlError::MissingBody)));
		assert!(matches!(decode("X", "Service Unavailable"), Err(_)));
	}
}

//! Write-style operations. None of them substitutes defaults.

// crates.io
use base64::{Engine, engine::general_purpose::STANDARD};
// self
use crate::{
	_prelude::*,
	auth::{ItemId, RequestId, TransactionId},
	gateway::Gateway,
	http::SoapTransport,
	marketplace::{
		FeedbackKind, ImageFormat, ListingDraft, PendingRequest, ShopSettingsUpdate,
		TransactionProgress,
	},
	soap::{SoapCall, SoapResponse, SoapValue},
};

const ADD_ITEM_XML: &str = "AddItemXml";
const ADD_ITEM_IMAGE: &str = "AddItemImage";
const ADD_ITEM_COMMIT: &str = "AddItemCommit";
const END_ITEM: &str = "EndItem";
const REMOVE_SHOP_ITEM: &str = "RemoveShopItem";
const SET_SHOP_SETTINGS: &str = "SetShopSettings";
const LEAVE_FEEDBACK: &str = "LeaveFeedback";
const UPDATE_TRANSACTION_STATUS: &str = "UpdateTransactionStatus";

impl<T> Gateway<T>
where
	T: SoapTransport,
{
	/// Queues a new listing. Requires a valid token.
	///
	/// The listing is created asynchronously; poll
	/// [`get_request_results`](Self::get_request_results) with the returned request id.
	pub async fn add_item_xml(&self, listing: &ListingDraft) -> Result<PendingRequest> {
		let call =
			SoapCall::restricted(ADD_ITEM_XML).arg("createItemRequestXml", listing.to_xml());
		let response = self.call(call).await?;
		let result = response.result().ok_or(Error::MalformedResponse {
			operation: ADD_ITEM_XML,
			field: "AddItemXmlResult",
		})?;
		let request_id = result
			.field("RequestId")
			.and_then(|id| RequestId::new(id).ok())
			.ok_or(Error::MalformedResponse { operation: ADD_ITEM_XML, field: "RequestId" })?;
		let item_id = result
			.field("ItemId")
			.and_then(|id| ItemId::new(id).ok())
			.ok_or(Error::MalformedResponse { operation: ADD_ITEM_XML, field: "ItemId" })?;

		Ok(PendingRequest { request_id, item_id })
	}

	/// Uploads an image for a listing created without auto-commit. Requires a valid token.
	pub async fn add_item_image(
		&self,
		item_id: &ItemId,
		image: &[u8],
		format: ImageFormat,
	) -> Result<()> {
		let call = SoapCall::restricted(ADD_ITEM_IMAGE)
			.arg("itemId", item_id.as_ref())
			.arg("imageData", STANDARD.encode(image))
			.arg("imageFormat", format.as_str())
			.arg("imageName", format!("image_{item_id}.{}", format.extension()));
		let response = self.call(call).await?;

		acknowledged(&response, ADD_ITEM_IMAGE, "AddItemImageResponse")
	}

	/// Publishes a listing created without auto-commit. Requires a valid token.
	pub async fn add_item_commit(&self, item_id: &ItemId) -> Result<()> {
		let call = SoapCall::restricted(ADD_ITEM_COMMIT).arg("itemId", item_id.as_ref());
		let response = self.call(call).await?;

		acknowledged(&response, ADD_ITEM_COMMIT, "AddItemCommitResponse")
	}

	/// Ends a listing early. Requires a valid token.
	pub async fn end_item(&self, item_id: &ItemId) -> Result<()> {
		let call = SoapCall::restricted(END_ITEM).arg("itemId", item_id.as_ref());
		let response = self.call(call).await?;

		acknowledged(&response, END_ITEM, "EndItemResponse")
	}

	/// Removes an item from the seller's shop. Requires a valid token.
	pub async fn remove_shop_item(&self, item_id: &ItemId) -> Result<()> {
		let call = SoapCall::restricted(REMOVE_SHOP_ITEM).arg("shopItemId", item_id.as_ref());
		let response = self.call(call).await?;

		acknowledged(&response, REMOVE_SHOP_ITEM, "RemoveShopItemResponse")
	}

	/// Replaces the seller's shop configuration. Requires a valid token.
	pub async fn set_shop_settings(&self, settings: &ShopSettingsUpdate) -> Result<()> {
		let call = SoapCall::restricted(SET_SHOP_SETTINGS).arg("shopSettings", settings.to_soap());
		let response = self.call(call).await?;

		acknowledged(&response, SET_SHOP_SETTINGS, "SetShopSettingsResponse")
	}

	/// Rates the counterpart of a transaction. Requires a valid token.
	pub async fn leave_feedback(
		&self,
		transaction_id: &TransactionId,
		kind: FeedbackKind,
		comment: &str,
	) -> Result<()> {
		let call = SoapCall::restricted(LEAVE_FEEDBACK)
			.arg("transactionId", transaction_id.as_ref())
			.arg("comment", comment)
			.arg("type", kind.as_str());
		let response = self.call(call).await?;

		acknowledged(&response, LEAVE_FEEDBACK, "LeaveFeedbackResponse")
	}

	/// Marks a transaction as paid, shipped or booked. Requires a valid token.
	pub async fn update_transaction_status(
		&self,
		transaction_id: &TransactionId,
		progress: TransactionProgress,
	) -> Result<()> {
		let update = SoapValue::Element(vec![
			("TransactionId".into(), transaction_id.as_ref().into()),
			("MarkAsPaidConfirmed".into(), progress.paid_confirmed.into()),
			("MarkedAsShipped".into(), progress.shipped.into()),
			("MarkShippingBooked".into(), progress.shipping_booked.into()),
		]);
		let call = SoapCall::restricted(UPDATE_TRANSACTION_STATUS)
			.arg("transactionStatusUpdateData", update);
		let response = self.call(call).await?;

		acknowledged(&response, UPDATE_TRANSACTION_STATUS, "UpdateTransactionStatusResponse")
	}
}

/// Void operations answer with an empty `{Operation}Response` element; anything else is malformed.
fn acknowledged(
	response: &SoapResponse,
	operation: &'static str,
	field: &'static str,
) -> Result<()> {
	if response.payload().name == field {
		Ok(())
	} else {
		Err(Error::MalformedResponse { operation, field })
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros;
	// self
	use super::*;
	use crate::{auth::UserId, gateway::testing::*, soap::XmlElement};

	const T0: OffsetDateTime = macros::datetime!(2025-08-26 08:00 UTC);

	async fn authorized() -> (Gateway<ScriptedTransport>, Arc<ScriptedTransport>) {
		let (gateway, transport, _clock) = scripted_gateway(100, T0);

		transport.push_ok(token_envelope("tok", "2025-08-27T08:00:00Z"));
		gateway
			.acquire_token(UserId::new("5986811").expect("User id should be valid."), "SKEY")
			.await
			.expect("Exchange should succeed.");

		(gateway, transport)
	}

	fn item() -> ItemId {
		ItemId::new("501").expect("Item id should be valid.")
	}

	#[tokio::test]
	async fn add_item_xml_returns_pending_request() {
		let (gateway, transport) = authorized().await;

		transport.push_ok(envelope(
			"<AddItemXmlResponse><AddItemXmlResult><RequestId>77</RequestId><ItemId>501</ItemId>\
			</AddItemXmlResult></AddItemXmlResponse>",
		));

		let pending = gateway
			.add_item_xml(&ListingDraft::new("Lamp", 344, 100))
			.await
			.expect("Listing should be queued.");

		assert_eq!(pending.request_id.as_ref(), "77");
		assert_eq!(pending.item_id, item());

		let sent = XmlElement::parse(&transport.requests()[1].body).expect("Envelope should parse.");
		let document = sent
			.find("createItemRequestXml")
			.map(|argument| argument.text.clone())
			.expect("Listing document expected.");

		assert!(document.starts_with("<CreateItemRequest>"));
	}

	#[tokio::test]
	async fn write_operations_never_default() {
		let (gateway, transport) = authorized().await;

		transport.push_ok(envelope("<AddItemXmlResponse/>"));
		transport.push_ok(envelope(
			"<AddItemXmlResponse><AddItemXmlResult><RequestId>77</RequestId></AddItemXmlResult>\
			</AddItemXmlResponse>",
		));
		transport.push_ok(envelope(""));

		let draft = ListingDraft::new("Lamp", 344, 100);

		assert!(matches!(
			gateway.add_item_xml(&draft).await,
			Err(Error::MalformedResponse { operation: "AddItemXml", field: "AddItemXmlResult" })
		));
		assert!(matches!(
			gateway.add_item_xml(&draft).await,
			Err(Error::MalformedResponse { operation: "AddItemXml", field: "ItemId" })
		));
		assert!(matches!(
			gateway.end_item(&item()).await,
			Err(Error::MalformedResponse { operation: "EndItem", field: "EndItemResponse" })
		));
	}

	#[tokio::test]
	async fn image_upload_then_commit() {
		let (gateway, transport) = authorized().await;

		transport.push_ok(envelope("<AddItemImageResponse xmlns=\"http://api.tradera.com\"/>"));
		transport.push_ok(envelope("<AddItemCommitResponse/>"));
		gateway
			.add_item_image(&item(), b"\x89PNG", ImageFormat::Png)
			.await
			.expect("Image upload should be acknowledged.");
		gateway.add_item_commit(&item()).await.expect("Commit should be acknowledged.");

		let requests = transport.requests();
		let upload = XmlElement::parse(&requests[1].body).expect("Envelope should parse.");
		let body = upload.find("AddItemImage").expect("Operation element expected.");

		assert_eq!(body.child_text("imageData"), Some("iVBORw=="));
		assert_eq!(body.child_text("imageFormat"), Some("Png"));
		assert_eq!(body.child_text("imageName"), Some("image_501.png"));
		assert_eq!(requests[2].soap_action, "\"http://api.tradera.com/AddItemCommit\"");
	}

	#[tokio::test]
	async fn shop_and_transaction_writes_are_acknowledged() {
		let (gateway, transport) = authorized().await;
		let transaction = TransactionId::new("9100").expect("Transaction id should be valid.");

		transport.push_ok(envelope("<RemoveShopItemResponse/>"));
		transport.push_ok(envelope("<SetShopSettingsResponse/>"));
		transport.push_ok(envelope("<LeaveFeedbackResponse/>"));
		transport.push_ok(envelope("<UpdateTransactionStatusResponse/>"));
		gateway.remove_shop_item(&item()).await.expect("Removal should be acknowledged.");
		gateway
			.set_shop_settings(&ShopSettingsUpdate::default())
			.await
			.expect("Settings should be acknowledged.");
		gateway
			.leave_feedback(&transaction, FeedbackKind::Positive, "Smooth deal")
			.await
			.expect("Feedback should be acknowledged.");
		gateway
			.update_transaction_status(&transaction, TransactionProgress::SHIPPED)
			.await
			.expect("Status update should be acknowledged.");

		let requests = transport.requests();
		let removal = XmlElement::parse(&requests[1].body).expect("Envelope should parse.");
		let settings = XmlElement::parse(&requests[2].body).expect("Envelope should parse.");
		let feedback = XmlElement::parse(&requests[3].body).expect("Envelope should parse.");
		let status = XmlElement::parse(&requests[4].body).expect("Envelope should parse.");
		let feedback = feedback.find("LeaveFeedback").expect("Operation element expected.");
		let status = status.find("transactionStatusUpdateData").expect("Update data expected.");

		assert_eq!(removal.find("shopItemId").map(|id| id.text.as_str()), Some("501"));
		assert!(settings.find("shopSettings").and_then(|s| s.child("LogoInformation")).is_some());
		assert_eq!(feedback.child_text("transactionId"), Some("9100"));
		assert_eq!(feedback.child_text("comment"), Some("Smooth deal"));
		assert_eq!(feedback.child_text("type"), Some("Positive"));
		assert_eq!(status.child_bool("MarkAsPaidConfirmed"), Some(true));
		assert_eq!(status.child_bool("MarkedAsShipped"), Some(true));
		assert_eq!(status.child_bool("MarkShippingBooked"), Some(false));
	}

	#[tokio::test]
	async fn unexpected_acknowledgement_is_malformed() {
		let (gateway, transport) = authorized().await;

		transport.push_ok(envelope("<EndItemResponse/>"));

		assert!(matches!(
			gateway.remove_shop_item(&item()).await,
			Err(Error::MalformedResponse {
				operation: "RemoveShopItem",
				field: "RemoveShopItemResponse"
			})
		));
	}

	#[tokio::test]
	async fn writes_require_a_token() {
		let (gateway, transport, _clock) = scripted_gateway(100, T0);

		assert!(matches!(gateway.end_item(&item()).await, Err(Error::MissingToken)));
		assert!(transport.requests().is_empty());
	}
}

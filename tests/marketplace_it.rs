// crates.io
use httpmock::prelude::*;
use time::macros;
// self
use tradera_gateway::{
	_preludet::*,
	auth::{ItemId, UserId},
	marketplace::{ListingDraft, core_item_fields},
};

const T0: OffsetDateTime = macros::datetime!(2025-08-26 08:00 UTC);

async fn public_mock<'a>(
	server: &'a MockServer,
	operation: &str,
	body: &str,
) -> httpmock::Mock<'a> {
	let action = format!("\"http://api.tradera.com/{operation}\"");
	let body = soap_envelope(body);

	server
		.mock_async(|when, then| {
			when.method(POST).path("/v3/publicservice.asmx").header("soapaction", action);
			then.status(200).header("content-type", "text/xml; charset=utf-8").body(body);
		})
		.await
}

#[tokio::test]
async fn reads_fall_back_to_documented_defaults() {
	let server = MockServer::start_async().await;
	let categories = public_mock(&server, "GetCategories", "<GetCategoriesResponse/>").await;
	let fields = public_mock(&server, "GetItemFieldValues", "<GetItemFieldValuesResponse/>").await;
	let item = public_mock(&server, "GetItem", "<GetItemResponse/>").await;
	let (gateway, _clock) = build_test_gateway(&server.url("/v3"), T0);

	assert!(gateway.get_categories().await.expect("Missing result should default.").is_empty());
	assert_eq!(
		gateway.get_item_field_values(344).await.expect("Missing result should default."),
		core_item_fields()
	);
	assert_eq!(
		gateway
			.get_item(&ItemId::new("501").expect("Item id should be valid."))
			.await
			.expect("Missing result should default."),
		None
	);

	categories.assert_async().await;
	fields.assert_async().await;
	item.assert_async().await;
	assert_eq!(gateway.get_rate_limit_info().calls_made, 3);
}

#[tokio::test]
async fn faults_are_never_masked_by_defaults() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/v3/publicservice.asmx");
			then.status(500).header("content-type", "text/xml; charset=utf-8").body(soap_envelope(
				"<soap:Fault><faultcode>soap:Server</faultcode>\
				<faultstring>Server was unable to process request.</faultstring></soap:Fault>",
			));
		})
		.await;
	let (gateway, _clock) = build_test_gateway(&server.url("/v3"), T0);
	let err = gateway.get_shipping_options().await.expect_err("Faults should propagate.");

	assert!(matches!(
		err,
		Error::RemoteFault { code, message }
			if code == "soap:Server" && message == "Server was unable to process request."
	));
	mock.assert_async().await;
}

#[tokio::test]
async fn seller_listing_round_trip() {
	let server = MockServer::start_async().await;
	let seller_items = public_mock(
		&server,
		"GetSellerItems",
		"<GetSellerItemsResponse xmlns=\"http://api.tradera.com\"><GetSellerItemsResult>\
		<Item><Id>501</Id><ShortDescription>Brass lamp</ShortDescription>\
		<OpeningBid>100</OpeningBid><MaxBid>140</MaxBid>\
		<EndDate>2025-09-02T20:00:00</EndDate><CategoryId>344</CategoryId></Item>\
		</GetSellerItemsResult></GetSellerItemsResponse>",
	)
	.await;
	let fetch = public_mock(
		&server,
		"FetchToken",
		"<FetchTokenResponse xmlns=\"http://api.tradera.com\"><FetchTokenResult>\
		<AuthToken>tok-seller</AuthToken></FetchTokenResult></FetchTokenResponse>",
	)
	.await;
	let add_item = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/v3/restrictedservice.asmx")
				.header("soapaction", "\"http://api.tradera.com/AddItemXml\"")
				.body_includes("<Token>tok-seller</Token>")
				.body_includes("&lt;Title&gt;Brass lamp&lt;/Title&gt;");
			then.status(200).body(soap_envelope(
				"<AddItemXmlResponse xmlns=\"http://api.tradera.com\"><AddItemXmlResult>\
				<RequestId>9001</RequestId><ItemId>502</ItemId>\
				</AddItemXmlResult></AddItemXmlResponse>",
			));
		})
		.await;
	let (gateway, _clock) = build_test_gateway(&server.url("/v3"), T0);
	let seller = UserId::new("5986811").expect("User id should be valid.");
	let items = gateway.get_seller_items(&seller).await.expect("Seller items should load.");

	assert_eq!(items.len(), 1);
	assert_eq!(items[0].title, "Brass lamp");
	assert_eq!(items[0].current_price, 140.);
	assert_eq!(items[0].quantity, 1);
	assert_eq!(items[0].end_date, Some(macros::datetime!(2025-09-02 20:00 UTC)));

	gateway.acquire_token(seller, "SKEY").await.expect("Token exchange should succeed.");

	let pending = gateway
		.add_item_xml(&ListingDraft::new("Brass lamp", 344, 100))
		.await
		.expect("Listing should be queued.");

	assert_eq!(pending.request_id.as_ref(), "9001");
	assert_eq!(pending.item_id.as_ref(), "502");
	seller_items.assert_async().await;
	fetch.assert_async().await;
	add_item.assert_async().await;
}

//! Walks the member login flow against a local mock of the Tradera services: build the login
//! URL, exchange the secret key for a token, then run a few reads and report the call budget.

// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use url::Url;
// self
use tradera_gateway::{
	auth::{Credentials, UserId},
	config::GatewayConfig,
	gateway::Gateway,
};

const NAMESPACE: &str = "http://api.tradera.com";

async fn mock_operation(server: &MockServer, operation: &str, result: &str) {
	let action = format!("\"{NAMESPACE}/{operation}\"");
	let body = format!(
		"<?xml version=\"1.0\" encoding=\"utf-8\"?>\
		<soap:Envelope xmlns:soap=\"http://schemas.xmlsoap.org/soap/envelope/\"><soap:Body>\
		<{operation}Response xmlns=\"{NAMESPACE}\">{result}</{operation}Response>\
		</soap:Body></soap:Envelope>"
	);

	server
		.mock_async(|when, then| {
			when.method(POST).header("soapaction", action);
			then.status(200).header("content-type", "text/xml; charset=utf-8").body(body);
		})
		.await;
}

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;

	mock_operation(
		&server,
		"FetchToken",
		"<FetchTokenResult><AuthToken>demo-token</AuthToken>\
		<HardExpirationTime>2099-01-01T00:00:00Z</HardExpirationTime></FetchTokenResult>",
	)
	.await;
	mock_operation(
		&server,
		"GetCategories",
		"<GetCategoriesResult><Category><Id>344</Id><Name>Lamps</Name>\
		<Category><Id>345</Id><Name>Table lamps</Name></Category></Category></GetCategoriesResult>",
	)
	.await;
	mock_operation(
		&server,
		"GetSellerItems",
		"<GetSellerItemsResult><Item><Id>501</Id><ShortDescription>Brass lamp</ShortDescription>\
		<MaxBid>140</MaxBid></Item></GetSellerItemsResult>",
	)
	.await;

	let credentials = Credentials::new("1234", "demo-service-key", "demo-public-key")?;
	let config = GatewayConfig::builder(credentials)
		.base_url(Url::parse(&server.url("/v3"))?)
		.login_page(Url::parse(&server.url("/tokenlogin"))?)
		.build()?;
	let gateway = Gateway::new(config)?;
	let login = gateway.login_request();

	println!("Member opens: {}", login.url);

	let user = UserId::new("5986811")?;
	let token = gateway.acquire_token(user.clone(), &login.secret_key).await?;

	println!("Token active until {}.", token.expires_at);

	for category in gateway.get_categories().await? {
		println!("Category {} `{}` at level {}.", category.id, category.name, category.level);
	}
	for item in gateway.get_seller_items(&user).await? {
		let id = item.item_id.as_deref().unwrap_or("unknown");

		println!("Item {id} `{}` at {}.", item.title, item.current_price);
	}

	let budget = gateway.get_rate_limit_info();

	println!(
		"{} calls made, {} remaining, window resets in {} s.",
		budget.calls_made, budget.calls_remaining, budget.seconds_until_reset
	);

	Ok(())
}

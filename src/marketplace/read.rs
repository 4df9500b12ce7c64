//! Read-style operations; each substitutes its documented default for an absent result.

// self
use crate::{
	_prelude::*,
	auth::{ItemId, RequestId, TransactionId, UserId},
	gateway::Gateway,
	http::SoapTransport,
	marketplace::{self, *},
	soap::{SoapCall, SoapValue, XmlElement},
};

const GET_CATEGORIES: &str = "GetCategories";
const GET_SELLER_ITEMS: &str = "GetSellerItems";
const GET_SHIPPING_OPTIONS: &str = "GetShippingOptions";
const GET_ITEM_FIELD_VALUES: &str = "GetItemFieldValues";
const GET_ITEM: &str = "GetItem";
const GET_MEMBER_PAYMENT_OPTIONS: &str = "GetMemberPaymentOptions";
const GET_REQUEST_RESULTS: &str = "GetRequestResults";
const GET_SELLER_TRANSACTIONS: &str = "GetSellerTransactions";
const GET_SHOP_SETTINGS: &str = "GetShopSettings";

impl<T> Gateway<T>
where
	T: SoapTransport,
{
	/// Lists marketplace categories, flattened depth-first.
	pub async fn get_categories(&self) -> Result<Vec<Category>> {
		let response = self.call(SoapCall::public(GET_CATEGORIES)).await?;

		Ok(marketplace::read_or_default(
			&response,
			GET_CATEGORIES,
			"GetCategoriesResult",
			Vec::new,
			|result| {
				let mut categories = Vec::new();

				for node in marketplace::records(result, "Categories", "Category") {
					flatten_category(node, None, 1, &mut categories);
				}

				categories
			},
		))
	}

	/// Lists the active items of `seller` across all categories.
	pub async fn get_seller_items(&self, seller: &UserId) -> Result<Vec<SellerItem>> {
		let call = SoapCall::public(GET_SELLER_ITEMS)
			.arg("userId", seller.as_ref())
			.arg("categoryId", 0)
			.arg("filterActive", "Active")
			.arg("minEndDate", SoapValue::Nil)
			.arg("maxEndDate", SoapValue::Nil)
			.arg("filterItemType", "All");
		let response = self.call(call).await?;

		Ok(marketplace::read_or_default(
			&response,
			GET_SELLER_ITEMS,
			"GetSellerItemsResult",
			Vec::new,
			|result| {
				marketplace::records(result, "Items", "Item")
					.into_iter()
					.map(|item| SellerItem {
						item_id: item_id_of(item),
						title: marketplace::text_of(item, &["ShortDescription", "Title"]),
						starting_price: marketplace::parse_of(item, &["OpeningBid", "StartingPrice"])
							.unwrap_or_default(),
						current_price: marketplace::parse_of(item, &["MaxBid", "CurrentPrice"])
							.unwrap_or_default(),
						end_date: item.child_datetime("EndDate"),
						status: marketplace::text_of(item, &["Status"]),
						category_id: item.field_parse("CategoryId"),
						quantity: item.field_parse("Quantity").unwrap_or(1),
					})
					.collect()
			},
		))
	}

	/// Lists the shipping options the marketplace offers.
	pub async fn get_shipping_options(&self) -> Result<Vec<ShippingOption>> {
		let response = self.call(SoapCall::public(GET_SHIPPING_OPTIONS)).await?;

		Ok(marketplace::read_or_default(
			&response,
			GET_SHIPPING_OPTIONS,
			"GetShippingOptionsResult",
			Vec::new,
			|result| {
				marketplace::records(result, "ShippingOptions", "ShippingOption")
					.into_iter()
					.map(|option| ShippingOption {
						id: option_id(option, "ShippingOptionId"),
						name: marketplace::text_of(option, &["Name"]),
						description: marketplace::text_of(option, &["Description"]),
						cost: option.field_parse("Cost").unwrap_or_default(),
						is_active: option.child_bool("IsActive").unwrap_or(true),
					})
					.collect()
			},
		))
	}

	/// Lists the listing fields accepted in `category_id`.
	pub async fn get_item_field_values(&self, category_id: i64) -> Result<Vec<FieldDefinition>> {
		let call = SoapCall::public(GET_ITEM_FIELD_VALUES).arg("categoryId", category_id);
		let response = self.call(call).await?;

		Ok(marketplace::read_or_default(
			&response,
			GET_ITEM_FIELD_VALUES,
			"GetItemFieldValuesResult",
			marketplace::core_item_fields,
			|result| {
				marketplace::records(result, "Fields", "Field")
					.into_iter()
					.map(|field| FieldDefinition {
						name: marketplace::text_of(field, &["Name"]),
						kind: marketplace::text_of(field, &["Type"]),
						required: field.child_bool("Required").unwrap_or(false),
						values: field
							.child("Values")
							.map(|values| {
								values
									.children
									.iter()
									.filter(|value| !value.nil && !value.text.is_empty())
									.map(|value| value.text.clone())
									.collect()
							})
							.unwrap_or_default(),
						description: marketplace::text_of(field, &["Description"]),
					})
					.collect()
			},
		))
	}

	/// Fetches one listing; `None` when the service returns no item.
	pub async fn get_item(&self, item_id: &ItemId) -> Result<Option<ItemDetails>> {
		let call = SoapCall::public(GET_ITEM).arg("itemId", item_id.as_ref());
		let response = self.call(call).await?;

		Ok(marketplace::read_or_default(
			&response,
			GET_ITEM,
			"GetItemResult",
			|| None,
			|result| {
				let item = match result.child("Item") {
					Some(item) => item,
					None if item_id_of(result).is_some() => result,
					None => return None,
				};

				Some(ItemDetails {
					item_id: item_id_of(item).unwrap_or_else(|| item_id.clone()),
					title: marketplace::text_of(item, &["ShortDescription", "Title"]),
					description: marketplace::text_of(item, &["LongDescription", "Description"]),
					starting_price: marketplace::parse_of(item, &["OpeningBid", "StartingPrice"])
						.unwrap_or_default(),
					current_price: marketplace::parse_of(item, &["MaxBid", "CurrentPrice"])
						.unwrap_or_default(),
					reserve_price: item.field_parse("ReservePrice").unwrap_or_default(),
					buy_it_now_price: item.field_parse("BuyItNowPrice").unwrap_or_default(),
					category_id: item.field_parse("CategoryId").unwrap_or_default(),
					status: marketplace::text_of(item, &["Status"]),
					start_date: item.child_datetime("StartDate"),
					end_date: item.child_datetime("EndDate"),
					quantity: item.field_parse("Quantity").unwrap_or(1),
					seller_id: item
						.child("Seller")
						.and_then(|seller| seller.field_parse("Id"))
						.or_else(|| item.field_parse("SellerId"))
						.unwrap_or_default(),
				})
			},
		))
	}

	/// Lists the payment options `member` accepts. Requires a valid token.
	pub async fn get_member_payment_options(
		&self,
		member: &UserId,
	) -> Result<Vec<PaymentOption>> {
		let call =
			SoapCall::restricted(GET_MEMBER_PAYMENT_OPTIONS).arg("memberId", member.as_ref());
		let response = self.call(call).await?;

		Ok(marketplace::read_or_default(
			&response,
			GET_MEMBER_PAYMENT_OPTIONS,
			"GetMemberPaymentOptionsResult",
			Vec::new,
			|result| {
				marketplace::records(result, "PaymentOptions", "PaymentOption")
					.into_iter()
					.map(|option| PaymentOption {
						id: option_id(option, "PaymentOptionId"),
						name: marketplace::text_of(option, &["Name"]),
						description: marketplace::text_of(option, &["Description"]),
						is_active: option.child_bool("IsActive").unwrap_or(true),
					})
					.collect()
			},
		))
	}

	/// Fetches the outcomes of queued writes. Requests without an outcome are still pending and
	/// are absent from the returned list. Requires a valid token.
	pub async fn get_request_results(
		&self,
		request_ids: &[RequestId],
	) -> Result<Vec<RequestResult>> {
		let ids = request_ids
			.iter()
			.map(|id| ("int".to_owned(), SoapValue::from(id.as_ref())))
			.collect();
		let call =
			SoapCall::restricted(GET_REQUEST_RESULTS).arg("requestIds", SoapValue::Element(ids));
		let response = self.call(call).await?;

		Ok(marketplace::read_or_default(
			&response,
			GET_REQUEST_RESULTS,
			"GetRequestResultsResult",
			Vec::new,
			|result| {
				marketplace::records(result, "RequestResults", "RequestResult")
					.into_iter()
					.filter_map(|record| {
						let request_id = RequestId::new(record.field("RequestId")?).ok()?;

						Some(RequestResult {
							request_id,
							item_id: record.field("ItemId").and_then(|id| ItemId::new(id).ok()),
							result_code: marketplace::text_of(record, &["ResultCode"]),
							message: marketplace::text_of(record, &["Message"]),
						})
					})
					.collect()
			},
		))
	}

	/// Lists the authorized seller's new transactions, optionally bounded by date. Requires a
	/// valid token.
	pub async fn get_seller_transactions(
		&self,
		since: Option<OffsetDateTime>,
		until: Option<OffsetDateTime>,
	) -> Result<Vec<Transaction>> {
		let request = SoapValue::Element(vec![
			("MinTransactionDate".into(), since.into()),
			("MaxTransactionDate".into(), until.into()),
			("Filter".into(), "New".into()),
		]);
		let call = SoapCall::restricted(GET_SELLER_TRANSACTIONS).arg("request", request);
		let response = self.call(call).await?;

		Ok(marketplace::read_or_default(
			&response,
			GET_SELLER_TRANSACTIONS,
			"GetSellerTransactionsResult",
			Vec::new,
			|result| {
				marketplace::records(result, "Transactions", "Transaction")
					.into_iter()
					.map(|transaction| Transaction {
						transaction_id: transaction
							.field("TransactionId")
							.or_else(|| transaction.field("Id"))
							.and_then(|id| TransactionId::new(id).ok()),
						item_id: transaction.field("ItemId").and_then(|id| ItemId::new(id).ok()),
						buyer_id: transaction.field_parse("BuyerId").unwrap_or_default(),
						amount: transaction.field_parse("Amount").unwrap_or_default(),
						status: transaction.field("Status").unwrap_or("Unknown").to_owned(),
						transaction_date: transaction.child_datetime("TransactionDate"),
						payment_method: marketplace::text_of(transaction, &["PaymentMethod"]),
						shipping_method: marketplace::text_of(transaction, &["ShippingMethod"]),
					})
					.collect()
			},
		))
	}

	/// Reads the authorized seller's shop settings; `None` when the service returns none.
	/// Requires a valid token.
	pub async fn get_shop_settings(&self) -> Result<Option<ShopSettings>> {
		let response = self.call(SoapCall::restricted(GET_SHOP_SETTINGS)).await?;

		Ok(marketplace::read_or_default(
			&response,
			GET_SHOP_SETTINGS,
			"GetShopSettingsResult",
			|| None,
			|result| {
				result.child("ShopSettings").map(|settings| ShopSettings {
					shop_name: marketplace::text_of(settings, &["ShopName"]),
					shop_description: marketplace::text_of(settings, &["ShopDescription"]),
					shop_url: marketplace::text_of(settings, &["ShopUrl"]),
					is_active: settings.child_bool("IsActive").unwrap_or(true),
					default_payment_method: settings
						.field_parse("DefaultPaymentMethod")
						.unwrap_or(1),
					default_shipping_option: settings
						.field_parse("DefaultShippingOption")
						.unwrap_or(1),
				})
			},
		))
	}
}

fn item_id_of(item: &XmlElement) -> Option<ItemId> {
	item.field("Id").or_else(|| item.field("ItemId")).and_then(|id| ItemId::new(id).ok())
}

fn option_id(option: &XmlElement, long_name: &str) -> i64 {
	marketplace::parse_of(option, &["Id", long_name]).unwrap_or_default()
}

fn flatten_category(
	node: &XmlElement,
	parent_id: Option<i64>,
	level: u32,
	out: &mut Vec<Category>,
) {
	let id = marketplace::parse_of(node, &["Id", "CategoryId"]).unwrap_or_default();

	out.push(Category {
		id,
		name: marketplace::text_of(node, &["Name"]),
		parent_id: parent_id.or_else(|| node.field_parse("ParentId")),
		level: node.field_parse("Level").unwrap_or(level),
	});

	for child in node.children_named("Category") {
		flatten_category(child, Some(id), level + 1, out);
	}
}

//! Listing drafts submitted through `AddItemXml`.

// self
use crate::{_prelude::*, soap::SoapValue};

/// Shipping choice attached to a listing: option id and cost.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingShipping {
	/// Shipping option id.
	pub id: i64,
	/// Cost in whole currency units.
	pub cost: i64,
}

/// Image encodings accepted by `AddItemImage`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImageFormat {
	/// JPEG image.
	Jpeg,
	/// PNG image.
	Png,
	/// GIF image.
	Gif,
}
impl ImageFormat {
	/// Wire label.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Jpeg => "Jpeg",
			Self::Png => "Png",
			Self::Gif => "Gif",
		}
	}

	/// File extension used when naming uploads.
	pub const fn extension(self) -> &'static str {
		match self {
			Self::Jpeg => "jpg",
			Self::Png => "png",
			Self::Gif => "gif",
		}
	}
}

/// New listing, rendered as a `CreateItemRequest` document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ListingDraft {
	/// Listing title.
	pub title: String,
	/// Listing description.
	pub description: String,
	/// Target category.
	pub category_id: i64,
	/// Opening price.
	pub start_price: i64,
	/// Reserve price, 0 for none.
	pub reserve_price: i64,
	/// Buy-it-now price, 0 for none.
	pub buy_it_now_price: i64,
	/// Listing length in days (3 to 14).
	pub duration_days: u32,
	/// Automatic restarts when unsold.
	pub restarts: u32,
	/// Item type (1 = auction).
	pub item_type: u32,
	/// Accepted bidder class (1 to 4).
	pub accepted_bidder_id: u32,
	/// VAT percentage.
	pub vat: u32,
	/// Commit immediately instead of waiting for `AddItemCommit`.
	pub auto_commit: bool,
	/// Free-text shipping terms.
	pub shipping_condition: String,
	/// Free-text payment terms.
	pub payment_condition: String,
	/// Accepted payment options.
	pub payment_option_ids: Vec<i64>,
	/// Offered shipping options.
	pub shipping_options: Vec<ListingShipping>,
	/// Item attribute ids.
	pub item_attributes: Vec<i64>,
	/// Seller references.
	pub own_references: Vec<String>,
}
impl ListingDraft {
	/// Creates an auction draft with the marketplace's usual defaults (7 days, 25% VAT,
	/// auto-commit, payment option 1, free shipping option 1).
	pub fn new(title: impl Into<String>, category_id: i64, start_price: i64) -> Self {
		Self {
			title: title.into(),
			description: String::new(),
			category_id,
			start_price,
			reserve_price: 0,
			buy_it_now_price: 0,
			duration_days: 7,
			restarts: 0,
			item_type: 1,
			accepted_bidder_id: 1,
			vat: 25,
			auto_commit: true,
			shipping_condition: String::new(),
			payment_condition: String::new(),
			payment_option_ids: vec![1],
			shipping_options: vec![ListingShipping { id: 1, cost: 0 }],
			item_attributes: vec![1],
			own_references: Vec::new(),
		}
	}

	/// Sets the description.
	pub fn description(mut self, description: impl Into<String>) -> Self {
		self.description = description.into();

		self
	}

	/// Sets the buy-it-now price.
	pub fn buy_it_now_price(mut self, price: i64) -> Self {
		self.buy_it_now_price = price;

		self
	}

	/// Sets the listing length in days.
	pub fn duration_days(mut self, days: u32) -> Self {
		self.duration_days = days;

		self
	}

	/// Toggles auto-commit; disable it to upload images before committing.
	pub fn auto_commit(mut self, auto_commit: bool) -> Self {
		self.auto_commit = auto_commit;

		self
	}

	/// Replaces the shipping options.
	pub fn shipping_options(mut self, options: Vec<ListingShipping>) -> Self {
		self.shipping_options = options;

		self
	}

	/// Renders the `CreateItemRequest` document.
	pub fn to_xml(&self) -> String {
		let list = |item: &str, values: &[i64]| {
			SoapValue::Element(
				values.iter().map(|value| (item.to_owned(), SoapValue::from(*value))).collect(),
			)
		};
		let shipping = SoapValue::Element(
			self.shipping_options
				.iter()
				.map(|option| {
					(
						"ShippingOption".to_owned(),
						SoapValue::Element(vec![
							("Id".into(), option.id.into()),
							("Cost".into(), option.cost.into()),
						]),
					)
				})
				.collect(),
		);
		let references = SoapValue::Element(
			self.own_references
				.iter()
				.map(|reference| ("OwnReference".to_owned(), reference.as_str().into()))
				.collect(),
		);
		let fields: Vec<(String, SoapValue)> = vec![
			("AutoCommit".into(), self.auto_commit.into()),
			("ItemType".into(), self.item_type.into()),
			("Title".into(), self.title.as_str().into()),
			("ShippingCondition".into(), self.shipping_condition.as_str().into()),
			("PaymentCondition".into(), self.payment_condition.as_str().into()),
			("CategoryId".into(), self.category_id.into()),
			("Duration".into(), self.duration_days.into()),
			("Restarts".into(), self.restarts.into()),
			("StartPrice".into(), self.start_price.into()),
			("ReservePrice".into(), self.reserve_price.into()),
			("BuyItNowPrice".into(), self.buy_it_now_price.into()),
			("Description".into(), self.description.as_str().into()),
			("AcceptedBidderId".into(), self.accepted_bidder_id.into()),
			("VAT".into(), self.vat.into()),
			("OwnReferences".into(), references),
			("ExpoItemIds".into(), SoapValue::Element(Vec::new())),
			("PaymentOptionIds".into(), list("PaymentOptionId", &self.payment_option_ids)),
			("ShippingOptions".into(), shipping),
			("ItemAttributes".into(), list("ItemAttribute", &self.item_attributes)),
		];

		SoapValue::Element(fields).to_xml("CreateItemRequest")
	}
}

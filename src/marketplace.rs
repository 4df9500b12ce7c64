//! Typed marketplace operations layered on [`Gateway::call`](crate::gateway::Gateway::call).
//!
//! # Defaults
//!
//! Read-style operations never fail because their result field is absent. Each one substitutes
//! the default listed below, logs a warning, and counts the substitution:
//!
//! | Operation | Service | Default when the result field is absent |
//! |---|---|---|
//! | [`get_categories`](crate::gateway::Gateway::get_categories) | public | empty list |
//! | [`get_seller_items`](crate::gateway::Gateway::get_seller_items) | public | empty list |
//! | [`get_shipping_options`](crate::gateway::Gateway::get_shipping_options) | public | empty list |
//! | [`get_item_field_values`](crate::gateway::Gateway::get_item_field_values) | public | [`core_item_fields`] |
//! | [`get_item`](crate::gateway::Gateway::get_item) | public | `None` |
//! | [`get_member_payment_options`](crate::gateway::Gateway::get_member_payment_options) | restricted | empty list |
//! | [`get_request_results`](crate::gateway::Gateway::get_request_results) | restricted | empty list (requests stay pending) |
//! | [`get_seller_transactions`](crate::gateway::Gateway::get_seller_transactions) | restricted | empty list |
//! | [`get_shop_settings`](crate::gateway::Gateway::get_shop_settings) | restricted | `None` |
//!
//! Fields missing inside a present record default to an empty string, zero, or `None`, except
//! quantities (1), activity flags (`true`), default shop payment and shipping options (1), and
//! transaction statuses (`Unknown`).
//!
//! Transport failures, faults, budget and token errors are never replaced by defaults. Write
//! operations never default either: a missing result is [`Error::MalformedResponse`].

mod listing;
mod read;
mod shop;
mod write;

pub use listing::*;
pub use shop::*;

// self
use crate::{
	_prelude::*,
	auth::{ItemId, RequestId, TransactionId},
	obs,
	soap::{SoapResponse, XmlElement},
};

/// Marketplace category, flattened depth-first from the category tree.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
	/// Category id.
	pub id: i64,
	/// Display name.
	pub name: String,
	/// Parent category, `None` for top-level categories.
	pub parent_id: Option<i64>,
	/// Depth in the tree, starting at 1.
	pub level: u32,
}

/// Listing owned by a seller.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SellerItem {
	/// Item id, `None` when the record omitted it.
	pub item_id: Option<ItemId>,
	/// Listing title.
	pub title: String,
	/// Opening price.
	pub starting_price: f64,
	/// Current bid or price.
	pub current_price: f64,
	/// Scheduled end.
	#[serde(default, with = "time::serde::rfc3339::option")]
	pub end_date: Option<OffsetDateTime>,
	/// Provider status label.
	pub status: String,
	/// Category the item is listed in.
	pub category_id: Option<i64>,
	/// Units offered.
	pub quantity: u32,
}

/// Shipping option offered by the marketplace.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShippingOption {
	/// Option id.
	pub id: i64,
	/// Display name.
	pub name: String,
	/// Description.
	pub description: String,
	/// Cost in whole currency units.
	pub cost: f64,
	/// Whether the option can currently be chosen.
	pub is_active: bool,
}

/// Payment option accepted by a member.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentOption {
	/// Option id.
	pub id: i64,
	/// Display name.
	pub name: String,
	/// Description.
	pub description: String,
	/// Whether the option can currently be chosen.
	pub is_active: bool,
}

/// Listing field accepted for a category.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDefinition {
	/// Field name.
	pub name: String,
	/// Value type label (`string`, `text`, `decimal`, `integer`, ...).
	pub kind: String,
	/// Whether listings must supply the field.
	pub required: bool,
	/// Allowed values, empty when free-form.
	pub values: Vec<String>,
	/// Description.
	pub description: String,
}

/// Full listing details.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ItemDetails {
	/// Item id.
	pub item_id: ItemId,
	/// Listing title.
	pub title: String,
	/// Listing description.
	pub description: String,
	/// Opening price.
	pub starting_price: f64,
	/// Current bid or price.
	pub current_price: f64,
	/// Reserve price.
	pub reserve_price: f64,
	/// Buy-it-now price.
	pub buy_it_now_price: f64,
	/// Category the item is listed in.
	pub category_id: i64,
	/// Provider status label.
	pub status: String,
	/// Listing start.
	#[serde(default, with = "time::serde::rfc3339::option")]
	pub start_date: Option<OffsetDateTime>,
	/// Scheduled end.
	#[serde(default, with = "time::serde::rfc3339::option")]
	pub end_date: Option<OffsetDateTime>,
	/// Units offered.
	pub quantity: u32,
	/// Seller member id.
	pub seller_id: i64,
}

/// Identifier of a queued write, resolved later through
/// [`get_request_results`](crate::gateway::Gateway::get_request_results).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PendingRequest {
	/// Queue ticket.
	pub request_id: RequestId,
	/// Item id reserved for the listing.
	pub item_id: ItemId,
}

/// Outcome of a queued write.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestResult {
	/// Queue ticket this result resolves.
	pub request_id: RequestId,
	/// Item id the request produced, when any.
	pub item_id: Option<ItemId>,
	/// Provider result code (`Ok`, `Error`, ...).
	pub result_code: String,
	/// Provider message.
	pub message: String,
}
impl RequestResult {
	/// Whether the provider reported success.
	pub fn is_success(&self) -> bool {
		["ok", "success"].iter().any(|code| self.result_code.eq_ignore_ascii_case(code))
	}
}

/// Sale recorded for the authorized seller.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
	/// Transaction id, `None` when the record omitted it.
	pub transaction_id: Option<TransactionId>,
	/// Item that was sold.
	pub item_id: Option<ItemId>,
	/// Buyer member id.
	pub buyer_id: i64,
	/// Amount paid.
	pub amount: f64,
	/// Provider status label, `Unknown` when absent.
	pub status: String,
	/// Instant the sale was made.
	#[serde(default, with = "time::serde::rfc3339::option")]
	pub transaction_date: Option<OffsetDateTime>,
	/// Payment method label.
	pub payment_method: String,
	/// Shipping method label.
	pub shipping_method: String,
}

/// Shop configuration of the authorized seller.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopSettings {
	/// Shop display name.
	pub shop_name: String,
	/// Shop description.
	pub shop_description: String,
	/// Public shop URL.
	pub shop_url: String,
	/// Whether the shop is open.
	pub is_active: bool,
	/// Payment option preselected for new shop items.
	pub default_payment_method: i64,
	/// Shipping option preselected for new shop items.
	pub default_shipping_option: i64,
}

/// Rating attached to feedback on a transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeedbackKind {
	/// Positive rating.
	Positive,
	/// Neutral rating.
	Neutral,
	/// Negative rating.
	Negative,
}
impl FeedbackKind {
	/// Wire label.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Positive => "Positive",
			Self::Neutral => "Neutral",
			Self::Negative => "Negative",
		}
	}
}

/// Progress flags a seller can set on a transaction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionProgress {
	/// Payment received.
	pub paid_confirmed: bool,
	/// Parcel handed to the carrier.
	pub shipped: bool,
	/// Shipping booked with the carrier.
	pub shipping_booked: bool,
}
impl TransactionProgress {
	/// Payment confirmed, nothing shipped yet.
	pub const PAID: Self = Self { paid_confirmed: true, shipped: false, shipping_booked: false };
	/// Paid and shipped.
	pub const SHIPPED: Self = Self { paid_confirmed: true, shipped: true, shipping_booked: false };
	/// Paid, shipped, and shipping booked.
	pub const COMPLETED: Self = Self { paid_confirmed: true, shipped: true, shipping_booked: true };
}

/// Listing fields returned by `get_item_field_values` when the service omits its result.
pub fn core_item_fields() -> Vec<FieldDefinition> {
	[
		("Title", "string", true, "Item title"),
		("Description", "text", false, "Item description"),
		("StartingPrice", "decimal", true, "Starting price"),
		("CategoryId", "integer", true, "Category ID"),
	]
	.into_iter()
	.map(|(name, kind, required, description)| FieldDefinition {
		name: name.into(),
		kind: kind.into(),
		required,
		values: Vec::new(),
		description: description.into(),
	})
	.collect()
}

/// Runs `parse` on the result element, or records a fallback and returns `default()`.
fn read_or_default<R>(
	response: &SoapResponse,
	operation: &'static str,
	field: &'static str,
	default: impl FnOnce() -> R,
	parse: impl FnOnce(&XmlElement) -> R,
) -> R {
	match response.result() {
		Some(result) => parse(result),
		None => {
			obs::record_fallback(operation, field);

			default()
		},
	}
}

/// Records under `result`, either wrapped (`<Items><Item/>..</Items>`) or direct children.
fn records<'a>(result: &'a XmlElement, wrapper: &str, item: &'a str) -> Vec<&'a XmlElement> {
	match result.child(wrapper) {
		Some(list) => list.children_named(item).collect(),
		None => result.children_named(item).collect(),
	}
}

/// First present field among `names`, or an empty string.
fn text_of(element: &XmlElement, names: &[&str]) -> String {
	names.iter().find_map(|name| element.field(name)).unwrap_or_default().to_owned()
}

/// First field among `names` that parses as `T`.
fn parse_of<T>(element: &XmlElement, names: &[&str]) -> Option<T>
where
	T: FromStr,
{
	names.iter().find_map(|name| element.field_parse(name))
}

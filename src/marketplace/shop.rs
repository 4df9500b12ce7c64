//! Shop configuration submitted through `SetShopSettings`.

// crates.io
use base64::{Engine, engine::general_purpose::STANDARD};
// self
use crate::{_prelude::*, marketplace::ImageFormat, soap::SoapValue};

/// Replacement shop logo.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopLogo {
	/// Image encoding.
	pub format: ImageFormat,
	/// Raw image bytes; base64-encoded on the wire.
	pub data: Vec<u8>,
}

/// Full shop configuration; every field is sent, so start from [`Default`] and override.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopSettingsUpdate {
	/// Company details shown on the shop page.
	pub company_information: String,
	/// Purchase terms shown to buyers.
	pub purchase_terms: String,
	/// Show items as a gallery.
	pub show_gallery_mode: bool,
	/// Show auction items in the shop.
	pub show_auction_view: bool,
	/// New logo, `None` to keep the current one.
	pub logo: Option<ShopLogo>,
	/// Drop the current logo.
	pub remove_logo: bool,
	/// Banner colour as `#RRGGBB`.
	pub banner_color: String,
	/// Close the shop temporarily.
	pub is_temporary_closed: bool,
	/// Notice shown while the shop is closed.
	pub temporary_closed_message: String,
	/// Contact details shown to buyers.
	pub contact_information: String,
	/// External logo URL.
	pub logo_image_url: String,
	/// Ceiling on simultaneously active items.
	pub max_active_items: u32,
	/// Ceiling on inventory items.
	pub max_inventory_items: u32,
}
impl ShopSettingsUpdate {
	/// Builds the `ShopSettingsData` argument.
	pub fn to_soap(&self) -> SoapValue {
		let (format, data) = match &self.logo {
			Some(logo) => (logo.format, STANDARD.encode(&logo.data)),
			None => (ImageFormat::Jpeg, String::new()),
		};
		let logo = SoapValue::Element(vec![
			("ImageFormat".into(), format.as_str().into()),
			("ImageData".into(), data.into()),
			("RemoveLogo".into(), self.remove_logo.into()),
		]);

		SoapValue::Element(vec![
			("CompanyInformation".into(), self.company_information.as_str().into()),
			("PurchaseTerms".into(), self.purchase_terms.as_str().into()),
			("ShowGalleryMode".into(), self.show_gallery_mode.into()),
			("ShowAuctionView".into(), self.show_auction_view.into()),
			("LogoInformation".into(), logo),
			("BannerColor".into(), self.banner_color.as_str().into()),
			("IsTemporaryClosed".into(), self.is_temporary_closed.into()),
			("TemporaryClosedMessage".into(), self.temporary_closed_message.as_str().into()),
			("ContactInformation".into(), self.contact_information.as_str().into()),
			("LogoImageUrl".into(), self.logo_image_url.as_str().into()),
			("MaxActiveItems".into(), self.max_active_items.into()),
			("MaxInventoryItems".into(), self.max_inventory_items.into()),
		])
	}
}
impl Default for ShopSettingsUpdate {
	fn default() -> Self {
		Self {
			company_information: String::new(),
			purchase_terms: String::new(),
			show_gallery_mode: true,
			show_auction_view: true,
			logo: None,
			remove_logo: false,
			banner_color: "#FFFFFF".into(),
			is_temporary_closed: false,
			temporary_closed_message: String::new(),
			contact_information: String::new(),
			logo_image_url: String::new(),
			max_active_items: 100,
			max_inventory_items: 1_000,
		}
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::soap::XmlElement;

	#[test]
	fn settings_render_every_field_with_logo() {
		let update = ShopSettingsUpdate {
			company_information: "Lamps & Co".into(),
			logo: Some(ShopLogo { format: ImageFormat::Png, data: b"\x89PNG".to_vec() }),
			..Default::default()
		};
		let doc = XmlElement::parse(&update.to_soap().to_xml("shopSettings"))
			.expect("Settings should render valid XML.");
		let logo = doc.child("LogoInformation").expect("Logo element expected.");

		assert_eq!(doc.child_text("CompanyInformation"), Some("Lamps & Co"));
		assert_eq!(doc.child_text("BannerColor"), Some("#FFFFFF"));
		assert_eq!(doc.child_parse::<u32>("MaxInventoryItems"), Some(1_000));
		assert_eq!(doc.child_bool("ShowGalleryMode"), Some(true));
		assert_eq!(logo.child_text("ImageFormat"), Some("Png"));
		assert_eq!(logo.child_text("ImageData"), Some("iVBORw=="));
		assert_eq!(logo.child_bool("RemoveLogo"), Some(false));
	}
}

//! Quotation input model
//!
//! Field names follow the camelCase JSON produced by the calculator app.

use chrono::NaiveDateTime;
use quote_text::Grouping;
use serde::{Deserialize, Serialize};

/// Company name used when branding does not supply one
pub const DEFAULT_COMPANY_NAME: &str = "Aluminium & Glass Works";
/// Tagline used when branding does not supply one
pub const DEFAULT_TAGLINE: &str = "Premium Windows, Doors & Glass Solutions";

/// Kind of fabricated item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    Window,
    Door,
}

impl ItemType {
    pub fn label(&self) -> &'static str {
        match self {
            ItemType::Window => "Window",
            ItemType::Door => "Door",
        }
    }
}

/// One priced line of the quotation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotationItem {
    pub name: String,
    #[serde(rename = "type")]
    pub item_type: ItemType,
    /// Width in feet
    pub width: f64,
    /// Height in feet
    pub height: f64,
    /// Area in the configured area unit
    pub area: f64,
    pub rate: f64,
    pub total: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub glass_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_type: Option<String>,
}

impl QuotationItem {
    /// Quantity shown in the table; absent means one piece
    pub fn display_quantity(&self) -> u32 {
        self.quantity.unwrap_or(1)
    }
}

/// The quotation being rendered
///
/// Aggregates are trusted as supplied and never recomputed from the items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotationData {
    pub invoice_number: String,
    #[serde(with = "timestamp")]
    pub date: NaiveDateTime,
    pub customer_name: String,
    #[serde(default)]
    pub customer_phone: String,
    #[serde(default)]
    pub customer_email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_address: Option<String>,
    #[serde(default)]
    pub items: Vec<QuotationItem>,
    pub subtotal: f64,
    pub tax: f64,
    pub grand_total: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terms_and_conditions: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub advance_paid: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub round_off: Option<f64>,
}

impl QuotationData {
    /// Balance Due, shown only when a discount or advance is present
    pub fn balance_due(&self) -> Option<f64> {
        if self.discount.is_none() && self.advance_paid.is_none() {
            return None;
        }
        Some(self.grand_total - self.advance_paid.unwrap_or(0.0) - self.discount.unwrap_or(0.0))
    }

    /// Sum of item areas
    pub fn total_area(&self) -> f64 {
        self.items.iter().map(|item| item.area).sum()
    }
}

/// Caller-specified watermark, overriding every mode default
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WatermarkOptions {
    pub text: String,
    #[serde(default = "default_watermark_opacity")]
    pub opacity: f64,
    /// Hex colour, gray when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

fn default_watermark_opacity() -> f64 {
    0.1
}

/// Signer details stamped on the first page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DigitalSignature {
    pub signer_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signer_title: Option<String>,
    /// Data URL or bare base64 of a PNG/JPEG signature
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

/// Company identity
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Branding {
    /// Data URL of an SVG, PNG or JPEG logo
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tagline: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
}

/// QR code overlay target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QrCodeOptions {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// Currency presentation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CurrencyOptions {
    pub symbol: String,
    pub grouping: Grouping,
    /// Main unit in amount-in-words, e.g. "Rupees"
    pub major_unit: String,
    /// Fractional unit in amount-in-words, e.g. "Paise"
    pub minor_unit: String,
}

impl Default for CurrencyOptions {
    fn default() -> Self {
        Self {
            symbol: "Rs.".to_string(),
            grouping: Grouping::Indian,
            major_unit: "Rupees".to_string(),
            minor_unit: "Paise".to_string(),
        }
    }
}

impl CurrencyOptions {
    /// "Rs. 15,000.00"
    pub fn format(&self, amount: f64) -> String {
        quote_text::format_money(amount, &self.symbol, self.grouping)
    }

    /// Plain grouped number with `decimals` places, no symbol
    pub fn number(&self, value: f64, decimals: u8) -> String {
        quote_text::render_float(value, decimals, self.grouping)
    }

    /// "Rupees Twenty Thousand Only"
    pub fn in_words(&self, amount: f64) -> String {
        quote_text::amount_in_words(amount, &self.major_unit, &self.minor_unit, self.grouping)
    }
}

/// Tunable layout constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LayoutConfig {
    /// Days added to the issue date for "Valid Until"
    pub validity_days: u32,
    /// kg per area unit used for the table's Weight column
    pub table_weight_density: f64,
    /// kg per area unit used for the material summary's frame weight
    pub summary_weight_density: f64,
    pub rate_note: String,
    pub area_unit: String,
    /// Product attribution in the footer
    pub attribution: String,
    pub amount_in_words: bool,
    /// Hex colour of bands, header row and Grand Total bar
    pub brand_color: String,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            validity_days: 30,
            table_weight_density: 2.5,
            summary_weight_density: 2.5,
            rate_note: "Rates include fabrication, hardware and installation".to_string(),
            area_unit: "sq.ft".to_string(),
            attribution: "Generated with GlassQuote".to_string(),
            amount_in_words: true,
            brand_color: "#1e40af".to_string(),
        }
    }
}

/// Per-render configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PdfOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub watermark: Option<WatermarkOptions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub digital_signature: Option<DigitalSignature>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branding: Option<Branding>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qr_code: Option<QrCodeOptions>,
    pub confidential: bool,
    pub draft: bool,
    pub currency: CurrencyOptions,
    pub layout: LayoutConfig,
}

fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(|s| s.trim()).filter(|s| !s.is_empty())
}

impl PdfOptions {
    pub fn company_name(&self) -> &str {
        non_empty(self.branding.as_ref().and_then(|b| b.company_name.as_ref()))
            .unwrap_or(DEFAULT_COMPANY_NAME)
    }

    pub fn tagline(&self) -> &str {
        non_empty(self.branding.as_ref().and_then(|b| b.tagline.as_ref()))
            .unwrap_or(DEFAULT_TAGLINE)
    }

    pub fn logo(&self) -> Option<&str> {
        non_empty(self.branding.as_ref().and_then(|b| b.logo.as_ref()))
    }

    /// Phone, email and website joined with separators; empty when none set
    pub fn contact_line(&self) -> String {
        let Some(branding) = &self.branding else {
            return String::new();
        };
        [&branding.phone, &branding.email, &branding.website]
            .into_iter()
            .filter_map(|v| non_empty(v.as_ref()))
            .collect::<Vec<_>>()
            .join("  |  ")
    }

    pub fn address(&self) -> Option<&str> {
        non_empty(self.branding.as_ref().and_then(|b| b.address.as_ref()))
    }

    /// Whether page 1 reserves the strip above the footer for overlays
    pub fn has_overlays(&self) -> bool {
        self.qr_code.is_some() || self.digital_signature.is_some()
    }
}

/// Timestamps accept RFC 3339 or a bare date and serialise without offset
mod timestamp {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.format("%Y-%m-%dT%H:%M:%S").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        quote_text::parse_date(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn data(discount: Option<f64>, advance: Option<f64>) -> QuotationData {
        serde_json::from_value(json!({
            "invoiceNumber": "Q-1",
            "date": "2024-01-15",
            "customerName": "A",
            "subtotal": 18000.0,
            "tax": 2000.0,
            "grandTotal": 20000.0,
            "discount": discount,
            "advancePaid": advance,
        }))
        .unwrap()
    }

    #[test]
    fn test_balance_due_absent_without_adjustments() {
        assert_eq!(data(None, None).balance_due(), None);
    }

    #[test]
    fn test_balance_due_formula() {
        assert_eq!(data(None, Some(5000.0)).balance_due(), Some(15000.0));
        assert_eq!(data(Some(1000.0), Some(5000.0)).balance_due(), Some(14000.0));
        assert_eq!(data(Some(500.0), None).balance_due(), Some(19500.0));
    }

    #[test]
    fn test_item_type_serde() {
        let item: QuotationItem = serde_json::from_value(json!({
            "name": "Sliding Window",
            "type": "window",
            "width": 4.0,
            "height": 5.0,
            "area": 20.0,
            "rate": 450.0,
            "total": 9000.0
        }))
        .unwrap();
        assert_eq!(item.item_type, ItemType::Window);
        assert_eq!(item.display_quantity(), 1);
        assert_eq!(item.glass_type, None);
    }

    #[test]
    fn test_options_defaults() {
        let options: PdfOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(options.company_name(), DEFAULT_COMPANY_NAME);
        assert_eq!(options.layout.validity_days, 30);
        assert_eq!(options.layout.table_weight_density, 2.5);
        assert_eq!(options.currency.symbol, "Rs.");
        assert!(!options.has_overlays());
        assert_eq!(options.contact_line(), "");
    }

    #[test]
    fn test_watermark_default_opacity() {
        let wm: WatermarkOptions = serde_json::from_value(json!({ "text": "SAMPLE" })).unwrap();
        assert_eq!(wm.opacity, 0.1);
    }

    #[test]
    fn test_contact_line_skips_blanks() {
        let options = PdfOptions {
            branding: Some(Branding {
                phone: Some("+91 98765 43210".to_string()),
                email: Some("  ".to_string()),
                website: Some("glass.example".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert_eq!(options.contact_line(), "+91 98765 43210  |  glass.example");
    }

    #[test]
    fn test_date_round_trip_format() {
        let d = data(None, None);
        let value = serde_json::to_value(&d).unwrap();
        assert_eq!(value["date"], json!("2024-01-15T00:00:00"));
    }
}

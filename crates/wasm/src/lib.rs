//! WASM bindings for the quotation engine
//!
//! This crate provides JavaScript-friendly API for:
//! - Generating quotation PDFs from the calculator's data objects
//! - Validating quotation JSON
//! - Money, amount-in-words and date formatting
//!
//! # Example (JavaScript)
//!
//! ```javascript
//! import init, { generateQuotationPdf, QuotationPdf, QuotationFormatter } from 'quotation-wasm';
//!
//! await init();
//!
//! // One shot
//! const bytes = generateQuotationPdf(quotation, { draft: true });
//!
//! // Or keep a document around
//! const pdf = QuotationPdf.fromJson(quotationJson, optionsJson);
//! const output = pdf.render();
//!
//! QuotationFormatter.formatMoney(15000, "Rs.", false); // "Rs. 15,000.00"
//! ```

use quotation::parser::{validate_options, validate_quotation};
use quotation::{PdfOptions, QuotationData, QuotationRenderer};
use quote_text::Grouping;
use wasm_bindgen::prelude::*;

// Initialize panic hook for better error messages in browser console
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

fn js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Forwards `log` records to the browser console
struct ConsoleLogger;

impl log::Log for ConsoleLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let message = JsValue::from_str(&format!("[{}] {}", record.target(), record.args()));
        match record.level() {
            log::Level::Error => web_sys::console::error_1(&message),
            log::Level::Warn => web_sys::console::warn_1(&message),
            _ => web_sys::console::log_1(&message),
        }
    }

    fn flush(&self) {}
}

static CONSOLE_LOGGER: ConsoleLogger = ConsoleLogger;

/// Send engine logs to the browser console
///
/// @param level - "error", "warn", "info", "debug" or "trace"
#[wasm_bindgen(js_name = initLogging)]
pub fn init_logging(level: &str) -> Result<(), JsValue> {
    let filter: log::LevelFilter = level.parse().map_err(js_error)?;
    // a second call only changes the level
    let _ = log::set_logger(&CONSOLE_LOGGER);
    log::set_max_level(filter);
    Ok(())
}

/// Local wall-clock time from the JS host
///
/// chrono cannot read the clock on wasm32-unknown-unknown by itself.
#[cfg(target_arch = "wasm32")]
fn host_now() -> Option<chrono::NaiveDateTime> {
    let now = js_sys::Date::new_0();
    chrono::NaiveDate::from_ymd_opt(
        now.get_full_year() as i32,
        now.get_month() + 1,
        now.get_date(),
    )?
    .and_hms_opt(now.get_hours(), now.get_minutes(), now.get_seconds())
}

#[cfg(not(target_arch = "wasm32"))]
fn host_now() -> Option<chrono::NaiveDateTime> {
    None
}

fn render(data: &QuotationData, options: &PdfOptions) -> Result<Vec<u8>, JsValue> {
    let mut renderer = QuotationRenderer::new(data, options);
    if let Some(now) = host_now() {
        renderer = renderer.with_generated_at(now);
    }
    renderer
        .render_to_bytes()
        .map_err(|e| JsValue::from_str(&format!("failed to generate quotation PDF: {e}")))
}

fn options_from_js(options: JsValue) -> Result<PdfOptions, JsValue> {
    if options.is_undefined() || options.is_null() {
        return Ok(PdfOptions::default());
    }
    let options: PdfOptions = serde_wasm_bindgen::from_value(options)?;
    validate_options(&options).map_err(js_error)?;
    Ok(options)
}

fn data_from_js(data: JsValue) -> Result<QuotationData, JsValue> {
    let data: QuotationData = serde_wasm_bindgen::from_value(data)?;
    validate_quotation(&data).map_err(js_error)?;
    Ok(data)
}

/// Generate a quotation PDF from plain JS objects
///
/// @param data - QuotationData object
/// @param options - PDFOptions object (optional)
/// @returns PDF bytes (Uint8Array)
#[wasm_bindgen(js_name = generateQuotationPdf)]
pub fn generate_quotation_pdf(data: JsValue, options: JsValue) -> Result<Vec<u8>, JsValue> {
    let data = data_from_js(data)?;
    let options = options_from_js(options)?;
    render(&data, &options)
}

/// Validate quotation JSON and return it as a JS object
///
/// @param json - QuotationData JSON string
/// @returns Parsed quotation object
#[wasm_bindgen(js_name = parseQuotation)]
pub fn parse_quotation(json: &str) -> Result<JsValue, JsValue> {
    let data = quotation::parse_quotation(json).map_err(js_error)?;
    Ok(serde_wasm_bindgen::to_value(&data)?)
}

/// A parsed quotation ready to render
#[wasm_bindgen]
pub struct QuotationPdf {
    data: QuotationData,
    options: PdfOptions,
}

#[wasm_bindgen]
impl QuotationPdf {
    /// Create from JSON strings
    ///
    /// @param dataJson - QuotationData JSON
    /// @param optionsJson - PDFOptions JSON, may be empty
    /// @returns QuotationPdf instance
    #[wasm_bindgen(js_name = fromJson)]
    pub fn from_json(data_json: &str, options_json: &str) -> Result<QuotationPdf, JsValue> {
        Ok(QuotationPdf {
            data: quotation::parse_quotation(data_json).map_err(js_error)?,
            options: quotation::parse_options(options_json).map_err(js_error)?,
        })
    }

    /// Replace the render options
    ///
    /// @param options - PDFOptions object
    #[wasm_bindgen(js_name = setOptions)]
    pub fn set_options(&mut self, options: JsValue) -> Result<(), JsValue> {
        self.options = options_from_js(options)?;
        Ok(())
    }

    /// Number of line items
    #[wasm_bindgen(js_name = itemCount)]
    pub fn item_count(&self) -> usize {
        self.data.items.len()
    }

    /// Render PDF
    ///
    /// @returns PDF bytes (Uint8Array)
    pub fn render(&self) -> Result<Vec<u8>, JsValue> {
        render(&self.data, &self.options)
    }
}

/// Formatting helpers matching the PDF's presentation
#[wasm_bindgen]
pub struct QuotationFormatter;

fn grouping(western: bool) -> Grouping {
    if western {
        Grouping::Western
    } else {
        Grouping::Indian
    }
}

#[wasm_bindgen]
impl QuotationFormatter {
    /// Format an amount with symbol and grouping
    ///
    /// @param amount - Amount
    /// @param symbol - Currency symbol (e.g., "Rs.")
    /// @param western - Use 1,234,567 grouping instead of 12,34,567
    /// @returns Formatted amount (e.g., "Rs. 15,000.00")
    #[wasm_bindgen(js_name = formatMoney)]
    pub fn format_money(amount: f64, symbol: &str, western: bool) -> String {
        quote_text::format_money(amount, symbol, grouping(western))
    }

    /// Spell an amount in words
    ///
    /// @param amount - Amount
    /// @returns Text (e.g., "Rupees Twenty Thousand Only")
    #[wasm_bindgen(js_name = amountInWords)]
    pub fn amount_in_words(amount: f64, major: &str, minor: &str, western: bool) -> String {
        quote_text::amount_in_words(amount, major, minor, grouping(western))
    }

    /// Format a date as dd/mm/yyyy
    ///
    /// @param value - ISO date or timestamp string
    /// @returns Date (e.g., "15/01/2024")
    #[wasm_bindgen(js_name = formatDate)]
    pub fn format_date(value: &str) -> Result<String, JsValue> {
        let date = quote_text::parse_date(value).map_err(js_error)?;
        Ok(quote_text::format_date(date.date()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    const DATA: &str = r#"{
        "invoiceNumber": "QT-1",
        "date": "2024-01-15",
        "customerName": "Ravi Kumar",
        "items": [],
        "subtotal": 0,
        "tax": 0,
        "grandTotal": 0
    }"#;

    #[wasm_bindgen_test]
    fn test_formatter() {
        assert_eq!(
            QuotationFormatter::format_money(15000.0, "Rs.", false),
            "Rs. 15,000.00"
        );
        assert_eq!(
            QuotationFormatter::amount_in_words(20000.0, "Rupees", "Paise", false),
            "Rupees Twenty Thousand Only"
        );
    }

    #[wasm_bindgen_test]
    fn test_format_date() {
        assert_eq!(
            QuotationFormatter::format_date("2024-01-15T10:30:00.000Z").unwrap(),
            "15/01/2024"
        );
    }

    #[wasm_bindgen_test]
    fn test_render_from_json() {
        let pdf = QuotationPdf::from_json(DATA, "").unwrap();
        assert_eq!(pdf.item_count(), 0);
        let bytes = pdf.render().unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
    }
}

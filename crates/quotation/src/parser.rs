//! Quotation JSON parsing and validation

use crate::{PdfOptions, QuotationData, QuotationError, Result};

/// Parse and validate quotation data from a JSON string
pub fn parse_quotation(json: &str) -> Result<QuotationData> {
    let data: QuotationData =
        serde_json::from_str(json).map_err(|e| QuotationError::ParseError(e.to_string()))?;
    validate_quotation(&data)?;
    Ok(data)
}

/// Parse and validate render options from a JSON string
///
/// An empty string yields the default options.
pub fn parse_options(json: &str) -> Result<PdfOptions> {
    if json.trim().is_empty() {
        return Ok(PdfOptions::default());
    }
    let options: PdfOptions =
        serde_json::from_str(json).map_err(|e| QuotationError::ParseError(e.to_string()))?;
    validate_options(&options)?;
    Ok(options)
}

fn invalid(message: impl Into<String>) -> QuotationError {
    QuotationError::InvalidInput(message.into())
}

fn check_finite(field: &str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(invalid(format!("{field} must be a finite number")))
    }
}

/// Reject input the layout cannot place
///
/// Only structural problems are rejected; aggregates are not cross-checked
/// against the items.
pub fn validate_quotation(data: &QuotationData) -> Result<()> {
    if data.invoice_number.trim().is_empty() {
        return Err(invalid("invoiceNumber must not be empty"));
    }

    check_finite("subtotal", data.subtotal)?;
    check_finite("tax", data.tax)?;
    check_finite("grandTotal", data.grand_total)?;
    for (field, value) in [
        ("discount", data.discount),
        ("advancePaid", data.advance_paid),
        ("roundOff", data.round_off),
    ] {
        if let Some(value) = value {
            check_finite(field, value)?;
        }
    }

    for (i, item) in data.items.iter().enumerate() {
        for (field, value) in [
            ("width", item.width),
            ("height", item.height),
            ("area", item.area),
            ("rate", item.rate),
            ("total", item.total),
        ] {
            check_finite(&format!("items[{i}].{field}"), value)?;
        }
    }

    Ok(())
}

/// Check option ranges and colours
pub fn validate_options(options: &PdfOptions) -> Result<()> {
    if let Some(watermark) = &options.watermark {
        if !(0.0..=1.0).contains(&watermark.opacity) {
            return Err(invalid(format!(
                "watermark.opacity must be between 0 and 1, got {}",
                watermark.opacity
            )));
        }
        if let Some(color) = &watermark.color {
            quote_text::parse_hex_color(color)?;
        }
    }

    if let Some(qr) = &options.qr_code {
        if qr.url.trim().is_empty() {
            return Err(invalid("qrCode.url must not be empty"));
        }
    }

    let layout = &options.layout;
    quote_text::parse_hex_color(&layout.brand_color)?;
    for (field, value) in [
        ("layout.tableWeightDensity", layout.table_weight_density),
        ("layout.summaryWeightDensity", layout.summary_weight_density),
    ] {
        check_finite(field, value)?;
        if value < 0.0 {
            return Err(invalid(format!("{field} must not be negative")));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"{
        "invoiceNumber": "QT-2024-001",
        "date": "2024-01-15T10:30:00.000Z",
        "customerName": "Ravi Kumar",
        "customerPhone": "9876543210",
        "customerEmail": "ravi@example.com",
        "items": [
            {
                "name": "Sliding Window",
                "type": "window",
                "width": 4,
                "height": 5,
                "area": 20,
                "rate": 450,
                "total": 9000
            }
        ],
        "subtotal": 9000,
        "tax": 1620,
        "grandTotal": 10620
    }"#;

    #[test]
    fn test_parse_minimal_quotation() {
        let data = parse_quotation(MINIMAL).unwrap();
        assert_eq!(data.invoice_number, "QT-2024-001");
        assert_eq!(data.items.len(), 1);
        assert_eq!(data.customer_address, None);
        assert_eq!(data.advance_paid, None);
    }

    #[test]
    fn test_parse_rejects_bad_json() {
        assert!(matches!(
            parse_quotation("{ not json"),
            Err(QuotationError::ParseError(_))
        ));
    }

    #[test]
    fn test_parse_rejects_unknown_item_type() {
        let json = MINIMAL.replace("\"window\"", "\"skylight\"");
        assert!(matches!(
            parse_quotation(&json),
            Err(QuotationError::ParseError(_))
        ));
    }

    #[test]
    fn test_parse_rejects_bad_date() {
        let json = MINIMAL.replace("2024-01-15T10:30:00.000Z", "15 Jan 2024");
        assert!(matches!(
            parse_quotation(&json),
            Err(QuotationError::ParseError(_))
        ));
    }

    #[test]
    fn test_empty_invoice_number_is_invalid() {
        let json = MINIMAL.replace("QT-2024-001", " ");
        assert!(matches!(
            parse_quotation(&json),
            Err(QuotationError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_parse_options_empty() {
        let options = parse_options("").unwrap();
        assert!(!options.draft);
        assert!(options.watermark.is_none());
    }

    #[test]
    fn test_parse_options_full() {
        let options = parse_options(
            r##"{
                "draft": true,
                "watermark": { "text": "SAMPLE", "opacity": 0.2, "color": "#ff0000" },
                "branding": { "companyName": "Crystal Glass Co." },
                "qrCode": { "url": "https://example.com/q/1", "label": "Scan to view" },
                "currency": { "symbol": "$", "grouping": "western" },
                "layout": { "validityDays": 15, "tableWeightDensity": 3.0 }
            }"##,
        )
        .unwrap();

        assert!(options.draft);
        assert_eq!(options.company_name(), "Crystal Glass Co.");
        assert_eq!(options.currency.grouping, quote_text::Grouping::Western);
        assert_eq!(options.currency.major_unit, "Rupees");
        assert_eq!(options.layout.validity_days, 15);
        assert_eq!(options.layout.summary_weight_density, 2.5);
    }

    #[test]
    fn test_opacity_out_of_range() {
        let result = parse_options(r#"{ "watermark": { "text": "X", "opacity": 1.5 } }"#);
        assert!(matches!(result, Err(QuotationError::InvalidInput(_))));
    }

    #[test]
    fn test_bad_colour_is_rejected() {
        let result = parse_options(r#"{ "layout": { "brandColor": "blue" } }"#);
        assert!(matches!(result, Err(QuotationError::TextError(_))));
    }

    #[test]
    fn test_negative_density_is_rejected() {
        let result = parse_options(r#"{ "layout": { "summaryWeightDensity": -1 } }"#);
        assert!(matches!(result, Err(QuotationError::InvalidInput(_))));
    }
}

//! Quote Text - text helpers for quotation documents
//!
//! This crate provides:
//! - Money formatting with Indian (12,34,567) or western (1,234,567) grouping
//! - Amounts in words ("Rupees Twenty Thousand Only")
//! - Date parsing and formatting (dd/mm/yyyy, "January 2024")
//! - Width-driven word wrapping, ellipsizing and line numbering
//! - Hex colour parsing
//!
//! # Example
//!
//! ```ignore
//! use quote_text::{format_money, amount_in_words, wrap_text, Grouping};
//!
//! let total = format_money(20000.0, "Rs.", Grouping::Indian); // "Rs. 20,000.00"
//! let words = amount_in_words(20000.0, "Rupees", "Paise", Grouping::Indian);
//! let lines = wrap_text("long notes ...", 180.0, |s| s.len() as f64 * 2.0);
//! ```

mod color;
mod formatter;
mod wrap;

pub use color::parse_hex_color;
pub use formatter::{
    add_days, amount_in_words, format_date, format_money, format_month_year, format_timestamp,
    number_in_words, parse_date, render_float, Grouping,
};
pub use wrap::{ellipsize, number_lines, wrap_text};

use thiserror::Error;

/// Errors that can occur during text processing
#[derive(Debug, Error)]
pub enum TextError {
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid colour: {0}")]
    InvalidColor(String),
}

/// Result type for text operations
pub type Result<T> = std::result::Result<T, TextError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_and_words_agree() {
        let amount = 150000.0;
        assert_eq!(format_money(amount, "Rs.", Grouping::Indian), "Rs. 1,50,000.00");
        assert_eq!(
            amount_in_words(amount, "Rupees", "Paise", Grouping::Indian),
            "Rupees One Lakh Fifty Thousand Only"
        );
    }

    #[test]
    fn test_error_display() {
        let err = TextError::InvalidColor("#zz".to_string());
        assert_eq!(err.to_string(), "Invalid colour: #zz");
    }
}

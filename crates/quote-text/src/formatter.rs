//! Number, currency, and date formatting

use crate::{Result, TextError};
use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

/// English number names (0-19)
const ONES: [&str; 20] = [
    "Zero",
    "One",
    "Two",
    "Three",
    "Four",
    "Five",
    "Six",
    "Seven",
    "Eight",
    "Nine",
    "Ten",
    "Eleven",
    "Twelve",
    "Thirteen",
    "Fourteen",
    "Fifteen",
    "Sixteen",
    "Seventeen",
    "Eighteen",
    "Nineteen",
];

/// English tens names, indexed by tens digit
const TENS: [&str; 10] = [
    "", "", "Twenty", "Thirty", "Forty", "Fifty", "Sixty", "Seventy", "Eighty", "Ninety",
];

/// English month names (long)
const MONTHS_LONG: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Digit grouping convention for thousands separators and number words
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Grouping {
    /// 12,34,567 and lakh/crore words
    #[default]
    Indian,
    /// 1,234,567 and million/billion words
    Western,
}

/// Render a float with a fixed number of decimals and digit grouping
///
/// # Example
/// ```
/// use quote_text::{render_float, Grouping};
///
/// assert_eq!(render_float(1234567.5, 2, Grouping::Indian), "12,34,567.50");
/// assert_eq!(render_float(1234567.5, 2, Grouping::Western), "1,234,567.50");
/// ```
pub fn render_float(n: f64, decimals: u8, grouping: Grouping) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }

    let multiplier = 10_u64.pow(decimals as u32);
    let scaled = (n.abs() * multiplier as f64).round() as u64;
    let int_part = scaled / multiplier;
    let frac_part = scaled % multiplier;

    let int_str = group_digits(int_part, grouping);
    let sign = if n < 0.0 && scaled > 0 { "-" } else { "" };

    if decimals > 0 {
        format!(
            "{sign}{int_str}.{frac_part:0>width$}",
            width = decimals as usize
        )
    } else {
        format!("{sign}{int_str}")
    }
}

/// Format integer with thousand separators
fn group_digits(n: u64, grouping: Grouping) -> String {
    let digits = n.to_string();
    if digits.len() <= 3 {
        return digits;
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let group = match grouping {
        Grouping::Indian => 2,
        Grouping::Western => 3,
    };

    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(group);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();
    groups.push(tail);
    groups.join(",")
}

/// Format a monetary amount with two decimals and a currency symbol
///
/// # Example
/// ```
/// use quote_text::{format_money, Grouping};
///
/// assert_eq!(format_money(15000.0, "Rs.", Grouping::Indian), "Rs. 15,000.00");
/// assert_eq!(format_money(15000.0, "", Grouping::Indian), "15,000.00");
/// ```
pub fn format_money(amount: f64, symbol: &str, grouping: Grouping) -> String {
    let number = render_float(amount, 2, grouping);
    if symbol.is_empty() {
        number
    } else {
        format!("{symbol} {number}")
    }
}

fn below_hundred(n: u64) -> String {
    match n {
        0..=19 => ONES[n as usize].to_string(),
        _ if n % 10 == 0 => TENS[(n / 10) as usize].to_string(),
        _ => format!("{} {}", TENS[(n / 10) as usize], ONES[(n % 10) as usize]),
    }
}

fn below_thousand(n: u64) -> String {
    let hundreds = n / 100;
    let rest = n % 100;
    match (hundreds, rest) {
        (0, r) => below_hundred(r),
        (h, 0) => format!("{} Hundred", ONES[h as usize]),
        (h, r) => format!("{} Hundred {}", ONES[h as usize], below_hundred(r)),
    }
}

/// Spell a whole number in English
///
/// Indian grouping uses Thousand / Lakh / Crore; western grouping uses
/// Thousand / Million / Billion.
pub fn number_in_words(n: u64, grouping: Grouping) -> String {
    if n == 0 {
        return ONES[0].to_string();
    }

    let scales: &[(u64, &str)] = match grouping {
        Grouping::Indian => &[(10_000_000, "Crore"), (100_000, "Lakh"), (1_000, "Thousand")],
        Grouping::Western => &[
            (1_000_000_000, "Billion"),
            (1_000_000, "Million"),
            (1_000, "Thousand"),
        ],
    };

    let mut parts = Vec::new();
    let mut remaining = n;
    for &(scale, name) in scales {
        let count = remaining / scale;
        if count > 0 {
            let count_words = if count >= 1000 {
                number_in_words(count, grouping)
            } else {
                below_thousand(count)
            };
            parts.push(format!("{count_words} {name}"));
            remaining %= scale;
        }
    }
    if remaining > 0 {
        parts.push(below_thousand(remaining));
    }
    parts.join(" ")
}

/// Spell a monetary amount, e.g. "Rupees Twenty Thousand Only"
///
/// # Arguments
/// * `amount` - Amount, rounded to two decimals
/// * `major` - Name of the main unit (e.g. "Rupees")
/// * `minor` - Name of the fractional unit (e.g. "Paise")
/// * `grouping` - Number word system
pub fn amount_in_words(amount: f64, major: &str, minor: &str, grouping: Grouping) -> String {
    if !amount.is_finite() {
        return String::new();
    }

    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = cents / 100;
    let fraction = cents % 100;

    let mut text = String::new();
    if amount < 0.0 && cents > 0 {
        text.push_str("Minus ");
    }
    if !major.is_empty() {
        text.push_str(major);
        text.push(' ');
    }
    text.push_str(&number_in_words(whole, grouping));
    if fraction > 0 {
        text.push_str(&format!(" and {}", below_hundred(fraction)));
        if !minor.is_empty() {
            text.push(' ');
            text.push_str(minor);
        }
    }
    text.push_str(" Only");
    text
}

/// Parse a timestamp from RFC 3339 or a bare `YYYY-MM-DD` date
///
/// Offsets are kept as wall-clock time; bare dates are treated as midnight.
pub fn parse_date(value: &str) -> Result<NaiveDateTime> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.naive_local());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(dt);
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or_else(|| TextError::InvalidDate(value.to_string()))
}

/// Add whole days to a date
pub fn add_days(date: NaiveDate, days: u32) -> Result<NaiveDate> {
    date.checked_add_days(Days::new(days as u64))
        .ok_or_else(|| TextError::InvalidDate(format!("{date} + {days} days")))
}

/// Format a date as "15/01/2024"
pub fn format_date(date: NaiveDate) -> String {
    format!("{:02}/{:02}/{}", date.day(), date.month(), date.year())
}

/// Format a date as "January 2024"
pub fn format_month_year(date: NaiveDate) -> String {
    let month_idx = date.month0() as usize;
    let month_name = MONTHS_LONG.get(month_idx).unwrap_or(&"");
    format!("{month_name} {}", date.year())
}

/// Format a timestamp as "15/01/2024, 10:30"
pub fn format_timestamp(dt: NaiveDateTime) -> String {
    format!(
        "{}, {:02}:{:02}",
        format_date(dt.date()),
        dt.hour(),
        dt.minute()
    )
}

//! Width-driven line breaking
//!
//! Measurement is injected as a closure so the same helpers work with any
//! font metrics. Widths are in whatever unit the closure returns.

/// Greedy word wrap of `text` into lines no wider than `max_width`
///
/// Explicit newlines start a new paragraph. A single word wider than the
/// line is split between characters. Blank paragraphs are kept as empty
/// lines, so spacing in notes survives.
pub fn wrap_text<F>(text: &str, max_width: f64, measure: F) -> Vec<String>
where
    F: Fn(&str) -> f64,
{
    let mut lines = Vec::new();

    for paragraph in text.lines() {
        let mut current = String::new();

        for word in paragraph.split_whitespace() {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{current} {word}")
            };

            if measure(&candidate) <= max_width {
                current = candidate;
                continue;
            }

            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }

            if measure(word) <= max_width {
                current = word.to_string();
            } else {
                let mut pieces = split_long_word(word, max_width, &measure);
                current = pieces.pop().unwrap_or_default();
                lines.extend(pieces);
            }
        }

        lines.push(current);
    }

    if lines.is_empty() {
        lines.push(String::new());
    }

    lines
}

fn split_long_word<F>(word: &str, max_width: f64, measure: &F) -> Vec<String>
where
    F: Fn(&str) -> f64,
{
    let mut pieces = Vec::new();
    let mut current = String::new();

    for c in word.chars() {
        current.push(c);
        if measure(&current) > max_width && current.chars().count() > 1 {
            current.pop();
            pieces.push(std::mem::take(&mut current));
            current.push(c);
        }
    }

    if !current.is_empty() {
        pieces.push(current);
    }
    pieces
}

/// Shorten `text` with a trailing "..." so it fits within `max_width`
///
/// Text that already fits is returned unchanged. When not even the
/// ellipsis fits, the result is empty.
pub fn ellipsize<F>(text: &str, max_width: f64, measure: F) -> String
where
    F: Fn(&str) -> f64,
{
    const ELLIPSIS: &str = "...";

    if measure(text) <= max_width {
        return text.to_string();
    }
    if measure(ELLIPSIS) > max_width {
        return String::new();
    }

    let mut kept: Vec<char> = text.chars().collect();
    while kept.pop().is_some() {
        let head: String = kept.iter().collect();
        let candidate = format!("{}{ELLIPSIS}", head.trim_end());
        if measure(&candidate) <= max_width {
            return candidate;
        }
    }
    ELLIPSIS.to_string()
}

/// Split free text into numbered lines: "1. ...", "2. ..."
///
/// Blank lines are dropped. Lines that already start with a number
/// followed by `.` or `)` keep their own numbering.
pub fn number_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .enumerate()
        .map(|(i, line)| {
            if is_numbered(line) {
                line.to_string()
            } else {
                format!("{}. {line}", i + 1)
            }
        })
        .collect()
}

fn is_numbered(line: &str) -> bool {
    let digits = line.chars().take_while(|c| c.is_ascii_digit()).count();
    digits > 0 && matches!(line[digits..].chars().next(), Some('.') | Some(')'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    // One unit per character keeps expectations readable
    fn chars(s: &str) -> f64 {
        s.chars().count() as f64
    }

    #[test]
    fn test_wrap_basic() {
        let lines = wrap_text("the quick brown fox jumps", 10.0, chars);
        assert_eq!(lines, vec!["the quick", "brown fox", "jumps"]);
    }

    #[test]
    fn test_wrap_keeps_paragraphs() {
        let lines = wrap_text("first\n\nsecond", 20.0, chars);
        assert_eq!(lines, vec!["first", "", "second"]);
    }

    #[test]
    fn test_wrap_splits_long_word() {
        let lines = wrap_text("abcdefghij xy", 4.0, chars);
        assert_eq!(lines, vec!["abcd", "efgh", "ij", "xy"]);
    }

    #[test]
    fn test_wrap_empty() {
        assert_eq!(wrap_text("", 10.0, chars), vec![""]);
    }

    #[test]
    fn test_ellipsize() {
        assert_eq!(ellipsize("short", 10.0, chars), "short");
        assert_eq!(ellipsize("a very long name", 8.0, chars), "a ver...");
        assert_eq!(ellipsize("abc def", 6.0, chars), "abc...");
        assert_eq!(ellipsize("abcdef", 2.0, chars), "");
    }

    #[test]
    fn test_number_lines() {
        let lines = number_lines("Payment in advance\n\n  Delivery in 2 weeks \n3. Warranty");
        assert_eq!(
            lines,
            vec![
                "1. Payment in advance",
                "2. Delivery in 2 weeks",
                "3. Warranty"
            ]
        );
    }

    #[test]
    fn test_is_numbered() {
        assert!(is_numbered("1. x"));
        assert!(is_numbered("12) x"));
        assert!(!is_numbered("2024 was good"));
        assert!(!is_numbered("x"));
    }
}

use chrono::NaiveDate;

/// Truncate a string to a maximum length in characters, adding ellipsis if needed
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

/// Format a date as e.g. "Mar 05, 2025"
pub fn format_date(date: NaiveDate) -> String {
    date.format("%b %d, %Y").to_string()
}

pub fn format_optional_date(date: Option<NaiveDate>, default: &str) -> String {
    date.map(format_date).unwrap_or_else(|| default.to_string())
}

/// Format a percentage share with two decimals
pub fn format_percent(value: f64) -> String {
    format!("{:.2}%", value)
}

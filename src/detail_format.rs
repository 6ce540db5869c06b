//! Display formatting for the detail modal. Data-shape anomalies resolve to
//! documented defaults ("\u{2014}", absent) instead of errors; none of this is
//! resolution logic, it only renders what the detail payload already holds.

use serde_json::Value;

use crate::models::TitleDetail;

pub const EMPTY_FIELD: &str = "\u{2014}";

/// Known spellings of the gross-income field, most specific first.
const GROSS_KEYS: [&str; 13] = [
    "worldwide_gross_income",
    "worldwide_income",
    "gross_worldwide",
    "world_gross",
    "usa_gross_income",
    "us_gross_income",
    "usa_gross",
    "us_gross",
    "gross_income",
    "box_office",
    "boxoffice",
    "revenue",
    "income",
];

/// Comma-joined names, or the em-dash default when the list is empty.
pub fn join_names(names: &[String]) -> String {
    let joined = names
        .iter()
        .filter(|n| !n.trim().is_empty())
        .cloned()
        .collect::<Vec<_>>()
        .join(", ");
    if joined.is_empty() {
        EMPTY_FIELD.to_string()
    } else {
        joined
    }
}

fn year_of(detail: &TitleDetail) -> Option<String> {
    if let Some(year) = detail.year {
        return Some(year.to_string());
    }
    detail
        .date_published
        .as_deref()
        .map(|d| d.chars().take(4).collect::<String>())
        .filter(|s| !s.is_empty())
}

/// "1994 - Drama, Crime" style header line.
pub fn year_genres_line(detail: &TitleDetail) -> String {
    let genres = detail
        .genres
        .iter()
        .filter(|g| !g.is_empty())
        .cloned()
        .collect::<Vec<_>>()
        .join(", ");
    [year_of(detail).unwrap_or_default(), genres]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" - ")
}

/// "PG-13 - 142 minutes - (USA / UK)" style line.
pub fn rated_runtime_line(detail: &TitleDetail) -> String {
    let mut parts = Vec::new();
    if let Some(rated) = detail.rated.as_deref().filter(|r| !r.is_empty()) {
        parts.push(rated.to_string());
    }
    if let Some(minutes) = detail.duration {
        parts.push(format!("{minutes} minutes"));
    }
    if !detail.countries.is_empty() {
        parts.push(format!("({})", detail.countries.join(" / ")));
    }
    parts.join(" - ")
}

pub fn imdb_line(detail: &TitleDetail) -> String {
    match detail
        .imdb_score
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
    {
        Some(score) => format!("{score}/10"),
        None => EMPTY_FIELD.to_string(),
    }
}

fn is_usable(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => {
            let trimmed = s.trim();
            !trimmed.is_empty() && !trimmed.eq_ignore_ascii_case("n/a")
        }
        _ => true,
    }
}

/// Lowercased, punctuation-free key for the last-resort scan, so
/// "Box Office", "box_office" and "boxOffice" all collapse to "boxoffice".
fn normalized_key(key: &str) -> String {
    key.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

fn looks_like_gross_key(key: &str) -> bool {
    let key = normalized_key(key);
    ["gross", "income", "boxoffice", "revenue"]
        .iter()
        .any(|needle| key.contains(needle))
}

/// Raw gross value from the detail payload: the candidate key list first,
/// then a scan over the flattened extras.
pub fn pick_gross(detail: &TitleDetail) -> Option<&Value> {
    for key in GROSS_KEYS {
        if let Some(value) = detail.extra.get(key) {
            if is_usable(value) {
                return Some(value);
            }
        }
    }
    detail
        .extra
        .iter()
        .find(|(key, value)| looks_like_gross_key(key) && is_usable(value))
        .map(|(_, value)| value)
}

/// Parses a monetary value out of a number or an upstream money string
/// ("$1,234,567", "1.234.567,89", "2.1 million"). Returns `None` for
/// anything unparseable.
pub fn parse_money(raw: &Value) -> Option<f64> {
    match raw {
        Value::Number(n) => n.as_f64().filter(|f| f.is_finite()),
        Value::String(s) => parse_money_str(s),
        _ => None,
    }
}

fn parse_money_str(raw: &str) -> Option<f64> {
    let mut up = raw.to_uppercase().replace(['\u{a0}', '\u{202f}'], " ");
    for (word, unit) in [
        ("MILLIONS", "M"),
        ("MILLION", "M"),
        ("BILLIONS", "B"),
        ("BILLION", "B"),
        ("THOUSANDS", "K"),
        ("THOUSAND", "K"),
    ] {
        up = up.replace(word, unit);
    }
    let up = up.trim();

    // A trailing M/B/K scales the figure; any other trailing letter is noise.
    let unit = up
        .chars()
        .rev()
        .find(|c| c.is_ascii_uppercase())
        .filter(|c| matches!(c, 'M' | 'B' | 'K'));

    let mut digits: String = up
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == ',')
        .collect();

    let has_dot = digits.contains('.');
    let has_comma = digits.contains(',');
    if has_dot && has_comma {
        if digits.rfind(',') > digits.rfind('.') {
            // EU style: "1.234.567,89"
            digits = digits.replace('.', "").replace(',', ".");
        } else {
            // US style: "1,234,567.89"
            digits = digits.replace(',', "");
        }
    } else if has_comma {
        let last = digits.rsplit(',').next().unwrap_or("");
        digits = if last.len() <= 2 {
            digits.replace(',', ".")
        } else {
            digits.replace(',', "")
        };
    }

    let mut n: f64 = digits.parse().ok()?;
    match unit {
        Some('B') => n *= 1e9,
        Some('M') => n *= 1e6,
        Some('K') => n *= 1e3,
        _ => {}
    }
    n.is_finite().then_some(n)
}

/// Compact USD rendering of the gross income, "\u{2014}" when unknown or
/// non-positive.
pub fn format_gross(detail: &TitleDetail) -> String {
    let Some(raw) = pick_gross(detail) else {
        return EMPTY_FIELD.to_string();
    };
    let Some(n) = parse_money(raw).filter(|n| *n > 0.0) else {
        return EMPTY_FIELD.to_string();
    };
    if n >= 1e9 {
        format!("${:.1}B", n / 1e9)
    } else if n >= 1e6 {
        format!("${:.1}M", n / 1e6)
    } else if n >= 1e3 {
        format!("${:.0}K", n / 1e3)
    } else {
        format!("${n:.0}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn detail_with_extra(pairs: &[(&str, Value)]) -> TitleDetail {
        let mut detail = TitleDetail::default();
        for (key, value) in pairs {
            detail.extra.insert(key.to_string(), value.clone());
        }
        detail
    }

    #[test]
    fn candidate_keys_win_over_the_scan() {
        let detail = detail_with_extra(&[
            ("random_income_note", json!("ignored")),
            ("worldwide_gross_income", json!(1_248_028)),
        ]);
        assert_eq!(pick_gross(&detail), Some(&json!(1_248_028)));
    }

    #[test]
    fn last_resort_scan_normalizes_key_spellings() {
        let detail = detail_with_extra(&[("Box Office (US)", json!("$12,345"))]);
        assert_eq!(pick_gross(&detail), Some(&json!("$12,345")));
    }

    #[test]
    fn na_and_empty_values_are_absent() {
        let detail = detail_with_extra(&[
            ("worldwide_gross_income", json!("N/A")),
            ("revenue", json!("")),
        ]);
        assert_eq!(pick_gross(&detail), None);
        assert_eq!(format_gross(&detail), EMPTY_FIELD);
    }

    #[test]
    fn parses_money_shapes() {
        assert_eq!(parse_money(&json!(1_248_028)), Some(1_248_028.0));
        assert_eq!(parse_money(&json!("$1,234,567.89")), Some(1_234_567.89));
        assert_eq!(parse_money(&json!("1.234.567,89")), Some(1_234_567.89));
        assert_eq!(parse_money(&json!("2.1 million")), Some(2_100_000.0));
        assert_eq!(parse_money(&json!("$3B")), Some(3_000_000_000.0));
        assert_eq!(parse_money(&json!("120K")), Some(120_000.0));
        assert_eq!(parse_money(&json!("1,23")), Some(1.23));
        assert_eq!(parse_money(&json!("not money")), None);
        assert_eq!(parse_money(&json!(null)), None);
    }

    #[test]
    fn formats_compact_usd() {
        let detail = detail_with_extra(&[("worldwide_gross_income", json!(1_248_028))]);
        assert_eq!(format_gross(&detail), "$1.2M");

        let detail = detail_with_extra(&[("revenue", json!("2.5 billion"))]);
        assert_eq!(format_gross(&detail), "$2.5B");

        let detail = detail_with_extra(&[("box_office", json!(950))]);
        assert_eq!(format_gross(&detail), "$950");
    }

    #[test]
    fn field_lines_use_documented_defaults() {
        let detail = TitleDetail::default();
        assert_eq!(join_names(&detail.directors), EMPTY_FIELD);
        assert_eq!(imdb_line(&detail), EMPTY_FIELD);
        assert_eq!(year_genres_line(&detail), "");

        let detail = TitleDetail {
            year: Some(1994),
            genres: vec!["Drama".into(), "Crime".into()],
            rated: Some("R".into()),
            duration: Some(142),
            countries: vec!["USA".into()],
            imdb_score: Some("9.3".into()),
            ..Default::default()
        };
        assert_eq!(year_genres_line(&detail), "1994 - Drama, Crime");
        assert_eq!(rated_runtime_line(&detail), "R - 142 minutes - (USA)");
        assert_eq!(imdb_line(&detail), "9.3/10");
    }
}

//! Identifier quoting and literal escaping for MySQL.
//!
//! These are pure functions; nothing here can fail. The textual output is the
//! compatibility contract of the crate, so every rule below is bit-exact:
//!
//! - identifiers are wrapped in backticks, per dotted segment;
//! - text literals use MySQL's C-style backslash escapes and single quotes;
//! - the placeholder token `?` is left alone for driver-side binding.
//!
//! # Raw SQL
//!
//! Identifiers containing `(` or `%`, [`Value::Raw`], and (in
//! [`format_value`] and `WHERE` right-hand sides) text that
//! [looks like a function call](looks_like_function_call) are emitted without
//! escaping. Shaping a string like `NOW()` is enough to inject it, so only
//! trusted text may reach those paths.

use crate::value::{PLACEHOLDER, Value};
use chrono::NaiveDateTime;
use std::sync::OnceLock;

/// Format string MySQL's `STR_TO_DATE` uses for [`format_timestamp`] output.
pub const MYSQL_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%i:%s";

/// Quote an identifier with backticks.
///
/// - `users` → `` `users` ``
/// - `u.name` → `` `u`.`name` ``
/// - `u.*` → `` `u`.* ``
/// - `COUNT(*)`, `name%` → unchanged
///
/// Segments that are already backtick-quoted are kept as they are, so quoting
/// twice is a no-op.
pub fn quote_identifier(name: &str) -> String {
    if name.contains('(') || name.contains('%') {
        return name.to_string();
    }

    let mut out = String::with_capacity(name.len() + 2);
    for (i, segment) in name.split('.').enumerate() {
        if i > 0 {
            out.push('.');
        }
        write_segment(segment, &mut out);
    }
    out
}

fn write_segment(segment: &str, out: &mut String) {
    if segment == "*" || is_backtick_quoted(segment) {
        out.push_str(segment);
        return;
    }
    out.push('`');
    for ch in segment.chars() {
        if ch == '`' {
            out.push('`');
        }
        out.push(ch);
    }
    out.push('`');
}

fn is_backtick_quoted(segment: &str) -> bool {
    segment.len() >= 2 && segment.starts_with('`') && segment.ends_with('`')
}

/// Escape a value as a SQL literal.
///
/// The placeholder token is returned as-is, `NULL` for null, bare tokens for
/// booleans and finite numbers, and escaped single-quoted text for everything
/// else.
pub fn escape_literal(value: &Value) -> String {
    match value {
        Value::Text(s) if s == PLACEHOLDER => s.clone(),
        Value::Text(s) => escape_text(s),
        Value::Null => "NULL".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Int(n) => n.to_string(),
        Value::UInt(n) => n.to_string(),
        Value::Float(f) if f.is_finite() => f.to_string(),
        Value::Float(f) => escape_text(&f.to_string()),
        Value::DateTime(dt) => escape_text(&format_timestamp(dt)),
        Value::Raw(sql) => sql.clone(),
        Value::List(items) => {
            let mut out = String::from("(");
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&escape_literal(item));
            }
            out.push(')');
            out
        }
    }
}

/// Escape text as a single-quoted MySQL string literal.
///
/// Unlike [`escape_literal`] this has no placeholder bypass: `?` becomes `'?'`.
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('\'');
    for ch in text.chars() {
        match ch {
            '\0' => out.push_str("\\0"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\u{8}' => out.push_str("\\b"),
            '\t' => out.push_str("\\t"),
            '\u{1a}' => out.push_str("\\Z"),
            '\\' | '\'' | '"' => {
                out.push('\\');
                out.push(ch);
            }
            _ => out.push(ch),
        }
    }
    out.push('\'');
    out
}

/// Returns `true` if `text` looks like a SQL function call such as `NOW()` or
/// `CONCAT('a','b')`.
///
/// Arguments may only contain word characters, quotes, commas, hyphens and
/// spaces; nested calls are not recognized.
pub fn looks_like_function_call(text: &str) -> bool {
    static CALL_RE: OnceLock<regex::Regex> = OnceLock::new();
    if !text.ends_with(')') {
        return false;
    }
    CALL_RE
        .get_or_init(|| {
            regex::Regex::new(r#"^[A-Za-z_][A-Za-z0-9_.]*\([\w'", -]*\)$"#)
                .expect("invalid built-in function call regex")
        })
        .is_match(text)
}

/// Format a value for INSERT value tuples and upsert assignments.
///
/// Dates go through `STR_TO_DATE`, the texts `"true"`/`"false"` become
/// boolean tokens and function-call-shaped text is emitted verbatim.
pub fn format_value(value: &Value) -> String {
    match value {
        Value::DateTime(dt) => format!(
            "STR_TO_DATE({}, '{}')",
            escape_text(&format_timestamp(dt)),
            MYSQL_DATETIME_FORMAT
        ),
        Value::Text(s) if s == "true" || s == "false" => s.clone(),
        Value::Text(s) if looks_like_function_call(s) => s.clone(),
        other => escape_literal(other),
    }
}

/// Seconds-precision ISO-like timestamp with a space instead of `T`.
pub fn format_timestamp(dt: &NaiveDateTime) -> String {
    dt.format("%Y-%m-%d %H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample_datetime() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_milli_opt(3, 4, 5, 678)
            .unwrap()
    }

    #[test]
    fn quote_simple() {
        assert_eq!(quote_identifier("users"), "`users`");
    }

    #[test]
    fn quote_dotted() {
        assert_eq!(quote_identifier("u.name"), "`u`.`name`");
        assert_eq!(quote_identifier("db.users.id"), "`db`.`users`.`id`");
    }

    #[test]
    fn quote_is_idempotent() {
        let once = quote_identifier("users");
        assert_eq!(quote_identifier(&once), once);
        let dotted = quote_identifier("u.name");
        assert_eq!(quote_identifier(&dotted), dotted);
    }

    #[test]
    fn quote_star_segment_stays_bare() {
        assert_eq!(quote_identifier("u.*"), "`u`.*");
        assert_eq!(quote_identifier("*"), "*");
    }

    #[test]
    fn quote_passes_through_expressions() {
        assert_eq!(quote_identifier("COUNT(*) AS cnt"), "COUNT(*) AS cnt");
        assert_eq!(quote_identifier("name%"), "name%");
        assert_eq!(quote_identifier("MAX(t.id)"), "MAX(t.id)");
    }

    #[test]
    fn quote_doubles_embedded_backticks() {
        assert_eq!(quote_identifier("we`ird"), "`we``ird`");
    }

    #[test]
    fn escape_plain_text() {
        assert_eq!(escape_literal(&Value::from("hello")), "'hello'");
        assert_eq!(escape_literal(&Value::from("")), "''");
    }

    #[test]
    fn escape_special_characters() {
        let cases = [
            ("a\0b", r"'a\0b'"),
            ("a\nb", r"'a\nb'"),
            ("a\rb", r"'a\rb'"),
            ("a\u{8}b", r"'a\bb'"),
            ("a\tb", r"'a\tb'"),
            ("a\\b", r"'a\\b'"),
            ("O'Brien", r"'O\'Brien'"),
            ("say \"hi\"", r#"'say \"hi\"'"#),
            ("a\u{1a}b", r"'a\Zb'"),
        ];
        for (input, expected) in cases {
            assert_eq!(escape_literal(&Value::from(input)), expected, "input {input:?}");
        }
    }

    #[test]
    fn escape_injection_attempt_stays_inside_quotes() {
        assert_eq!(
            escape_literal(&Value::from("1' OR '1'='1")),
            r"'1\' OR \'1\'=\'1'"
        );
    }

    #[test]
    fn escape_scalars() {
        assert_eq!(escape_literal(&Value::Null), "NULL");
        assert_eq!(escape_literal(&Value::from(true)), "true");
        assert_eq!(escape_literal(&Value::from(false)), "false");
        assert_eq!(escape_literal(&Value::from(-42)), "-42");
        assert_eq!(escape_literal(&Value::from(42_u64)), "42");
        assert_eq!(escape_literal(&Value::from(1.5)), "1.5");
        assert_eq!(escape_literal(&Value::from(30.0)), "30");
        assert_eq!(escape_literal(&Value::from(f64::NAN)), "'NaN'");
    }

    #[test]
    fn escape_keeps_placeholder() {
        assert_eq!(escape_literal(&Value::placeholder()), "?");
        assert_eq!(escape_text("?"), "'?'");
    }

    #[test]
    fn escape_list_has_no_trailing_comma() {
        assert_eq!(escape_literal(&Value::from(vec![1, 2, 3])), "(1,2,3)");
        assert_eq!(escape_literal(&Value::from(vec!["a", "b"])), "('a','b')");
        assert_eq!(escape_literal(&Value::List(vec![])), "()");
    }

    #[test]
    fn escape_raw_is_verbatim() {
        assert_eq!(escape_literal(&Value::raw("NOW()")), "NOW()");
    }

    #[test]
    fn escape_datetime_is_truncated_to_seconds() {
        assert_eq!(
            escape_literal(&Value::from(sample_datetime())),
            "'2024-01-02 03:04:05'"
        );
    }

    #[test]
    fn function_call_detection() {
        assert!(looks_like_function_call("NOW()"));
        assert!(looks_like_function_call("CONCAT('a','b')"));
        assert!(!looks_like_function_call("DATE_FORMAT(created_at, '%Y')"));
        assert!(looks_like_function_call("UUID_TO_BIN(uuid, 1)"));
        assert!(looks_like_function_call("IFNULL(-1, 0)"));
        assert!(!looks_like_function_call("NOW"));
        assert!(!looks_like_function_call("(1)"));
        assert!(!looks_like_function_call("x) OR (1=1)"));
        assert!(!looks_like_function_call("a(b(c))"));
    }

    #[test]
    fn format_value_dates_use_str_to_date() {
        assert_eq!(
            format_value(&Value::from(sample_datetime())),
            "STR_TO_DATE('2024-01-02 03:04:05', '%Y-%m-%d %H:%i:%s')"
        );
    }

    #[test]
    fn format_value_coerces_boolean_text() {
        assert_eq!(format_value(&Value::from("true")), "true");
        assert_eq!(format_value(&Value::from("false")), "false");
        assert_eq!(format_value(&Value::from("TRUE")), "'TRUE'");
    }

    #[test]
    fn format_value_passes_function_calls() {
        assert_eq!(format_value(&Value::from("NOW()")), "NOW()");
        assert_eq!(format_value(&Value::from("O'Brien")), r"'O\'Brien'");
        assert_eq!(format_value(&Value::from(7)), "7");
    }
}

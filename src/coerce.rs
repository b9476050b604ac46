use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

/// A filter literal after coercion.
///
/// Filter values travel through the parser as raw strings and are coerced
/// exactly once, when the clause is compiled into a store condition. An
/// unparseable tag body degrades to [`FilterValue::Text`] so the clause
/// becomes a literal string comparison instead of failing the request.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Int(i64),
    Date(NaiveDateTime),
    DateTime(NaiveDateTime),
    Text(String),
}

/// Coerce a raw filter literal into a typed value.
///
/// Rules are checked in order, first match wins:
/// 1. `int(<digits>)` — signed integer
/// 2. `date(YYYYMMDD)` — midnight of the given calendar date
/// 3. `datetime(YYYYMMDD HH:MM:SS)` — full timestamp
/// 4. anything else — the raw string, unmodified
#[must_use]
pub fn coerce(raw: &str) -> FilterValue {
    if let Some(body) = tag_body(raw, "int")
        && let Ok(value) = body.parse::<i64>()
    {
        return FilterValue::Int(value);
    }
    if let Some(body) = tag_body(raw, "date")
        && let Some(date) = parse_compact_date(body)
    {
        return FilterValue::Date(date.and_time(NaiveTime::MIN));
    }
    if let Some(body) = tag_body(raw, "datetime")
        && let Ok(timestamp) = NaiveDateTime::parse_from_str(body, "%Y%m%d %H:%M:%S")
    {
        return FilterValue::DateTime(timestamp);
    }
    FilterValue::Text(raw.to_string())
}

fn tag_body<'a>(raw: &'a str, tag: &str) -> Option<&'a str> {
    raw.strip_prefix(tag)?.strip_prefix('(')?.strip_suffix(')')
}

fn parse_compact_date(body: &str) -> Option<NaiveDate> {
    // %Y%m%d alone would accept shorter strings like "202111".
    if body.len() != 8 || !body.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    NaiveDate::parse_from_str(body, "%Y%m%d").ok()
}

impl From<FilterValue> for sea_orm::Value {
    fn from(value: FilterValue) -> Self {
        match value {
            FilterValue::Int(n) => n.into(),
            FilterValue::Date(ts) | FilterValue::DateTime(ts) => ts.into(),
            FilterValue::Text(s) => s.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coerces_integer_tag() {
        assert_eq!(coerce("int(42)"), FilterValue::Int(42));
        assert_eq!(coerce("int(-7)"), FilterValue::Int(-7));
    }

    #[test]
    fn invalid_integer_body_falls_back_to_text() {
        assert_eq!(coerce("int(12a)"), FilterValue::Text("int(12a)".into()));
        assert_eq!(coerce("int()"), FilterValue::Text("int()".into()));
    }

    #[test]
    fn coerces_date_tag_to_midnight() {
        let expected = NaiveDate::from_ymd_opt(2021, 3, 14)
            .unwrap()
            .and_time(NaiveTime::MIN);
        assert_eq!(coerce("date(20210314)"), FilterValue::Date(expected));
    }

    #[test]
    fn invalid_calendar_date_falls_back_to_text() {
        // February 30th is not a valid date, so the rule does not match.
        assert_eq!(
            coerce("date(20210230)"),
            FilterValue::Text("date(20210230)".into())
        );
        assert_eq!(
            coerce("date(2021031)"),
            FilterValue::Text("date(2021031)".into())
        );
    }

    #[test]
    fn coerces_datetime_tag() {
        let expected = NaiveDate::from_ymd_opt(2021, 3, 14)
            .unwrap()
            .and_hms_opt(15, 9, 26)
            .unwrap();
        assert_eq!(
            coerce("datetime(20210314 15:09:26)"),
            FilterValue::DateTime(expected)
        );
    }

    #[test]
    fn invalid_datetime_falls_back_to_text() {
        assert_eq!(
            coerce("datetime(20210314 25:00:00)"),
            FilterValue::Text("datetime(20210314 25:00:00)".into())
        );
    }

    #[test]
    fn bare_text_is_untouched() {
        assert_eq!(coerce("%foo%"), FilterValue::Text("%foo%".into()));
        assert_eq!(coerce(""), FilterValue::Text(String::new()));
    }
}

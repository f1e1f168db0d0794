// ===============================
// src/numeric.rs
// ===============================
//
// Parsing helpers untuk input bebas dari form dan record dari ledger service:
// - sanitize_numeric: hanya digit + satu titik desimal
// - parse_numeric: string tersanitasi -> Decimal (None kalau kosong / "." saja)
// - parse_timestamp: RFC 3339, ISO tanpa zona (dianggap UTC), atau tanggal saja
// - lenient_decimal: serde helper, angka/string diterima, sisanya None
//
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;

/// Keeps ASCII digits and the first decimal point; everything else is dropped.
pub fn sanitize_numeric(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut seen_dot = false;
    for c in input.chars() {
        if c.is_ascii_digit() {
            out.push(c);
        } else if c == '.' && !seen_dot {
            seen_dot = true;
            out.push(c);
        }
    }
    out
}

pub fn parse_numeric(input: &str) -> Option<Decimal> {
    let clean = sanitize_numeric(input);
    let body = clean.strip_suffix('.').unwrap_or(&clean);
    if body.is_empty() {
        return None;
    }
    if body.starts_with('.') {
        format!("0{body}").parse().ok()
    } else {
        body.parse().ok()
    }
}

const NAIVE_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

pub fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    let t = text.trim();
    if t.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(t) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(t, fmt) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    NaiveDate::parse_from_str(t, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// JSON number or numeric string -> Decimal. Signs are kept (shares can be negative).
pub fn decimal_from_json(v: &Value) -> Option<Decimal> {
    match v {
        Value::Number(n) => {
            let s = n.to_string();
            s.parse::<Decimal>().ok().or_else(|| Decimal::from_scientific(&s).ok())
        }
        Value::String(s) => s.trim().parse::<Decimal>().ok(),
        _ => None,
    }
}

pub fn lenient_decimal<'de, D>(de: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(de)?;
    Ok(raw.as_ref().and_then(decimal_from_json))
}

/// Per-member form values may come in as strings or bare numbers.
pub fn text_or_number_map<'de, D>(de: D) -> Result<BTreeMap<i64, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = BTreeMap::<i64, Value>::deserialize(de)?;
    Ok(raw
        .into_iter()
        .map(|(id, v)| {
            let text = match v {
                Value::String(s) => s,
                Value::Number(n) => n.to_string(),
                _ => String::new(),
            };
            (id, text)
        })
        .collect())
}

// Payload ke ledger service: angka JSON biasa, bukan string
pub fn serialize_float_map<S>(map: &BTreeMap<i64, Decimal>, s: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let mut out = s.serialize_map(Some(map.len()))?;
    for (id, v) in map {
        out.serialize_entry(id, &v.to_f64().unwrap_or_default())?;
    }
    out.end()
}

//! Normalization: canonical column names and coerced cell types.
//!
//! Dirty values never abort the pipeline: an unparseable date becomes
//! [`Value::Missing`], an unparseable amount becomes zero so downstream
//! sums ignore it.

use chrono::NaiveDate;

use crate::table::{canonical_name, Table, Value, COL_AMOUNT, COL_DATE};

/// Return a normalized copy of `table`:
///
/// 1. An empty table is returned unchanged.
/// 2. Column names are trimmed and lower-cased. If two columns collapse to
///    the same canonical name the first keeps its position and later
///    duplicates are dropped.
/// 3. `data` cells are parsed as day-first calendar dates; failures become
///    the missing-date marker.
/// 4. `valor` cells are parsed as numbers; failures become `0.0`.
///
/// Idempotent: normalizing a normalized table yields an identical table.
pub fn normalize(table: &Table) -> Table {
    if table.is_empty() {
        return table.clone();
    }

    // Renamed column set, first occurrence wins on collision.
    let mut columns: Vec<String> = Vec::new();
    let mut kept: Vec<usize> = Vec::new();
    for (i, c) in table.columns().iter().enumerate() {
        let name = canonical_name(c);
        if !columns.contains(&name) {
            columns.push(name);
            kept.push(i);
        }
    }

    let date_col = columns.iter().position(|c| c == COL_DATE);
    let amount_col = columns.iter().position(|c| c == COL_AMOUNT);

    let mut out = Table::new(columns);
    for row in table.rows() {
        let cells = kept
            .iter()
            .enumerate()
            .map(|(col, &src)| {
                let v = &row[src];
                if Some(col) == date_col {
                    coerce_date(v)
                } else if Some(col) == amount_col {
                    coerce_amount(v)
                } else {
                    v.clone()
                }
            })
            .collect();
        out.push_row(cells);
    }
    out
}

fn coerce_date(v: &Value) -> Value {
    match v {
        Value::Date(d) => Value::Date(*d),
        Value::Text(s) => match parse_date_dayfirst(s) {
            Some(d) => Value::Date(d),
            None => Value::Missing,
        },
        _ => Value::Missing,
    }
}

fn coerce_amount(v: &Value) -> Value {
    match v {
        Value::Number(n) => Value::Number(*n),
        Value::Text(s) => Value::Number(parse_amount(s).unwrap_or(0.0)),
        _ => Value::Number(0.0),
    }
}

/// Day-first date parsing: `03/04/2024` is day 3, month 4. ISO dates are
/// accepted as well since exports mix formats.
pub fn parse_date_dayfirst(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    for fmt in ["%d/%m/%Y", "%d/%m/%y", "%d-%m-%Y", "%Y-%m-%d"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }
    None
}

/// Parse an amount accepting both plain (`1234.56`) and locale
/// (`1.234,56`) decimal forms.
pub fn parse_amount(s: &str) -> Option<f64> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(v) = s.parse::<f64>() {
        return Some(v);
    }
    // Whichever separator appears last is the decimal separator.
    let cleaned = match (s.rfind('.'), s.rfind(',')) {
        (Some(dot), Some(comma)) if comma > dot => s.replace('.', "").replace(',', "."),
        (Some(_), Some(_)) => s.replace(',', ""),
        (None, Some(_)) => s.replace(',', "."),
        _ => return None,
    };
    cleaned.parse().ok()
}

//! Custom template filters

use crate::trend::parse_timestamp;
use minijinja::value::Value;
use minijinja::{Error, ErrorKind, State};

/// Shown when a model's update time cannot be parsed
const UNKNOWN_DATE: &str = "Recently";

/// Register all custom filters with a minijinja Environment
pub fn register_filters(env: &mut minijinja::Environment) {
    env.add_filter("thousands", filter_thousands);
    env.add_filter("date", filter_date);
}

/// Format an integer with comma thousands separators
///
/// Example: `1234567` becomes `1,234,567`
fn filter_thousands(_state: &State, value: Value) -> Result<Value, Error> {
    let n = value.as_i64().ok_or_else(|| {
        Error::new(
            ErrorKind::InvalidOperation,
            format!("thousands filter requires an integer, got {}", value.kind()),
        )
    })?;

    Ok(Value::from(group_thousands(n)))
}

/// Format a timestamp as `YYYY-MM-DD`
///
/// Unparsable or missing timestamps render as "Recently" instead of failing
/// the whole digest.
fn filter_date(_state: &State, value: Value) -> Result<Value, Error> {
    let formatted = value
        .as_str()
        .and_then(|s| parse_timestamp(s).ok())
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| UNKNOWN_DATE.to_string());

    Ok(Value::from(formatted))
}

fn group_thousands(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);

    if n < 0 {
        grouped.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    grouped
}

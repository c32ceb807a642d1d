use serde_json::Value;

use crate::{http::client::RequestError, model::Candle};

// Coinbase schema: [time, low, high, open, close, volume]
const ROW_LEN: usize = 6;

/// Parses a candles response body. Rows are returned in received order.
pub fn parse_candles(body: &str) -> Result<Vec<Candle>, RequestError> {
    let value: Value =
        serde_json::from_str(body).map_err(|e| RequestError::JsonError(e.to_string()))?;

    let rows = match value {
        Value::Array(rows) => rows,
        other => {
            return Err(RequestError::JsonError(format!(
                "expected an array of candles, got {}",
                other
            )));
        }
    };

    rows.iter()
        .enumerate()
        .map(|(i, row)| parse_row(row).map_err(|reason| RequestError::MalformedResponse { row: i, reason }))
        .collect()
}

fn parse_row(row: &Value) -> Result<Candle, String> {
    let fields = row
        .as_array()
        .ok_or_else(|| format!("expected an array, got {}", row))?;
    if fields.len() != ROW_LEN {
        return Err(format!("expected {} fields, got {}", ROW_LEN, fields.len()));
    }

    Ok(Candle {
        time: as_int(&fields[0], "time")?,
        low: as_float(&fields[1], "low")?,
        high: as_float(&fields[2], "high")?,
        open: as_float(&fields[3], "open")?,
        close: as_float(&fields[4], "close")?,
        volume: as_float(&fields[5], "volume")?,
    })
}

// Numbers and numeric strings are accepted; fractional times are truncated.
fn as_int(value: &Value, name: &str) -> Result<i64, String> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().and_then(truncate_to_i64))
            .ok_or_else(|| format!("{} is not an integer: {}", name, n)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(truncate_to_i64))
                .ok_or_else(|| format!("{} is not an integer: {:?}", name, s))
        }
        other => Err(format!("{} is not numeric: {}", name, other)),
    }
}

// None for NaN, infinities and values outside the i64 range.
fn truncate_to_i64(f: f64) -> Option<i64> {
    const LIMIT: f64 = 9_223_372_036_854_775_808.0; // 2^63
    let t = f.trunc();
    (t.is_finite() && t >= -LIMIT && t < LIMIT).then_some(t as i64)
}

fn as_float(value: &Value, name: &str) -> Result<f64, String> {
    match value {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| format!("{} is not a float: {}", name, n)),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| format!("{} is not numeric: {:?}", name, s)),
        other => Err(format!("{} is not numeric: {}", name, other)),
    }
}

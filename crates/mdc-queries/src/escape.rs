//! Expression Escaper
//!
//! Renders a [`Value`] as the literal text that appears inside a generated
//! filter expression.
//!
//! Text is single-quoted without any quote doubling. An embedded `'` ends the
//! literal early on the server side; the legacy wire format expects exactly
//! this output, so callers must not pass untrusted text containing quotes.

use chrono::SecondsFormat;

use crate::value::Value;

/// Render a value as an expression literal
pub fn escape(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Sequence(items) => {
            let escaped: Vec<String> = items.iter().map(escape).collect();
            format!("[{}]", escaped.join(","))
        }
        Value::DateTime(dt) => format!("'{}'", dt.to_rfc3339_opts(SecondsFormat::AutoSi, false)),
        Value::Bool(b) => if *b { "true" } else { "false" }.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Text(s) => format!("'{}'", s),
        Value::Expression(expr) => expr.to_string(),
        Value::Other(s) => format!("'{}'", s),
    }
}

//! CLI output formatting module
//!
//! Commands produce a value that renders either for humans or as JSON.

pub mod table;

use serde::Serialize;

pub use table::TableFormatter;

pub trait CommandOutput: Serialize {
    fn to_human(&self) -> String;

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub fn output<T: CommandOutput>(result: &T, json_mode: bool) {
    if json_mode {
        println!("{}", serde_json::to_string_pretty(&result.to_json()).unwrap_or_default());
    } else {
        println!("{}", result.to_human());
    }
}

/// Format an optional float for display, `-` when absent or NaN.
pub fn fmt_opt(value: Option<f64>) -> String {
    value
        .filter(|v| !v.is_nan())
        .map_or_else(|| "-".to_string(), |v| format!("{v:.4}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fmt_opt() {
        assert_eq!(fmt_opt(Some(0.123_456)), "0.1235");
        assert_eq!(fmt_opt(None), "-");
        assert_eq!(fmt_opt(Some(f64::NAN)), "-");
    }
}

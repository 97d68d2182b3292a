use serde_json::Value;

use super::{format_scalar, result_object};

/// Key answer fields, in priority order.
const PRIORITY_KEYS: [&str; 4] = ["total_interest", "final_balance", "total_out", "total_in"];

/// Print just the key answer value from the output.
pub fn print_minimal(value: &Value) {
    let Some(map) = result_object(value) else {
        println!("{}", format_scalar(value));
        return;
    };

    for key in PRIORITY_KEYS {
        if let Some(val) = map.get(key).filter(|v| !v.is_null()) {
            println!("{}", format_scalar(val));
            return;
        }
    }

    if let Some((key, val)) = map.iter().find(|(_, v)| !v.is_array() && !v.is_object()) {
        println!("{}: {}", key, format_scalar(val));
    }
}
